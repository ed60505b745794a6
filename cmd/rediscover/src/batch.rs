use crate::render;
use anyhow::Context;
use chrono::Utc;
use domains::{Account, Post, Result as ApiResult};
use services::{Rediscover, Shuffler};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Samples a batch of active followings, asks for one unread post each
/// concurrently, and prints the results in sampling order. Returns how many
/// posts were shown, or `None` once no active following is left to sample.
pub async fn show_batch<S>(engine: &Arc<Rediscover<S>>) -> anyhow::Result<Option<usize>>
where
    S: Shuffler + 'static,
{
    let accounts = engine.next_batch().await.context("fetching followings")?;
    if accounts.is_empty() {
        return Ok(None);
    }

    let mut tasks: JoinSet<(usize, Account, ApiResult<Option<Post>>)> = JoinSet::new();
    for (index, account) in accounts.into_iter().enumerate() {
        let engine = Arc::clone(engine);
        tasks.spawn(async move {
            let picked = engine.next_unread_post(&account.id).await;
            (index, account, picked)
        });
    }

    let mut cards = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        let (index, account, picked) = joined.context("post lookup task failed")?;
        match picked {
            Ok(Some(post)) => cards.push((index, account, post)),
            Ok(None) => debug!(account = %account.acct, "no unread posts"),
            Err(e) => warn!(account = %account.acct, error = %e, "dropping account"),
        }
    }
    cards.sort_by_key(|(index, ..)| *index);

    let now = Utc::now();
    for (_, account, post) in &cards {
        println!("{}", render::Card { account, post, now });
    }
    Ok(Some(cards.len()))
}
