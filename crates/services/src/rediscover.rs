//! # Rediscover
//!
//! Session-scoped selection state over a `ServerApi`.
//!
//! Per account the engine moves `Unknown → Cached(posts) → {HasCandidate |
//! Drained}`. Nothing is refetched or evicted while the engine lives, and a
//! drained account stays drained.

use crate::filter::is_recent_unread;
use crate::options::RediscoverOptions;
use crate::shuffle::{Shuffler, ThreadRngShuffler};
use chrono::{DateTime, Utc};
use dashmap::{DashMap, DashSet};
use domains::{Account, AccountId, ApiError, Post, Result, ServerApi};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info};

pub struct Rediscover<S = ThreadRngShuffler> {
    api: Arc<dyn ServerApi>,
    shuffler: S,
    since: DateTime<Utc>,
    batch_size: usize,

    me: OnceCell<Account>,
    followings: OnceCell<Arc<Vec<Account>>>,
    posts_by_account: DashMap<AccountId, Arc<Vec<Post>>>,
    /// Identity keys already handed out this session
    shown_keys: DashSet<String>,
    /// Accounts with no unread post left
    drained: DashSet<AccountId>,
}

impl Rediscover<ThreadRngShuffler> {
    pub fn new(api: Arc<dyn ServerApi>, options: RediscoverOptions) -> Self {
        Self::with_shuffler(api, options, ThreadRngShuffler)
    }
}

impl<S: Shuffler> Rediscover<S> {
    pub fn with_shuffler(api: Arc<dyn ServerApi>, options: RediscoverOptions, shuffler: S) -> Self {
        Self {
            api,
            shuffler,
            since: options.since.resolve(Utc::now()),
            batch_size: options.batch_size,
            me: OnceCell::new(),
            followings: OnceCell::new(),
            posts_by_account: DashMap::new(),
            shown_keys: DashSet::new(),
            drained: DashSet::new(),
        }
    }

    pub fn since(&self) -> DateTime<Utc> {
        self.since
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn is_drained(&self, account_id: &str) -> bool {
        self.drained.contains(account_id)
    }

    pub fn shown_count(&self) -> usize {
        self.shown_keys.len()
    }

    async fn me(&self) -> Result<&Account> {
        self.me.get_or_try_init(|| self.api.me()).await
    }

    /// The full following list, fetched once per session. Concurrent callers
    /// wait on the same fetch; a failed fetch is retried by the next caller.
    pub async fn fetch_all_followings(&self) -> Result<Arc<Vec<Account>>> {
        let followings = self
            .followings
            .get_or_try_init(|| async {
                let accounts = self.api.followings().await?;
                debug!(count = accounts.len(), "fetched followings");
                Ok::<_, ApiError>(Arc::new(accounts))
            })
            .await?;
        Ok(Arc::clone(followings))
    }

    /// Up to `max` followings that posted after the cutoff and are not
    /// drained, in random order.
    pub async fn active_followings(&self, max: usize) -> Result<Vec<Account>> {
        let followings = self.fetch_all_followings().await?;
        let mut active: Vec<Account> = followings
            .iter()
            .filter(|account| {
                account.is_active_since(self.since) && !self.drained.contains(&account.id)
            })
            .cloned()
            .collect();

        let qualifying = active.len();
        self.shuffler.shuffle(&mut active);
        active.truncate(max);
        debug!(qualifying, picked = active.len(), "sampled active followings");
        Ok(active)
    }

    /// `active_followings` with the configured batch size.
    pub async fn next_batch(&self) -> Result<Vec<Account>> {
        self.active_followings(self.batch_size).await
    }

    async fn posts_of(&self, account_id: &str) -> Result<Arc<Vec<Post>>> {
        let cached = self
            .posts_by_account
            .get(account_id)
            .map(|posts| Arc::clone(posts.value()));
        if let Some(posts) = cached {
            debug!(account_id, "post cache hit");
            return Ok(posts);
        }

        let fetched = Arc::new(self.api.posts(account_id).await?);
        debug!(account_id, count = fetched.len(), "fetched posts");

        // Two first accesses may race; whichever lands first is kept.
        let stored = self
            .posts_by_account
            .entry(account_id.to_owned())
            .or_insert(fetched);
        Ok(Arc::clone(stored.value()))
    }

    /// One random unread post of `account_id` not yet shown this session.
    ///
    /// `Ok(None)` means the account is drained and will not be fetched again.
    /// Fetch failures are returned as-is and leave the account eligible.
    pub async fn next_unread_post(&self, account_id: &str) -> Result<Option<Post>> {
        if self.drained.contains(account_id) {
            return Ok(None);
        }

        let me = self.me().await?;
        let posts = self.posts_of(account_id).await?;

        let mut candidates: Vec<&Post> = posts
            .iter()
            .filter(|post| {
                !self.shown_keys.contains(post.identity_key())
                    && is_recent_unread(post, self.since, &me.id)
            })
            .collect();
        self.shuffler.shuffle(&mut candidates);

        // The insert is the claim: a concurrent caller that lost the race on
        // a key moves on to its next candidate.
        let picked = candidates
            .into_iter()
            .find(|post| self.shown_keys.insert(post.identity_key().to_owned()));

        match picked {
            Some(post) => {
                debug!(account_id, key = post.identity_key(), "picked unread post");
                Ok(Some(post.clone()))
            }
            None => {
                self.drained.insert(account_id.to_owned());
                info!(account_id, "account drained");
                Ok(None)
            }
        }
    }
}
