//! In-memory `ServerApi` used to drive the engine end to end.

use async_trait::async_trait;
use domains::{Account, ApiError, Post, Result, ServerApi};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub const ME: &str = "me";

#[derive(Default)]
pub struct FakeServer {
    followings: Vec<Account>,
    posts: HashMap<String, Vec<Post>>,
    /// Accounts whose next posts fetch fails once
    failing_once: Mutex<HashSet<String>>,
    following_calls: AtomicUsize,
    post_calls: Mutex<HashMap<String, usize>>,
}

impl FakeServer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_followings(mut self, followings: Vec<Account>) -> Self {
        self.followings = followings;
        self
    }

    pub fn with_posts(mut self, account_id: &str, posts: Vec<Post>) -> Self {
        self.posts.insert(account_id.to_owned(), posts);
        self
    }

    pub fn failing_once(self, account_id: &str) -> Self {
        self.failing_once
            .lock()
            .expect("fake server lock")
            .insert(account_id.to_owned());
        self
    }

    pub fn following_calls(&self) -> usize {
        self.following_calls.load(Ordering::SeqCst)
    }

    pub fn post_calls(&self, account_id: &str) -> usize {
        self.post_calls
            .lock()
            .expect("fake server lock")
            .get(account_id)
            .copied()
            .unwrap_or_default()
    }
}

#[async_trait]
impl ServerApi for FakeServer {
    async fn me(&self) -> Result<Account> {
        Ok(domains::testing::account(ME, None))
    }

    async fn followings(&self) -> Result<Vec<Account>> {
        self.following_calls.fetch_add(1, Ordering::SeqCst);
        // Give racing callers a chance to pile up on the same fetch.
        tokio::task::yield_now().await;
        Ok(self.followings.clone())
    }

    async fn posts(&self, account_id: &str) -> Result<Vec<Post>> {
        *self
            .post_calls
            .lock()
            .expect("fake server lock")
            .entry(account_id.to_owned())
            .or_default() += 1;

        let fail = self
            .failing_once
            .lock()
            .expect("fake server lock")
            .remove(account_id);
        if fail {
            return Err(ApiError::Transport(format!("{account_id}: connection reset")));
        }

        tokio::task::yield_now().await;
        Ok(self.posts.get(account_id).cloned().unwrap_or_default())
    }
}
