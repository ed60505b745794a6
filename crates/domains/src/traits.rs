//! # Core Traits (Ports)
//!
//! Every server family plugs in by implementing `ServerApi`.

use crate::error::Result;
use crate::models::{Account, Post};
use async_trait::async_trait;

/// What the selection engine needs from a server: who I am, whom I follow,
/// and what a given account has posted lately.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ServerApi: Send + Sync {
    /// The authenticated account.
    async fn me(&self) -> Result<Account>;

    /// Every account the authenticated user follows. Implementations page
    /// through the server's listing until it is exhausted.
    async fn followings(&self) -> Result<Vec<Account>>;

    /// Recent posts of `account_id`, normalized.
    async fn posts(&self, account_id: &str) -> Result<Vec<Post>>;
}
