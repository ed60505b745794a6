//! rediscover/crates/domains/src/lib.rs
//!
//! The canonical account/post shapes, the server port, and the error type
//! shared by every Rediscover crate.

pub mod error;
pub mod models;
pub mod traits;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use traits::*;

#[cfg(test)]
mod tests {
    use super::testing::{account, post};
    use chrono::{Duration, Utc};

    #[test]
    fn test_boosted_post_keys_on_target() {
        let now = Utc::now();
        let inner = post("inner", "carol", now - Duration::days(1));
        let mut boost = post("outer", "alice", now);
        boost.boost_target = Some(Box::new(inner.clone()));

        assert_eq!(boost.target().id, "inner");
        assert_eq!(boost.identity_key(), inner.url);
        assert_eq!(inner.identity_key(), inner.url);
    }

    #[test]
    fn test_account_activity_cutoff() {
        let now = Utc::now();
        let recent = account("a", Some(now - Duration::days(1)));
        let stale = account("b", Some(now - Duration::days(30)));
        let silent = account("c", None);

        let since = now - Duration::days(7);
        assert!(recent.is_active_since(since));
        assert!(!stale.is_active_since(since));
        assert!(!silent.is_active_since(since));
    }
}
