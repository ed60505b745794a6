//! Eligibility of a single post for rediscovery.

use chrono::{DateTime, Utc};
use domains::Post;

/// Whether `post` is recent, not written by `my_id`, and shows no sign of
/// having been read. Boosts are judged on the boosted post.
///
/// Session dedup is not checked here; the engine owns that state.
pub fn is_recent_unread(post: &Post, since: DateTime<Utc>, my_id: &str) -> bool {
    let target = post.target();

    if target.engagement.any() {
        // Reacted, boosted or bookmarked: clearly read
        return false;
    }
    if post.author_id == my_id || target.author_id == my_id {
        return false;
    }
    if target.is_mid_conversation() {
        return false;
    }
    target.created_at > since
}
