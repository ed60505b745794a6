//! Fixture builders for tests across the workspace.

use crate::models::{Account, Engagement, Post};
use chrono::{DateTime, Utc};

pub const TEST_ORIGIN: &str = "https://example.social";

pub fn account(id: &str, last_activity: Option<DateTime<Utc>>) -> Account {
    Account {
        id: id.to_owned(),
        display_name: format!("Account {id}"),
        username: id.to_owned(),
        acct: id.to_owned(),
        last_activity,
        avatar_url: None,
    }
}

/// An unread, standalone post by `author` with a URL derived from both ids.
pub fn post(id: &str, author: &str, created_at: DateTime<Utc>) -> Post {
    Post {
        id: id.to_owned(),
        author_id: author.to_owned(),
        author_acct: format!("@{author}"),
        created_at,
        url: format!("{TEST_ORIGIN}/@{author}/{id}"),
        engagement: Engagement::default(),
        in_reply_to_id: None,
        mentions: Vec::new(),
        boost_target: None,
        content: format!("<p>post {id}</p>"),
        spoiler_text: None,
        language: None,
        sensitive: false,
        media_count: 0,
    }
}

/// `booster` boosting `target`; the outer post carries no engagement.
pub fn boost(id: &str, booster: &str, target: Post) -> Post {
    let mut outer = post(id, booster, target.created_at);
    outer.content = String::new();
    outer.boost_target = Some(Box::new(target));
    outer
}
