//! # Domain Models
//!
//! Server-agnostic accounts and posts. Each server family normalizes its
//! native objects into these shapes before the selection engine sees them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque per-server account identifier.
pub type AccountId = String;

/// The API family a server speaks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerKind {
    #[default]
    Mastodon,
    Misskey,
}

impl fmt::Display for ServerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerKind::Mastodon => f.write_str("mastodon"),
            ServerKind::Misskey => f.write_str("misskey"),
        }
    }
}

/// A followed identity (or the authenticated user).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub display_name: String,
    pub username: String,
    /// `user` for local accounts, `user@host` for remote ones
    pub acct: String,
    /// When the account last posted. `None` if the server never saw it post.
    pub last_activity: Option<DateTime<Utc>>,
    pub avatar_url: Option<String>,
}

impl Account {
    /// True when the account posted strictly after `since`.
    pub fn is_active_since(&self, since: DateTime<Utc>) -> bool {
        self.last_activity.is_some_and(|at| at > since)
    }

    /// Display name, falling back to the username when the name is blank.
    pub fn label(&self) -> &str {
        if self.display_name.trim().is_empty() {
            &self.username
        } else {
            &self.display_name
        }
    }
}

/// Ways the viewer may already have engaged with a post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Engagement {
    /// Favourited (Mastodon) or reacted to (Misskey)
    pub reacted: bool,
    pub boosted_by_me: bool,
    pub bookmarked: bool,
}

impl Engagement {
    pub fn any(&self) -> bool {
        self.reacted || self.boosted_by_me || self.bookmarked
    }
}

/// The canonical post/note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub author_id: AccountId,
    /// `@user` or `@user@host`
    pub author_acct: String,
    pub created_at: DateTime<Utc>,
    /// Web URL of the post on the viewer's own server
    pub url: String,
    pub engagement: Engagement,
    pub in_reply_to_id: Option<String>,
    /// Ids of the accounts mentioned in the post
    pub mentions: Vec<AccountId>,
    /// The post this one reblogs/renotes, if any
    pub boost_target: Option<Box<Post>>,
    /// Raw body as delivered by the server (HTML for Mastodon, MFM for Misskey)
    pub content: String,
    pub spoiler_text: Option<String>,
    pub language: Option<String>,
    pub sensitive: bool,
    pub media_count: usize,
}

impl Post {
    /// The post read-state is judged on: the boosted post for a boost,
    /// otherwise the post itself.
    pub fn target(&self) -> &Post {
        self.boost_target.as_deref().unwrap_or(self)
    }

    /// Dedup key. Boosts share the key of the post they boost, so the same
    /// post reached through two followings is only shown once.
    pub fn identity_key(&self) -> &str {
        &self.target().url
    }

    pub fn is_boost(&self) -> bool {
        self.boost_target.is_some()
    }

    /// A reply that also mentions someone is treated as part of a
    /// conversation rather than a standalone post.
    pub fn is_mid_conversation(&self) -> bool {
        self.in_reply_to_id.is_some() && !self.mentions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::post;

    #[test]
    fn reply_with_mentions_is_mid_conversation() {
        let mut reply = post("1", "alice", Utc::now());
        reply.in_reply_to_id = Some("0".into());
        assert!(!reply.is_mid_conversation());

        reply.mentions.push("bob".into());
        assert!(reply.is_mid_conversation());

        reply.in_reply_to_id = None;
        assert!(!reply.is_mid_conversation());
    }

    #[test]
    fn engagement_any() {
        assert!(!Engagement::default().any());
        assert!(Engagement { bookmarked: true, ..Default::default() }.any());
        assert!(Engagement { reacted: true, ..Default::default() }.any());
        assert!(Engagement { boosted_by_me: true, ..Default::default() }.any());
    }

    #[test]
    fn label_falls_back_to_username() {
        let mut account = crate::testing::account("1", None);
        account.display_name = "  ".into();
        assert_eq!(account.label(), account.username);
    }

    #[test]
    fn server_kind_is_lowercase_in_serde() {
        let kind: ServerKind = serde_json::from_str("\"misskey\"").unwrap();
        assert_eq!(kind, ServerKind::Misskey);
        assert_eq!(ServerKind::Mastodon.to_string(), "mastodon");
    }
}
