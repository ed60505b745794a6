//! Mastodon REST entities, trimmed to the fields Rediscover reads, and their
//! normalization into the canonical shapes.

use crate::http::endpoint;
use chrono::{DateTime, NaiveDate, Utc};
use domains::{Account, Engagement, Post, Result};
use reqwest::Url;
use serde::de::IgnoredAny;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct MastodonAccount {
    pub(crate) id: String,
    pub(crate) username: String,
    pub(crate) acct: String,
    #[serde(default)]
    pub(crate) display_name: String,
    pub(crate) avatar_static: Option<String>,
    // A date ("2024-03-01") on current servers, a timestamp on older ones
    pub(crate) last_status_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Mention {
    pub(crate) id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Status {
    pub(crate) id: String,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) account: MastodonAccount,
    #[serde(default)]
    pub(crate) content: String,
    #[serde(default)]
    pub(crate) spoiler_text: String,
    #[serde(default)]
    pub(crate) sensitive: bool,
    pub(crate) language: Option<String>,
    #[serde(default)]
    pub(crate) media_attachments: Vec<IgnoredAny>,
    #[serde(default)]
    pub(crate) mentions: Vec<Mention>,
    pub(crate) in_reply_to_id: Option<String>,
    pub(crate) reblog: Option<Box<Status>>,
    // ↓↓↓ Only present for authorized requests
    pub(crate) favourited: Option<bool>,
    pub(crate) reblogged: Option<bool>,
    pub(crate) bookmarked: Option<bool>,
}

fn parse_last_status_at(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|at| at.and_utc())
}

impl From<MastodonAccount> for Account {
    fn from(account: MastodonAccount) -> Self {
        let last_activity = account.last_status_at.as_deref().and_then(parse_last_status_at);
        Account {
            id: account.id,
            display_name: account.display_name,
            username: account.username,
            acct: account.acct,
            last_activity,
            avatar_url: account.avatar_static,
        }
    }
}

impl Status {
    /// Normalizes the status; links point at `origin`'s web UI.
    pub(crate) fn into_post(self, origin: &Url) -> Result<Post> {
        let url = endpoint(origin, &format!("/@{}/{}", self.account.acct, self.id))?.to_string();
        let boost_target = match self.reblog {
            Some(inner) => Some(Box::new(inner.into_post(origin)?)),
            None => None,
        };

        Ok(Post {
            id: self.id,
            author_id: self.account.id,
            author_acct: format!("@{}", self.account.acct),
            created_at: self.created_at,
            url,
            engagement: Engagement {
                reacted: self.favourited.unwrap_or(false),
                boosted_by_me: self.reblogged.unwrap_or(false),
                bookmarked: self.bookmarked.unwrap_or(false),
            },
            in_reply_to_id: self.in_reply_to_id,
            mentions: self.mentions.into_iter().map(|m| m.id).collect(),
            boost_target,
            content: self.content,
            spoiler_text: Some(self.spoiler_text).filter(|s| !s.is_empty()),
            language: self.language.filter(|l| !l.is_empty()),
            sensitive: self.sensitive,
            media_count: self.media_attachments.len(),
        })
    }
}
