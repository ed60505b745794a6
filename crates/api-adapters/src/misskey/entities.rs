//! Misskey API objects, trimmed to the fields Rediscover reads.

use crate::http::endpoint;
use chrono::{DateTime, Utc};
use domains::{Account, Engagement, Post, Result};
use reqwest::Url;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct User {
    pub(crate) id: String,
    pub(crate) username: String,
    /// `None` for users on the same server
    pub(crate) host: Option<String>,
    pub(crate) name: Option<String>,
    pub(crate) avatar_url: Option<String>,
    /// Only present on detailed user objects
    pub(crate) updated_at: Option<DateTime<Utc>>,
}

impl User {
    fn acct(&self) -> String {
        match &self.host {
            Some(host) => format!("{}@{}", self.username, host),
            None => self.username.clone(),
        }
    }
}

/// One row of `users/following`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Following {
    pub(crate) id: String,
    pub(crate) followee: Option<User>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DriveFile {
    #[serde(default)]
    pub(crate) is_sensitive: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Note {
    pub(crate) id: String,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) user_id: String,
    pub(crate) user: User,
    pub(crate) text: Option<String>,
    pub(crate) cw: Option<String>,
    pub(crate) reply_id: Option<String>,
    #[serde(default)]
    pub(crate) mentions: Vec<String>,
    pub(crate) renote: Option<Box<Note>>,
    pub(crate) my_reaction: Option<String>,
    #[serde(default)]
    pub(crate) files: Vec<DriveFile>,
}

impl From<User> for Account {
    fn from(user: User) -> Self {
        let acct = user.acct();
        Account {
            id: user.id,
            display_name: user.name.unwrap_or_default(),
            username: user.username,
            acct,
            last_activity: user.updated_at,
            avatar_url: user.avatar_url,
        }
    }
}

impl Note {
    /// Normalizes the note. Misskey does not report renotes or favorites by
    /// the viewer on notes, so only reactions count as engagement.
    pub(crate) fn into_post(self, origin: &Url) -> Result<Post> {
        let url = endpoint(origin, &format!("/notes/{}", self.id))?.to_string();
        let boost_target = match self.renote {
            Some(inner) => Some(Box::new(inner.into_post(origin)?)),
            None => None,
        };

        Ok(Post {
            author_acct: format!("@{}", self.user.acct()),
            id: self.id,
            author_id: self.user_id,
            created_at: self.created_at,
            url,
            engagement: Engagement {
                reacted: self.my_reaction.is_some(),
                ..Engagement::default()
            },
            in_reply_to_id: self.reply_id,
            mentions: self.mentions,
            boost_target,
            content: self.text.unwrap_or_default(),
            spoiler_text: self.cw,
            language: None,
            sensitive: self.files.iter().any(|f| f.is_sensitive),
            media_count: self.files.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn notes() -> Vec<Post> {
        let origin = Url::parse("https://misskey.example").unwrap();
        let raw: Vec<Note> =
            serde_json::from_str(include_str!("../../test_data/misskey_notes.json")).unwrap();
        raw.into_iter().map(|n| n.into_post(&origin).unwrap()).collect()
    }

    #[test]
    fn reaction_marks_note_read() {
        let notes = notes();
        let note = &notes[0];
        assert_eq!(note.url, "https://misskey.example/notes/9qa1");
        assert!(note.engagement.reacted);
        assert!(!note.engagement.bookmarked);
        assert_eq!(note.media_count, 2);
        assert!(note.sensitive);
        assert_eq!(note.content, "hello from misskey");
    }

    #[test]
    fn renote_becomes_boost_target() {
        let notes = notes();
        let renote = &notes[1];
        let target = renote.target();

        assert!(renote.is_boost());
        assert_eq!(renote.content, "");
        assert_eq!(target.author_id, "u42");
        assert_eq!(target.author_acct, "@carol@remote.example");
        assert_eq!(renote.identity_key(), "https://misskey.example/notes/8zz9");
        assert!(target.is_mid_conversation());
        assert_eq!(target.spoiler_text.as_deref(), Some("long"));
    }

    #[test]
    fn followees_normalize() {
        let page: Vec<Following> =
            serde_json::from_str(include_str!("../../test_data/misskey_following.json")).unwrap();
        assert_eq!(page.last().map(|f| f.id.as_str()), Some("rel-1"));

        let accounts: Vec<Account> = page.into_iter().filter_map(|f| f.followee).map(Account::from).collect();
        assert_eq!(accounts[0].acct, "carol@remote.example");
        assert_eq!(
            accounts[0].last_activity,
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap())
        );
        assert_eq!(accounts[1].acct, "dan");
        assert_eq!(accounts[1].last_activity, None);
        assert_eq!(accounts[1].label(), "dan");
    }
}
