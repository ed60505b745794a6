//! Terminal rendering of a rediscovered post.

use chrono::{DateTime, Utc};
use domains::{Account, Post};
use std::fmt;

const MAX_BODY_CHARS: usize = 500;

/// "3 days ago", "5 hours ago", "just now".
pub fn relative_age(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let age = now.signed_duration_since(then);
    let (amount, unit) = if age.num_days() > 0 {
        (age.num_days(), "day")
    } else if age.num_hours() > 0 {
        (age.num_hours(), "hour")
    } else if age.num_minutes() > 0 {
        (age.num_minutes(), "minute")
    } else {
        return "just now".to_owned();
    };
    let plural = if amount == 1 { "" } else { "s" };
    format!("{amount} {unit}{plural} ago")
}

/// Strips markup from a status body. Paragraph and line breaks become
/// newlines and character references are decoded.
pub fn plain_text(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut rest = html;
    while let Some(start) = rest.find('<') {
        text.push_str(&rest[..start]);
        let Some(end) = rest[start..].find('>') else {
            rest = &rest[start..];
            break;
        };
        let tag = &rest[start + 1..start + end];
        if tag.starts_with("br") || tag == "/p" {
            text.push('\n');
        }
        rest = &rest[start + end + 1..];
    }
    text.push_str(rest);

    html_escape::decode_html_entities(&text).trim().to_owned()
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text.to_owned(),
    }
}

/// One post as printed to the terminal.
pub struct Card<'a> {
    pub account: &'a Account,
    pub post: &'a Post,
    pub now: DateTime<Utc>,
}

impl fmt::Display for Card<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let target = self.post.target();

        writeln!(f, "── {} (@{})", self.account.label(), self.account.acct)?;
        if self.post.is_boost() {
            writeln!(f, "   boosted {}", target.author_acct)?;
        }
        match &target.spoiler_text {
            Some(cw) => writeln!(f, "   (CW: {cw})")?,
            None => {
                for line in truncate(&plain_text(&target.content), MAX_BODY_CHARS).lines() {
                    writeln!(f, "   {line}")?;
                }
            }
        }

        let mut notes = Vec::new();
        if target.media_count > 0 {
            notes.push(format!("{} media", target.media_count));
        }
        if target.sensitive {
            notes.push("marked as sensitive".to_owned());
        }
        if !notes.is_empty() {
            writeln!(f, "   ({})", notes.join(", "))?;
        }
        write!(f, "   {} · {}", relative_age(target.created_at, self.now), target.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use domains::testing::{account, boost, post};

    #[test]
    fn ages_read_naturally() {
        let now = Utc::now();
        assert_eq!(relative_age(now - Duration::days(3), now), "3 days ago");
        assert_eq!(relative_age(now - Duration::hours(1), now), "1 hour ago");
        assert_eq!(relative_age(now - Duration::minutes(5), now), "5 minutes ago");
        assert_eq!(relative_age(now - Duration::seconds(10), now), "just now");
    }

    #[test]
    fn markup_is_stripped() {
        assert_eq!(
            plain_text("<p>Hello <a href=\"x\">@bob</a> &amp; co</p><p>second<br>line</p>"),
            "Hello @bob & co\nsecond\nline"
        );
        assert_eq!(plain_text("plain misskey text"), "plain misskey text");
        assert_eq!(plain_text("dangling <b"), "dangling <b");
    }

    #[test]
    fn numeric_and_named_references_are_decoded() {
        assert_eq!(
            plain_text("<p>it&#x27;s&nbsp;fine &#8212; ok</p>"),
            "it's\u{a0}fine \u{2014} ok"
        );
        assert_eq!(plain_text("&lt;b&gt;not a tag&lt;/b&gt;"), "<b>not a tag</b>");
    }

    #[test]
    fn long_bodies_are_truncated_on_char_boundaries() {
        assert_eq!(truncate("héllo", 2), "hé…");
        assert_eq!(truncate("hi", 5), "hi");
    }

    #[test]
    fn card_shows_boost_and_content_warning() {
        let now = Utc::now();
        let mut inner = post("7", "carol", now - Duration::days(2));
        inner.spoiler_text = Some("spoilers".into());
        inner.media_count = 2;
        let account = account("alice", Some(now));
        let post = boost("8", "alice", inner);
        let card = Card {
            account: &account,
            post: &post,
            now,
        }
        .to_string();

        assert!(card.contains("boosted @carol"));
        assert!(card.contains("(CW: spoilers)"));
        assert!(!card.contains("post 7"));
        assert!(card.contains("(2 media)"));
        assert!(card.contains("2 days ago · https://example.social/@carol/7"));
    }
}
