//! Rendering of extraction results.
//!
//! Every formatter is a pure function of its input: the same [`Extraction`]
//! always renders to identical bytes.

pub mod json;
pub mod markdown;
pub mod text;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

pub use json::{ErrorEnvelope, SuccessEnvelope, error_envelope, success_envelope, to_json};
pub use markdown::{format_article_markdown, format_social_markdown, post_to_blockquote};
pub use text::{format_article_text, format_post_text, format_social_text};

use crate::model::{Extraction, Post};

/// Render any extraction as plain text.
pub fn format_plain_text(extraction: &Extraction) -> String {
    match extraction {
        Extraction::Social(social) => format_social_text(social),
        Extraction::Article(article) => format_article_text(article),
    }
}

/// Render any extraction as markdown.
pub fn format_markdown(extraction: &Extraction) -> String {
    match extraction {
        Extraction::Social(social) => format_social_markdown(social),
        Extraction::Article(article) => format_article_markdown(article),
    }
}

/// Render a publication date as `June 15, 2024`.
///
/// Accepts RFC 3339, RFC 2822, the mirror's `Sat Jun 15 10:00:00 +0000 2024`
/// form and bare `YYYY-MM-DD`. Anything else is returned unchanged.
pub fn format_date(raw: &str) -> String {
    let raw = raw.trim();
    let date = DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_rfc2822(raw))
        .or_else(|_| DateTime::parse_from_str(raw, "%a %b %d %H:%M:%S %z %Y"))
        .map(|dt| dt.date_naive())
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S").map(|dt| dt.date()))
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"));

    match date {
        Ok(date) => date.format("%B %-d, %Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// `1234567` as `1,234,567`.
pub(crate) fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Non-zero engagement counts joined with `" | "`, or `None` when all are zero.
pub(crate) fn metrics_line(post: &Post, number: fn(u64) -> String) -> Option<String> {
    let metrics: Vec<String> = [
        (post.likes, "likes"),
        (post.retweets, "retweets"),
        (post.replies, "replies"),
        (post.bookmarks, "bookmarks"),
    ]
    .into_iter()
    .filter(|(count, _)| *count > 0)
    .map(|(count, label)| format!("{} {label}", number(count)))
    .collect();

    (!metrics.is_empty()).then(|| metrics.join(" | "))
}
