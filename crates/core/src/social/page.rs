//! Meta-tag scraping of the mirror's HTML page.
//!
//! The mirror renders Open Graph tags for crawlers: the description is the
//! post text and the title reads `Display Name (@handle)`. Nothing else about
//! the post survives, so every other field keeps its default.

use std::sync::LazyLock;

use regex::Regex;

use super::raw::{UNKNOWN_AUTHOR, UNKNOWN_HANDLE};
use crate::model::Post;
use crate::parse::Document;

static HANDLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(@?(\w+)\)").expect("static regex"));

/// The post described by the page's meta tags, or `None` without a description.
pub(crate) fn post_from_page(html: &str) -> Option<Post> {
    let doc = Document::parse(html);
    let text = doc.meta_content("og:description")?;
    let (author, author_handle) = split_title(&doc.meta_content("og:title").unwrap_or_default());

    Some(Post { text, author, author_handle, ..Default::default() })
}

/// Split `Name (@handle)` into its parts.
fn split_title(title: &str) -> (String, String) {
    let (name, handle) = match HANDLE.captures(title) {
        Some(caps) => {
            let whole = caps.get(0).map_or(0..0, |m| m.range());
            let handle = caps.get(1).map_or("", |m| m.as_str());
            (format!("{}{}", &title[..whole.start], &title[whole.end..]).trim().to_string(), handle.to_string())
        }
        None => (title.trim().to_string(), String::new()),
    };

    let name = if name.is_empty() { UNKNOWN_AUTHOR.to_string() } else { name };
    let handle = if handle.is_empty() { UNKNOWN_HANDLE.to_string() } else { handle };
    (name, handle)
}
