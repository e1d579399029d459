//! Plain-text rendering.

use super::{format_date, metrics_line};
use crate::model::{ArticleResult, MAX_QUOTE_DEPTH, Post, SocialResult};

/// Render one post: header line, text, media, quoted chain and metrics.
pub fn format_post_text(post: &Post) -> String {
    let mut out = format!("{} (@{})", post.author, post.author_handle);
    if !post.timestamp.is_empty() {
        out.push_str(&format!(" -- {}", post.timestamp));
    }
    out.push_str(&format!("\n\n{}", post.text));

    if !post.media.is_empty() {
        let lines: Vec<String> = post
            .media
            .iter()
            .map(|media| match &media.alt_text {
                Some(alt) => format!("[{}: {}] Alt: {alt}", media.kind.as_str(), media.url),
                None => format!("[{}: {}]", media.kind.as_str(), media.url),
            })
            .collect();
        out.push('\n');
        out.push_str(&lines.join("\n"));
    }

    if let Some(quoted) = post.quoted.as_deref() {
        push_quote(&mut out, quoted, 1);
    }

    if let Some(metrics) = metrics_line(post, |n| n.to_string()) {
        out.push_str(&format!("\n\n{metrics}"));
    }

    out
}

/// Each nesting level adds one `> ` in front of its lines.
fn push_quote(out: &mut String, quoted: &Post, depth: usize) {
    let prefix = "> ".repeat(depth);
    if depth == 1 {
        out.push_str("\n\n");
    } else {
        out.push_str(&format!("\n{}\n", "> ".repeat(depth - 1).trim_end()));
    }

    out.push_str(&format!("{prefix}Quoting @{}:", quoted.author_handle));
    for line in quoted.text.split('\n') {
        out.push_str(&format!("\n{prefix}{line}"));
    }

    if depth < MAX_QUOTE_DEPTH
        && let Some(inner) = quoted.quoted.as_deref()
    {
        push_quote(out, inner, depth + 1);
    }
}

/// Render a post with its reply parent or self-thread.
pub fn format_social_text(social: &SocialResult) -> String {
    let mut parts: Vec<String> = Vec::new();

    if let Some(parent) = &social.reply_parent {
        parts.push(format_post_text(parent));
        parts.push("---".to_string());
        parts.push(format!("Replying to @{}:\n", parent.author_handle));
    }

    if !social.thread.is_empty() {
        let total = social.thread.len() + 1;
        parts.push("Thread:\n".to_string());
        for (i, post) in social.thread.iter().enumerate() {
            parts.push(format!("[{}/{total}]", i + 1));
            parts.push(format_post_text(post));
            parts.push(String::new());
        }
        parts.push(format!("[{total}/{total}]"));
    }

    parts.push(format_post_text(&social.post));
    parts.join("\n")
}

/// Render an article: title, byline, site, publication date, then the body.
pub fn format_article_text(article: &ArticleResult) -> String {
    let mut header = String::new();
    if !article.title.is_empty() {
        header.push_str(&format!("{}\n", article.title));
    }
    if let Some(author) = &article.author {
        header.push_str(&format!("By {author}\n"));
    }
    if let Some(site) = &article.site_name {
        header.push_str(&format!("{site}\n"));
    }
    if let Some(date) = &article.published_date {
        header.push_str(&format!("Published: {}\n", format_date(date)));
    }

    if !header.is_empty() {
        header.push('\n');
    }
    header.push_str(&article.text);
    header
}
