//! Markdown rendering.
//!
//! Posts become blockquotes, with quoted posts nested one `>` deeper per
//! level. Articles keep their HTML structure through htmd when the
//! `markdown` feature is enabled and fall back to their plain text otherwise.

use super::{format_date, group_thousands, metrics_line};
use crate::model::{ArticleResult, MAX_QUOTE_DEPTH, Post, SocialResult};

/// Render one post as a markdown blockquote.
pub fn post_to_blockquote(post: &Post) -> String {
    let mut lines = Vec::new();

    let timestamp = if post.timestamp.is_empty() { String::new() } else { format!(" -- {}", post.timestamp) };
    lines.push(format!("> **{}** (@{}){timestamp}", post.author, post.author_handle));
    lines.push(">".to_string());
    lines.extend(post.text.split('\n').map(|line| format!("> {line}")));

    if !post.media.is_empty() {
        lines.push(">".to_string());
        for media in &post.media {
            let alt = media.alt_text.as_deref().unwrap_or(media.kind.as_str());
            lines.push(format!("> ![{alt}]({})", media.url));
        }
    }

    if let Some(quoted) = post.quoted.as_deref() {
        push_quoted(&mut lines, quoted, 1);
    }

    if let Some(metrics) = metrics_line(post, group_thousands) {
        lines.push(">".to_string());
        lines.push(format!("> {metrics}"));
    }

    lines.join("\n")
}

fn push_quoted(lines: &mut Vec<String>, quoted: &Post, depth: usize) {
    let prefix = "> ".repeat(depth + 1);
    lines.push("> ".repeat(depth).trim_end().to_string());
    lines.push(format!("{prefix}**{}** (@{}):", quoted.author, quoted.author_handle));
    lines.extend(quoted.text.split('\n').map(|line| format!("{prefix}{line}")));

    if depth < MAX_QUOTE_DEPTH
        && let Some(inner) = quoted.quoted.as_deref()
    {
        push_quoted(lines, inner, depth + 1);
    }
}

/// Render a post with its reply parent or self-thread.
pub fn format_social_markdown(social: &SocialResult) -> String {
    let mut sections: Vec<String> = Vec::new();

    if let Some(parent) = &social.reply_parent {
        sections.push("*In reply to:*\n".to_string());
        sections.push(post_to_blockquote(parent));
        sections.push("\n---\n".to_string());
    }

    if !social.thread.is_empty() {
        let total = social.thread.len() + 1;
        sections.push("### Thread\n".to_string());
        for (i, post) in social.thread.iter().enumerate() {
            sections.push(format!("**{}/{total}**\n", i + 1));
            sections.push(post_to_blockquote(post));
            sections.push(String::new());
        }
        sections.push(format!("**{total}/{total}**\n"));
    }

    sections.push(post_to_blockquote(&social.post));
    sections.join("\n")
}

/// Render an article with a heading, a metadata line and its body.
pub fn format_article_markdown(article: &ArticleResult) -> String {
    let mut parts = Vec::new();

    if !article.title.is_empty() {
        parts.push(format!("# {}\n", article.title));
    }

    let mut meta = Vec::new();
    if let Some(author) = &article.author {
        meta.push(format!("By **{author}**"));
    }
    if let Some(site) = &article.site_name {
        meta.push(format!("*{site}*"));
    }
    if let Some(date) = &article.published_date {
        meta.push(format_date(date));
    }
    if !meta.is_empty() {
        parts.push(format!("{}\n", meta.join(" | ")));
    }

    if let Some(image) = &article.featured_image {
        parts.push(format!("![Featured image]({image})\n"));
    }

    let body = article
        .html_content
        .as_deref()
        .filter(|html| !html.trim().is_empty())
        .and_then(html_to_markdown)
        .unwrap_or_else(|| article.text.clone());
    parts.push(body);

    parts.join("\n")
}

/// Convert HTML to markdown with ATX headings, fenced code and `-` bullets.
#[cfg(feature = "markdown")]
fn html_to_markdown(html: &str) -> Option<String> {
    use std::sync::LazyLock;

    use htmd::options::{BulletListMarker, CodeBlockStyle, HeadingStyle, Options};
    use regex::Regex;

    static EXTRA_BLANK_LINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").expect("static regex"));

    let converter = htmd::HtmlToMarkdown::builder()
        .options(Options {
            heading_style: HeadingStyle::Atx,
            code_block_style: CodeBlockStyle::Fenced,
            bullet_list_marker: BulletListMarker::Dash,
            ..Default::default()
        })
        .skip_tags(vec!["script", "style", "noscript"])
        .build();

    match converter.convert(html) {
        Ok(markdown) => Some(EXTRA_BLANK_LINES.replace_all(markdown.trim(), "\n\n").into_owned()),
        Err(e) => {
            tracing::debug!(error = %e, "html to markdown conversion failed");
            None
        }
    }
}

#[cfg(not(feature = "markdown"))]
fn html_to_markdown(_html: &str) -> Option<String> {
    None
}
