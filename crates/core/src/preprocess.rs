//! Markup cleanup run before readability scoring.
//!
//! A single streaming `lol_html` pass drops non-content elements, hidden
//! elements and unwraps containers whose class or id marks them as page chrome.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

/// Class/id fragments that mark page chrome rather than content.
pub(crate) static UNLIKELY_CANDIDATES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(banner|breadcrumbs?|combx|comment|community|disqus|extra|foot|header|menu|related|remark|rss|shoutbox|sidebar|sponsor|ad-break|agegate|pagination|pager|popup|share|social|newsletter|cookie)",
    )
    .expect("static regex")
});

/// Class/id fragments that mark main content.
pub(crate) static LIKELY_CONTENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(article|body|content|entry|hentry|h-entry|main|page|post|text|blog|story)").expect("static regex")
});

static HIDDEN_STYLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(display\s*:\s*none|visibility\s*:\s*hidden)").expect("static regex"));

static COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("static regex"));

const REMOVED_TAGS: &str = "script, style, noscript, iframe, svg, canvas, form, button, input, select, textarea";

/// Tags that are never unwrapped even if their class looks like chrome.
const STRUCTURAL_TAGS: [&str; 4] = ["html", "head", "body", "main"];

/// Configuration for HTML preprocessing
#[derive(Debug, Clone)]
pub struct PreprocessConfig {
    /// Whether to unwrap elements matching unlikely-candidate patterns
    pub remove_unlikely: bool,
    /// Whether to remove elements hidden by inline style or the `hidden` attribute
    pub remove_hidden: bool,
    /// Base URL for turning relative `href`/`src` values absolute
    pub base_url: Option<Url>,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self { remove_unlikely: true, remove_hidden: true, base_url: None }
    }
}

/// Preprocess HTML by removing unwanted elements.
///
/// Rewriting is best effort: if the rewriter rejects the input, the original
/// markup is returned unchanged.
pub fn preprocess_html(html: &str, config: &PreprocessConfig) -> String {
    let without_comments = COMMENT.replace_all(html, "");
    rewrite(&without_comments, config).unwrap_or_else(|| without_comments.into_owned())
}

fn rewrite(html: &str, config: &PreprocessConfig) -> Option<String> {
    let remove_unlikely = config.remove_unlikely;
    let remove_hidden = config.remove_hidden;
    let base_url = config.base_url.clone();
    let img_base_url = base_url.clone();

    let mut output = Vec::with_capacity(html.len());
    let mut rewriter = lol_html::HtmlRewriter::new(
        lol_html::Settings {
            element_content_handlers: vec![
                lol_html::element!(REMOVED_TAGS, |el| {
                    el.remove();
                    Ok(())
                }),
                lol_html::element!("*", move |el| {
                    if remove_hidden
                        && (el.has_attribute("hidden")
                            || el.get_attribute("style").is_some_and(|s| HIDDEN_STYLE.is_match(&s))
                            || el.get_attribute("aria-hidden").is_some_and(|v| v == "true"))
                    {
                        el.remove();
                        return Ok(());
                    }

                    if remove_unlikely && !STRUCTURAL_TAGS.contains(&el.tag_name().as_str()) {
                        let marker =
                            format!("{} {}", el.get_attribute("class").unwrap_or_default(), el.get_attribute("id").unwrap_or_default());
                        if UNLIKELY_CANDIDATES.is_match(&marker) && !LIKELY_CONTENT.is_match(&marker) {
                            el.remove_and_keep_content();
                        }
                    }
                    Ok(())
                }),
                lol_html::element!("a[href]", move |el| {
                    if let Some(base) = &base_url
                        && let Some(href) = el.get_attribute("href")
                        && let Ok(absolute) = base.join(&href)
                    {
                        el.set_attribute("href", absolute.as_str()).ok();
                    }
                    Ok(())
                }),
                lol_html::element!("img[src]", move |el| {
                    if let Some(base) = &img_base_url
                        && let Some(src) = el.get_attribute("src")
                        && let Ok(absolute) = base.join(&src)
                    {
                        el.set_attribute("src", absolute.as_str()).ok();
                    }
                    Ok(())
                }),
            ],
            ..Default::default()
        },
        |c: &[u8]| output.extend_from_slice(c),
    );

    rewriter.write(html.as_bytes()).ok()?;
    rewriter.end().ok()?;

    let output = String::from_utf8_lossy(&output).into_owned();
    if output.is_empty() && !html.is_empty() { None } else { Some(output) }
}
