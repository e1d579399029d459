use std::sync::LazyLock;

use regex::Regex;

/// Configuration for cleaning up extracted content.
#[derive(Debug, Clone)]
pub struct PostProcessConfig {
    /// Whether to keep class attributes (default: false)
    pub keep_classes: bool,
    /// Whether to remove elements with no text
    pub remove_empty_nodes: bool,
    /// Maximum passes for removing empty nodes
    pub max_empty_node_passes: usize,
}

impl Default for PostProcessConfig {
    fn default() -> Self {
        Self { keep_classes: false, remove_empty_nodes: true, max_empty_node_passes: 10 }
    }
}

static CONDITIONAL_COMMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<!--\[if[^\]]*\]>.*?<!\[endif\]-->|<!--<!\[if[^\]]*\]>.*?<!\[endif\]-->").expect("static regex")
});

static CLASS_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\s+class\s*=\s*(?:"[^"]*"|'[^']*')"#).expect("static regex"));

/// Containers dropped when they hold nothing but whitespace and `<br>`s.
/// The regex crate has no backreferences, so there is one pattern per tag.
static EMPTY_NODES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    ["div", "p", "span", "section", "article", "aside", "header", "footer", "li", "ul", "ol", "strong", "em", "a"]
        .iter()
        .map(|tag| {
            Regex::new(&format!(r"(?i)<{tag}(?:\s[^>]*)?>(?:\s|&nbsp;|<br\s*/?>)*</{tag}>")).expect("static regex")
        })
        .collect()
});

/// Clean extracted HTML: drop conditional comments, strip classes, remove empty nodes.
pub fn postprocess_html(html: &str, config: &PostProcessConfig) -> String {
    let mut processed = CONDITIONAL_COMMENT.replace_all(html, "").into_owned();

    if !config.keep_classes {
        processed = CLASS_ATTR.replace_all(&processed, "").into_owned();
    }

    if config.remove_empty_nodes {
        processed = remove_empty_nodes(&processed, config.max_empty_node_passes);
    }

    processed
}

/// Nested empties need one pass per level, so repeat until nothing changes.
fn remove_empty_nodes(html: &str, max_passes: usize) -> String {
    let mut result = html.to_string();
    for _ in 0..max_passes {
        let before = result.len();
        for re in EMPTY_NODES.iter() {
            result = re.replace_all(&result, "").into_owned();
        }
        if result.len() == before {
            break;
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_classes_by_default() {
        let html = r#"<div class="content main"><p class='lead'>Text</p></div>"#;
        assert_eq!(postprocess_html(html, &PostProcessConfig::default()), "<div><p>Text</p></div>");
    }

    #[test]
    fn test_keep_classes() {
        let html = r#"<p class="lead">Text</p>"#;
        let config = PostProcessConfig { keep_classes: true, ..Default::default() };
        assert_eq!(postprocess_html(html, &config), html);
    }

    #[test]
    fn test_removes_nested_empty_nodes() {
        let html = "<div><p>Keep</p><div><p>  <br/> </p></div><span></span></div>";
        assert_eq!(postprocess_html(html, &PostProcessConfig::default()), "<div><p>Keep</p></div>");
    }

    #[test]
    fn test_images_survive_empty_node_pass() {
        let html = r#"<p><img src="a.png"></p>"#;
        assert_eq!(postprocess_html(html, &PostProcessConfig::default()), html);
    }

    #[test]
    fn test_removes_conditional_comments() {
        let html = "<p>a</p><!--[if IE]><p>ie</p><![endif]--><p>b</p>";
        assert_eq!(postprocess_html(html, &PostProcessConfig::default()), "<p>a</p><p>b</p>");
    }
}
