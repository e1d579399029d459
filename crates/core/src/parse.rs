//! HTML parsing and DOM navigation.
//!
//! [`Document`] and [`Element`] wrap `scraper` so the readability and metadata
//! passes can query markup with CSS selectors and walk up to ancestors.
//!
//! # Example
//!
//! ```rust
//! use clipmark_core::parse::Document;
//!
//! let doc = Document::parse(r#"<html><head><title>Test</title></head><body><p class="c">Hi</p></body></html>"#);
//! assert_eq!(doc.title(), Some("Test".to_string()));
//! assert_eq!(doc.select("p.c").unwrap().len(), 1);
//! ```

use std::sync::LazyLock;

use ego_tree::iter::Edge;
use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};

use crate::preprocess::{PreprocessConfig, preprocess_html};
use crate::{ExtractError, Result};

/// Elements that end a paragraph when flattening markup to text.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "div", "dl", "dt", "figcaption", "figure", "footer", "h1", "h2",
    "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "nav", "ol", "p", "pre", "section", "table", "tr", "ul",
];

static BLANK_LINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").expect("static regex"));

/// Node identity inside one parsed document.
pub type NodeId = ego_tree::NodeId;

/// A parsed HTML document.
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses HTML without any cleanup. Never fails; html5ever recovers from any input.
    pub fn parse(html: &str) -> Self {
        Self { html: Html::parse_document(html) }
    }

    /// Parses HTML after stripping scripts, hidden chrome and unlikely candidates.
    pub fn parse_with_preprocessing(html: &str, config: &PreprocessConfig) -> Self {
        let cleaned = preprocess_html(html, config);
        Self::parse(&cleaned)
    }

    /// Selects elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::ParseFailed`] if the selector is invalid.
    pub fn select(&'_ self, selector: &str) -> Result<Vec<Element<'_>>> {
        let sel = compile(selector)?;
        Ok(self.html.select(&sel).map(Element::new).collect())
    }

    /// The first element matching `selector`, if any.
    pub fn select_first(&'_ self, selector: &str) -> Result<Option<Element<'_>>> {
        let sel = compile(selector)?;
        Ok(self.html.select(&sel).next().map(Element::new))
    }

    /// Content of the `<title>` element.
    pub fn title(&self) -> Option<String> {
        let el = self.select_first("title").ok().flatten()?;
        let text = el.text();
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }

    /// The `<body>` element.
    pub fn body(&'_ self) -> Option<Element<'_>> {
        self.select_first("body").ok().flatten()
    }

    /// Content of a `<meta>` tag matched by `name` or `property`.
    pub fn meta_content(&self, key: &str) -> Option<String> {
        for attr in ["property", "name"] {
            let selector = format!("meta[{}=\"{}\"]", attr, key);
            if let Ok(Some(el)) = self.select_first(&selector)
                && let Some(content) = el.attr("content")
            {
                let content = content.trim();
                if !content.is_empty() {
                    return Some(content.to_string());
                }
            }
        }
        None
    }
}

fn compile(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| ExtractError::ParseFailed(format!("Invalid selector {}: {}", selector, e)))
}

/// A single element of a [`Document`].
#[derive(Clone, Debug)]
pub struct Element<'a> {
    element: ElementRef<'a>,
}

impl<'a> Element<'a> {
    fn new(element: ElementRef<'a>) -> Self {
        Self { element }
    }

    /// Stable identity of this node within its document.
    pub fn id(&self) -> NodeId {
        self.element.id()
    }

    pub fn inner_html(&self) -> String {
        self.element.inner_html()
    }

    pub fn outer_html(&self) -> String {
        self.element.html()
    }

    /// Concatenation of all descendant text nodes.
    pub fn text(&self) -> String {
        self.element.text().collect()
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }

    /// Lowercase tag name.
    pub fn tag_name(&self) -> String {
        self.element.value().name().to_lowercase()
    }

    /// Nearest ancestor that is an element.
    pub fn parent(&self) -> Option<Element<'a>> {
        self.element.parent().and_then(ElementRef::wrap).map(Element::new)
    }

    /// Element children, in document order.
    pub fn children(&self) -> Vec<Element<'a>> {
        self.element.children().filter_map(ElementRef::wrap).map(Element::new).collect()
    }

    /// Text with paragraph breaks between block elements.
    ///
    /// Whitespace inside a line collapses to single spaces and at most one
    /// blank line separates blocks.
    pub fn readable_text(&self) -> String {
        let mut raw = String::new();
        for edge in self.element.traverse() {
            match edge {
                Edge::Open(node) => match node.value() {
                    Node::Text(text) => raw.push_str(text),
                    Node::Element(el) if el.name() == "br" => raw.push('\n'),
                    _ => {}
                },
                Edge::Close(node) => {
                    if let Node::Element(el) = node.value()
                        && BLOCK_TAGS.contains(&el.name())
                    {
                        raw.push_str("\n\n");
                    }
                }
            }
        }

        let lines: Vec<String> = raw.lines().map(|line| line.split_whitespace().collect::<Vec<_>>().join(" ")).collect();
        BLANK_LINES.replace_all(&lines.join("\n"), "\n\n").trim().to_string()
    }

    /// Selects descendants using a CSS selector.
    pub fn select(&self, selector: &str) -> Result<Vec<Element<'a>>> {
        let sel = compile(selector)?;
        Ok(self.element.select(&sel).map(Element::new).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_HTML: &str = r#"
        <!DOCTYPE html>
        <html lang="en">
        <head>
            <meta charset="UTF-8">
            <title>Test Page</title>
            <meta property="og:image" content="https://example.com/cover.png">
            <meta name="description" content="  ">
        </head>
        <body>
            <div id="outer"><p class="content">Paragraph 1</p></div>
            <p class="content">Paragraph 2</p>
            <a href="https://example.com">Link</a>
        </body>
        </html>
    "#;

    #[test]
    fn test_parse_document() {
        let doc = Document::parse(SAMPLE_HTML);
        assert_eq!(doc.title(), Some("Test Page".to_string()));
        assert!(doc.body().is_some());
    }

    #[test]
    fn test_select_elements() {
        let doc = Document::parse(SAMPLE_HTML);
        let elements = doc.select("p.content").unwrap();

        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].text(), "Paragraph 1");
        assert_eq!(elements[1].text(), "Paragraph 2");
    }

    #[test]
    fn test_parent_navigation() {
        let doc = Document::parse(SAMPLE_HTML);
        let first = doc.select_first("p.content").unwrap().unwrap();
        let parent = first.parent().unwrap();
        assert_eq!(parent.tag_name(), "div");
        assert_eq!(parent.attr("id"), Some("outer"));
        assert_eq!(parent.children().len(), 1);
    }

    #[test]
    fn test_readable_text_breaks_blocks() {
        let doc = Document::parse("<body><h1>Title</h1><p>First   line<br>second</p>\n\n\n<div><p>Last</p></div></body>");
        let body = doc.body().unwrap();
        assert_eq!(body.readable_text(), "Title\n\nFirst line\nsecond\n\nLast");
    }

    #[test]
    fn test_invalid_selector() {
        let doc = Document::parse(SAMPLE_HTML);
        assert!(matches!(doc.select("[[invalid"), Err(ExtractError::ParseFailed(_))));
    }

    #[test]
    fn test_meta_content() {
        let doc = Document::parse(SAMPLE_HTML);
        assert_eq!(doc.meta_content("og:image"), Some("https://example.com/cover.png".to_string()));
        assert_eq!(doc.meta_content("description"), None);
        assert_eq!(doc.meta_content("missing"), None);
    }
}
