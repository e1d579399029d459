//! Page metadata.
//!
//! Two passes share this module. [`PageMetadata`] reads the publishing facts
//! (cover image, date, JSON-LD) from the raw markup before any cleanup. The
//! `Document::extract_*` methods resolve the descriptive fields readability
//! reports, each through a fixed priority list.

use serde_json::Value;

use crate::parse::Document;

const JSON_LD_SELECTOR: &str = r#"script[type="application/ld+json"]"#;

/// Publishing facts read from meta tags and JSON-LD.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageMetadata {
    /// `og:image`
    pub featured_image: Option<String>,
    /// `article:published_time`, else the first JSON-LD `datePublished`
    pub published_date: Option<String>,
    /// First JSON-LD block that parses
    pub structured_data: Option<Value>,
}

impl PageMetadata {
    pub fn from_document(doc: &Document) -> Self {
        let blocks = doc.json_ld_blocks();
        let published_date = doc
            .meta_content("article:published_time")
            .or_else(|| blocks.iter().find_map(|block| string_field(block, "datePublished")));

        Self { featured_image: doc.meta_content("og:image"), published_date, structured_data: blocks.into_iter().next() }
    }
}

impl Document {
    /// Every JSON-LD block that parses, in document order. Malformed blocks are skipped.
    pub fn json_ld_blocks(&self) -> Vec<Value> {
        self.select(JSON_LD_SELECTOR)
            .unwrap_or_default()
            .iter()
            .filter_map(|el| serde_json::from_str::<Value>(el.text().trim()).ok())
            .collect()
    }

    /// Title with priority fallback:
    /// 1. JSON-LD `headline`
    /// 2. `og:title`
    /// 3. `twitter:title`
    /// 4. `<title>` element
    /// 5. First `<h1>`
    pub fn extract_title(&self) -> Option<String> {
        self.json_ld_field("headline")
            .or_else(|| self.meta_content("og:title"))
            .or_else(|| self.meta_content("twitter:title"))
            .or_else(|| self.title())
            .or_else(|| self.first_text("h1"))
    }

    /// Byline with priority fallback:
    /// 1. JSON-LD `author` (string, object or array)
    /// 2. Meta `author`
    /// 3. `[rel="author"]`, then `[itemprop="author"]` text
    /// 4. Short text of an element whose class mentions `byline` or `author`
    pub fn extract_byline(&self) -> Option<String> {
        if let Some(name) = self.json_ld_blocks().iter().find_map(|block| block.get("author").and_then(author_name)) {
            return Some(name);
        }

        self.meta_content("author")
            .or_else(|| self.first_text(r#"[rel="author"]"#))
            .or_else(|| self.first_text(r#"[itemprop="author"]"#))
            .or_else(|| {
                ["byline", "author"].iter().find_map(|pattern| {
                    self.select(&format!(r#"[class*="{pattern}"]"#))
                        .unwrap_or_default()
                        .iter()
                        .take(3)
                        .map(|el| el.text().trim().to_string())
                        .find(|text| !text.is_empty() && text.chars().count() < 100)
                })
            })
    }

    /// Site name: JSON-LD `publisher.name`, then `og:site_name`.
    pub fn extract_site_name(&self) -> Option<String> {
        self.json_ld_blocks()
            .iter()
            .find_map(|block| block.get("publisher").and_then(|p| p.get("name")).and_then(Value::as_str).map(str::to_string))
            .or_else(|| self.meta_content("og:site_name"))
    }

    /// Excerpt: JSON-LD `description`, `og:description`, meta `description`,
    /// then the first paragraph longer than 50 characters.
    pub fn extract_excerpt(&self) -> Option<String> {
        self.json_ld_field("description")
            .or_else(|| self.meta_content("og:description"))
            .or_else(|| self.meta_content("description"))
            .or_else(|| {
                self.select("p")
                    .unwrap_or_default()
                    .iter()
                    .take(5)
                    .map(|el| el.text().trim().to_string())
                    .find(|text| text.chars().count() > 50)
                    .map(|text| truncate_chars(&text, 300))
            })
    }

    fn json_ld_field(&self, key: &str) -> Option<String> {
        self.json_ld_blocks().iter().find_map(|block| string_field(block, key))
    }

    fn first_text(&self, selector: &str) -> Option<String> {
        let el = self.select_first(selector).ok().flatten()?;
        let text = el.text();
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    let field = value.get(key)?.as_str()?.trim();
    (!field.is_empty()).then(|| field.to_string())
}

fn author_name(author: &Value) -> Option<String> {
    match author {
        Value::String(name) => Some(name.clone()),
        Value::Object(obj) => obj.get("name").and_then(Value::as_str).map(str::to_string),
        Value::Array(items) => items.first().and_then(author_name),
        _ => None,
    }
}

/// The first `max` characters of `text`, with `...` appended when cut.
pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HTML_WITH_META: &str = r#"
        <html>
        <head>
            <title>Fallback Title</title>
            <meta property="og:title" content="OG Title">
            <meta property="og:image" content="https://example.com/cover.jpg">
            <meta property="og:site_name" content="Example Site">
            <meta name="author" content="John Doe">
            <meta name="description" content="A short description.">
            <meta property="article:published_time" content="2024-06-15T10:00:00Z">
        </head>
        <body><h1>Heading</h1><p>Body</p></body>
        </html>
    "#;

    const HTML_WITH_JSON_LD: &str = r#"
        <html>
        <head>
            <script type="application/ld+json">{ not json </script>
            <script type="application/ld+json">
            {"@type": "NewsArticle", "headline": "LD Headline", "datePublished": "2024-01-02",
             "author": [{"@type": "Person", "name": "Jane Writer"}], "publisher": {"name": "LD Times"}}
            </script>
            <meta property="og:title" content="OG Title">
        </head>
        <body><p>Body</p></body>
        </html>
    "#;

    #[test]
    fn test_page_metadata_from_meta_tags() {
        let meta = PageMetadata::from_document(&Document::parse(HTML_WITH_META));
        assert_eq!(meta.featured_image.as_deref(), Some("https://example.com/cover.jpg"));
        assert_eq!(meta.published_date.as_deref(), Some("2024-06-15T10:00:00Z"));
        assert!(meta.structured_data.is_none());
    }

    #[test]
    fn test_page_metadata_skips_malformed_json_ld() {
        let meta = PageMetadata::from_document(&Document::parse(HTML_WITH_JSON_LD));
        assert_eq!(meta.published_date.as_deref(), Some("2024-01-02"));
        assert_eq!(meta.structured_data.unwrap()["headline"], "LD Headline");
    }

    #[test]
    fn test_meta_date_wins_over_json_ld() {
        let html = r#"<html><head>
            <meta property="article:published_time" content="2024-06-15">
            <script type="application/ld+json">{"datePublished": "1999-01-01"}</script>
        </head><body></body></html>"#;
        let meta = PageMetadata::from_document(&Document::parse(html));
        assert_eq!(meta.published_date.as_deref(), Some("2024-06-15"));
    }

    #[test]
    fn test_descriptive_fields_from_meta() {
        let doc = Document::parse(HTML_WITH_META);
        assert_eq!(doc.extract_title().as_deref(), Some("OG Title"));
        assert_eq!(doc.extract_byline().as_deref(), Some("John Doe"));
        assert_eq!(doc.extract_site_name().as_deref(), Some("Example Site"));
        assert_eq!(doc.extract_excerpt().as_deref(), Some("A short description."));
    }

    #[test]
    fn test_descriptive_fields_from_json_ld() {
        let doc = Document::parse(HTML_WITH_JSON_LD);
        assert_eq!(doc.extract_title().as_deref(), Some("LD Headline"));
        assert_eq!(doc.extract_byline().as_deref(), Some("Jane Writer"));
        assert_eq!(doc.extract_site_name().as_deref(), Some("LD Times"));
    }

    #[test]
    fn test_title_falls_back_to_h1() {
        let doc = Document::parse("<html><body><h1> Only Heading </h1></body></html>");
        assert_eq!(doc.extract_title().as_deref(), Some("Only Heading"));
    }

    #[test]
    fn test_byline_from_class() {
        let doc = Document::parse(r#"<html><body><span class="post-byline">By Sam</span></body></html>"#);
        assert_eq!(doc.extract_byline().as_deref(), Some("By Sam"));
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("héllo", 10), "héllo");
        assert_eq!(truncate_chars("héllo", 2), "hé...");
    }
}
