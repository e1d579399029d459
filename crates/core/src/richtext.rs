//! Rich-block article rendering.
//!
//! Long-form posts arrive as an ordered list of typed blocks. Each block
//! carries raw text with inline style ranges, and entity ranges that point
//! into a side table. [`render_blocks`] turns that into parallel plain-text
//! and HTML output.
//!
//! Offsets and lengths in style ranges count characters, not bytes. Blocks,
//! ranges and entities that fail to decode are dropped rather than failing
//! the document.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::lenient::{items_from_value, or_default, valid_items};

/// A rich-block document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RichContent {
    #[serde(default, deserialize_with = "valid_items")]
    pub blocks: Vec<RichBlock>,
    #[serde(default, deserialize_with = "or_default")]
    pub entity_map: EntityMap,
}

/// One paragraph, heading or embedded object.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RichBlock {
    /// A `null` text fails the block, which the document then drops.
    #[serde(default)]
    pub text: String,
    #[serde(rename = "type", default, deserialize_with = "or_default")]
    pub kind: String,
    #[serde(default, deserialize_with = "valid_items")]
    pub inline_style_ranges: Vec<StyleRange>,
    #[serde(default, deserialize_with = "valid_items")]
    pub entity_ranges: Vec<EntityRange>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StyleRange {
    pub offset: usize,
    pub length: usize,
    pub style: String,
}

impl StyleRange {
    fn covers(&self, index: usize) -> bool {
        index >= self.offset && index < self.offset.saturating_add(self.length)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EntityRange {
    #[serde(default, deserialize_with = "or_default")]
    pub offset: usize,
    #[serde(default, deserialize_with = "or_default")]
    pub length: usize,
    #[serde(deserialize_with = "string_or_number")]
    pub key: String,
}

/// An embedded object referenced from an `atomic` block.
#[derive(Debug, Clone, Deserialize)]
pub struct Entity {
    #[serde(rename = "type", default, deserialize_with = "or_default")]
    pub kind: String,
    #[serde(default)]
    pub data: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EntityEntry {
    #[serde(deserialize_with = "string_or_number")]
    pub key: String,
    pub value: Entity,
}

/// The entity side table. Upstream sends either a list of key/value pairs or
/// an object keyed by id. Entries that do not decode are dropped.
#[derive(Debug, Clone)]
pub enum EntityMap {
    List(Vec<EntityEntry>),
    Keyed(HashMap<String, Entity>),
}

impl Default for EntityMap {
    fn default() -> Self {
        EntityMap::Keyed(HashMap::new())
    }
}

impl<'de> Deserialize<'de> for EntityMap {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            list @ Value::Array(_) => EntityMap::List(items_from_value(list)),
            Value::Object(map) => EntityMap::Keyed(
                map.into_iter()
                    .filter_map(|(key, entity)| Some((key, serde_json::from_value(entity).ok()?)))
                    .collect(),
            ),
            _ => EntityMap::default(),
        })
    }
}

impl EntityMap {
    pub fn get(&self, key: &str) -> Option<&Entity> {
        match self {
            EntityMap::List(entries) => entries.iter().find(|entry| entry.key == key).map(|entry| &entry.value),
            EntityMap::Keyed(map) => map.get(key),
        }
    }
}

/// A media item that MEDIA entities refer to by id.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArticleMedia {
    #[serde(default, deserialize_with = "string_or_number")]
    pub media_id: String,
    #[serde(default, deserialize_with = "or_default")]
    pub media_info: Option<MediaInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaInfo {
    #[serde(default, deserialize_with = "or_default")]
    pub original_img_url: Option<String>,
}

/// Parallel renderings of one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedArticle {
    /// Blocks joined with blank lines.
    pub text: String,
    /// Blocks joined with newlines.
    pub html: String,
}

/// Render every block in order.
///
/// ```rust
/// use clipmark_core::richtext::{RichContent, render_blocks};
///
/// let content: RichContent = serde_json::from_str(r#"{
///     "blocks": [
///         {"text": "Title", "type": "header-two"},
///         {"text": "Hello world", "type": "unstyled",
///          "inlineStyleRanges": [{"offset": 0, "length": 5, "style": "BOLD"}]}
///     ],
///     "entityMap": {}
/// }"#).unwrap();
///
/// let rendered = render_blocks(&content, &[]);
/// assert_eq!(rendered.text, "## Title\n\nHello world");
/// assert_eq!(rendered.html, "<h2>Title</h2>\n<p><strong>Hello</strong> world</p>");
/// ```
pub fn render_blocks(content: &RichContent, media: &[ArticleMedia]) -> RenderedArticle {
    let mut text_parts = Vec::with_capacity(content.blocks.len());
    let mut html_parts = Vec::with_capacity(content.blocks.len());

    for block in &content.blocks {
        if let Some((text, html)) = render_block(block, &content.entity_map, media) {
            text_parts.push(text);
            html_parts.push(html);
        }
    }

    RenderedArticle { text: text_parts.join("\n\n"), html: html_parts.join("\n") }
}

/// `None` means the block produces no output at all.
fn render_block(block: &RichBlock, entities: &EntityMap, media: &[ArticleMedia]) -> Option<(String, String)> {
    if block.kind.starts_with("header") {
        return Some((format!("## {}", block.text), format!("<h2>{}</h2>", apply_inline_styles(block))));
    }

    if block.kind == "atomic" {
        let key = &block.entity_ranges.first()?.key;
        let entity = entities.get(key)?;
        return render_entity(block, entity, media);
    }

    if block.text.is_empty() {
        return Some((String::new(), String::new()));
    }
    Some((block.text.clone(), format!("<p>{}</p>", apply_inline_styles(block))))
}

fn render_entity(block: &RichBlock, entity: &Entity, media: &[ArticleMedia]) -> Option<(String, String)> {
    match entity.kind.as_str() {
        "MEDIA" => {
            let media_id = entity.data.get("mediaItems")?.get(0)?.get("mediaId").and_then(value_as_id)?;
            let url = media
                .iter()
                .find(|item| item.media_id == media_id)
                .and_then(|item| item.media_info.as_ref())
                .and_then(|info| info.original_img_url.as_deref())?;
            Some((format!("[Image: {url}]"), format!(r#"<img src="{}" />"#, escape_html(url))))
        }
        "DIVIDER" => Some(("---".to_string(), "<hr />".to_string())),
        "MARKDOWN" => {
            let code = &block.text;
            Some((format!("```\n{code}\n```"), format!("<pre><code>{}</code></pre>", escape_html(code))))
        }
        _ => None,
    }
}

/// Escaped HTML of the block text with `<strong>` around BOLD runs.
///
/// A run still open at the end of the text is closed there.
fn apply_inline_styles(block: &RichBlock) -> String {
    let bold: Vec<&StyleRange> =
        block.inline_style_ranges.iter().filter(|range| range.style.eq_ignore_ascii_case("bold")).collect();

    let mut html = String::with_capacity(block.text.len() + 16);
    let mut open = false;

    for (index, ch) in block.text.chars().enumerate() {
        let inside = bold.iter().any(|range| range.covers(index));
        if inside && !open {
            html.push_str("<strong>");
            open = true;
        } else if !inside && open {
            html.push_str("</strong>");
            open = false;
        }
        push_escaped(&mut html, ch);
    }

    if open {
        html.push_str("</strong>");
    }
    html
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        push_escaped(&mut out, ch);
    }
    out
}

fn push_escaped(out: &mut String, ch: char) {
    match ch {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '"' => out.push_str("&quot;"),
        _ => out.push(ch),
    }
}

fn value_as_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Ids and keys show up both as JSON strings and as numbers.
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    value_as_id(&value).ok_or_else(|| serde::de::Error::custom("expected a string or number id"))
}
