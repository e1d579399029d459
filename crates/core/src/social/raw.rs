//! Mirror API payloads and their mapping onto the public model.
//!
//! Every field is optional upstream. Absent, `null` or mistyped values fall
//! back to the same defaults the page scraper uses, and list items that do
//! not decode are dropped.

use serde::Deserialize;
use serde_json::Value;

use crate::lenient::{or_default, valid_items};
use crate::model::{ArticleResult, MAX_QUOTE_DEPTH, Media, MediaKind, Post};
use crate::richtext::{ArticleMedia, MediaInfo, RichContent, render_blocks};

pub(crate) const UNKNOWN_AUTHOR: &str = "Unknown";
pub(crate) const UNKNOWN_HANDLE: &str = "unknown";
const UNTITLED_ARTICLE: &str = "Untitled Article";
const PLATFORM_NAME: &str = "X";

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawEnvelope {
    #[serde(default, deserialize_with = "or_default")]
    pub tweet: Option<RawTweet>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawTweet {
    #[serde(default, deserialize_with = "or_default")]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "or_default")]
    pub author: Option<RawAuthor>,
    #[serde(default, deserialize_with = "or_default")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "or_default")]
    pub likes: Option<u64>,
    #[serde(default, deserialize_with = "or_default")]
    pub retweets: Option<u64>,
    #[serde(default, deserialize_with = "or_default")]
    pub replies: Option<u64>,
    #[serde(default, deserialize_with = "or_default")]
    pub bookmarks: Option<u64>,
    #[serde(default, deserialize_with = "or_default")]
    pub media: Option<RawMediaSet>,
    #[serde(default, deserialize_with = "or_default")]
    pub quote: Option<Box<RawTweet>>,
    #[serde(default, deserialize_with = "or_default")]
    pub replying_to: Option<String>,
    #[serde(default, deserialize_with = "or_default")]
    pub replying_to_status: Option<Value>,
    #[serde(default, deserialize_with = "or_default")]
    pub article: Option<RawArticle>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawAuthor {
    #[serde(default, deserialize_with = "or_default")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "or_default")]
    pub screen_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawMediaSet {
    #[serde(default, deserialize_with = "valid_items")]
    pub all: Vec<RawMedia>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawMedia {
    #[serde(rename = "type", default, deserialize_with = "or_default")]
    pub kind: String,
    #[serde(default, deserialize_with = "or_default")]
    pub url: String,
    #[serde(rename = "altText", default, deserialize_with = "or_default")]
    pub alt_text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawArticle {
    #[serde(default, deserialize_with = "or_default")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "or_default")]
    pub preview_text: Option<String>,
    #[serde(default, deserialize_with = "or_default")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "or_default")]
    pub cover_media: Option<RawCover>,
    #[serde(default, deserialize_with = "or_default")]
    pub content: Option<RichContent>,
    #[serde(default, deserialize_with = "valid_items")]
    pub media_entities: Vec<ArticleMedia>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawCover {
    #[serde(default, deserialize_with = "or_default")]
    pub media_info: Option<MediaInfo>,
}

/// Who a post replies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ReplyTarget {
    pub handle: String,
    /// Missing when upstream names the author but not the status.
    pub status_id: Option<String>,
}

impl RawTweet {
    pub fn has_text(&self) -> bool {
        self.text.as_deref().is_some_and(|text| !text.trim().is_empty())
    }

    pub fn handle(&self) -> &str {
        self.author.as_ref().and_then(|a| a.screen_name.as_deref()).filter(|h| !h.is_empty()).unwrap_or(UNKNOWN_HANDLE)
    }

    pub fn display_name(&self) -> &str {
        self.author.as_ref().and_then(|a| a.name.as_deref()).filter(|n| !n.is_empty()).unwrap_or(UNKNOWN_AUTHOR)
    }

    pub fn reply_target(&self) -> Option<ReplyTarget> {
        let handle = self.replying_to.as_deref().map(str::trim).filter(|h| !h.is_empty())?;
        let status_id = match &self.replying_to_status {
            Some(Value::String(id)) if !id.is_empty() => Some(id.clone()),
            Some(Value::Number(id)) => Some(id.to_string()),
            _ => None,
        };
        Some(ReplyTarget { handle: handle.to_string(), status_id })
    }

    /// Map onto a [`Post`], following quotes down to [`MAX_QUOTE_DEPTH`].
    pub fn to_post(&self) -> Post {
        self.to_post_at(0)
    }

    fn to_post_at(&self, depth: usize) -> Post {
        let quoted = if depth < MAX_QUOTE_DEPTH {
            self.quote.as_deref().map(|quote| Box::new(quote.to_post_at(depth + 1)))
        } else {
            None
        };

        Post {
            text: self.text.clone().unwrap_or_default(),
            author: self.display_name().to_string(),
            author_handle: self.handle().to_string(),
            timestamp: self.created_at.clone().unwrap_or_default(),
            likes: self.likes.unwrap_or(0),
            retweets: self.retweets.unwrap_or(0),
            replies: self.replies.unwrap_or(0),
            bookmarks: self.bookmarks.unwrap_or(0),
            media: self.media.as_ref().map(RawMediaSet::to_media).unwrap_or_default(),
            quoted,
        }
    }

    /// Render the embedded article, when there is one.
    pub fn to_article(&self, excerpt_chars: usize) -> Option<ArticleResult> {
        let article = self.article.as_ref()?;
        let content = article.content.clone().unwrap_or_default();
        let rendered = render_blocks(&content, &article.media_entities);

        let text = if rendered.text.trim().is_empty() {
            article.preview_text.clone().unwrap_or_default()
        } else {
            rendered.text
        };
        let title = article
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(UNTITLED_ARTICLE)
            .to_string();

        Some(ArticleResult {
            title,
            excerpt: Some(text.chars().take(excerpt_chars).collect()),
            text,
            html_content: (!rendered.html.is_empty()).then_some(rendered.html),
            author: Some(self.display_name().to_string()),
            site_name: Some(PLATFORM_NAME.to_string()),
            published_date: article.created_at.clone().or_else(|| self.created_at.clone()),
            featured_image: article
                .cover_media
                .as_ref()
                .and_then(|cover| cover.media_info.as_ref())
                .and_then(|info| info.original_img_url.clone()),
            structured_data: None,
        })
    }
}

impl RawMediaSet {
    fn to_media(&self) -> Vec<Media> {
        self.all
            .iter()
            .filter(|item| !item.url.is_empty())
            .filter_map(|item| {
                Some(Media {
                    kind: MediaKind::from_upstream(&item.kind)?,
                    url: item.url.clone(),
                    alt_text: item.alt_text.clone().filter(|alt| !alt.is_empty()),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tweet(json: &str) -> RawTweet {
        serde_json::from_str::<RawEnvelope>(json).unwrap().tweet.unwrap()
    }

    #[test]
    fn test_maps_full_post() {
        let raw = tweet(
            r#"{"tweet": {
                "text": "Shipping a new release today!",
                "author": {"name": "Jane Developer", "screen_name": "janedev"},
                "created_at": "2024-06-15T10:00:00Z",
                "likes": 1234, "retweets": 567, "replies": 89, "bookmarks": 42,
                "media": {"all": [
                    {"type": "photo", "url": "https://pbs.example/1.jpg", "altText": "Release notes"},
                    {"type": "video", "url": "https://video.example/1.mp4"},
                    {"type": "mosaic", "url": "https://pbs.example/m.jpg"}
                ]}
            }}"#,
        );
        let post = raw.to_post();

        assert_eq!(post.author, "Jane Developer");
        assert_eq!(post.author_handle, "janedev");
        assert_eq!(post.likes, 1234);
        assert_eq!(post.bookmarks, 42);
        assert_eq!(post.media.len(), 2);
        assert_eq!(post.media[0].kind, MediaKind::Image);
        assert_eq!(post.media[0].alt_text.as_deref(), Some("Release notes"));
        assert_eq!(post.media[1].alt_text, None);
        assert!(post.quoted.is_none());
    }

    #[test]
    fn test_missing_fields_default() {
        let post = tweet(r#"{"tweet": {"text": "hi", "likes": null}}"#).to_post();
        assert_eq!(post.author, "Unknown");
        assert_eq!(post.author_handle, "unknown");
        assert_eq!(post.timestamp, "");
        assert_eq!(post.likes, 0);
        assert!(post.media.is_empty());
    }

    #[test]
    fn test_quote_mapping_is_capped() {
        let mut raw = RawTweet { text: Some("leaf".into()), ..Default::default() };
        for i in 0..40 {
            raw = RawTweet { text: Some(format!("level {i}")), quote: Some(Box::new(raw)), ..Default::default() };
        }
        assert_eq!(raw.to_post().quote_depth(), MAX_QUOTE_DEPTH);
    }

    #[test]
    fn test_reply_target_accepts_numeric_status() {
        let raw = tweet(r#"{"tweet": {"text": "x", "replying_to": "bob", "replying_to_status": 123}}"#);
        assert_eq!(raw.reply_target(), Some(ReplyTarget { handle: "bob".into(), status_id: Some("123".into()) }));

        let raw = tweet(r#"{"tweet": {"text": "x", "replying_to": null}}"#);
        assert_eq!(raw.reply_target(), None);
    }

    #[test]
    fn test_embedded_article_defaults() {
        let raw = tweet(
            r#"{"tweet": {
                "text": "",
                "author": {"name": "Writer", "screen_name": "writer"},
                "created_at": "2024-03-01T00:00:00Z",
                "article": {
                    "content": {"blocks": [{"text": "Body text of the piece.", "type": "unstyled"}], "entityMap": []},
                    "cover_media": {"media_info": {"original_img_url": "https://pbs.example/cover.jpg"}}
                }
            }}"#,
        );
        let article = raw.to_article(4).unwrap();

        assert_eq!(article.title, "Untitled Article");
        assert_eq!(article.text, "Body text of the piece.");
        assert_eq!(article.excerpt.as_deref(), Some("Body"));
        assert_eq!(article.html_content.as_deref(), Some("<p>Body text of the piece.</p>"));
        assert_eq!(article.author.as_deref(), Some("Writer"));
        assert_eq!(article.site_name.as_deref(), Some("X"));
        assert_eq!(article.published_date.as_deref(), Some("2024-03-01T00:00:00Z"));
        assert_eq!(article.featured_image.as_deref(), Some("https://pbs.example/cover.jpg"));
    }
}
