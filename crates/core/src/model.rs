//! Extraction result types.
//!
//! Everything here is built per request and thrown away after formatting.
//! Serialization uses the camelCase wire shape consumers of the JSON envelope
//! expect (`authorHandle`, `quotedTweet`, `replyParent`, ...).

use serde::Serialize;

/// Deepest quoted-post chain that will be mapped or rendered.
///
/// Matches the self-thread hop cap so both recursive structures share one bound.
pub const MAX_QUOTE_DEPTH: usize = 25;

/// Kind of attached media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Gif,
}

impl MediaKind {
    /// Parse an upstream media type. `photo` is the API's name for images.
    pub fn from_upstream(kind: &str) -> Option<Self> {
        match kind.to_ascii_lowercase().as_str() {
            "photo" | "image" => Some(MediaKind::Image),
            "video" => Some(MediaKind::Video),
            "gif" | "animated_gif" => Some(MediaKind::Gif),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
            MediaKind::Gif => "gif",
        }
    }
}

/// A media attachment on a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub url: String,
    pub alt_text: Option<String>,
}

/// A single short-form post.
///
/// `quoted` owns at most one nested post; mapping from upstream data stops at
/// [`MAX_QUOTE_DEPTH`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub text: String,
    pub author: String,
    pub author_handle: String,
    /// ISO-ish timestamp as delivered upstream, or empty.
    pub timestamp: String,
    pub likes: u64,
    pub retweets: u64,
    pub replies: u64,
    pub bookmarks: u64,
    pub media: Vec<Media>,
    #[serde(rename = "quotedTweet")]
    pub quoted: Option<Box<Post>>,
}

impl Post {
    /// Depth of the quoted chain below this post.
    pub fn quote_depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.quoted.as_deref();
        while let Some(post) = current {
            depth += 1;
            current = post.quoted.as_deref();
        }
        depth
    }
}

/// A social post together with its conversation context.
///
/// `thread` and `reply_parent` are mutually exclusive: a post is either part
/// of a self-authored thread or a reply to someone else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialResult {
    #[serde(rename = "tweet")]
    pub post: Post,
    /// Earlier posts of a self-thread, oldest first. Never contains `post`.
    pub thread: Vec<Post>,
    pub reply_parent: Option<Post>,
}

impl SocialResult {
    /// A result with no conversation context.
    pub fn single(post: Post) -> Self {
        Self { post, thread: Vec::new(), reply_parent: None }
    }

    /// A post followed by the earlier posts of its self-thread.
    pub fn with_thread(post: Post, thread: Vec<Post>) -> Self {
        Self { post, thread, reply_parent: None }
    }

    /// A reply along with the post it answers.
    pub fn with_parent(post: Post, parent: Option<Post>) -> Self {
        Self { post, thread: Vec::new(), reply_parent: parent }
    }
}

/// A long-form article, either from a web page or embedded in a social post.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleResult {
    pub title: String,
    /// Plain text of the main content.
    pub text: String,
    pub html_content: Option<String>,
    pub author: Option<String>,
    pub site_name: Option<String>,
    pub excerpt: Option<String>,
    pub published_date: Option<String>,
    pub featured_image: Option<String>,
    /// First parseable JSON-LD block of the page, passed through untouched.
    pub structured_data: Option<serde_json::Value>,
}

/// The outcome of a successful extraction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Extraction {
    #[serde(rename = "twitter")]
    Social(SocialResult),
    #[serde(rename = "article")]
    Article(ArticleResult),
}

impl Extraction {
    pub fn as_social(&self) -> Option<&SocialResult> {
        match self {
            Extraction::Social(social) => Some(social),
            Extraction::Article(_) => None,
        }
    }

    pub fn as_article(&self) -> Option<&ArticleResult> {
        match self {
            Extraction::Article(article) => Some(article),
            Extraction::Social(_) => None,
        }
    }
}
