pub mod article;
pub mod classify;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod formatters;
mod lenient;
pub mod metadata;
pub mod model;
pub mod parse;
pub mod postprocess;
pub mod preprocess;
pub mod readability;
pub mod richtext;
pub mod scoring;
pub mod social;

pub use article::ArticleExtractor;
pub use classify::{SOCIAL_HOSTS, UrlKind, classify};
pub use error::{ErrorCode, ExtractError, Result};
pub use extract::{Extractor, ExtractorBuilder, extract};
pub use fetch::{FetchConfig, FetchError, HttpFetcher, RequestProfile};
pub use formatters::{error_envelope, format_date, format_markdown, format_plain_text, success_envelope, to_json};
pub use metadata::PageMetadata;
pub use model::{ArticleResult, Extraction, MAX_QUOTE_DEPTH, Media, MediaKind, Post, SocialResult};
pub use parse::Document;
#[doc(hidden)]
pub use postprocess::{PostProcessConfig, postprocess_html};
#[doc(hidden)]
pub use preprocess::{PreprocessConfig, preprocess_html};
pub use readability::{Readability, ReadabilityConfig, ReadabilityConfigBuilder, Readable};
pub use richtext::{RenderedArticle, RichContent, render_blocks};
#[doc(hidden)]
pub use scoring::{ScoreConfig, calculate_score};
pub use social::{SocialConfig, SocialExtractor};
