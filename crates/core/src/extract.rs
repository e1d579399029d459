//! Single entry point for URL extraction.
//!
//! [`Extractor`] classifies a URL and hands it to the matching extractor.
//!
//! # Example
//!
//! ```rust,no_run
//! use clipmark_core::{Extractor, format_markdown};
//! use tokio_util::sync::CancellationToken;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let extractor = Extractor::builder().timeout(15).build()?;
//! let result = extractor.extract("https://x.com/user/status/1", &CancellationToken::new()).await?;
//! println!("{}", format_markdown(&result));
//! # Ok(())
//! # }
//! ```

use tokio_util::sync::CancellationToken;

use crate::Result;
use crate::article::ArticleExtractor;
use crate::classify::{UrlKind, classify};
use crate::fetch::{FetchConfig, HttpFetcher};
use crate::model::Extraction;
use crate::readability::ReadabilityConfig;
use crate::social::{SocialConfig, SocialExtractor};

/// Routes URLs to the social or article extractor.
#[derive(Debug, Clone)]
pub struct Extractor {
    social: SocialExtractor,
    article: ArticleExtractor,
}

impl Extractor {
    /// An extractor with production defaults.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    pub fn builder() -> ExtractorBuilder {
        ExtractorBuilder::default()
    }

    /// Extract `url` with the strategy its host calls for.
    pub async fn extract(&self, url: &str, cancel: &CancellationToken) -> Result<Extraction> {
        let kind = classify(url);
        tracing::debug!(url, kind = kind.as_str(), "classified url");

        match kind {
            UrlKind::Social => self.social.extract(url, cancel).await,
            UrlKind::Article => self.article.extract(url, cancel).await,
        }
    }

    pub fn social(&self) -> &SocialExtractor {
        &self.social
    }

    pub fn article(&self) -> &ArticleExtractor {
        &self.article
    }
}

/// Builder for [`Extractor`].
#[derive(Debug, Clone, Default)]
pub struct ExtractorBuilder {
    fetch: FetchConfig,
    readability: ReadabilityConfig,
    social: SocialConfig,
}

impl ExtractorBuilder {
    /// Per-request timeout in seconds.
    pub fn timeout(mut self, secs: u64) -> Self {
        self.fetch.timeout = secs;
        self
    }

    /// User-Agent for article pages.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.fetch.browser_user_agent = user_agent.into();
        self
    }

    pub fn fetch_config(mut self, config: FetchConfig) -> Self {
        self.fetch = config;
        self
    }

    pub fn readability_config(mut self, config: ReadabilityConfig) -> Self {
        self.readability = config;
        self
    }

    pub fn social_config(mut self, config: SocialConfig) -> Self {
        self.social = config;
        self
    }

    /// Build the extractor. Both extractors share one HTTP connection pool.
    pub fn build(self) -> Result<Extractor> {
        let fetcher = HttpFetcher::new(self.fetch)?;
        Ok(Extractor {
            social: SocialExtractor::new(fetcher.clone(), self.social),
            article: ArticleExtractor::new(fetcher, self.readability),
        })
    }
}

/// Extract `url` with a default [`Extractor`].
pub async fn extract(url: &str, cancel: &CancellationToken) -> Result<Extraction> {
    Extractor::new()?.extract(url, cancel).await
}
