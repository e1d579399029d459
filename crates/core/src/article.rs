//! Generic web-page extraction.
//!
//! The page is fetched once with a browser profile. Publishing metadata is
//! read from the raw markup, and the readability pass supplies the content
//! and descriptive fields.

use tokio_util::sync::CancellationToken;
use url::Url;

use crate::fetch::{HttpFetcher, RequestProfile};
use crate::metadata::PageMetadata;
use crate::model::{ArticleResult, Extraction};
use crate::parse::Document;
use crate::readability::{Readability, ReadabilityConfig};
use crate::{ExtractError, Result};

/// Extracts the main content of arbitrary article pages.
#[derive(Debug, Clone)]
pub struct ArticleExtractor {
    fetcher: HttpFetcher,
    readability: Readability,
}

impl ArticleExtractor {
    pub fn new(fetcher: HttpFetcher, config: ReadabilityConfig) -> Self {
        Self { fetcher, readability: Readability::with_config(config) }
    }

    /// Fetch `url` and extract its article.
    ///
    /// # Errors
    ///
    /// - [`ExtractError::FetchFailed`] on transport errors, cancellation or a non-2xx status.
    /// - [`ExtractError::EmptyContent`] when no text survives extraction.
    /// - [`ExtractError::ParseFailed`] for any other failure while reading the page.
    pub async fn extract(&self, url: &str, cancel: &CancellationToken) -> Result<Extraction> {
        let page = self.fetcher.get(url, RequestProfile::Browser, cancel).await?;
        self.extract_html(&page.body, url).map(Extraction::Article)
    }

    /// Extract an article from markup that was already fetched from `url`.
    pub fn extract_html(&self, html: &str, url: &str) -> Result<ArticleResult> {
        let metadata = PageMetadata::from_document(&Document::parse(html));

        let readable = match Url::parse(url) {
            Ok(base) => self.readability.parse_with_url(html, &base),
            Err(_) => self.readability.parse(html),
        }
        .map_err(|e| match e {
            ExtractError::FetchFailed(_) | ExtractError::EmptyContent | ExtractError::ParseFailed(_) => e,
            other => ExtractError::ParseFailed(other.to_string()),
        })?;

        tracing::debug!(url, chars = readable.text.len(), body_fallback = readable.used_body_fallback, "article extracted");

        Ok(ArticleResult {
            title: readable.title.unwrap_or_default(),
            text: readable.text,
            html_content: Some(readable.content_html),
            author: readable.byline,
            site_name: readable.site_name,
            excerpt: readable.excerpt,
            published_date: metadata.published_date,
            featured_image: metadata.featured_image,
            structured_data: metadata.structured_data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchConfig;
    use httpmock::prelude::*;

    const ARTICLE_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>Modern Web Architecture | Dev Weekly</title>
    <meta property="og:title" content="Modern Web Architecture">
    <meta property="og:image" content="https://example.com/images/web-arch.jpg">
    <meta property="article:published_time" content="2024-06-15T10:00:00Z">
    <meta name="author" content="Sam Rivera">
    <script type="application/ld+json">{"@type": "Article", "headline": "Modern Web Architecture"}</script>
</head>
<body>
    <nav class="menu"><a href="/">Home</a></nav>
    <article class="post">
        <h2>Component-Based Architecture</h2>
        <p>Component-based architecture breaks an interface into small, reusable pieces, each with its own state, markup, and behaviour, which keeps large codebases manageable.</p>
        <p>Teams adopt it because it scales, because it tests well, and because it lets designers and engineers share one vocabulary across the whole product surface.</p>
        <p>The trade-off is coordination, since shared state must flow somewhere, and the answer usually involves a store, a context, or a carefully designed event system.</p>
    </article>
</body>
</html>"#;

    fn extractor() -> ArticleExtractor {
        let fetcher = HttpFetcher::new(FetchConfig { timeout: 5, ..Default::default() }).unwrap();
        ArticleExtractor::new(fetcher, ReadabilityConfig::default())
    }

    #[tokio::test]
    async fn test_extracts_article_with_metadata() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/article").header("accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8");
            then.status(200).header("content-type", "text/html").body(ARTICLE_HTML);
        });

        let result = extractor().extract(&server.url("/article"), &CancellationToken::new()).await.unwrap();
        mock.assert();

        let article = result.as_article().unwrap();
        assert!(article.title.contains("Modern Web Architecture"));
        assert!(article.text.contains("Component-Based Architecture"));
        assert_eq!(article.author.as_deref(), Some("Sam Rivera"));
        assert_eq!(article.featured_image.as_deref(), Some("https://example.com/images/web-arch.jpg"));
        assert_eq!(article.published_date.as_deref(), Some("2024-06-15T10:00:00Z"));
        assert_eq!(article.structured_data.as_ref().unwrap()["@type"], "Article");
        assert!(article.html_content.as_deref().unwrap().contains("<p>"));
    }

    #[tokio::test]
    async fn test_server_error_is_fetch_failed() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/broken");
            then.status(500).body("Internal Server Error");
        });

        let err = extractor().extract(&server.url("/broken"), &CancellationToken::new()).await.unwrap_err();
        assert!(matches!(err, ExtractError::FetchFailed(_)));
    }

    #[tokio::test]
    async fn test_empty_body_is_empty_content() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/empty");
            then.status(200).body("<!DOCTYPE html><html><head><title>Empty</title></head><body>   </body></html>");
        });

        let err = extractor().extract(&server.url("/empty"), &CancellationToken::new()).await.unwrap_err();
        assert!(matches!(err, ExtractError::EmptyContent));
    }

    #[tokio::test]
    async fn test_network_error_is_fetch_failed() {
        let err = extractor().extract("http://127.0.0.1:1/offline", &CancellationToken::new()).await.unwrap_err();
        assert!(matches!(err, ExtractError::FetchFailed(_)));
    }

    #[tokio::test]
    async fn test_cancelled_token_is_fetch_failed() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/slow");
            then.status(200).delay(std::time::Duration::from_secs(3)).body(ARTICLE_HTML);
        });

        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = extractor().extract(&server.url("/slow"), &cancel).await.unwrap_err();
        assert!(matches!(err, ExtractError::FetchFailed(_)));
    }

    #[test]
    fn test_extract_html_without_url() {
        let article = extractor().extract_html(ARTICLE_HTML, "").unwrap();
        assert!(article.text.contains("shared state must flow somewhere"));
        assert!(!article.text.contains("Home"));
    }
}
