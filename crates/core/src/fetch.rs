//! HTTP fetching shared by every extractor.
//!
//! Each request carries a per-request timeout from [`FetchConfig`] and races
//! the caller's [`CancellationToken`], so an overall deadline enforced by the
//! caller aborts whatever request is in flight, body download included.

use std::time::Duration;

use reqwest::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::{ExtractError, Result};

const HTML_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// HTTP client configuration.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Per-request timeout in seconds.
    pub timeout: u64,
    /// User-Agent sent when fetching article pages.
    pub browser_user_agent: String,
    /// User-Agent sent to the mirror page; mirrors only render meta tags for crawlers.
    pub crawler_user_agent: String,
    /// User-Agent sent to the mirror API.
    pub api_user_agent: String,
    /// Base URL of the structured mirror API, without trailing slash.
    pub api_base: String,
    /// Base URL of the HTML mirror, without trailing slash.
    pub page_base: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: 10,
            browser_user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
            crawler_user_agent: "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)".to_string(),
            api_user_agent: concat!("clipmark/", env!("CARGO_PKG_VERSION")).to_string(),
            api_base: "https://api.fxtwitter.com".to_string(),
            page_base: "https://fxtwitter.com".to_string(),
        }
    }
}

/// Which set of request headers to send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestProfile {
    /// Browser-identifying UA with an HTML-preferring Accept header.
    Browser,
    /// Search-crawler UA.
    Crawler,
    /// JSON API request.
    Api,
}

/// Why a single request produced no body.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Network errors, DNS failures, connection issues, malformed URLs.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// The caller's cancellation token fired.
    #[error("Request cancelled")]
    Cancelled,

    /// The server answered with a non-success status.
    #[error("Upstream returned HTTP {0}")]
    Status(u16),
}

impl FetchError {
    /// True when the request never got a usable HTTP answer.
    pub fn is_transport(&self) -> bool {
        !matches!(self, FetchError::Status(_))
    }
}

/// A successful (2xx) response body.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub url: String,
    pub status: u16,
    pub body: String,
}

/// Thin wrapper around a configured [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    config: FetchConfig,
}

impl HttpFetcher {
    /// Builds the underlying client. Fails only if the TLS backend cannot initialize.
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()
            .map_err(|e| ExtractError::FetchFailed(e.to_string()))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// GET `url`, returning the body of a 2xx response.
    pub async fn get(
        &self, url: &str, profile: RequestProfile, cancel: &CancellationToken,
    ) -> std::result::Result<FetchedPage, FetchError> {
        let request = match profile {
            RequestProfile::Browser => self
                .client
                .get(url)
                .header(USER_AGENT, &self.config.browser_user_agent)
                .header(ACCEPT, HTML_ACCEPT)
                .header(ACCEPT_LANGUAGE, "en-US,en;q=0.9"),
            RequestProfile::Crawler => self
                .client
                .get(url)
                .header(USER_AGENT, &self.config.crawler_user_agent)
                .header(ACCEPT, HTML_ACCEPT),
            RequestProfile::Api => self
                .client
                .get(url)
                .header(USER_AGENT, &self.config.api_user_agent)
                .header(ACCEPT, "application/json"),
        };

        let timeout = self.config.timeout;
        let work = async move {
            let response = request.send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Status(status.as_u16()));
            }
            let body = response.text().await?;
            Ok(FetchedPage { url: url.to_string(), status: status.as_u16(), body })
        };

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(FetchError::Cancelled),
            result = work => result,
        };

        match result {
            Ok(page) => {
                tracing::debug!(url, status = page.status, bytes = page.body.len(), "fetched");
                Ok(page)
            }
            Err(FetchError::Http(e)) if e.is_timeout() => {
                tracing::debug!(url, timeout, "request timed out");
                Err(FetchError::Timeout { timeout })
            }
            Err(e) => {
                tracing::debug!(url, error = %e, "request failed");
                Err(e)
            }
        }
    }
}
