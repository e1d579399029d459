//! Error types for clipmark operations.
//!
//! [`ExtractError`] is the classified failure every extractor returns. Each
//! variant maps onto a stable [`ErrorCode`] string so callers (an HTTP layer,
//! the CLI) can switch on the code without matching on message text.
//!
//! # Example
//!
//! ```rust
//! use clipmark_core::{ErrorCode, ExtractError};
//!
//! let err = ExtractError::MirrorUnavailable;
//! assert_eq!(err.code(), ErrorCode::MirrorUnavailable);
//! assert_eq!(err.code().as_str(), "MIRROR_UNAVAILABLE");
//! ```

use serde::Serialize;
use thiserror::Error;

/// Stable identifiers for every failure class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// The input was not an http(s) URL. Raised by callers, never by extractors.
    InvalidUrl,
    /// Transport failure or non-2xx response at the primary source.
    FetchFailed,
    /// A fetched payload could not be decoded.
    ParseFailed,
    /// The fetch succeeded but nothing readable came out of it.
    EmptyContent,
    /// Every social-post strategy was exhausted.
    MirrorUnavailable,
}

impl ErrorCode {
    /// The wire identifier of this code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidUrl => "INVALID_URL",
            ErrorCode::FetchFailed => "FETCH_FAILED",
            ErrorCode::ParseFailed => "PARSE_FAILED",
            ErrorCode::EmptyContent => "EMPTY_CONTENT",
            ErrorCode::MirrorUnavailable => "MIRROR_UNAVAILABLE",
        }
    }

    /// Static message suitable for showing to an end user.
    pub fn user_message(&self) -> &'static str {
        match self {
            ErrorCode::InvalidUrl => "Invalid URL.",
            ErrorCode::FetchFailed => "Could not fetch the URL. It may be unreachable or blocked.",
            ErrorCode::ParseFailed => "Could not extract readable content from the page.",
            ErrorCode::EmptyContent => "The page returned no readable content.",
            ErrorCode::MirrorUnavailable => {
                "Twitter mirror services are currently unavailable. Try pasting the tweet text manually."
            }
        }
    }

    /// Whether the caller should offer a manual-paste fallback for this code.
    pub fn offers_manual_paste(&self) -> bool {
        matches!(self, ErrorCode::MirrorUnavailable | ErrorCode::EmptyContent)
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Main error type for extraction operations.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Invalid URL provided.
    ///
    /// Only produced by callers that validate input before extraction.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// The page or API could not be fetched.
    ///
    /// Covers DNS and connection errors, timeouts, cancellation and non-2xx
    /// responses from the primary source.
    #[error("FETCH_FAILED: {0}")]
    FetchFailed(String),

    /// A fetched payload failed to decode in an unexpected way.
    #[error("PARSE_FAILED: {0}")]
    ParseFailed(String),

    /// No content could be extracted from the document.
    #[error("EMPTY_CONTENT: no readable content in the document")]
    EmptyContent,

    /// Both the mirror API and the mirror page failed to produce a post.
    #[error("MIRROR_UNAVAILABLE: all social mirror strategies failed")]
    MirrorUnavailable,
}

impl ExtractError {
    /// The classification code of this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            ExtractError::InvalidUrl(_) => ErrorCode::InvalidUrl,
            ExtractError::FetchFailed(_) => ErrorCode::FetchFailed,
            ExtractError::ParseFailed(_) => ErrorCode::ParseFailed,
            ExtractError::EmptyContent => ErrorCode::EmptyContent,
            ExtractError::MirrorUnavailable => ErrorCode::MirrorUnavailable,
        }
    }
}

impl From<crate::fetch::FetchError> for ExtractError {
    fn from(err: crate::fetch::FetchError) -> Self {
        ExtractError::FetchFailed(err.to_string())
    }
}

/// Result type alias for ExtractError.
pub type Result<T> = std::result::Result<T, ExtractError>;
