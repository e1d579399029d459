//! JSON response envelopes.
//!
//! Success and failure share one shape, discriminated by `ok`:
//!
//! ```json
//! {"ok": true, "data": {"type": "article", "title": "..."}}
//! {"ok": false, "error": {"code": "FETCH_FAILED", "message": "..."}}
//! ```

use serde::Serialize;

use crate::error::{ErrorCode, ExtractError, Result};
use crate::model::Extraction;

/// `{"ok": true, "data": ...}`
#[derive(Debug, Clone, Serialize)]
pub struct SuccessEnvelope<'a> {
    pub ok: bool,
    pub data: &'a Extraction,
}

/// `{"ok": false, "error": {...}}`
#[derive(Debug, Clone, Serialize)]
pub struct ErrorEnvelope {
    pub ok: bool,
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub code: ErrorCode,
    /// The static user-facing message for `code`, never internal detail.
    pub message: &'static str,
}

pub fn success_envelope(extraction: &Extraction) -> SuccessEnvelope<'_> {
    SuccessEnvelope { ok: true, data: extraction }
}

pub fn error_envelope(err: &ExtractError) -> ErrorEnvelope {
    let code = err.code();
    ErrorEnvelope { ok: false, error: ErrorBody { code, message: code.user_message() } }
}

/// Serialize an envelope, optionally pretty-printed.
pub fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let encoded = if pretty { serde_json::to_string_pretty(value) } else { serde_json::to_string(value) };
    encoded.map_err(|e| ExtractError::ParseFailed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ArticleResult, Post, SocialResult};
    use serde_json::Value;

    #[test]
    fn test_success_envelope_shape() {
        let article = Extraction::Article(ArticleResult {
            title: "Title".into(),
            text: "Body".into(),
            site_name: Some("Blog".into()),
            ..Default::default()
        });
        let json: Value = serde_json::from_str(&to_json(&success_envelope(&article), false).unwrap()).unwrap();

        assert_eq!(json["ok"], true);
        assert_eq!(json["data"]["type"], "article");
        assert_eq!(json["data"]["siteName"], "Blog");
        assert!(json["data"]["featuredImage"].is_null());
    }

    #[test]
    fn test_social_envelope_shape() {
        let post = Post { text: "hi".into(), author: "A".into(), author_handle: "a".into(), ..Default::default() };
        let social = Extraction::Social(SocialResult::single(post));
        let json: Value = serde_json::from_str(&to_json(&success_envelope(&social), true).unwrap()).unwrap();

        assert_eq!(json["data"]["type"], "twitter");
        assert_eq!(json["data"]["tweet"]["text"], "hi");
        assert_eq!(json["data"]["thread"], serde_json::json!([]));
    }

    #[test]
    fn test_error_envelope_uses_user_message() {
        let err = ExtractError::FetchFailed("dns error: no such host".into());
        let json: Value = serde_json::from_str(&to_json(&error_envelope(&err), false).unwrap()).unwrap();

        assert_eq!(json["ok"], false);
        assert_eq!(json["error"]["code"], "FETCH_FAILED");
        assert_eq!(json["error"]["message"], "Could not fetch the URL. It may be unreachable or blocked.");
        assert!(!json.to_string().contains("dns error"));
    }

    #[test]
    fn test_pretty_output_is_multiline() {
        let out = to_json(&error_envelope(&ExtractError::MirrorUnavailable), true).unwrap();
        assert!(out.contains('\n'));
        assert!(out.contains("\"MIRROR_UNAVAILABLE\""));
    }
}
