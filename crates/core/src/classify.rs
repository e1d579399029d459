//! URL classification.
//!
//! Decides whether a URL should go through the social-post pipeline or the
//! generic article pipeline. Article is the fallback route, so this never fails.

use serde::Serialize;
use url::Url;

/// Hosts served by the social-post extractor, with and without `www.`.
pub const SOCIAL_HOSTS: [&str; 8] = [
    "twitter.com",
    "www.twitter.com",
    "x.com",
    "www.x.com",
    "fxtwitter.com",
    "www.fxtwitter.com",
    "vxtwitter.com",
    "www.vxtwitter.com",
];

/// Which extraction strategy a URL routes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UrlKind {
    /// A post on a known social platform or one of its mirrors.
    Social,
    /// Anything else.
    Article,
}

impl UrlKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            UrlKind::Social => "social",
            UrlKind::Article => "article",
        }
    }
}

/// Classify a URL by its host.
///
/// Unparseable input and URLs without a host classify as [`UrlKind::Article`].
///
/// ```rust
/// use clipmark_core::{classify, UrlKind};
///
/// assert_eq!(classify("https://x.com/user/status/1"), UrlKind::Social);
/// assert_eq!(classify("https://example.com/post"), UrlKind::Article);
/// assert_eq!(classify("not-a-url"), UrlKind::Article);
/// ```
pub fn classify(url: &str) -> UrlKind {
    let Ok(parsed) = Url::parse(url) else {
        return UrlKind::Article;
    };

    match parsed.host_str() {
        Some(host) if SOCIAL_HOSTS.contains(&host.to_lowercase().as_str()) => UrlKind::Social,
        _ => UrlKind::Article,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://twitter.com/user/status/123")]
    #[case("https://www.twitter.com/user/status/123")]
    #[case("https://x.com/user/status/123")]
    #[case("https://www.x.com/user/status/123")]
    #[case("https://fxtwitter.com/user/status/123")]
    #[case("https://www.fxtwitter.com/user/status/123")]
    #[case("https://vxtwitter.com/user/status/123")]
    #[case("https://www.vxtwitter.com/user/status/123")]
    fn test_social_hosts(#[case] url: &str) {
        assert_eq!(classify(url), UrlKind::Social);
    }

    #[rstest]
    #[case("https://example.com/article")]
    #[case("https://blog.x.com.evil.net/post")]
    #[case("https://mobile.twitter.com/user/status/1")]
    #[case("not-a-url")]
    #[case("")]
    #[case("mailto:someone@x.com")]
    fn test_article_fallback(#[case] url: &str) {
        assert_eq!(classify(url), UrlKind::Article);
    }

    #[test]
    fn test_host_case_is_ignored() {
        assert_eq!(classify("https://X.COM/user/status/1"), UrlKind::Social);
        assert_eq!(classify("https://WWW.Twitter.com/user/status/1"), UrlKind::Social);
    }

    #[test]
    fn test_kind_names_match_serialized_form() {
        assert_eq!(UrlKind::Social.as_str(), "social");
        assert_eq!(UrlKind::Article.as_str(), "article");
        for kind in [UrlKind::Social, UrlKind::Article] {
            assert_eq!(serde_json::to_value(kind).unwrap(), kind.as_str());
        }
    }
}
