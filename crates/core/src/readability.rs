//! Main-content isolation.
//!
//! [`Readability`] scores candidate containers, propagates scores up the
//! tree, picks the best container plus its qualifying siblings and cleans the
//! result. Metadata is read from the raw markup since preprocessing drops
//! the JSON-LD scripts it depends on.
//!
//! # Example
//!
//! ```rust
//! use clipmark_core::Readability;
//!
//! let html = r#"<html><head><title>Post</title></head><body>
//!     <article><p>Readable content, long enough to count, with a few commas, and enough words to pass.</p></article>
//! </body></html>"#;
//! let readable = Readability::new().parse(html).unwrap();
//! assert_eq!(readable.title.as_deref(), Some("Post"));
//! assert!(readable.text.contains("Readable content"));
//! ```

use std::collections::{HashMap, HashSet};

use url::Url;

use crate::parse::{Document, Element, NodeId};
use crate::postprocess::{PostProcessConfig, postprocess_html};
use crate::preprocess::PreprocessConfig;
use crate::scoring::{ScoreConfig, calculate_score, link_density};
use crate::{ExtractError, Result};

/// Configuration for the readability pass.
///
/// ```rust
/// use clipmark_core::ReadabilityConfig;
///
/// let config = ReadabilityConfig::builder()
///     .min_score(25.0)
///     .char_threshold(300)
///     .keep_classes(true)
///     .build();
/// assert_eq!(config.char_threshold, 300);
/// ```
#[derive(Debug, Clone)]
pub struct ReadabilityConfig {
    /// Minimum score the top candidate needs; below it the whole body is used (default: 20.0).
    pub min_score: f64,
    /// Paragraph-sized elements shorter than a tenth of this are not scored (default: 500).
    pub char_threshold: usize,
    /// Number of top candidates compared against each other (default: 5).
    pub nb_top_candidates: usize,
    /// Fraction of the top score a sibling needs to be appended (default: 0.2).
    pub sibling_threshold: f64,
    /// Whether to unwrap elements whose class/id look like page chrome (default: true).
    pub remove_unlikely: bool,
    /// Whether to preserve class attributes in output HTML (default: false).
    pub keep_classes: bool,
}

impl Default for ReadabilityConfig {
    fn default() -> Self {
        Self {
            min_score: 20.0,
            char_threshold: 500,
            nb_top_candidates: 5,
            sibling_threshold: 0.2,
            remove_unlikely: true,
            keep_classes: false,
        }
    }
}

impl ReadabilityConfig {
    pub fn builder() -> ReadabilityConfigBuilder {
        ReadabilityConfigBuilder::new()
    }
}

/// Builder for [`ReadabilityConfig`].
#[derive(Debug, Default)]
pub struct ReadabilityConfigBuilder {
    config: ReadabilityConfig,
}

impl ReadabilityConfigBuilder {
    pub fn new() -> Self {
        Self { config: ReadabilityConfig::default() }
    }

    pub fn min_score(mut self, value: f64) -> Self {
        self.config.min_score = value;
        self
    }

    pub fn char_threshold(mut self, value: usize) -> Self {
        self.config.char_threshold = value;
        self
    }

    pub fn nb_top_candidates(mut self, value: usize) -> Self {
        self.config.nb_top_candidates = value.max(1);
        self
    }

    pub fn sibling_threshold(mut self, value: f64) -> Self {
        self.config.sibling_threshold = value;
        self
    }

    pub fn remove_unlikely(mut self, value: bool) -> Self {
        self.config.remove_unlikely = value;
        self
    }

    pub fn keep_classes(mut self, value: bool) -> Self {
        self.config.keep_classes = value;
        self
    }

    pub fn build(self) -> ReadabilityConfig {
        self.config
    }
}

/// Output of the readability pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Readable {
    pub title: Option<String>,
    pub byline: Option<String>,
    pub site_name: Option<String>,
    pub excerpt: Option<String>,
    /// Cleaned HTML of the main content.
    pub content_html: String,
    /// Plain text of `content_html`, with blank lines between blocks.
    pub text: String,
    /// Whether no candidate passed the threshold and the body was used instead.
    pub used_body_fallback: bool,
}

/// Tags scored as content containers.
const CANDIDATE_TAGS: &[&str] = &["div", "article", "section", "main", "p", "td", "pre", "blockquote"];

/// Containers scored regardless of their text length.
const CONTAINER_TAGS: &[&str] = &["article", "section", "main"];

/// Ancestors that never receive propagated score.
const ROOT_TAGS: &[&str] = &["html", "body"];

/// Siblings are considered only above this absolute score, whatever the threshold.
const MIN_SIBLING_SCORE: f64 = 10.0;

/// Ancestor promotion needs this many strong alternatives inside it.
const MIN_SHARED_ALTERNATIVES: usize = 3;

#[derive(Debug, Clone)]
struct Candidate<'a> {
    element: Element<'a>,
    score: f64,
}

/// Readability engine.
#[derive(Debug, Clone, Default)]
pub struct Readability {
    config: ReadabilityConfig,
    score_config: ScoreConfig,
}

impl Readability {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ReadabilityConfig) -> Self {
        Self { config, score_config: ScoreConfig::default() }
    }

    pub fn config(&self) -> &ReadabilityConfig {
        &self.config
    }

    /// Extract the main content of `html`.
    ///
    /// # Errors
    ///
    /// - [`ExtractError::EmptyContent`] when the selected content has no text.
    /// - [`ExtractError::ParseFailed`] when the document has no body to fall back to.
    pub fn parse(&self, html: &str) -> Result<Readable> {
        self.parse_inner(html, None)
    }

    /// Like [`Readability::parse`], resolving relative links and images against `base_url`.
    pub fn parse_with_url(&self, html: &str, base_url: &Url) -> Result<Readable> {
        self.parse_inner(html, Some(base_url.clone()))
    }

    fn parse_inner(&self, html: &str, base_url: Option<Url>) -> Result<Readable> {
        let raw = Document::parse(html);
        let preprocess = PreprocessConfig { remove_unlikely: self.config.remove_unlikely, base_url, ..Default::default() };
        let doc = Document::parse_with_preprocessing(html, &preprocess);

        let (content, used_body_fallback) = match self.select_content(&doc) {
            Some(content) => (content, false),
            None => {
                let body = doc
                    .body()
                    .ok_or_else(|| ExtractError::ParseFailed("document has no body".to_string()))?;
                tracing::debug!("no candidate passed the threshold, using body");
                (body.inner_html(), true)
            }
        };

        let postprocess = PostProcessConfig { keep_classes: self.config.keep_classes, ..Default::default() };
        let content_html = postprocess_html(&content, &postprocess);

        let text = Document::parse(&content_html).body().map(|body| body.readable_text()).unwrap_or_default();
        if text.trim().is_empty() {
            return Err(ExtractError::EmptyContent);
        }

        Ok(Readable {
            title: raw.extract_title(),
            byline: raw.extract_byline(),
            site_name: raw.extract_site_name(),
            excerpt: raw.extract_excerpt(),
            content_html,
            text,
            used_body_fallback,
        })
    }

    /// Outer HTML of the top candidate and its siblings, or `None` when nothing qualifies.
    fn select_content(&self, doc: &Document) -> Option<String> {
        let candidates = self.score_candidates(doc);

        // Equal scores keep document order; node ids follow parse order.
        let mut ranked: Vec<&Candidate<'_>> = candidates.values().collect();
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.element.id().cmp(&b.element.id())));
        ranked.truncate(self.config.nb_top_candidates);

        let top = *ranked.first()?;
        if top.score < self.config.min_score {
            tracing::debug!(score = top.score, threshold = self.config.min_score, "top candidate below threshold");
            return None;
        }

        let top = self.promote_shared_ancestor(top, &ranked[1..], &candidates);
        tracing::debug!(tag = %top.element.tag_name(), score = top.score, "selected top candidate");

        Some(self.with_siblings(top, &candidates))
    }

    /// Score every candidate element, then add half of each score to its parent
    /// and a third to its grandparent.
    fn score_candidates<'a>(&self, doc: &'a Document) -> HashMap<NodeId, Candidate<'a>> {
        let min_chars = self.config.char_threshold / 10;
        let mut candidates: HashMap<NodeId, Candidate<'a>> = HashMap::new();

        for tag in CANDIDATE_TAGS {
            for element in doc.select(tag).unwrap_or_default() {
                if !CONTAINER_TAGS.contains(tag) && element.text().trim().chars().count() < min_chars {
                    continue;
                }
                let score = calculate_score(&element, &self.score_config).total;
                candidates.insert(element.id(), Candidate { element, score });
            }
        }

        let mut seeds: Vec<(Element<'a>, f64)> =
            candidates.values().map(|candidate| (candidate.element.clone(), candidate.score)).collect();
        seeds.sort_by_key(|(element, _)| element.id());

        for (element, score) in seeds {
            let ancestors = std::iter::successors(element.parent(), Element::parent)
                .take(2)
                .zip([2.0, 3.0]);
            for (ancestor, divisor) in ancestors {
                if ROOT_TAGS.contains(&ancestor.tag_name().as_str()) {
                    break;
                }
                let entry = candidates.entry(ancestor.id()).or_insert_with(|| Candidate {
                    score: calculate_score(&ancestor, &self.score_config).total,
                    element: ancestor,
                });
                entry.score += score / divisor;
            }
        }

        candidates
    }

    /// When several strong alternatives sit inside one ancestor of the top
    /// candidate, that ancestor holds the article and the top candidate is
    /// only one part of it.
    fn promote_shared_ancestor<'a, 'b>(
        &self, top: &'b Candidate<'a>, alternatives: &[&'b Candidate<'a>], candidates: &'b HashMap<NodeId, Candidate<'a>>,
    ) -> &'b Candidate<'a> {
        let strong: Vec<HashSet<NodeId>> = alternatives
            .iter()
            .filter(|alt| alt.score >= top.score * 0.75)
            .map(|alt| std::iter::successors(alt.element.parent(), Element::parent).map(|el| el.id()).collect())
            .collect();
        if strong.len() < MIN_SHARED_ALTERNATIVES {
            return top;
        }

        for ancestor in std::iter::successors(top.element.parent(), Element::parent) {
            if ROOT_TAGS.contains(&ancestor.tag_name().as_str()) {
                break;
            }
            let shared = strong.iter().filter(|ids| ids.contains(&ancestor.id())).count();
            if shared >= MIN_SHARED_ALTERNATIVES
                && let Some(promoted) = candidates.get(&ancestor.id())
            {
                tracing::debug!(tag = %ancestor.tag_name(), "promoted shared ancestor");
                return promoted;
            }
        }
        top
    }

    /// The top candidate plus qualifying siblings, in document order.
    fn with_siblings(&self, top: &Candidate<'_>, candidates: &HashMap<NodeId, Candidate<'_>>) -> String {
        let Some(parent) = top.element.parent() else {
            return top.element.outer_html();
        };

        let threshold = MIN_SIBLING_SCORE.max(top.score * self.config.sibling_threshold);
        let mut parts = Vec::new();

        for sibling in parent.children() {
            let keep = if sibling.id() == top.element.id() {
                true
            } else if candidates.get(&sibling.id()).is_some_and(|c| c.score >= threshold) {
                true
            } else if sibling.tag_name() == "p" {
                let text = sibling.text();
                let length = text.trim().chars().count();
                let density = link_density(&sibling);
                (length > 80 && density < 0.25) || (length > 0 && density == 0.0 && text.contains(". "))
            } else {
                false
            };

            if keep {
                parts.push(sibling.outer_html());
            }
        }

        parts.join("\n")
    }
}
