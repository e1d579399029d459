use std::sync::LazyLock;

use regex::Regex;

use crate::parse::Element;

/// Weights used when scoring candidate elements.
#[derive(Debug, Clone)]
pub struct ScoreConfig {
    /// Weight for positive class/ID patterns
    pub positive_weight: f64,
    /// Weight for negative class/ID patterns
    pub negative_weight: f64,
    /// Maximum content density score from character count
    pub max_char_density_score: f64,
    /// Maximum content density score from comma count
    pub max_comma_density_score: f64,
    /// Characters per point for content density scoring
    pub chars_per_point: usize,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            positive_weight: 25.0,
            negative_weight: -25.0,
            max_char_density_score: 3.0,
            max_comma_density_score: 3.0,
            chars_per_point: 100,
        }
    }
}

/// Breakdown of an element's score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score {
    /// Score from the tag alone
    pub base: f64,
    /// Adjustment from class/ID patterns
    pub class_weight: f64,
    /// Score from text length and comma count
    pub content_density: f64,
    /// Share of text inside links, 0.0 to 1.0
    pub link_density: f64,
    /// Combined score after the link penalty
    pub total: f64,
}

/// How likely a tag is to hold main content.
///
/// - ARTICLE: +10
/// - SECTION: +8
/// - DIV: +5
/// - TD, BLOCKQUOTE: +3
/// - FORM, ADDRESS and list elements: -3
/// - headings, TH, HEADER, FOOTER, NAV: -5
pub fn base_tag_score(element: &Element<'_>) -> f64 {
    match element.tag_name().as_str() {
        "article" => 10.0,
        "section" => 8.0,
        "div" | "main" => 5.0,
        "td" | "blockquote" => 3.0,
        "form" | "address" | "ol" | "ul" | "dl" | "dd" | "dt" | "li" => -3.0,
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "th" | "header" | "footer" | "nav" => -5.0,
        _ => 0.0,
    }
}

static POSITIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(article|body|content|entry|hentry|h-entry|main|page|post|text|blog|story)").expect("static regex")
});

static NEGATIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(banner|breadcrumbs?|combx|comment|community|disqus|extra|foot|header|menu|related|remark|rss|shoutbox|sidebar|sponsor|ad-break|agegate|pagination|pager|popup|promo|share|widget)",
    )
    .expect("static regex")
});

/// Class/ID weight: the id is checked first, then each class name in turn.
/// A positive match wins over a negative one on the same value.
pub fn class_id_weight(element: &Element<'_>, config: &ScoreConfig) -> f64 {
    let values = element
        .attr("id")
        .into_iter()
        .chain(element.attr("class").into_iter().flat_map(str::split_whitespace));

    for value in values {
        if POSITIVE.is_match(value) {
            return config.positive_weight;
        }
        if NEGATIVE.is_match(value) {
            return config.negative_weight;
        }
    }
    0.0
}

/// One point per `chars_per_point` characters plus one per comma, each capped.
pub fn content_density_score(element: &Element<'_>, config: &ScoreConfig) -> f64 {
    let text = element.text();
    let char_score = ((text.chars().count() / config.chars_per_point) as f64).min(config.max_char_density_score);
    let comma_score = (text.matches(',').count() as f64).min(config.max_comma_density_score);
    char_score + comma_score
}

/// Ratio of link text characters to all text characters.
pub fn link_density(element: &Element<'_>) -> f64 {
    let text_length = element.text().chars().count();
    if text_length == 0 {
        return 0.0;
    }

    let link_length: usize = element
        .select("a")
        .unwrap_or_default()
        .iter()
        .map(|link| link.text().chars().count())
        .sum();

    link_length as f64 / text_length as f64
}

/// Score an element.
///
/// The raw score (tag + class/ID + density) is scaled by `1 - link_density`.
/// Elements with a positive class/ID or more than 500 characters of text only
/// take half the link penalty.
pub fn calculate_score(element: &Element<'_>, config: &ScoreConfig) -> Score {
    let base = base_tag_score(element);
    let class_weight = class_id_weight(element, config);
    let content_density = content_density_score(element, config);
    let link_density = link_density(element);

    let content_rich = element.text().chars().count() > 500;
    let link_penalty =
        if class_weight > 0.0 || content_rich { 1.0 - link_density * 0.5 } else { 1.0 - link_density };

    Score { base, class_weight, content_density, link_density, total: (base + class_weight + content_density) * link_penalty }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::Document;

    fn first<'a>(doc: &'a Document, selector: &str) -> Element<'a> {
        doc.select_first(selector).unwrap().unwrap()
    }

    #[test]
    fn test_base_tag_scores() {
        let doc = Document::parse(
            r#"<article>a</article><section>s</section><div>d</div><table><tr><td>c</td></tr></table>
               <form>f</form><nav>n</nav><header>h</header><p>p</p>"#,
        );
        assert_eq!(base_tag_score(&first(&doc, "article")), 10.0);
        assert_eq!(base_tag_score(&first(&doc, "section")), 8.0);
        assert_eq!(base_tag_score(&first(&doc, "div")), 5.0);
        assert_eq!(base_tag_score(&first(&doc, "td")), 3.0);
        assert_eq!(base_tag_score(&first(&doc, "form")), -3.0);
        assert_eq!(base_tag_score(&first(&doc, "nav")), -5.0);
        assert_eq!(base_tag_score(&first(&doc, "header")), -5.0);
        assert_eq!(base_tag_score(&first(&doc, "p")), 0.0);
    }

    #[test]
    fn test_class_weight_positive() {
        let doc = Document::parse(r#"<div class="article-content">Content</div>"#);
        assert_eq!(class_id_weight(&first(&doc, "div"), &ScoreConfig::default()), 25.0);
    }

    #[test]
    fn test_class_weight_negative() {
        let doc = Document::parse(r#"<div class="sidebar">Content</div>"#);
        assert_eq!(class_id_weight(&first(&doc, "div"), &ScoreConfig::default()), -25.0);
    }

    #[test]
    fn test_class_weight_id_checked_first() {
        let doc = Document::parse(r#"<div id="main-article" class="sidebar">Content</div>"#);
        assert_eq!(class_id_weight(&first(&doc, "div"), &ScoreConfig::default()), 25.0);
    }

    #[test]
    fn test_class_weight_no_match() {
        let doc = Document::parse(r#"<div class="container" id="wrapper">Content</div>"#);
        assert_eq!(class_id_weight(&first(&doc, "div"), &ScoreConfig::default()), 0.0);
    }

    #[test]
    fn test_content_density() {
        let config = ScoreConfig::default();

        let doc = Document::parse(r#"<div>Short text here.</div>"#);
        assert_eq!(content_density_score(&first(&doc, "div"), &config), 0.0);

        let doc = Document::parse(r#"<div>Text with commas, more commas, even more commas, and more.</div>"#);
        assert_eq!(content_density_score(&first(&doc, "div"), &config), 3.0);

        let doc = Document::parse(&format!("<div>{}</div>", "a".repeat(500)));
        assert_eq!(content_density_score(&first(&doc, "div"), &config), 3.0);
    }

    #[test]
    fn test_link_density() {
        let doc = Document::parse(r##"<div id="a">Plain text.</div><div id="b"><a href="#">Only a link</a></div>
            <div id="c">Some text <a href="#">link</a> more text</div>"##);
        assert_eq!(link_density(&first(&doc, "#a")), 0.0);
        assert_eq!(link_density(&first(&doc, "#b")), 1.0);
        let mixed = link_density(&first(&doc, "#c"));
        assert!(mixed > 0.0 && mixed < 1.0);
    }

    #[test]
    fn test_calculate_score_rewards_prose() {
        let doc = Document::parse(
            r##"<article class="main-content">
            This is a long piece of text that should score well, with multiple commas, to indicate prose content.
            <a href="#">Small link</a>
            More text here to increase character count, more commas, more content, this should score high.
        </article>"##,
        );
        let score = calculate_score(&first(&doc, "article"), &ScoreConfig::default());
        assert_eq!(score.base, 10.0);
        assert_eq!(score.class_weight, 25.0);
        assert!(score.link_density > 0.0 && score.link_density < 0.3);
        assert!(score.total > 25.0);
    }

    #[test]
    fn test_calculate_score_penalizes_navigation() {
        let doc = Document::parse(r##"<nav class="menu"><a href="#">One</a><a href="#">Two</a></nav>"##);
        let score = calculate_score(&first(&doc, "nav"), &ScoreConfig::default());
        assert_eq!(score.base, -5.0);
        assert_eq!(score.class_weight, -25.0);
        assert!(score.total <= 0.0);
    }
}
