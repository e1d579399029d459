use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use clipmark_core::{
    ArticleResult, Document, Extraction, Readability, RichContent, format_markdown, format_plain_text, preprocess_html,
    render_blocks,
};

fn bench_parse(c: &mut Criterion) {
    let article = std::fs::read_to_string("../../tests/fixtures/article.html").unwrap();
    let repeated = article.repeat(20);

    let mut group = c.benchmark_group("parse");

    group.bench_with_input(BenchmarkId::new("article", "5KB"), &article, |b, html| {
        b.iter(|| Document::parse(black_box(html)))
    });

    group.bench_with_input(BenchmarkId::new("repeated", "100KB"), &repeated, |b, html| {
        b.iter(|| Document::parse(black_box(html)))
    });

    group.finish();
}

fn bench_readability(c: &mut Criterion) {
    let html = std::fs::read_to_string("../../tests/fixtures/article.html").unwrap();
    let readability = Readability::new();

    c.bench_function("readability", |b| b.iter(|| readability.parse(black_box(&html))));
}

fn bench_preprocess(c: &mut Criterion) {
    let html = std::fs::read_to_string("../../tests/fixtures/article.html").unwrap();
    let config = Default::default();

    c.bench_function("preprocess", |b| b.iter(|| preprocess_html(black_box(&html), &config)));
}

fn bench_render_blocks(c: &mut Criterion) {
    let json = std::fs::read_to_string("../../tests/fixtures/x_article.json").unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let content: RichContent = serde_json::from_value(value["tweet"]["article"]["content"].clone()).unwrap();

    c.bench_function("render_blocks", |b| b.iter(|| render_blocks(black_box(&content), &[])));
}

fn bench_formatters(c: &mut Criterion) {
    let html = std::fs::read_to_string("../../tests/fixtures/article.html").unwrap();
    let readable = Readability::new().parse(&html).unwrap();
    let extraction = Extraction::Article(ArticleResult {
        title: readable.title.unwrap_or_default(),
        text: readable.text,
        html_content: Some(readable.content_html),
        author: readable.byline,
        ..Default::default()
    });

    let mut group = c.benchmark_group("format");
    group.bench_function("plain_text", |b| b.iter(|| format_plain_text(black_box(&extraction))));
    group.bench_function("markdown", |b| b.iter(|| format_markdown(black_box(&extraction))));
    group.finish();
}

criterion_group!(
    benches,
    bench_parse,
    bench_readability,
    bench_preprocess,
    bench_render_blocks,
    bench_formatters
);
criterion_main!(benches);
