//! Criterion benchmarks for the block engine.
//!
//! Run with: `cargo bench`
//!
//! These benchmarks measure extraction, serialization and reordering over
//! listing documents of increasing size.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use listing_blocks::categories::BlockLibrary;
use listing_blocks::core::Classifier;
use listing_blocks::runtime::extractor::extract_blocks;
use listing_blocks::runtime::serializer::serialize_blocks;
use listing_blocks::runtime::session::EditorSession;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// A document built from the library templates, cycled to `n` blocks
fn make_document(n: usize) -> String {
    let library = BlockLibrary::standard();
    library
        .all()
        .iter()
        .cycle()
        .take(n)
        .map(|t| t.content.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

// ---------------------------------------------------------------------------
// Extraction Benchmarks
// ---------------------------------------------------------------------------

fn bench_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract");

    for count in [10, 100, 1_000] {
        let html = make_document(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &html, |b, html| {
            b.iter(|| black_box(extract_blocks(html).len()));
        });
    }
    group.finish();
}

fn bench_classify(c: &mut Criterion) {
    let classifier = Classifier::new();
    c.bench_function("classify_last_rule", |b| {
        b.iter(|| black_box(classifier.classify(black_box("div"), black_box("showcase wide"))));
    });
}

// ---------------------------------------------------------------------------
// Serialization Benchmarks
// ---------------------------------------------------------------------------

fn bench_serialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialize");

    for count in [10, 100, 1_000] {
        let blocks = extract_blocks(&make_document(count));
        group.bench_with_input(BenchmarkId::from_parameter(count), &blocks, |b, blocks| {
            b.iter(|| black_box(serialize_blocks(blocks).len()));
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// Session Benchmarks
// ---------------------------------------------------------------------------

fn bench_reorder(c: &mut Criterion) {
    let mut group = c.benchmark_group("reorder");

    for count in [10, 100, 1_000] {
        let mut session = EditorSession::from_html(&make_document(count));
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &n| {
            b.iter(|| black_box(session.move_block(0, n - 1)));
        });
    }
    group.finish();
}

fn bench_append(c: &mut Criterion) {
    c.bench_function("append_template_to_50", |b| {
        b.iter_batched(
            || EditorSession::from_html(&make_document(50)),
            |mut session| black_box(session.append_template("ebay-description")),
            criterion::BatchSize::SmallInput,
        );
    });
}

criterion_group!(extraction_benches, bench_extract, bench_classify);

criterion_group!(serialization_benches, bench_serialize);

criterion_group!(session_benches, bench_reorder, bench_append);

criterion_main!(extraction_benches, serialization_benches, session_benches);
