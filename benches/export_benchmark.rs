//! Benchmarks for the procdoc export pipeline.
//!
//! Run with: cargo bench
//!
//! These benchmarks use synthetic step lists of increasing length.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use procdoc::render::{paginate, render_layout};
use procdoc::{
    parse_blocks, style_spans, BitmapRasterizer, LayoutOptions, Procdoc, SourceDocument,
};

/// Creates a body with `steps` numbered steps split into sections of ten.
fn create_test_body(steps: usize) -> String {
    let mut body = String::new();
    for i in 0..steps {
        if i % 10 == 0 {
            body.push_str(&format!("## Section {}\n", i / 10 + 1));
        }
        body.push_str(&format!(
            "{}. Open the **settings** panel and confirm step {} before continuing\n",
            i % 10 + 1,
            i + 1
        ));
    }
    body
}

/// Benchmark block parsing and inline styling.
fn bench_parsing(c: &mut Criterion) {
    let body = create_test_body(200);

    c.bench_function("parse_blocks_200_steps", |b| {
        b.iter(|| parse_blocks(black_box(&body)));
    });

    c.bench_function("style_spans", |b| {
        b.iter(|| style_spans(black_box("Click **Save** then **Close** the dialog")));
    });
}

/// Benchmark layout and pagination at various sizes.
fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    let options = LayoutOptions::default();
    let rasterizer = BitmapRasterizer::new();

    for steps in [10, 50, 200].iter() {
        let blocks = parse_blocks(&create_test_body(*steps));

        group.bench_function(format!("render_layout_{}_steps", steps), |b| {
            b.iter(|| render_layout("Benchmark", black_box(&blocks), &[], &rasterizer, &options));
        });

        let layout = render_layout("Benchmark", &blocks, &[], &rasterizer, &options).unwrap();
        group.bench_function(format!("paginate_{}_steps", steps), |b| {
            b.iter(|| paginate(black_box(&layout), &rasterizer, options.page_height_px()));
        });
    }

    group.finish();
}

/// Benchmark a full PDF export.
fn bench_pdf_export(c: &mut Criterion) {
    let job = Procdoc::new()
        .without_timestamp()
        .document("Benchmark", create_test_body(50));

    c.bench_function("pdf_export_50_steps", |b| {
        b.iter(|| job.to_pdf().unwrap());
    });

    c.bench_function("text_export_50_steps", |b| {
        let doc = SourceDocument::new("Benchmark", create_test_body(50));
        b.iter(|| procdoc::export_text(black_box(&doc.title), black_box(&doc.body)).unwrap());
    });
}

criterion_group!(benches, bench_parsing, bench_layout, bench_pdf_export);
criterion_main!(benches);
