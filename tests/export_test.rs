//! Integration tests for the export pipeline.

use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use image::{ImageFormat, Rgb, RgbImage};

use procdoc::render::{FontSpec, LayoutOptions, Surface, TextItem};
use procdoc::{
    export_pdf, export_text, file_name, BitmapRasterizer, Error, ExportFormat, ExportOptions,
    Exporter, Rasterizer, RenderedLayout, Screenshot, SourceDocument, TextMetrics,
};

/// Wraps the bitmap rasterizer and counts drawing and measuring calls.
#[derive(Default, Clone)]
struct CountingRasterizer {
    inner: BitmapRasterizer,
    draws: Arc<AtomicUsize>,
    measures: Arc<AtomicUsize>,
}

impl TextMetrics for CountingRasterizer {
    fn text_width(&self, text: &str, font: FontSpec) -> u32 {
        self.measures.fetch_add(1, Ordering::SeqCst);
        self.inner.text_width(text, font)
    }

    fn glyph_height(&self, font: FontSpec) -> u32 {
        self.inner.glyph_height(font)
    }
}

impl Rasterizer for CountingRasterizer {
    fn draw_text(&self, item: &TextItem, surface: &mut Surface) -> procdoc::Result<()> {
        self.inner.draw_text(item, surface)
    }

    fn draw(&self, layout: &RenderedLayout, surface: &mut Surface) -> procdoc::Result<()> {
        self.draws.fetch_add(1, Ordering::SeqCst);
        self.inner.draw(layout, surface)
    }
}

fn quiet_options() -> ExportOptions {
    ExportOptions::default().with_timestamp(false)
}

fn png_screenshot(width: u32, height: u32) -> Screenshot {
    let img = RgbImage::from_pixel(width, height, Rgb([200, 30, 30]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    Screenshot::from_bytes(out.into_inner()).with_filename("step.png")
}

fn count(haystack: &[u8], needle: &[u8]) -> usize {
    haystack.windows(needle.len()).filter(|w| *w == needle).count()
}

#[test]
fn test_flat_text_exact() {
    let artifact = export_text("Setup Guide", "## Step 1\n1. Open app").unwrap();
    assert_eq!(
        String::from_utf8(artifact.bytes).unwrap(),
        "Setup Guide\n\n-----------\n\n## Step 1\n1. Open app"
    );
    assert_eq!(artifact.file_name, "setup_guide.txt");
    assert_eq!(artifact.mime_type, "text/plain");
}

#[test]
fn test_title_used_verbatim_by_every_output() {
    let doc = SourceDocument::new(" Setup Guide ", "1. Open app");

    let text = export_text(&doc.title, &doc.body).unwrap();
    assert_eq!(
        String::from_utf8(text.bytes).unwrap(),
        " Setup Guide \n\n-------------\n\n1. Open app"
    );
    assert_eq!(text.file_name, "_setup_guide_.txt");

    assert!(procdoc::to_preview_html(&doc).contains("<h1> Setup Guide </h1>"));

    let pdf = Exporter::with_options(quiet_options())
        .export(&doc, ExportFormat::Pdf)
        .unwrap();
    assert_eq!(count(&pdf.bytes, b"( Setup Guide )"), 1);
}

#[test]
fn test_missing_title_never_rasterizes() {
    let rasterizer = CountingRasterizer::default();
    let exporter = Exporter::with_rasterizer(quiet_options(), rasterizer.clone());

    for title in ["", "   ", "\t\n"] {
        let doc = SourceDocument::new(title, "## Step 1\n1. Open app")
            .with_screenshot(png_screenshot(10, 10));
        for format in [ExportFormat::Pdf, ExportFormat::Text] {
            let result = exporter.export(&doc, format);
            assert!(matches!(result, Err(Error::MissingTitle)));
        }
        assert!(matches!(exporter.render_pages(&doc), Err(Error::MissingTitle)));
    }

    assert_eq!(rasterizer.draws.load(Ordering::SeqCst), 0);
    assert_eq!(rasterizer.measures.load(Ordering::SeqCst), 0);
    assert!(!exporter.status().in_progress);
}

#[test]
fn test_second_export_rejected_while_running() {
    let exporter = Exporter::with_options(quiet_options());
    let doc = SourceDocument::new("Guide", "1. Open app");

    let guard = exporter.begin(ExportFormat::Pdf).unwrap();
    assert!(matches!(
        exporter.export(&doc, ExportFormat::Text),
        Err(Error::ExportInProgress)
    ));
    drop(guard);

    assert!(exporter.export(&doc, ExportFormat::Text).is_ok());
}

#[test]
fn test_guard_cleared_after_failure() {
    let exporter = Exporter::with_options(quiet_options());
    let doc = SourceDocument::new("Guide", "1. Open app")
        .with_screenshot(Screenshot::from_bytes(b"GIF89a not really".to_vec()));

    let err = exporter.export(&doc, ExportFormat::Pdf).unwrap_err();
    assert!(err.is_render_failure());
    assert!(!exporter.status().in_progress);

    // the document is untouched and a valid export can follow
    assert_eq!(doc.screenshots.len(), 1);
    assert!(exporter.export(&doc, ExportFormat::Text).is_ok());
}

#[test]
fn test_oversized_screenshot_fails_cleanly() {
    let exporter = Exporter::with_options(quiet_options());
    let doc = SourceDocument::new("Tall", "1. Scroll").with_screenshot(png_screenshot(1, 200_000));

    let err = exporter.export(&doc, ExportFormat::Pdf).unwrap_err();
    assert!(err.is_render_failure());
    assert!(err.to_string().contains("pixel limit"));
    assert!(!exporter.status().in_progress);
}

#[test]
fn test_pdf_export_structure() {
    let doc = SourceDocument::new("Setup Guide", "## Step 1\n1. Open app\n2. Click **Save**");
    let artifact = Exporter::with_options(quiet_options())
        .export(&doc, ExportFormat::Pdf)
        .unwrap();

    assert!(artifact.bytes.starts_with(b"%PDF-"));
    assert_eq!(artifact.file_name, "setup_guide.pdf");
    assert_eq!(artifact.mime_type, "application/pdf");
    assert_eq!(artifact.page_count, Some(1));
    assert_eq!(count(&artifact.bytes, b"/Subtype /Image"), 1);
    assert_eq!(count(&artifact.bytes, b"/CreationDate"), 0);
}

#[test]
fn test_long_document_spans_pages() {
    let body: String = (1..=120)
        .map(|i| format!("{}. Step {} of a long procedure", i, i))
        .collect::<Vec<_>>()
        .join("\n");
    let rasterizer = CountingRasterizer::default();
    let exporter = Exporter::with_rasterizer(quiet_options(), rasterizer.clone());

    let artifact = exporter
        .export(&SourceDocument::new("Long", body), ExportFormat::Pdf)
        .unwrap();
    let pages = artifact.page_count.unwrap();

    assert!(pages >= 3);
    assert_eq!(rasterizer.draws.load(Ordering::SeqCst), pages);
    assert_eq!(count(&artifact.bytes, format!("/Count {}", pages).as_bytes()), 1);
}

#[test]
fn test_screenshots_rendered_after_text() {
    let doc = SourceDocument::new("Shots", "1. Look")
        .with_screenshot(png_screenshot(64, 32))
        .with_screenshot(png_screenshot(32, 64));
    let exporter = Exporter::with_options(quiet_options());
    let pages = exporter.render_pages(&doc).unwrap();

    let red = pages
        .iter()
        .flat_map(|p| p.image.pixels())
        .filter(|p| p[0] > 150 && p[1] < 80 && p[2] < 80)
        .count();
    assert!(red > 0);
}

#[test]
fn test_data_url_screenshot_export() {
    let url = png_screenshot(8, 8).to_data_url();
    let doc = SourceDocument::new("Data", "Text")
        .with_screenshot(Screenshot::from_data_url(&url).unwrap());
    let artifact = export_pdf(&doc).unwrap();
    assert_eq!(artifact.page_count, Some(1));
}

#[test]
fn test_save_to_directory() {
    let dir = tempfile::tempdir().unwrap();
    let artifact = export_text("Release Checklist v2", "1. Tag").unwrap();

    let path = artifact.save_to(dir.path().join("nested")).unwrap();
    assert_eq!(path.file_name().unwrap(), "release_checklist_v2.txt");
    assert_eq!(std::fs::read(&path).unwrap(), artifact.bytes);
}

#[test]
fn test_custom_layout_options() {
    let options = quiet_options().with_layout(
        LayoutOptions::default()
            .with_scale(3)
            .with_screenshot_heading(None),
    );
    let exporter = Exporter::with_options(options.clone());
    let pages = exporter
        .render_pages(&SourceDocument::new("Scaled", "Body"))
        .unwrap();

    assert_eq!(pages[0].width(), options.layout.page_width_px());
    assert_eq!(pages[0].height(), options.layout.page_height_px());
}

#[test]
fn test_options_json_roundtrip() {
    let options = quiet_options().with_producer("acme docs");
    let json = serde_json::to_string(&options).unwrap();
    assert_eq!(ExportOptions::from_json(&json).unwrap(), options);
}

#[test]
fn test_file_name_rules() {
    assert_eq!(file_name("Setup Guide", "pdf"), "setup_guide.pdf");
    assert_eq!(file_name("A/B\\C", "txt"), "a_b_c.txt");
}
