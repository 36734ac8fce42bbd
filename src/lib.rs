//! # procdoc
//!
//! Process documentation pipeline for Rust.
//!
//! Turns a titled, markdown-like step list (headings, numbered steps, bold
//! spans) plus optional screenshots into a paginated A4 PDF or a flat text
//! file.
//!
//! ## Quick Start
//!
//! ```no_run
//! use procdoc::{export_pdf, SourceDocument};
//!
//! fn main() -> procdoc::Result<()> {
//!     let doc = SourceDocument::new(
//!         "Setup Guide",
//!         "## Step 1\n1. Open the app\n2. Click **Save**",
//!     );
//!
//!     let artifact = export_pdf(&doc)?;
//!     artifact.save_to(".")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! - **Block parser**: one block per line; headings, numbered runs, paragraphs
//! - **Inline styler**: `**bold**` spans, unpaired markers kept literally
//! - **Layout**: one continuous canvas at fixed A4 width
//! - **Compositor**: offset-and-clip slicing into equal-height pages
//! - **Export**: PDF with one image per page, or flat text

pub mod detect;
pub mod error;
pub mod export;
pub mod model;
pub mod parser;
pub mod render;

#[cfg(feature = "ffi")]
pub mod ffi;

// Re-export commonly used types
pub use detect::{detect_image_kind, parse_data_url, DataUrl, ImageKind};
pub use error::{Error, Result};
pub use export::{
    file_name, file_stem, to_flat_text, Artifact, ExportFormat, ExportJob, ExportOptions, Exporter,
};
pub use model::{spans_text, Block, Page, Screenshot, SourceDocument, Span};
pub use parser::{parse_blocks, style_spans, BlockParser, InlineStyler};
pub use render::{
    to_preview_html, BitmapRasterizer, LayoutOptions, PageSize, Rasterizer, RenderedLayout,
    TextMetrics,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Parse body text into blocks.
///
/// # Example
///
/// ```
/// use procdoc::{parse_body, Block};
///
/// let blocks = parse_body("## Step 1\n1. Open app");
/// assert_eq!(blocks[0], Block::heading("Step 1"));
/// ```
pub fn parse_body(body: &str) -> Vec<Block> {
    parse_blocks(body)
}

/// Export a title and body as flat text.
///
/// # Example
///
/// ```
/// use procdoc::export_text;
///
/// let artifact = export_text("Setup Guide", "1. Open app").unwrap();
/// assert_eq!(artifact.file_name, "setup_guide.txt");
/// ```
pub fn export_text(title: &str, body: &str) -> Result<Artifact> {
    Exporter::new().export(&SourceDocument::new(title, body), ExportFormat::Text)
}

/// Export a document as a paginated PDF with default options.
///
/// # Example
///
/// ```no_run
/// use procdoc::{export_pdf, SourceDocument};
///
/// let doc = SourceDocument::new("Setup Guide", "1. Open app");
/// let artifact = export_pdf(&doc).unwrap();
/// std::fs::write(&artifact.file_name, &artifact.bytes).unwrap();
/// ```
pub fn export_pdf(doc: &SourceDocument) -> Result<Artifact> {
    Exporter::new().export(doc, ExportFormat::Pdf)
}

/// Export a document as a paginated PDF with custom options.
pub fn export_pdf_with_options(doc: &SourceDocument, options: ExportOptions) -> Result<Artifact> {
    Exporter::with_options(options).export(doc, ExportFormat::Pdf)
}

/// Render a document as pages without serializing them.
pub fn render_pages(doc: &SourceDocument) -> Result<Vec<Page>> {
    Exporter::new().render_pages(doc)
}

/// Builder for configuring and running exports.
///
/// # Example
///
/// ```no_run
/// use procdoc::{PageSize, Procdoc, Screenshot};
///
/// let artifact = Procdoc::new()
///     .with_page_size(PageSize::Letter)
///     .with_scale(3)
///     .without_timestamp()
///     .document("Setup Guide", "1. Open app")
///     .with_screenshot(Screenshot::from_path("step1.png")?)
///     .to_pdf()?;
/// # Ok::<(), procdoc::Error>(())
/// ```
pub struct Procdoc {
    options: ExportOptions,
}

impl Procdoc {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self {
            options: ExportOptions::default(),
        }
    }

    /// Use the given export options.
    pub fn with_options(mut self, options: ExportOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the page size.
    pub fn with_page_size(mut self, size: PageSize) -> Self {
        self.options.layout = self.options.layout.with_page_size(size);
        self
    }

    /// Set the supersampling scale.
    pub fn with_scale(mut self, scale: u32) -> Self {
        self.options.layout = self.options.layout.with_scale(scale);
        self
    }

    /// Set the page margin in millimeters.
    pub fn with_margin_mm(mut self, margin: f32) -> Self {
        self.options.layout = self.options.layout.with_margin_mm(margin);
        self
    }

    /// Omit the PDF creation date.
    pub fn without_timestamp(mut self) -> Self {
        self.options.timestamp = false;
        self
    }

    /// Set the PDF producer string.
    pub fn with_producer(mut self, producer: impl Into<String>) -> Self {
        self.options = self.options.with_producer(producer);
        self
    }

    /// Start a document to export with these options.
    pub fn document(self, title: impl Into<String>, body: impl Into<String>) -> ProcdocJob {
        ProcdocJob {
            document: SourceDocument::new(title, body),
            exporter: Exporter::with_options(self.options),
        }
    }
}

impl Default for Procdoc {
    fn default() -> Self {
        Self::new()
    }
}

/// A document bound to an exporter.
pub struct ProcdocJob {
    document: SourceDocument,
    exporter: Exporter,
}

impl ProcdocJob {
    /// Attach a screenshot.
    pub fn with_screenshot(mut self, screenshot: Screenshot) -> Self {
        self.document.screenshots.push(screenshot);
        self
    }

    /// Export as PDF.
    pub fn to_pdf(&self) -> Result<Artifact> {
        self.exporter.export(&self.document, ExportFormat::Pdf)
    }

    /// Export as flat text.
    pub fn to_text(&self) -> Result<Artifact> {
        self.exporter.export(&self.document, ExportFormat::Text)
    }

    /// Render the HTML preview.
    pub fn to_html(&self) -> String {
        render::HtmlRenderer::new(self.exporter.options().layout.clone()).render(&self.document)
    }

    /// Render pages without serializing them.
    pub fn pages(&self) -> Result<Vec<Page>> {
        self.exporter.render_pages(&self.document)
    }

    /// Get the document.
    pub fn document(&self) -> &SourceDocument {
        &self.document
    }
}
