//! Export of a process document to PDF or flat text.
//!
//! An [`Exporter`] owns the export options, the rasterizer, and the
//! [`ExportJob`] that guards against overlapping exports.
//!
//! # Example
//!
//! ```no_run
//! use procdoc::export::{ExportFormat, Exporter};
//! use procdoc::SourceDocument;
//!
//! fn main() -> procdoc::Result<()> {
//!     let doc = SourceDocument::new("Setup Guide", "## Step 1\n1. Open app");
//!     let artifact = Exporter::new().export(&doc, ExportFormat::Pdf)?;
//!     artifact.save_to("out")?;
//!     Ok(())
//! }
//! ```

mod pdf;
mod text;

pub use pdf::write_pdf;
pub use text::to_flat_text;

use crate::error::{Error, Result};
use crate::model::{Page, SourceDocument};
use crate::parser::BlockParser;
use crate::render::{paginate, render_layout, BitmapRasterizer, LayoutOptions, Rasterizer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Output format of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Paginated A4 PDF
    #[default]
    Pdf,
    /// Flat plain text
    Text,
}

impl ExportFormat {
    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Text => "txt",
        }
    }

    /// MIME type of the produced bytes.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Text => "text/plain",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Pdf => write!(f, "PDF"),
            ExportFormat::Text => write!(f, "text"),
        }
    }
}

/// State of the exporter's single export slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExportJob {
    /// Format of the current or most recent export
    pub format: ExportFormat,
    /// Whether an export is running
    pub in_progress: bool,
}

/// Bytes produced by an export, with the name a host should save them under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Suggested file name, e.g. `setup_guide.pdf`
    pub file_name: String,
    /// MIME type of `bytes`
    pub mime_type: String,
    /// Serialized document
    pub bytes: Vec<u8>,
    /// Number of pages for paginated formats
    pub page_count: Option<usize>,
}

impl Artifact {
    /// Write the artifact into `dir` under its file name.
    pub fn save_to<P: AsRef<Path>>(&self, dir: P) -> Result<PathBuf> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.bytes)?;
        log::debug!("Saved {} ({} bytes)", path.display(), self.bytes.len());
        Ok(path)
    }

    /// Size of the artifact in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if the artifact has no content.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// File name stem for a title: lower-cased, every character outside
/// `[a-z0-9]` replaced by `_`.
pub fn file_stem(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_lowercase() || c.is_ascii_digit() { c } else { '_' })
        .collect()
}

/// File name for a title with the given extension.
pub fn file_name(title: &str, extension: &str) -> String {
    format!("{}.{}", file_stem(title), extension)
}

/// Options for an export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Layout and pagination options
    pub layout: LayoutOptions,

    /// PDF producer string
    pub producer: String,

    /// Record the creation date in the PDF
    pub timestamp: bool,
}

impl ExportOptions {
    /// Create new export options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load options from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Set layout options.
    pub fn with_layout(mut self, layout: LayoutOptions) -> Self {
        self.layout = layout;
        self
    }

    /// Set the PDF producer string.
    pub fn with_producer(mut self, producer: impl Into<String>) -> Self {
        self.producer = producer.into();
        self
    }

    /// Enable or disable the PDF creation date.
    pub fn with_timestamp(mut self, timestamp: bool) -> Self {
        self.timestamp = timestamp;
        self
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            layout: LayoutOptions::default(),
            producer: format!("procdoc {}", crate::VERSION),
            timestamp: true,
        }
    }
}

/// Holds the export slot for the duration of one export.
///
/// The slot is released when the guard is dropped, whether the export
/// succeeded or failed.
pub struct ExportGuard<'a> {
    job: &'a Mutex<ExportJob>,
    format: ExportFormat,
}

impl ExportGuard<'_> {
    /// Format being exported.
    pub fn format(&self) -> ExportFormat {
        self.format
    }
}

impl Drop for ExportGuard<'_> {
    fn drop(&mut self) {
        lock(self.job).in_progress = false;
        log::debug!("{} export finished", self.format);
    }
}

fn lock(job: &Mutex<ExportJob>) -> MutexGuard<'_, ExportJob> {
    job.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Runs exports, at most one at a time.
pub struct Exporter<R: Rasterizer = BitmapRasterizer> {
    options: ExportOptions,
    rasterizer: R,
    parser: BlockParser,
    job: Mutex<ExportJob>,
}

impl Exporter<BitmapRasterizer> {
    /// Create an exporter with default options and the built-in rasterizer.
    pub fn new() -> Self {
        Self::with_options(ExportOptions::default())
    }

    /// Create an exporter with the built-in rasterizer.
    pub fn with_options(options: ExportOptions) -> Self {
        Self::with_rasterizer(options, BitmapRasterizer::new())
    }
}

impl Default for Exporter<BitmapRasterizer> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rasterizer> Exporter<R> {
    /// Create an exporter drawing with `rasterizer`.
    pub fn with_rasterizer(options: ExportOptions, rasterizer: R) -> Self {
        Self {
            options,
            rasterizer,
            parser: BlockParser::new(),
            job: Mutex::new(ExportJob::default()),
        }
    }

    /// Export options in use.
    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Rasterizer in use.
    pub fn rasterizer(&self) -> &R {
        &self.rasterizer
    }

    /// Snapshot of the export slot.
    pub fn status(&self) -> ExportJob {
        *lock(&self.job)
    }

    /// Claim the export slot, failing if another export holds it.
    pub fn begin(&self, format: ExportFormat) -> Result<ExportGuard<'_>> {
        let mut job = lock(&self.job);
        if job.in_progress {
            log::warn!("{} export rejected: {} export in progress", format, job.format);
            return Err(Error::ExportInProgress);
        }
        job.in_progress = true;
        job.format = format;
        log::debug!("{} export started", format);
        Ok(ExportGuard {
            job: &self.job,
            format,
        })
    }

    /// Export `doc` in the requested format.
    ///
    /// The title is checked before the slot is claimed and before anything
    /// is parsed or drawn.
    pub fn export(&self, doc: &SourceDocument, format: ExportFormat) -> Result<Artifact> {
        if !doc.has_title() {
            return Err(Error::MissingTitle);
        }
        let _guard = self.begin(format)?;

        match format {
            ExportFormat::Text => Ok(self.text_artifact(doc)),
            ExportFormat::Pdf => self.pdf_artifact(doc),
        }
    }

    /// Rasterize `doc` into pages without serializing them.
    pub fn render_pages(&self, doc: &SourceDocument) -> Result<Vec<Page>> {
        if !doc.has_title() {
            return Err(Error::MissingTitle);
        }
        let _guard = self.begin(ExportFormat::Pdf)?;
        self.paginate_document(doc)
    }

    fn text_artifact(&self, doc: &SourceDocument) -> Artifact {
        let format = ExportFormat::Text;
        Artifact {
            file_name: file_name(&doc.title, format.extension()),
            mime_type: format.mime_type().to_string(),
            bytes: to_flat_text(&doc.title, &doc.body).into_bytes(),
            page_count: None,
        }
    }

    fn pdf_artifact(&self, doc: &SourceDocument) -> Result<Artifact> {
        let format = ExportFormat::Pdf;
        let pages = self.paginate_document(doc)?;
        let bytes = write_pdf(&pages, &doc.title, &self.options)?;
        log::debug!("PDF export: {} pages, {} bytes", pages.len(), bytes.len());

        Ok(Artifact {
            file_name: file_name(&doc.title, format.extension()),
            mime_type: format.mime_type().to_string(),
            bytes,
            page_count: Some(pages.len()),
        })
    }

    fn paginate_document(&self, doc: &SourceDocument) -> Result<Vec<Page>> {
        let layout_options = &self.options.layout;
        let blocks = self.parser.parse(&doc.body);
        let layout = render_layout(
            &doc.title,
            &blocks,
            &doc.screenshots,
            &self.rasterizer,
            layout_options,
        )?;
        paginate(&layout, &self.rasterizer, layout_options.page_height_px())
    }
}
