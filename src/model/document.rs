//! Document-level types.

use super::Screenshot;
use serde::{Deserialize, Serialize};

/// The inputs of one export: the generated (or hand-edited) documentation.
///
/// The pipeline never mutates a `SourceDocument`; a failed export leaves it
/// ready to be edited and exported again.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceDocument {
    /// Document title, rendered as the top-level heading
    pub title: String,

    /// Markdown-like body text
    pub body: String,

    /// Screenshots appended after the text, in order
    #[serde(default)]
    pub screenshots: Vec<Screenshot>,
}

impl SourceDocument {
    /// Create a document without screenshots.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            screenshots: Vec::new(),
        }
    }

    /// Attach a screenshot.
    pub fn with_screenshot(mut self, screenshot: Screenshot) -> Self {
        self.screenshots.push(screenshot);
        self
    }

    /// Attach several screenshots.
    pub fn with_screenshots(mut self, screenshots: impl IntoIterator<Item = Screenshot>) -> Self {
        self.screenshots.extend(screenshots);
        self
    }

    /// Check whether the title is usable for export.
    pub fn has_title(&self) -> bool {
        !self.title.trim().is_empty()
    }

    /// Check if the document has any screenshots.
    pub fn has_screenshots(&self) -> bool {
        !self.screenshots.is_empty()
    }
}
