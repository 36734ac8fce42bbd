//! Error types for procdoc library.

use std::io;
use thiserror::Error;

/// Result type alias for procdoc operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while exporting a process document.
///
/// Parsing and inline styling are total and never produce an error.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading inputs or saving artifacts.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Export requested for a document whose title is empty or whitespace.
    #[error("Document title is required for export")]
    MissingTitle,

    /// Another export holds the in-flight guard.
    #[error("An export is already in progress")]
    ExportInProgress,

    /// A screenshot could not be decoded or scaled.
    #[error("Image error: {0}")]
    Image(String),

    /// Failure while building the layout or compositing pages.
    #[error("Rendering error: {0}")]
    Render(String),

    /// A screenshot `data:` URL is malformed.
    #[error("Invalid data URL: {0}")]
    InvalidDataUrl(String),

    /// Options could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether this error was raised while rasterizing (layout, screenshots, pages).
    pub fn is_render_failure(&self) -> bool {
        matches!(self, Error::Render(_) | Error::Image(_))
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::Image(err.to_string())
    }
}

impl From<base64::DecodeError> for Error {
    fn from(err: base64::DecodeError) -> Self {
        Error::InvalidDataUrl(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::MissingTitle;
        assert_eq!(err.to_string(), "Document title is required for export");

        let err = Error::Render("surface allocation failed".into());
        assert_eq!(err.to_string(), "Rendering error: surface allocation failed");
    }

    #[test]
    fn test_render_failure_classification() {
        assert!(Error::Render("x".into()).is_render_failure());
        assert!(Error::Image("x".into()).is_render_failure());
        assert!(!Error::MissingTitle.is_render_failure());
        assert!(!Error::ExportInProgress.is_render_failure());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let err: Error = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, Error::Config(_)));
    }
}
