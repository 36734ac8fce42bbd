//! Screenshot payloads attached to a process document.

use crate::detect::{detect_image_kind, parse_data_url, to_data_url, ImageKind};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A binary image attached to the document, rendered after the text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Screenshot {
    /// Raw encoded image data, base64 in serialized form
    #[serde(with = "base64_payload")]
    pub data: Vec<u8>,

    /// MIME type (e.g., "image/png")
    pub mime_type: String,

    /// Original filename if known
    pub filename: Option<String>,
}

impl Screenshot {
    /// Create a screenshot, detecting the MIME type from magic bytes.
    ///
    /// Unknown payloads are kept as `application/octet-stream`; they fail
    /// later, at layout time, like any other undecodable image.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        let mime_type = detect_image_kind(&data)
            .map(|kind| kind.mime_type())
            .unwrap_or("application/octet-stream");
        Self {
            data,
            mime_type: mime_type.to_string(),
            filename: None,
        }
    }

    /// Create a screenshot from a base64 `data:` URL.
    pub fn from_data_url(url: &str) -> Result<Self> {
        let parsed = parse_data_url(url)?;
        let mut shot = Self::from_bytes(parsed.data);
        if shot.kind().is_none() && !parsed.media_type.is_empty() {
            shot.mime_type = parsed.media_type;
        }
        Ok(shot)
    }

    /// Load a screenshot from a file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let mut shot = Self::from_bytes(data);
        shot.filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());
        Ok(shot)
    }

    /// Set filename.
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Detected container format.
    pub fn kind(&self) -> Option<ImageKind> {
        detect_image_kind(&self.data)
    }

    /// Get the size of the payload in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Re-encode as a `data:` URL, the form the host application stores.
    pub fn to_data_url(&self) -> String {
        to_data_url(&self.mime_type, &self.data)
    }

    /// Get a display label, e.g. "Screenshot 2".
    pub fn label(index: usize) -> String {
        format!("Screenshot {}", index + 1)
    }

    /// Ensure the payload can be rasterized by the built-in decoder.
    pub fn ensure_decodable(&self) -> Result<ImageKind> {
        match self.kind() {
            Some(kind) if kind.is_decodable() => Ok(kind),
            Some(kind) => Err(Error::Image(format!("unsupported screenshot format {kind}"))),
            None => Err(Error::Image(format!(
                "unrecognized screenshot payload ({} bytes)",
                self.size()
            ))),
        }
    }
}

mod base64_payload {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(data))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded.as_bytes()).map_err(de::Error::custom)
    }
}
