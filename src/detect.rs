//! Screenshot payload detection and `data:` URL handling.

use crate::error::{Error, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Image container formats accepted as screenshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    /// Portable Network Graphics
    Png,
    /// JPEG / JFIF
    Jpeg,
    /// Graphics Interchange Format
    Gif,
    /// Windows bitmap
    Bmp,
    /// WebP
    Webp,
}

impl ImageKind {
    /// MIME type of the format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageKind::Png => "image/png",
            ImageKind::Jpeg => "image/jpeg",
            ImageKind::Gif => "image/gif",
            ImageKind::Bmp => "image/bmp",
            ImageKind::Webp => "image/webp",
        }
    }

    /// Whether the built-in decoder can rasterize this format.
    pub fn is_decodable(&self) -> bool {
        matches!(self, ImageKind::Png | ImageKind::Jpeg)
    }
}

impl std::fmt::Display for ImageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mime_type())
    }
}

const PNG_MAGIC: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];

/// Detect the image format from leading magic bytes.
///
/// # Returns
/// * `Some(ImageKind)` if the header matches a known format
/// * `None` otherwise
pub fn detect_image_kind(data: &[u8]) -> Option<ImageKind> {
    if data.starts_with(PNG_MAGIC) {
        return Some(ImageKind::Png);
    }
    if data.starts_with(JPEG_MAGIC) {
        return Some(ImageKind::Jpeg);
    }
    if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        return Some(ImageKind::Gif);
    }
    if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
        return Some(ImageKind::Webp);
    }
    if data.starts_with(b"BM") {
        return Some(ImageKind::Bmp);
    }
    None
}

/// A decoded `data:` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    /// Declared media type (e.g., "image/png"); empty if omitted
    pub media_type: String,
    /// Decoded payload
    pub data: Vec<u8>,
}

/// Parse a base64 `data:` URL such as `data:image/png;base64,iVBOR...`.
///
/// Only base64 payloads are accepted; screenshots are never percent-encoded.
pub fn parse_data_url(url: &str) -> Result<DataUrl> {
    let rest = url
        .trim()
        .strip_prefix("data:")
        .ok_or_else(|| Error::InvalidDataUrl("missing 'data:' scheme".into()))?;

    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| Error::InvalidDataUrl("missing ',' separator".into()))?;

    let mut params = header.split(';');
    let media_type = params.next().unwrap_or_default().to_ascii_lowercase();
    if !params.any(|p| p.eq_ignore_ascii_case("base64")) {
        return Err(Error::InvalidDataUrl("payload is not base64 encoded".into()));
    }

    let cleaned: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    let data = STANDARD.decode(cleaned.as_bytes())?;

    Ok(DataUrl { media_type, data })
}

/// Encode bytes as a base64 `data:` URL.
pub fn to_data_url(media_type: &str, data: &[u8]) -> String {
    format!("data:{};base64,{}", media_type, STANDARD.encode(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_png_and_jpeg() {
        let png = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00];
        assert_eq!(detect_image_kind(&png), Some(ImageKind::Png));

        let jpeg = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];
        assert_eq!(detect_image_kind(&jpeg), Some(ImageKind::Jpeg));
    }

    #[test]
    fn test_detect_other_formats() {
        assert_eq!(detect_image_kind(b"GIF89a...."), Some(ImageKind::Gif));
        assert_eq!(detect_image_kind(b"RIFF\0\0\0\0WEBPVP8 "), Some(ImageKind::Webp));
        assert_eq!(detect_image_kind(b"BM\0\0"), Some(ImageKind::Bmp));
        assert_eq!(detect_image_kind(b"<svg>"), None);
        assert_eq!(detect_image_kind(b""), None);
    }

    #[test]
    fn test_decodable_kinds() {
        assert!(ImageKind::Png.is_decodable());
        assert!(ImageKind::Jpeg.is_decodable());
        assert!(!ImageKind::Gif.is_decodable());
    }

    #[test]
    fn test_parse_data_url() {
        let url = "data:image/png;base64,aGVsbG8=";
        let parsed = parse_data_url(url).unwrap();
        assert_eq!(parsed.media_type, "image/png");
        assert_eq!(parsed.data, b"hello");
    }

    #[test]
    fn test_parse_data_url_rejects_malformed() {
        assert!(matches!(
            parse_data_url("image/png;base64,aGVsbG8="),
            Err(Error::InvalidDataUrl(_))
        ));
        assert!(matches!(
            parse_data_url("data:image/png;base64"),
            Err(Error::InvalidDataUrl(_))
        ));
        assert!(matches!(
            parse_data_url("data:text/plain,hello"),
            Err(Error::InvalidDataUrl(_))
        ));
        assert!(matches!(
            parse_data_url("data:image/png;base64,@@@"),
            Err(Error::InvalidDataUrl(_))
        ));
    }

    #[test]
    fn test_data_url_roundtrip_header() {
        let url = to_data_url("image/jpeg", &[1, 2, 3]);
        assert!(url.starts_with("data:image/jpeg;base64,"));
        assert_eq!(parse_data_url(&url).unwrap().data, vec![1, 2, 3]);
    }
}
