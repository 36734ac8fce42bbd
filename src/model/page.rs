//! Page-level types.

use crate::error::Result;
use image::{ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

/// One fixed-size slice of a rendered layout.
#[derive(Debug, Clone)]
pub struct Page {
    /// Page number (1-indexed)
    pub number: u32,

    /// Rasterized page content, `width × height` device pixels
    pub image: RgbImage,
}

impl Page {
    /// Create a page from its rasterized content.
    pub fn new(number: u32, image: RgbImage) -> Self {
        Self { number, image }
    }

    /// Page width in device pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Page height in device pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Get page dimensions as (width, height) tuple.
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Raw RGB8 samples, row-major, top row first.
    pub fn samples(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// Pixel row `y` as RGB triples.
    pub fn row(&self, y: u32) -> &[u8] {
        let stride = self.width() as usize * 3;
        let start = y as usize * stride;
        &self.image.as_raw()[start..start + stride]
    }

    /// Check if every pixel of the page is `color`.
    pub fn is_uniform(&self, color: Rgb<u8>) -> bool {
        self.image.pixels().all(|p| *p == color)
    }

    /// Encode the page as PNG.
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let mut buf = Cursor::new(Vec::new());
        self.image.write_to(&mut buf, ImageFormat::Png)?;
        Ok(buf.into_inner())
    }
}
