//! Measuring and drawing capabilities used by layout and pagination.
//!
//! The layout renderer only needs [`TextMetrics`]; the compositor needs a
//! [`Rasterizer`] that can draw a [`RenderedLayout`] onto a [`Surface`]
//! positioned at some vertical offset. Backends implement both so that the
//! layout is measured with the same font it is drawn with.

use super::layout::{LayoutItem, RenderedLayout, TextItem};
use crate::error::Result;
use image::{Rgb, RgbImage};

/// Font selection for one text run, in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontSpec {
    /// Nominal font size in device pixels
    pub size_px: u32,
    /// Bold weight
    pub bold: bool,
}

impl FontSpec {
    /// Regular weight at `size_px`.
    pub fn regular(size_px: u32) -> Self {
        Self {
            size_px,
            bold: false,
        }
    }

    /// Bold weight at `size_px`.
    pub fn bold(size_px: u32) -> Self {
        Self {
            size_px,
            bold: true,
        }
    }

    /// Same size with the given weight.
    pub fn with_bold(self, bold: bool) -> Self {
        Self { bold, ..self }
    }
}

/// Text measurement used while laying out lines.
pub trait TextMetrics {
    /// Advance width of `text` in device pixels.
    fn text_width(&self, text: &str, font: FontSpec) -> u32;

    /// Height of the glyph box in device pixels.
    fn glyph_height(&self, font: FontSpec) -> u32;
}

/// Draws a layout onto an off-screen surface.
pub trait Rasterizer: TextMetrics {
    /// Draw one text run at its layout position.
    fn draw_text(&self, item: &TextItem, surface: &mut Surface) -> Result<()>;

    /// Draw every item of `layout` that intersects the surface window.
    ///
    /// Coordinates stay in layout space; the surface translates them by its
    /// window offset and clips.
    fn draw(&self, layout: &RenderedLayout, surface: &mut Surface) -> Result<()> {
        for item in layout.items() {
            if !surface.intersects(item.top(), item.bottom()) {
                continue;
            }
            match item {
                LayoutItem::Text(text) => self.draw_text(text, surface)?,
                LayoutItem::Image(image) => surface.blit(image.x, image.y, &image.pixels),
                LayoutItem::Rect(rect) => {
                    surface.fill_rect(rect.x, rect.y, rect.width, rect.height, rect.color)
                }
            }
        }
        Ok(())
    }
}

/// Fixed-size off-screen canvas looking at a vertical window of a layout.
///
/// A surface lives for exactly one pagination pass and is released when it
/// goes out of scope, whichever way the pass ends.
pub struct Surface {
    image: RgbImage,
    background: Rgb<u8>,
    offset_y: u32,
    visible_rows: u32,
}

impl Surface {
    /// Allocate a `width × height` surface filled with `background`.
    pub fn new(width: u32, height: u32, background: Rgb<u8>) -> Self {
        log::debug!("Allocating {}x{} surface", width, height);
        Self {
            image: RgbImage::from_pixel(width, height, background),
            background,
            offset_y: 0,
            visible_rows: height,
        }
    }

    /// Surface width in device pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Surface height in device pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Layout row shown at the top of the surface.
    pub fn offset_y(&self) -> u32 {
        self.offset_y
    }

    /// Number of rows that show layout content; rows below stay background.
    pub fn visible_rows(&self) -> u32 {
        self.visible_rows
    }

    /// Clear the surface and position it over `[offset_y, min(offset_y + height, layout_height))`.
    pub fn begin_window(&mut self, offset_y: u32, layout_height: u32) {
        let background = self.background;
        self.image.pixels_mut().for_each(|p| *p = background);
        self.offset_y = offset_y;
        self.visible_rows = layout_height
            .saturating_sub(offset_y)
            .min(self.image.height());
    }

    /// Whether layout rows `[top, bottom)` overlap the visible window.
    pub fn intersects(&self, top: u32, bottom: u32) -> bool {
        bottom > self.offset_y && top < self.window_end()
    }

    fn window_end(&self) -> u32 {
        self.offset_y.saturating_add(self.visible_rows)
    }

    /// Fill a rectangle given in layout coordinates.
    pub fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, color: Rgb<u8>) {
        let x0 = x.min(self.width());
        let x1 = x.saturating_add(width).min(self.width());
        let y0 = y.max(self.offset_y);
        let y1 = y.saturating_add(height).min(self.window_end());

        for ly in y0..y1 {
            let row = ly - self.offset_y;
            for px in x0..x1 {
                self.image.put_pixel(px, row, color);
            }
        }
    }

    /// Copy `pixels` with its top-left corner at layout position (`x`, `y`).
    pub fn blit(&mut self, x: u32, y: u32, pixels: &RgbImage) {
        if x >= self.width() {
            return;
        }
        let cols = pixels.width().min(self.width() - x) as usize;
        let src_stride = pixels.width() as usize * 3;
        let dst_stride = self.width() as usize * 3;

        let y0 = y.max(self.offset_y);
        let y1 = y.saturating_add(pixels.height()).min(self.window_end());
        let offset_y = self.offset_y;
        let dst: &mut [u8] = &mut self.image;

        for ly in y0..y1 {
            let src_start = (ly - y) as usize * src_stride;
            let dst_start = (ly - offset_y) as usize * dst_stride + x as usize * 3;
            dst[dst_start..dst_start + cols * 3]
                .copy_from_slice(&pixels.as_raw()[src_start..src_start + cols * 3]);
        }
    }

    /// Copy of the current surface content.
    pub fn snapshot(&self) -> RgbImage {
        self.image.clone()
    }
}

impl Drop for Surface {
    fn drop(&mut self) {
        log::debug!(
            "Releasing {}x{} surface",
            self.image.width(),
            self.image.height()
        );
    }
}
