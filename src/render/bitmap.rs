//! Built-in rasterizer drawing text with an 8x8 bitmap font.
//!
//! Glyphs are scaled by whole pixels so the output is deterministic across
//! platforms and needs no system fonts.

use super::backend::{FontSpec, Rasterizer, Surface, TextMetrics};
use super::layout::TextItem;
use crate::error::Result;
use font8x8::{UnicodeFonts, BASIC_FONTS, GREEK_FONTS, LATIN_FONTS, MISC_FONTS};
use unicode_normalization::UnicodeNormalization;

const GLYPH_CELLS: u32 = 8;
const REPLACEMENT: char = '?';

/// Rasterizer backed by the `font8x8` glyph tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct BitmapRasterizer;

impl BitmapRasterizer {
    /// Create a new bitmap rasterizer.
    pub fn new() -> Self {
        Self
    }

    /// Device pixels per glyph cell for `font`.
    fn cell(font: FontSpec) -> u32 {
        ((font.size_px as f32 / GLYPH_CELLS as f32).round() as u32).max(1)
    }

    fn glyph(c: char) -> [u8; 8] {
        let c = fold_punctuation(c);
        if c.is_whitespace() {
            return [0; 8];
        }
        BASIC_FONTS
            .get(c)
            .or_else(|| LATIN_FONTS.get(c))
            .or_else(|| GREEK_FONTS.get(c))
            .or_else(|| MISC_FONTS.get(c))
            .unwrap_or_else(|| {
                log::warn!("No glyph for {:?}, drawing {:?}", c, REPLACEMENT);
                BASIC_FONTS.get(REPLACEMENT).unwrap_or([0; 8])
            })
    }
}

/// Map typographic punctuation to the ASCII glyph it resembles.
fn fold_punctuation(c: char) -> char {
    match c {
        '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{2032}' => '\'',
        '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{2033}' => '"',
        '\u{2010}'..='\u{2015}' | '\u{2212}' => '-',
        '\u{2022}' | '\u{00B7}' => '*',
        '\u{00A0}' | '\u{2007}' | '\u{202F}' => ' ',
        other => other,
    }
}

impl TextMetrics for BitmapRasterizer {
    fn text_width(&self, text: &str, font: FontSpec) -> u32 {
        text.nfc().count() as u32 * GLYPH_CELLS * Self::cell(font)
    }

    fn glyph_height(&self, font: FontSpec) -> u32 {
        GLYPH_CELLS * Self::cell(font)
    }
}

impl Rasterizer for BitmapRasterizer {
    fn draw_text(&self, item: &TextItem, surface: &mut Surface) -> Result<()> {
        let cell = Self::cell(item.font);
        let advance = GLYPH_CELLS * cell;
        // faux bold: widen every stroke to the right
        let stroke = if item.font.bold {
            cell + (cell / 2).max(1)
        } else {
            cell
        };

        for (index, c) in item.text.nfc().enumerate() {
            let origin_x = item.x + index as u32 * advance;
            let glyph = Self::glyph(c);
            for (row, bits) in glyph.iter().enumerate() {
                let y = item.y + row as u32 * cell;
                for col in 0..GLYPH_CELLS {
                    if bits & (1 << col) != 0 {
                        surface.fill_rect(origin_x + col * cell, y, stroke, cell, item.color);
                    }
                }
            }
        }
        Ok(())
    }
}
