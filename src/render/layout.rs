//! Continuous layout of a document at fixed page width.
//!
//! The renderer places the title, the grouped blocks and the screenshots
//! top to bottom on an unbounded canvas. Nothing here knows about pages;
//! the compositor slices the result afterwards.

use super::backend::{FontSpec, TextMetrics};
use super::options::LayoutOptions;
use crate::error::{Error, Result};
use crate::model::{Block, Screenshot, Span};
use crate::parser::InlineStyler;
use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage, RgbaImage};

const TEXT_COLOR: Rgb<u8> = Rgb([0, 0, 0]);
const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const FRAME_COLOR: Rgb<u8> = Rgb([0xdd, 0xdd, 0xdd]);

/// Upper bound on the pixel count of one scaled screenshot.
pub const MAX_IMAGE_PIXELS: u64 = 1 << 26;

/// A text run placed at a layout position.
#[derive(Debug, Clone, PartialEq)]
pub struct TextItem {
    /// Left edge in device pixels
    pub x: u32,
    /// Top of the glyph box in device pixels
    pub y: u32,
    /// Measured advance width
    pub width: u32,
    /// Glyph box height
    pub height: u32,
    /// Text to draw
    pub text: String,
    /// Font to draw with
    pub font: FontSpec,
    /// Fill color
    pub color: Rgb<u8>,
}

/// A raster image placed at a layout position, already at its final size.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageItem {
    pub x: u32,
    pub y: u32,
    pub pixels: RgbImage,
}

/// A solid rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectItem {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub color: Rgb<u8>,
}

/// One drawable element of a layout, in paint order.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutItem {
    Text(TextItem),
    Image(ImageItem),
    Rect(RectItem),
}

impl LayoutItem {
    /// First layout row covered by the item.
    pub fn top(&self) -> u32 {
        match self {
            LayoutItem::Text(t) => t.y,
            LayoutItem::Image(i) => i.y,
            LayoutItem::Rect(r) => r.y,
        }
    }

    /// Row just below the item.
    pub fn bottom(&self) -> u32 {
        match self {
            LayoutItem::Text(t) => t.y.saturating_add(t.height),
            LayoutItem::Image(i) => i.y.saturating_add(i.pixels.height()),
            LayoutItem::Rect(r) => r.y.saturating_add(r.height),
        }
    }
}

/// A fully laid out document of width `W` and height `H`.
///
/// Produced once per export and consumed by pagination; it is never
/// re-rendered between pages.
#[derive(Debug, PartialEq)]
pub struct RenderedLayout {
    width: u32,
    height: u32,
    items: Vec<LayoutItem>,
}

impl RenderedLayout {
    /// Assemble a layout from already placed items.
    pub fn from_items(width: u32, height: u32, items: Vec<LayoutItem>) -> Self {
        Self {
            width,
            height,
            items,
        }
    }

    /// Layout width `W` in device pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Layout height `H` in device pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Items in paint order.
    pub fn items(&self) -> &[LayoutItem] {
        &self.items
    }

    /// Background color the layout is drawn on.
    pub fn background(&self) -> Rgb<u8> {
        BACKGROUND
    }

    /// Text runs in paint order.
    pub fn text_items(&self) -> impl Iterator<Item = &TextItem> {
        self.items.iter().filter_map(|item| match item {
            LayoutItem::Text(text) => Some(text),
            _ => None,
        })
    }
}

/// A visual element after grouping adjacent list items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element<'a> {
    Heading(&'a str),
    Paragraph(&'a str),
    /// One numbered run; numbers are positions within the run
    List(Vec<&'a str>),
}

/// Group blocks into visual elements.
///
/// Consecutive list items form one numbered run no matter where they appear;
/// blank lines produce nothing.
pub fn group_elements(blocks: &[Block]) -> Vec<Element<'_>> {
    let mut elements = Vec::new();
    let mut run: Vec<&str> = Vec::new();

    for block in blocks {
        if let Block::ListItem { text, .. } = block {
            run.push(text);
            continue;
        }
        if !run.is_empty() {
            elements.push(Element::List(std::mem::take(&mut run)));
        }
        match block {
            Block::Heading { text } => elements.push(Element::Heading(text)),
            Block::Paragraph { text } => elements.push(Element::Paragraph(text)),
            Block::ListItem { .. } | Block::Blank => {}
        }
    }
    if !run.is_empty() {
        elements.push(Element::List(run));
    }

    elements
}

/// Lay out a document with the given metrics and options.
pub fn render_layout<M: TextMetrics + ?Sized>(
    title: &str,
    blocks: &[Block],
    screenshots: &[Screenshot],
    metrics: &M,
    options: &LayoutOptions,
) -> Result<RenderedLayout> {
    LayoutRenderer::new(metrics, options).render(title, blocks, screenshots)
}

/// Places words on lines and lines on the canvas.
pub struct LayoutRenderer<'a, M: TextMetrics + ?Sized> {
    metrics: &'a M,
    options: &'a LayoutOptions,
    styler: InlineStyler,
    items: Vec<LayoutItem>,
    cursor: u32,
    left: u32,
    content_width: u32,
}

/// Words placed on the line being filled.
struct LineBuilder {
    runs: Vec<(u32, String, FontSpec)>,
    x: u32,
    pending_space: bool,
}

impl LineBuilder {
    fn new() -> Self {
        Self {
            runs: Vec::new(),
            x: 0,
            pending_space: false,
        }
    }

    fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

impl<'a, M: TextMetrics + ?Sized> LayoutRenderer<'a, M> {
    /// Create a renderer.
    pub fn new(metrics: &'a M, options: &'a LayoutOptions) -> Self {
        let margin = options.margin_px();
        Self {
            metrics,
            options,
            styler: InlineStyler::new(),
            items: Vec::new(),
            cursor: margin,
            left: margin,
            content_width: options.content_width_px(),
        }
    }

    /// Render the document into a layout.
    pub fn render(
        mut self,
        title: &str,
        blocks: &[Block],
        screenshots: &[Screenshot],
    ) -> Result<RenderedLayout> {
        let opts = self.options;

        let title_font = FontSpec::bold(opts.pt_to_px(opts.title_size_pt));
        self.text_block(&[Span::Plain(title.to_string())], title_font, 0);
        self.gap(opts.title_gap_pt);

        for element in group_elements(blocks) {
            self.render_element(&element);
        }

        if !screenshots.is_empty() {
            self.render_screenshots(screenshots)?;
        }

        self.cursor += opts.margin_px();

        log::debug!(
            "Laid out {} items, {}x{} px",
            self.items.len(),
            opts.page_width_px(),
            self.cursor
        );
        Ok(RenderedLayout::from_items(
            opts.page_width_px(),
            self.cursor,
            self.items,
        ))
    }

    fn render_element(&mut self, element: &Element<'_>) {
        let opts = self.options;
        let body = FontSpec::regular(opts.pt_to_px(opts.body_size_pt));

        match element {
            Element::Heading(text) => {
                self.gap(opts.heading_gap_before_pt);
                let spans = self.styler.style(text);
                self.text_block(&spans, FontSpec::bold(opts.pt_to_px(opts.heading_size_pt)), 0);
                self.gap(opts.heading_gap_after_pt);
            }
            Element::Paragraph(text) => {
                let spans = self.styler.style(text);
                self.text_block(&spans, body, 0);
                self.gap(opts.block_gap_pt);
            }
            Element::List(entries) => {
                // hanging indent sized for the widest marker of the run
                let indent = self
                    .metrics
                    .text_width(&format!("{}. ", entries.len()), body);
                for (index, text) in entries.iter().enumerate() {
                    let marker = format!("{}.", index + 1);
                    let y = self.cursor + self.text_offset(body);
                    self.push_text(self.left, y, marker, body);

                    let spans = self.styler.style(text);
                    self.text_block(&spans, body, indent);
                    self.gap(opts.block_gap_pt);
                }
            }
        }
    }

    fn render_screenshots(&mut self, screenshots: &[Screenshot]) -> Result<()> {
        let opts = self.options;
        self.gap(opts.section_gap_pt);

        if let Some(heading) = opts.screenshot_heading.as_deref() {
            let font = FontSpec::bold(opts.pt_to_px(opts.section_size_pt));
            self.text_block(&[Span::Plain(heading.to_string())], font, 0);
            self.gap(opts.heading_gap_after_pt);
        }

        for (index, shot) in screenshots.iter().enumerate() {
            if index > 0 {
                self.gap(opts.image_gap_pt);
            }
            self.place_image(index, shot)?;
        }
        Ok(())
    }

    fn place_image(&mut self, index: usize, shot: &Screenshot) -> Result<()> {
        let label = Screenshot::label(index);
        shot.ensure_decodable().map_err(|e| match e {
            Error::Image(msg) => Error::Image(format!("{label}: {msg}")),
            other => other,
        })?;
        let decoded = image::load_from_memory(&shot.data)
            .map_err(|e| Error::Image(format!("{label}: {e}")))?;

        let (src_w, src_h) = (decoded.width(), decoded.height());
        if src_w == 0 || src_h == 0 {
            return Err(Error::Image(format!("{label}: image has no pixels")));
        }

        let frame = if self.options.image_border {
            self.options.effective_scale()
        } else {
            0
        };
        let target_w = self.content_width.saturating_sub(2 * frame).max(1);
        let target_h = ((src_h as f64 * target_w as f64 / src_w as f64).round() as u64).max(1);
        if target_w as u64 * target_h > MAX_IMAGE_PIXELS {
            log::warn!(
                "{} rejected: {}x{} scales to {}x{}",
                label,
                src_w,
                src_h,
                target_w,
                target_h
            );
            return Err(Error::Image(format!(
                "{label}: scaled size {target_w}x{target_h} exceeds the {MAX_IMAGE_PIXELS} pixel limit"
            )));
        }
        let target_h = target_h as u32;
        log::debug!(
            "Scaling {} from {}x{} to {}x{}",
            label,
            src_w,
            src_h,
            target_w,
            target_h
        );

        let resized = imageops::resize(&decoded.to_rgba8(), target_w, target_h, FilterType::Triangle);
        let pixels = flatten_on(&resized, BACKGROUND);

        if frame > 0 {
            self.items.push(LayoutItem::Rect(RectItem {
                x: self.left,
                y: self.cursor,
                width: target_w + 2 * frame,
                height: target_h + 2 * frame,
                color: FRAME_COLOR,
            }));
        }
        self.items.push(LayoutItem::Image(ImageItem {
            x: self.left + frame,
            y: self.cursor + frame,
            pixels,
        }));
        self.cursor = self
            .cursor
            .checked_add(target_h + 2 * frame)
            .ok_or_else(|| Error::Render(format!("{label}: layout height overflow")))?;
        Ok(())
    }

    /// Lay out styled text as wrapped lines starting at the cursor.
    ///
    /// Always produces at least one line box, even for empty text.
    fn text_block(&mut self, spans: &[Span], font: FontSpec, indent: u32) {
        let max_width = self.content_width.saturating_sub(indent).max(1);
        let mut line = LineBuilder::new();

        for span in spans {
            let span_font = font.with_bold(font.bold || span.is_emphasized());
            let mut rest = span.text();
            loop {
                let trimmed = rest.trim_start();
                if trimmed.len() != rest.len() {
                    line.pending_space = true;
                }
                if trimmed.is_empty() {
                    break;
                }
                let end = trimmed
                    .find(char::is_whitespace)
                    .unwrap_or(trimmed.len());
                self.place_word(&mut line, &trimmed[..end], span_font, font, indent, max_width);
                rest = &trimmed[end..];
            }
        }

        self.flush_line(&mut line, font, indent);
    }

    fn place_word(
        &mut self,
        line: &mut LineBuilder,
        word: &str,
        font: FontSpec,
        line_font: FontSpec,
        indent: u32,
        max_width: u32,
    ) {
        let width = self.metrics.text_width(word, font);
        let mut space = if line.pending_space && !line.is_empty() {
            self.metrics.text_width(" ", font)
        } else {
            0
        };
        line.pending_space = false;

        if !line.is_empty() && line.x + space + width > max_width {
            self.flush_line(line, line_font, indent);
            space = 0;
        }

        if width <= max_width.saturating_sub(line.x + space) {
            line.runs.push((line.x + space, word.to_string(), font));
            line.x += space + width;
            return;
        }

        // a single word wider than the line is broken between characters
        let mut chunk = String::new();
        for c in word.chars() {
            chunk.push(c);
            if line.x + self.metrics.text_width(&chunk, font) > max_width && chunk.chars().count() > 1 {
                chunk.pop();
                let w = self.metrics.text_width(&chunk, font);
                line.runs.push((line.x, std::mem::take(&mut chunk), font));
                line.x += w;
                self.flush_line(line, line_font, indent);
                chunk.push(c);
            }
        }
        if !chunk.is_empty() {
            let w = self.metrics.text_width(&chunk, font);
            line.runs.push((line.x, chunk, font));
            line.x += w;
        }
    }

    fn flush_line(&mut self, line: &mut LineBuilder, font: FontSpec, indent: u32) {
        let y = self.cursor + self.text_offset(font);
        for (x, text, run_font) in line.runs.drain(..) {
            self.push_text(self.left + indent + x, y, text, run_font);
        }
        line.x = 0;
        line.pending_space = false;
        self.cursor += self.options.line_box_px(font.size_px);
    }

    /// Distance from the top of a line box to the top of its glyph box.
    fn text_offset(&self, font: FontSpec) -> u32 {
        self.options
            .line_box_px(font.size_px)
            .saturating_sub(self.metrics.glyph_height(font))
            / 2
    }

    fn push_text(&mut self, x: u32, y: u32, text: String, font: FontSpec) {
        self.items.push(LayoutItem::Text(TextItem {
            x,
            y,
            width: self.metrics.text_width(&text, font),
            height: self.metrics.glyph_height(font),
            text,
            font,
            color: TEXT_COLOR,
        }));
    }

    fn gap(&mut self, pt: f32) {
        self.cursor += self.options.pt_to_px(pt);
    }
}

/// Composite an RGBA image onto a solid background.
fn flatten_on(rgba: &RgbaImage, background: Rgb<u8>) -> RgbImage {
    let mut out = RgbImage::new(rgba.width(), rgba.height());
    for (x, y, pixel) in rgba.enumerate_pixels() {
        let alpha = pixel[3] as u32;
        let blend = |fg: u8, bg: u8| ((fg as u32 * alpha + bg as u32 * (255 - alpha) + 127) / 255) as u8;
        out.put_pixel(
            x,
            y,
            Rgb([
                blend(pixel[0], background[0]),
                blend(pixel[1], background[1]),
                blend(pixel[2], background[2]),
            ]),
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_blocks;
    use image::{ImageFormat, Rgba};
    use std::io::Cursor;

    /// Fixed-pitch metrics: every char is half the font size wide.
    struct FixedMetrics;

    impl TextMetrics for FixedMetrics {
        fn text_width(&self, text: &str, font: FontSpec) -> u32 {
            text.chars().count() as u32 * font.size_px / 2
        }

        fn glyph_height(&self, font: FontSpec) -> u32 {
            font.size_px
        }
    }

    fn layout(title: &str, body: &str) -> RenderedLayout {
        render_layout(
            title,
            &parse_blocks(body),
            &[],
            &FixedMetrics,
            &LayoutOptions::default(),
        )
        .unwrap()
    }

    fn texts(layout: &RenderedLayout) -> Vec<&str> {
        layout.text_items().map(|t| t.text.as_str()).collect()
    }

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_group_elements_runs() {
        let blocks = parse_blocks("1. a\n2. b\n\nText\n1. c");
        assert_eq!(
            group_elements(&blocks),
            vec![
                Element::List(vec!["a", "b"]),
                Element::Paragraph("Text"),
                Element::List(vec!["c"]),
            ]
        );
    }

    #[test]
    fn test_group_elements_leading_run() {
        let blocks = parse_blocks("1. first\n2. second");
        assert_eq!(group_elements(&blocks), vec![Element::List(vec!["first", "second"])]);

        let blocks = parse_blocks("Intro\n1. first\n2. second");
        assert_eq!(
            group_elements(&blocks)[1],
            Element::List(vec!["first", "second"])
        );
    }

    #[test]
    fn test_layout_width_and_title() {
        let layout = layout("Guide", "");
        assert_eq!(layout.width(), 1587);
        assert_eq!(texts(&layout), vec!["Guide"]);

        let title = layout.text_items().next().unwrap();
        assert!(title.font.bold);
        assert_eq!(title.x, 151);
        assert!(title.y >= 151);
    }

    #[test]
    fn test_list_markers_and_indent() {
        let layout = layout("T", "1. Open app\n2. Close");
        let items: Vec<_> = layout.text_items().collect();
        let markers: Vec<_> = items.iter().filter(|t| t.text.ends_with('.')).collect();
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].text, "1.");
        assert_eq!(markers[1].text, "2.");

        let open = items.iter().find(|t| t.text == "Open").unwrap();
        assert!(open.x > markers[0].x);
        assert_eq!(open.y, markers[0].y);
    }

    #[test]
    fn test_emphasis_is_bold() {
        let layout = layout("T", "Click **Save** now");
        let save = layout.text_items().find(|t| t.text == "Save").unwrap();
        let click = layout.text_items().find(|t| t.text == "Click").unwrap();
        assert!(save.font.bold);
        assert!(!click.font.bold);
        assert!(!texts(&layout).iter().any(|t| t.contains("**")));
    }

    #[test]
    fn test_long_text_wraps() {
        let body = "word ".repeat(400);
        let layout = layout("T", &body);
        let rows: std::collections::BTreeSet<_> = layout.text_items().map(|t| t.y).collect();
        assert!(rows.len() > 2);

        let right = 1587 - 151;
        assert!(layout.text_items().all(|t| t.x + t.width <= right));
    }

    #[test]
    fn test_long_word_breaks() {
        let body = "x".repeat(500);
        let layout = layout("T", &body);
        let chunks: Vec<_> = layout.text_items().skip(1).collect();
        assert!(chunks.len() > 1);
        let joined: String = chunks.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(joined, body);
    }

    #[test]
    fn test_height_grows_with_content() {
        let short = layout("T", "One line");
        let long = layout("T", &"Line\n".repeat(100));
        assert!(long.height() > short.height());
    }

    #[test]
    fn test_screenshot_scaled_to_width() {
        let shot = Screenshot::from_bytes(png_bytes(100, 50));
        let options = LayoutOptions::default().with_image_border(false);
        let layout = render_layout("T", &[], &[shot], &FixedMetrics, &options).unwrap();

        let image = layout
            .items()
            .iter()
            .find_map(|item| match item {
                LayoutItem::Image(image) => Some(image),
                _ => None,
            })
            .unwrap();
        assert_eq!(image.pixels.width(), options.content_width_px());
        // 1285 * 50 / 100, rounded half up
        assert_eq!(image.pixels.height(), 643);
        assert_eq!(*image.pixels.get_pixel(0, 0), Rgb([10, 20, 30]));
        assert!(texts(&layout).contains(&"Associated"));
    }

    #[test]
    fn test_screenshot_frame() {
        let shot = Screenshot::from_bytes(png_bytes(40, 40));
        let layout =
            render_layout("T", &[], &[shot], &FixedMetrics, &LayoutOptions::default()).unwrap();
        let first_rect = layout.items().iter().position(|i| matches!(i, LayoutItem::Rect(_)));
        let first_image = layout.items().iter().position(|i| matches!(i, LayoutItem::Image(_)));
        assert!(first_rect.unwrap() < first_image.unwrap());
    }

    #[test]
    fn test_undecodable_screenshot() {
        let shot = Screenshot::from_bytes(b"not an image".to_vec());
        let result = render_layout("T", &[], &[shot], &FixedMetrics, &LayoutOptions::default());
        let err = result.unwrap_err();
        assert!(err.is_render_failure());
        assert!(err.to_string().contains("Screenshot 1"));
    }

    #[test]
    fn test_oversized_screenshot_rejected() {
        let shot = Screenshot::from_bytes(png_bytes(1, 200_000));
        let err = render_layout("T", &[], &[shot], &FixedMetrics, &LayoutOptions::default())
            .unwrap_err();

        assert!(matches!(err, Error::Image(_)));
        assert!(err.is_render_failure());
        let msg = err.to_string();
        assert!(msg.contains("Screenshot 1"));
        assert!(msg.contains("pixel limit"));
    }

    #[test]
    fn test_tall_screenshot_within_limit() {
        let shot = Screenshot::from_bytes(png_bytes(10, 100));
        let options = LayoutOptions::default().with_image_border(false);
        let layout = render_layout("T", &[], &[shot], &FixedMetrics, &options).unwrap();
        let width = options.content_width_px();
        assert!(layout.height() > width * 9);
    }

    #[test]
    fn test_flatten_transparent() {
        let rgba = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 0]));
        let flat = flatten_on(&rgba, BACKGROUND);
        assert_eq!(*flat.get_pixel(0, 0), BACKGROUND);
    }
}
