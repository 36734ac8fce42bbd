//! Layout options and configuration.

use serde::{Deserialize, Serialize};

/// CSS reference resolution the layout is expressed in.
const PX_PER_INCH: f32 = 96.0;
const MM_PER_INCH: f32 = 25.4;
const PT_PER_INCH: f32 = 72.0;

/// Smallest supersampling factor that keeps body text legible.
pub const MIN_SCALE: u32 = 2;
/// Largest supersampling factor accepted.
pub const MAX_SCALE: u32 = 8;

/// Physical page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    /// ISO A4 (210 x 297 mm)
    #[default]
    A4,
    /// US Letter (8.5 x 11 inches)
    Letter,
}

impl PageSize {
    /// Page dimensions in millimeters (width, height).
    pub fn dimensions_mm(&self) -> (f32, f32) {
        match self {
            PageSize::A4 => (210.0, 297.0),
            PageSize::Letter => (215.9, 279.4),
        }
    }

    /// Page dimensions in PDF points (width, height).
    pub fn dimensions_pt(&self) -> (f32, f32) {
        let (w, h) = self.dimensions_mm();
        (mm_to_pt(w), mm_to_pt(h))
    }
}

fn mm_to_pt(mm: f32) -> f32 {
    mm / MM_PER_INCH * PT_PER_INCH
}

/// Options controlling the continuous layout and its page slicing.
///
/// Sizes are given in print units (points, millimeters) and converted to
/// device pixels at 96 dpi times `scale`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    /// Page size; the layout width is the page width
    pub page_size: PageSize,

    /// Margin on all four sides, in millimeters
    pub margin_mm: f32,

    /// Supersampling factor applied to every dimension
    pub scale: u32,

    /// Document title size in points
    pub title_size_pt: f32,

    /// `## ` heading size in points
    pub heading_size_pt: f32,

    /// Screenshot section heading size in points
    pub section_size_pt: f32,

    /// Paragraph and list item size in points
    pub body_size_pt: f32,

    /// Line box height as a multiple of the font size
    pub line_height: f32,

    /// Space after the title, in points
    pub title_gap_pt: f32,

    /// Space before a heading, in points
    pub heading_gap_before_pt: f32,

    /// Space after a heading, in points
    pub heading_gap_after_pt: f32,

    /// Space after a paragraph or list item, in points
    pub block_gap_pt: f32,

    /// Space before the screenshot section, in points
    pub section_gap_pt: f32,

    /// Vertical gap between successive screenshots, in points
    pub image_gap_pt: f32,

    /// Heading shown above the screenshots (`None` to omit)
    pub screenshot_heading: Option<String>,

    /// Draw a thin frame around each screenshot
    pub image_border: bool,
}

impl LayoutOptions {
    /// Create new layout options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size.
    pub fn with_page_size(mut self, size: PageSize) -> Self {
        self.page_size = size;
        self
    }

    /// Set the margin in millimeters.
    pub fn with_margin_mm(mut self, margin: f32) -> Self {
        self.margin_mm = margin.max(0.0);
        self
    }

    /// Set the supersampling factor (clamped to 2..=8).
    pub fn with_scale(mut self, scale: u32) -> Self {
        self.scale = scale.clamp(MIN_SCALE, MAX_SCALE);
        self
    }

    /// Set the body text size in points.
    pub fn with_body_size(mut self, pt: f32) -> Self {
        self.body_size_pt = pt;
        self
    }

    /// Set or remove the screenshot section heading.
    pub fn with_screenshot_heading(mut self, heading: Option<String>) -> Self {
        self.screenshot_heading = heading;
        self
    }

    /// Enable or disable screenshot frames.
    pub fn with_image_border(mut self, border: bool) -> Self {
        self.image_border = border;
        self
    }

    /// Effective supersampling factor, even for deserialized values.
    pub fn effective_scale(&self) -> u32 {
        self.scale.clamp(MIN_SCALE, MAX_SCALE)
    }

    fn device_px_per_inch(&self) -> f32 {
        PX_PER_INCH * self.effective_scale() as f32
    }

    /// Convert points to device pixels.
    pub fn pt_to_px(&self, pt: f32) -> u32 {
        (pt.max(0.0) / PT_PER_INCH * self.device_px_per_inch()).round() as u32
    }

    /// Convert millimeters to device pixels.
    pub fn mm_to_px(&self, mm: f32) -> u32 {
        (mm.max(0.0) / MM_PER_INCH * self.device_px_per_inch()).round() as u32
    }

    /// Layout width `W` in device pixels.
    pub fn page_width_px(&self) -> u32 {
        self.mm_to_px(self.page_size.dimensions_mm().0)
    }

    /// Page height `P` in device pixels.
    pub fn page_height_px(&self) -> u32 {
        self.mm_to_px(self.page_size.dimensions_mm().1)
    }

    /// Margin in device pixels.
    pub fn margin_px(&self) -> u32 {
        self.mm_to_px(self.margin_mm)
    }

    /// Width available to content between the side margins.
    pub fn content_width_px(&self) -> u32 {
        self.page_width_px()
            .saturating_sub(2 * self.margin_px())
            .max(1)
    }

    /// Line box height for a font of `size_px` device pixels.
    pub fn line_box_px(&self, size_px: u32) -> u32 {
        (size_px as f32 * self.line_height.max(1.0)).round() as u32
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            page_size: PageSize::A4,
            margin_mm: 20.0,
            scale: MIN_SCALE,
            title_size_pt: 22.0,
            heading_size_pt: 18.0,
            section_size_pt: 14.0,
            body_size_pt: 12.0,
            line_height: 1.6,
            title_gap_pt: 12.0,
            heading_gap_before_pt: 12.0,
            heading_gap_after_pt: 9.0,
            block_gap_pt: 6.0,
            section_gap_pt: 18.0,
            image_gap_pt: 12.0,
            screenshot_heading: Some("Associated Screenshots".to_string()),
            image_border: true,
        }
    }
}
