//! Rendering: continuous layout, pagination and the HTML preview.

mod backend;
mod bitmap;
mod compositor;
mod html;
mod layout;
mod options;

pub use backend::{FontSpec, Rasterizer, Surface, TextMetrics};
pub use bitmap::BitmapRasterizer;
pub use compositor::{page_count, paginate};
pub use html::{to_preview_html, HtmlRenderer};
pub use layout::{
    group_elements, render_layout, Element, ImageItem, LayoutItem, LayoutRenderer, RectItem,
    RenderedLayout, TextItem, MAX_IMAGE_PIXELS,
};
pub use options::{LayoutOptions, PageSize, MAX_SCALE, MIN_SCALE};
