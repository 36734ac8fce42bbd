//! Slicing a continuous layout into fixed-height pages.
//!
//! Page `i` is produced by drawing the whole layout into a page-sized
//! surface shifted up by `i * P` rows; everything outside the window is
//! clipped. Content is never reflowed, so a line may be split across a page
//! boundary.

use super::backend::{Rasterizer, Surface};
use super::layout::RenderedLayout;
use crate::error::{Error, Result};
use crate::model::Page;

/// Number of pages needed for a layout of height `layout_height`.
///
/// Always at least one, even for an empty layout.
pub fn page_count(layout_height: u32, page_height: u32) -> u32 {
    if page_height == 0 {
        return 1;
    }
    layout_height.div_ceil(page_height).max(1)
}

/// Rasterize `layout` into pages of `page_height` rows.
///
/// A single scoped surface is reused for every page and released when this
/// function returns, on success or failure.
pub fn paginate<R: Rasterizer + ?Sized>(
    layout: &RenderedLayout,
    rasterizer: &R,
    page_height: u32,
) -> Result<Vec<Page>> {
    if page_height == 0 {
        return Err(Error::Render("page height must be positive".to_string()));
    }
    if layout.width() == 0 {
        return Err(Error::Render("layout has zero width".to_string()));
    }

    let count = page_count(layout.height(), page_height);
    log::debug!(
        "Paginating {}x{} layout into {} pages of {} rows",
        layout.width(),
        layout.height(),
        count,
        page_height
    );

    let mut surface = Surface::new(layout.width(), page_height, layout.background());
    let mut pages = Vec::with_capacity(count as usize);

    for index in 0..count {
        let offset = index * page_height;
        surface.begin_window(offset, layout.height());
        rasterizer
            .draw(layout, &mut surface)
            .map_err(|e| match e {
                Error::Render(msg) => Error::Render(format!("page {}: {}", index + 1, msg)),
                other => other,
            })?;
        pages.push(Page::new(index + 1, surface.snapshot()));
    }

    Ok(pages)
}
