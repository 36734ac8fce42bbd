//! PDF serialization of rasterized pages.
//!
//! Every page becomes one PDF page whose only content is its raster image,
//! stretched over the full media box.

use super::ExportOptions;
use crate::error::{Error, Result};
use crate::model::Page;
use chrono::{Datelike, Timelike, Utc};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use pdf_writer::{Content, Date, Filter, Finish, Name, Pdf, Rect, Ref, TextStr};
use std::io::Write;

const IMAGE_NAME: Name<'static> = Name(b"Im0");

/// Hands out sequential object ids.
struct RefAllocator {
    next: Ref,
}

impl RefAllocator {
    fn new() -> Self {
        Self { next: Ref::new(1) }
    }

    fn bump(&mut self) -> Ref {
        self.next.bump()
    }
}

/// Write `pages` into a PDF document.
pub fn write_pdf(pages: &[Page], title: &str, options: &ExportOptions) -> Result<Vec<u8>> {
    if pages.is_empty() {
        return Err(Error::Render("no pages to write".to_string()));
    }

    let (page_w, page_h) = options.layout.page_size.dimensions_pt();
    let mut alloc = RefAllocator::new();
    let catalog_id = alloc.bump();
    let tree_id = alloc.bump();
    let info_id = alloc.bump();

    let mut pdf = Pdf::new();
    let mut page_ids = Vec::with_capacity(pages.len());

    for page in pages {
        let page_id = alloc.bump();
        let image_id = alloc.bump();
        let content_id = alloc.bump();
        page_ids.push(page_id);

        let (width, height) = page.dimensions();
        let compressed = deflate(page.samples())?;

        let mut image = pdf.image_xobject(image_id, &compressed);
        image.filter(Filter::FlateDecode);
        image.width(width as i32);
        image.height(height as i32);
        image.color_space().device_rgb();
        image.bits_per_component(8);
        image.finish();

        let mut content = Content::new();
        content.save_state();
        content.transform([page_w, 0.0, 0.0, page_h, 0.0, 0.0]);
        content.x_object(IMAGE_NAME);
        content.restore_state();
        pdf.stream(content_id, &content.finish());

        let mut pdf_page = pdf.page(page_id);
        pdf_page.media_box(Rect::new(0.0, 0.0, page_w, page_h));
        pdf_page.parent(tree_id);
        pdf_page.contents(content_id);
        pdf_page.resources().x_objects().pair(IMAGE_NAME, image_id);
        pdf_page.finish();

        log::debug!(
            "Wrote page {} ({}x{} px, {} bytes compressed)",
            page.number,
            width,
            height,
            compressed.len()
        );
    }

    pdf.pages(tree_id)
        .kids(page_ids.iter().copied())
        .count(page_ids.len() as i32);
    pdf.catalog(catalog_id).pages(tree_id);

    {
        let mut info = pdf.document_info(info_id);
        info.title(TextStr(title));
        info.producer(TextStr(&options.producer));
        if options.timestamp {
            info.creation_date(now());
        }
    }

    Ok(pdf.finish())
}

fn deflate(samples: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(samples)?;
    Ok(encoder.finish()?)
}

fn now() -> Date {
    let ts = Utc::now();
    Date::new(ts.year().clamp(0, 9999) as u16)
        .month(ts.month() as u8)
        .day(ts.day() as u8)
        .hour(ts.hour() as u8)
        .minute(ts.minute() as u8)
        .second(ts.second() as u8)
        .utc_offset_hour(0)
        .utc_offset_minute(0)
}
