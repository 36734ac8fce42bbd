//! HTML preview of a process document.
//!
//! Produces a standalone HTML page with the same structure the paginated
//! export lays out: title, headings, numbered runs, paragraphs and the
//! screenshot section.

use super::layout::{group_elements, Element};
use super::options::LayoutOptions;
use crate::model::{Screenshot, SourceDocument, Span};
use crate::parser::{BlockParser, InlineStyler};
use std::fmt::Write;

/// Render a document to a standalone HTML preview with default options.
pub fn to_preview_html(doc: &SourceDocument) -> String {
    HtmlRenderer::new(LayoutOptions::default()).render(doc)
}

/// HTML preview renderer.
pub struct HtmlRenderer {
    options: LayoutOptions,
    parser: BlockParser,
    styler: InlineStyler,
}

impl HtmlRenderer {
    /// Create a new HTML renderer.
    pub fn new(options: LayoutOptions) -> Self {
        Self {
            options,
            parser: BlockParser::new(),
            styler: InlineStyler::new(),
        }
    }

    /// Render a document to HTML.
    pub fn render(&self, doc: &SourceDocument) -> String {
        let mut output = String::new();
        let title = escape_html(&doc.title);

        output.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
        let _ = writeln!(output, "<title>{}</title>", title);
        self.render_style(&mut output);
        output.push_str("</head>\n<body>\n<article>\n");

        let _ = writeln!(output, "<h1>{}</h1>", title);
        self.render_body(&mut output, &doc.body);

        if doc.has_screenshots() {
            self.render_screenshots(&mut output, &doc.screenshots);
        }

        output.push_str("</article>\n</body>\n</html>\n");
        output
    }

    /// Render only the body fragment (no document wrapper).
    pub fn render_fragment(&self, body: &str) -> String {
        let mut output = String::new();
        self.render_body(&mut output, body);
        output
    }

    fn render_style(&self, output: &mut String) {
        let opts = &self.options;
        let (width_mm, _) = opts.page_size.dimensions_mm();
        let _ = writeln!(
            output,
            "<style>\n\
             article {{ width: {width_mm}mm; padding: {margin}mm; box-sizing: border-box; \
             font-family: Arial, sans-serif; line-height: {lh}; color: #000; background: #fff; }}\n\
             h1 {{ font-size: {title}pt; margin-top: 0; }}\n\
             h2 {{ font-size: {heading}pt; }}\n\
             h3 {{ font-size: {section}pt; }}\n\
             p, li {{ font-size: {body}pt; }}\n\
             img {{ max-width: 100%; height: auto; border: 1px solid #ddd; border-radius: 4px; }}\n\
             </style>",
            margin = opts.margin_mm,
            lh = opts.line_height,
            title = opts.title_size_pt,
            heading = opts.heading_size_pt,
            section = opts.section_size_pt,
            body = opts.body_size_pt,
        );
    }

    fn render_body(&self, output: &mut String, body: &str) {
        let blocks = self.parser.parse(body);
        for element in group_elements(&blocks) {
            match element {
                Element::Heading(text) => {
                    output.push_str("<h2>");
                    self.render_inline(output, text);
                    output.push_str("</h2>\n");
                }
                Element::Paragraph(text) => {
                    output.push_str("<p>");
                    self.render_inline(output, text);
                    output.push_str("</p>\n");
                }
                Element::List(items) => {
                    output.push_str("<ol>\n");
                    for item in items {
                        output.push_str("<li>");
                        self.render_inline(output, item);
                        output.push_str("</li>\n");
                    }
                    output.push_str("</ol>\n");
                }
            }
        }
    }

    fn render_inline(&self, output: &mut String, text: &str) {
        for span in self.styler.style(text) {
            match span {
                Span::Plain(text) => output.push_str(&escape_html(&text)),
                Span::Emphasized(text) => {
                    let _ = write!(output, "<strong>{}</strong>", escape_html(&text));
                }
            }
        }
    }

    fn render_screenshots(&self, output: &mut String, screenshots: &[Screenshot]) {
        output.push_str("<section>\n");
        if let Some(heading) = &self.options.screenshot_heading {
            let _ = writeln!(output, "<h3>{}</h3>", escape_html(heading));
        }
        for (index, shot) in screenshots.iter().enumerate() {
            let _ = writeln!(
                output,
                "<img src=\"{}\" alt=\"{}\">",
                shot.to_data_url(),
                escape_html(&Screenshot::label(index))
            );
        }
        output.push_str("</section>\n");
    }
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new(LayoutOptions::default())
    }
}

/// Escape text for use in HTML content and attribute values.
fn escape_html(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    result
}
