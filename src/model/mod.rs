//! Document model types for the export pipeline.
//!
//! This module defines the intermediate representation that flows from the
//! parser through layout and pagination to the serializers.

mod block;
mod document;
mod page;
mod resource;

pub use block::{spans_text, Block, Span};
pub use document::SourceDocument;
pub use page::Page;
pub use resource::Screenshot;
