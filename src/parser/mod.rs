//! Body text parsing: block classification and inline styling.

mod block;
mod inline;

pub use block::{parse_blocks, BlockParser};
pub use inline::{style_spans, InlineStyler};
