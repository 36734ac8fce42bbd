//! Block-level and inline types produced by the parser.

use serde::{Deserialize, Serialize};

/// One structurally classified line of body text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// A `## ` heading, marker stripped
    Heading {
        /// Heading text
        text: String,
    },

    /// A numbered step, source digits discarded
    ListItem {
        /// Item text after the `N.` prefix
        text: String,
        /// 1-based position inside its run
        ordinal: usize,
    },

    /// Any other non-blank line
    Paragraph {
        /// Line text
        text: String,
    },

    /// Empty or whitespace-only line
    Blank,
}

impl Block {
    /// Create a heading block.
    pub fn heading(text: impl Into<String>) -> Self {
        Block::Heading { text: text.into() }
    }

    /// Create a list item block.
    pub fn list_item(text: impl Into<String>, ordinal: usize) -> Self {
        Block::ListItem {
            text: text.into(),
            ordinal,
        }
    }

    /// Create a paragraph block.
    pub fn paragraph(text: impl Into<String>) -> Self {
        Block::Paragraph { text: text.into() }
    }

    /// Raw text carried by the block (`None` for blanks).
    pub fn text(&self) -> Option<&str> {
        match self {
            Block::Heading { text } | Block::ListItem { text, .. } | Block::Paragraph { text } => {
                Some(text)
            }
            Block::Blank => None,
        }
    }

    /// Check if this block is a list item.
    pub fn is_list_item(&self) -> bool {
        matches!(self, Block::ListItem { .. })
    }

    /// Check if this block produces visual output.
    pub fn is_renderable(&self) -> bool {
        !matches!(self, Block::Blank)
    }
}

/// An inline-styled fragment of a block's text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "text", rename_all = "snake_case")]
pub enum Span {
    /// Unstyled text, whitespace preserved
    Plain(String),
    /// Text that was wrapped in `**`
    Emphasized(String),
}

impl Span {
    /// Text of the span without markers.
    pub fn text(&self) -> &str {
        match self {
            Span::Plain(text) | Span::Emphasized(text) => text,
        }
    }

    /// Check if this span is emphasized.
    pub fn is_emphasized(&self) -> bool {
        matches!(self, Span::Emphasized(_))
    }
}

/// Visible text of a span sequence.
pub fn spans_text(spans: &[Span]) -> String {
    spans.iter().map(Span::text).collect()
}
