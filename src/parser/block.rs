//! Line-oriented block parser.
//!
//! The body text is machine generated with a narrow shape, so a single pass
//! over the lines with a two-state machine is enough: no lookahead, no
//! grammar, and every line maps to exactly one [`Block`].

use crate::model::Block;
use regex::Regex;

const HEADING_MARKER: &str = "## ";

/// Scanner state between lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListState {
    /// Not inside a numbered run
    Idle,
    /// Inside a run; holds the ordinal of the last emitted item
    InList(usize),
}

/// Parser turning body text into an ordered block sequence.
#[derive(Debug, Clone)]
pub struct BlockParser {
    list_marker: Regex,
}

impl BlockParser {
    /// Create a new block parser.
    pub fn new() -> Self {
        Self {
            list_marker: Regex::new(r"^[0-9]+\.\s*").expect("list marker pattern is valid"),
        }
    }

    /// Parse the body into blocks, one per source line.
    ///
    /// Total: any line that matches no pattern becomes a paragraph.
    pub fn parse(&self, body: &str) -> Vec<Block> {
        let mut state = ListState::Idle;
        let mut blocks = Vec::new();

        for raw in body.split('\n') {
            let line = raw.strip_suffix('\r').unwrap_or(raw);
            let (block, next) = self.classify(line, state);
            blocks.push(block);
            state = next;
        }

        log::debug!("Parsed {} blocks", blocks.len());
        blocks
    }

    fn classify(&self, line: &str, state: ListState) -> (Block, ListState) {
        if let Some(text) = line.strip_prefix(HEADING_MARKER) {
            return (Block::heading(text), ListState::Idle);
        }

        if let Some(marker) = self.list_marker.find(line) {
            let ordinal = match state {
                ListState::Idle => 1,
                ListState::InList(last) => last + 1,
            };
            let text = &line[marker.end()..];
            return (Block::list_item(text, ordinal), ListState::InList(ordinal));
        }

        if line.trim().is_empty() {
            return (Block::Blank, ListState::Idle);
        }

        (Block::paragraph(line), ListState::Idle)
    }
}

impl Default for BlockParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse body text into blocks with a fresh parser.
pub fn parse_blocks(body: &str) -> Vec<Block> {
    BlockParser::new().parse(body)
}
