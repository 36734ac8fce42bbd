//! Inline styling of a single block's text.

use crate::model::Span;
use regex::Regex;

/// Splits text on paired `**` delimiters.
///
/// Matching is non-greedy and non-nesting. An unpaired `**` is not an error;
/// it stays in the surrounding plain text.
#[derive(Debug, Clone)]
pub struct InlineStyler {
    emphasis: Regex,
}

impl InlineStyler {
    /// Create a new inline styler.
    pub fn new() -> Self {
        Self {
            emphasis: Regex::new(r"\*\*(.*?)\*\*").expect("emphasis pattern is valid"),
        }
    }

    /// Split `text` into plain and emphasized spans.
    pub fn style(&self, text: &str) -> Vec<Span> {
        let mut spans = Vec::new();
        let mut last = 0;

        for caps in self.emphasis.captures_iter(text) {
            let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            if whole.start() > last {
                spans.push(Span::Plain(text[last..whole.start()].to_string()));
            }
            spans.push(Span::Emphasized(inner.as_str().to_string()));
            last = whole.end();
        }

        if last < text.len() {
            spans.push(Span::Plain(text[last..].to_string()));
        }

        spans
    }
}

impl Default for InlineStyler {
    fn default() -> Self {
        Self::new()
    }
}

/// Style `text` with a fresh styler.
pub fn style_spans(text: &str) -> Vec<Span> {
    InlineStyler::new().style(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(s: &str) -> Span {
        Span::Plain(s.to_string())
    }

    fn strong(s: &str) -> Span {
        Span::Emphasized(s.to_string())
    }

    #[test]
    fn test_single_emphasis() {
        assert_eq!(style_spans("**bold**"), vec![strong("bold")]);
    }

    #[test]
    fn test_unterminated_is_literal() {
        assert_eq!(style_spans("**unterminated"), vec![plain("**unterminated")]);
        assert_eq!(
            style_spans("**a** and **b"),
            vec![strong("a"), plain(" and **b")]
        );
    }

    #[test]
    fn test_whitespace_preserved() {
        assert_eq!(
            style_spans("  Click **Save**  now "),
            vec![plain("  Click "), strong("Save"), plain("  now ")]
        );
    }

    #[test]
    fn test_non_greedy() {
        assert_eq!(
            style_spans("**one** two **three**"),
            vec![strong("one"), plain(" two "), strong("three")]
        );
    }

    #[test]
    fn test_edge_delimiters() {
        assert_eq!(style_spans("****"), vec![strong("")]);
        assert_eq!(style_spans("**"), vec![plain("**")]);
        assert_eq!(style_spans("***x***"), vec![strong("*x"), plain("*")]);
        assert_eq!(style_spans(""), Vec::<Span>::new());
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(style_spans("Just text."), vec![plain("Just text.")]);
    }
}
