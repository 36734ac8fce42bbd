//! Flat text serialization.

/// Serialize a document as `title`, a blank line, a dash underline as long
/// as the title, a blank line, then the body verbatim.
pub fn to_flat_text(title: &str, body: &str) -> String {
    let dashes = "-".repeat(title.chars().count());
    format!("{title}\n\n{dashes}\n\n{body}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_text_layout() {
        assert_eq!(
            to_flat_text("Setup Guide", "## Step 1\n1. Open app"),
            "Setup Guide\n\n-----------\n\n## Step 1\n1. Open app"
        );
    }

    #[test]
    fn test_dashes_count_characters() {
        let text = to_flat_text("Café", "");
        assert_eq!(text, "Café\n\n----\n\n");
    }

    #[test]
    fn test_body_not_stripped() {
        let body = "**Bold** and\r\n\n\n  spaced ";
        assert!(to_flat_text("T", body).ends_with(body));
    }
}
