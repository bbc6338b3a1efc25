//! Cleaning rules for newsgroup posts.
//!
//! Quoted replies and signature blocks carry the identity of other posters
//! and mailing-list boilerplate rather than the content of the post.

use std::sync::LazyLock;

use regex::Regex;

/// Lines that introduce or contain quoted text.
static QUOTE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(writes in|writes:|wrote:|says:|said:|^In article|^Quoted from|^\||^>)")
        .expect("quote pattern is valid")
});

/// Remove every line that looks like quoted reply text.
///
/// ```
/// use mosaic::document::strip_newsgroup_quoting;
///
/// let text = "In article <1@x>, bob writes:\n> old text\nnew text";
/// assert_eq!(strip_newsgroup_quoting(text), "new text");
/// ```
pub fn strip_newsgroup_quoting(text: &str) -> String {
    text.split('\n')
        .filter(|line| !QUOTE_RE.is_match(line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Remove a trailing signature block.
///
/// The signature starts at the last line that is blank once whitespace and
/// dashes are trimmed. When that line is the first one, or no such line
/// exists, the text is returned unchanged.
///
/// ```
/// use mosaic::document::strip_newsgroup_footer;
///
/// assert_eq!(strip_newsgroup_footer("body\n--\nsig"), "body");
/// assert_eq!(strip_newsgroup_footer("no footer here"), "no footer here");
/// ```
pub fn strip_newsgroup_footer(text: &str) -> String {
    let lines: Vec<&str> = text.trim().split('\n').collect();

    let separator = lines
        .iter()
        .rposition(|line| line.trim().trim_matches('-').is_empty());

    match separator {
        Some(idx) if idx > 0 => lines[..idx].join("\n"),
        _ => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_quoting_patterns() {
        let text = [
            "keep me",
            "alice@example.com wrote:",
            "| piped quote",
            "> angle quote",
            "Quoted from somewhere",
            "bob says: hi",
            "keep me too",
        ]
        .join("\n");

        assert_eq!(strip_newsgroup_quoting(&text), "keep me\nkeep me too");
    }

    #[test]
    fn test_quote_anchors_only_at_line_start() {
        // "In article" mid-line is not a quote marker.
        assert_eq!(
            strip_newsgroup_quoting("as shown In article 5"),
            "as shown In article 5"
        );
    }

    #[test]
    fn test_strip_footer_uses_last_blank_line() {
        let text = "para one\n\npara two\n\n-- \nJohn Doe\njohn@example.com\n";
        assert_eq!(strip_newsgroup_footer(text), "para one\n\npara two\n");
    }

    #[test]
    fn test_strip_footer_keeps_text_when_separator_first() {
        let text = "\n---\nonly a signature";
        assert_eq!(strip_newsgroup_footer(text), text);
    }

    #[test]
    fn test_strip_footer_empty() {
        assert_eq!(strip_newsgroup_footer(""), "");
    }
}
