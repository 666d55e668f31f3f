//! Content normalization
//!
//! Converts between the plain text typed into the editor field and the
//! paragraph markup that is posted, and decides whether a body has any
//! real content in it.

use once_cell::sync::Lazy;
use regex::Regex;

const PARAGRAPH_OPEN: &str = "<p>";
const PARAGRAPH_CLOSE: &str = "</p>";

/// Matches bodies made only of whitespace and empty paragraphs
static BLANK_BODY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\s*<p>\s*</p>)*\s*$").expect("blank body pattern is valid")
});

/// Convert newline-separated text into paragraph markup
///
/// A single trailing line break terminates the last line instead of opening
/// a new one, and trailing blanks on that last line are dropped. Interior
/// blank lines are kept, one empty paragraph each.
///
/// `""` becomes `<p></p>`; `"abc\ndef"` becomes `<p>abc</p><p>def</p>`.
pub fn normalize_newlines(text: &str) -> String {
    let text = trim_trailing(text);
    let mut markup = String::with_capacity(text.len() + PARAGRAPH_OPEN.len() + PARAGRAPH_CLOSE.len());

    for line in text.split('\n') {
        markup.push_str(PARAGRAPH_OPEN);
        markup.push_str(line);
        markup.push_str(PARAGRAPH_CLOSE);
    }

    markup
}

/// Convert paragraph markup back into newline-separated text
pub fn denormalize_paragraphs(markup: &str) -> String {
    let text = markup
        .replace(PARAGRAPH_OPEN, "")
        .replace(PARAGRAPH_CLOSE, "\n");

    match text.strip_suffix('\n') {
        Some(stripped) => stripped.to_string(),
        None => text,
    }
}

/// Whether a post body has anything besides whitespace and empty paragraphs
pub fn is_body_valid(markup: &str) -> bool {
    !markup.is_empty() && !BLANK_BODY.is_match(markup)
}

/// Selection offset that puts the caret after the last character of `text`
///
/// Doubles the UTF-16 length so the offset clamps to the end of the field.
pub fn cursor_end(text: &str) -> u32 {
    let units = text.encode_utf16().count().saturating_mul(2);
    u32::try_from(units).unwrap_or(u32::MAX)
}

fn trim_trailing(text: &str) -> &str {
    let text = text
        .strip_suffix("\r\n")
        .or_else(|| text.strip_suffix('\n'))
        .unwrap_or(text);
    text.trim_end_matches(|c: char| c.is_whitespace() && c != '\n' && c != '\r')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wraps_single_line() {
        assert_eq!(normalize_newlines("abc"), "<p>abc</p>");
    }

    #[test]
    fn test_empty_text_is_one_empty_paragraph() {
        assert_eq!(normalize_newlines(""), "<p></p>");
    }

    #[test]
    fn test_each_line_gets_a_paragraph() {
        assert_eq!(normalize_newlines("abc\ndef"), "<p>abc</p><p>def</p>");
        assert_eq!(normalize_newlines("abc\n\ndef"), "<p>abc</p><p></p><p>def</p>");
        assert_eq!(normalize_newlines("\nsomething"), "<p></p><p>something</p>");
    }

    #[test]
    fn test_blank_lines_are_not_collapsed() {
        assert_eq!(normalize_newlines("\n\n"), "<p></p><p></p>");
        assert_eq!(
            normalize_newlines("a\n\n\nb"),
            "<p>a</p><p></p><p></p><p>b</p>"
        );
    }

    #[test]
    fn test_trailing_blanks_are_stripped() {
        assert_eq!(normalize_newlines("abc   "), "<p>abc</p>");
        assert_eq!(normalize_newlines("abc \n"), "<p>abc</p>");
        assert_eq!(normalize_newlines("abc\r\ndef\r\n"), "<p>abc\r</p><p>def</p>");
    }

    #[test]
    fn test_denormalize_strips_tags_and_final_newline() {
        assert_eq!(denormalize_paragraphs("<p>abc</p>"), "abc");
        assert_eq!(denormalize_paragraphs("<p>abc</p><p></p><p>def</p>"), "abc\n\ndef");
        assert_eq!(denormalize_paragraphs(""), "");
    }

    #[test]
    fn test_round_trip_preserves_text() {
        for text in ["", "hello", "abc\ndef", "\nleading", "a\n\n\nb", "  indented\n\tx", "a\r\nb"] {
            assert_eq!(denormalize_paragraphs(&normalize_newlines(text)), text, "text: {:?}", text);
        }
    }

    #[test]
    fn test_cursor_end_counts_utf16_units() {
        assert_eq!(cursor_end(""), 0);
        assert_eq!(cursor_end("abc"), 6);
        assert_eq!(cursor_end("a\u{1F600}"), 6);
    }

    #[test]
    fn test_body_validation() {
        assert!(!is_body_valid(""));
        assert!(!is_body_valid("   \n\n"));
        assert!(!is_body_valid("<p></p>"));
        assert!(!is_body_valid("<p></p><p>  </p>"));
        assert!(is_body_valid("hello"));
        assert!(is_body_valid("<p>something</p>"));
        assert!(is_body_valid("<p></p><p>something</p>"));
    }

    #[test]
    fn test_normalized_whitespace_is_invalid() {
        assert!(!is_body_valid(&normalize_newlines("")));
        assert!(!is_body_valid(&normalize_newlines("\n\n")));
        assert!(!is_body_valid(&normalize_newlines("   \n \n")));
        assert!(is_body_valid(&normalize_newlines("abc\ndef")));
    }
}
