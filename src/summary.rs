//! Preview text derived from note content.

/// Number of content characters kept in a summary.
pub const SUMMARY_CHARS: usize = 100;

/// Appended when the content was cut.
pub const TRUNCATION_MARKER: &str = "...";

/// Derive the summary for `content`: unchanged when it has at most
/// `SUMMARY_CHARS` characters, otherwise the first `SUMMARY_CHARS` characters
/// followed by `TRUNCATION_MARKER`.
pub fn summarize(content: &str) -> String {
    match content.char_indices().nth(SUMMARY_CHARS) {
        None => content.to_string(),
        Some((cut, _)) => format!("{}{}", &content[..cut], TRUNCATION_MARKER),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_content_is_unchanged() {
        assert_eq!(summarize("hello"), "hello");
        assert_eq!(summarize(""), "");
    }

    #[test]
    fn test_exactly_limit_is_unchanged() {
        let content = "a".repeat(SUMMARY_CHARS);
        assert_eq!(summarize(&content), content);
    }

    #[test]
    fn test_long_content_is_truncated_with_marker() {
        let content = "b".repeat(SUMMARY_CHARS + 1);
        let summary = summarize(&content);
        assert_eq!(summary, format!("{}...", "b".repeat(SUMMARY_CHARS)));
        assert_eq!(summary.chars().count(), SUMMARY_CHARS + TRUNCATION_MARKER.len());
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        let content = "é".repeat(120);
        let summary = summarize(&content);
        assert!(summary.starts_with(&"é".repeat(SUMMARY_CHARS)));
        assert_eq!(summary.chars().count(), 103);
    }

    #[test]
    fn test_resummarizing_same_content_is_stable() {
        let content = "word ".repeat(40);
        assert_eq!(summarize(&content), summarize(&content));
    }
}
