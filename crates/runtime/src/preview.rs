//! Text preview for console output.

/// First `max_chars` characters of `text`, followed by `...` when the text is
/// longer than that.
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_unchanged() {
        assert_eq!(preview("Hello world.", 1000), "Hello world.");
        assert_eq!(preview("", 10), "");
    }

    #[test]
    fn test_exact_length_not_elided() {
        assert_eq!(preview("abcde", 5), "abcde");
    }

    #[test]
    fn test_long_text_elided() {
        assert_eq!(preview("abcdef", 5), "abcde...");
        assert_eq!(preview("abc", 0), "...");
    }

    #[test]
    fn test_counts_chars_not_bytes() {
        assert_eq!(preview("héllo wörld", 4), "héll...");
    }
}
