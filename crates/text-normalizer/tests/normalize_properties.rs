//! Property tests for text normalization.

use proptest::prelude::*;
use text_normalizer::{Normalizer, is_allowed, is_space, normalize};
use tts_core::TextNormalizer;

/// Strings biased towards whitespace runs and stripped symbols.
fn messy_text() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            "[a-zA-Z0-9_]{1,8}",
            "[ \t\n\r\u{1C}-\u{1F}\u{00A0}]{1,4}",
            "[@#$%^&*+=<>/\\\\|~`{}\\[\\]]{1,3}",
            "[.,!?'\":;()-]{1,2}",
            "[\u{00A0}\u{2013}\u{2014}\u{2018}\u{2019}\u{201C}\u{201D}\u{2026}]",
            "[а-яА-Яéü]{1,4}",
        ],
        0..40,
    )
    .prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn test_idempotent(input in messy_text()) {
        let once = normalize(&input);
        let twice = normalize(once.as_str());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn test_idempotent_arbitrary_unicode(input in any::<String>()) {
        let once = normalize(&input);
        prop_assert_eq!(normalize(once.as_str()), once);
    }

    #[test]
    fn test_no_consecutive_whitespace(input in messy_text()) {
        let out = normalize(&input);
        let chars: Vec<char> = out.as_str().chars().collect();
        for pair in chars.windows(2) {
            prop_assert!(!(is_space(pair[0]) && is_space(pair[1])), "{:?}", out);
        }
    }

    #[test]
    fn test_only_allowed_characters(input in messy_text()) {
        let out = normalize(&input);
        prop_assert!(out.as_str().chars().all(is_allowed), "{:?}", out);
    }

    #[test]
    fn test_trimmed(input in messy_text()) {
        let out = normalize(&input);
        prop_assert_eq!(out.as_str().trim(), out.as_str());
    }
}

#[test]
fn test_symbols_removed() {
    let out = normalize("Price @#$%^&*: 42");
    assert_eq!(out.as_str(), "Price : 42");
}

#[test]
fn test_mixed_whitespace_collapsed() {
    let out = normalize("one\ttwo\n\nthree   four\r\nfive");
    assert_eq!(out.as_str(), "one two three four five");
}

#[test]
fn test_allowed_punctuation_kept() {
    let input = "\"Quote\" (paren) - dash: semi; excl! q? it's, done.";
    assert_eq!(normalize(input).as_str(), input);
}

#[test]
fn test_trait_object_usage() {
    let normalizer: Box<dyn TextNormalizer> = Box::new(Normalizer::new());
    assert_eq!(normalizer.normalize("  Second page.  ").as_str(), "Second page.");
}
