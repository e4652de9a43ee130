//! # text-normalizer
//!
//! Cleans raw text pulled out of document pages before it is handed to a
//! synthesis engine:
//! - Whitespace runs collapsed to single spaces, ends trimmed
//! - Characters outside letters, digits, `_`, whitespace and
//!   `. , ! ? ' " : ; ( ) -` removed
//!
//! Normalization is pure and idempotent.
//!
//! # Example
//!
//! ```
//! use text_normalizer::Normalizer;
//! use tts_core::TextNormalizer;
//!
//! let normalizer = Normalizer::new();
//! let result = normalizer.normalize("Hello   world!! @home");
//! assert_eq!(result.as_str(), "Hello world!! home");
//! ```

mod rules;

use tracing::instrument;
use tts_core::{NormText, TextNormalizer};

pub use rules::{
    ALLOWED_PUNCTUATION, CharsetRule, Rule, WhitespaceRule, is_allowed, is_space,
};

/// Text normalizer with configurable rule pipeline.
#[derive(Debug)]
pub struct Normalizer {
    rules: Vec<Box<dyn Rule>>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    /// Create a new normalizer with default rules.
    pub fn new() -> Self {
        Self {
            rules: rules::default_rules(),
        }
    }

    /// Create a normalizer with custom rules.
    pub fn with_rules(rules: Vec<Box<dyn Rule>>) -> Self {
        Self { rules }
    }

    /// Add a rule to the pipeline.
    pub fn add_rule(&mut self, rule: Box<dyn Rule>) {
        self.rules.push(rule);
    }
}

impl TextNormalizer for Normalizer {
    #[instrument(level = "trace", skip_all, fields(input_len = input.len()))]
    fn normalize(&self, input: &str) -> NormText {
        if input.is_empty() {
            return NormText::default();
        }

        let text = self
            .rules
            .iter()
            .fold(input.to_string(), |text, rule| rule.apply(&text));

        NormText::new(text)
    }
}

/// Normalize with the default rule set.
pub fn normalize(input: &str) -> NormText {
    Normalizer::new().normalize(input)
}
