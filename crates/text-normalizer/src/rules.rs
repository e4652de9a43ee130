//! Normalization rules.

/// Punctuation kept by [`CharsetRule`] besides letters, digits, `_` and whitespace.
pub const ALLOWED_PUNCTUATION: &[char] = &['.', ',', '!', '?', '\'', '"', ':', ';', '(', ')', '-'];

/// A text normalization rule.
pub trait Rule: Send + Sync + std::fmt::Debug {
    /// Get the rule name.
    fn name(&self) -> &str;

    /// Apply the rule to the input text.
    fn apply(&self, input: &str) -> String;
}

/// Create the default set of normalization rules.
///
/// Whitespace is collapsed again after the charset filter: dropping a symbol
/// that sat between two spaces would otherwise leave a double space behind.
pub fn default_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(WhitespaceRule),
        Box::new(CharsetRule),
        Box::new(WhitespaceRule),
    ]
}

/// Whitespace as found in document text layers.
///
/// Unicode `White_Space` plus the ASCII separators U+001C..=U+001F.
pub fn is_space(c: char) -> bool {
    c.is_whitespace() || ('\u{1C}'..='\u{1F}').contains(&c)
}

/// Check whether a character survives normalization.
pub fn is_allowed(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || is_space(c) || ALLOWED_PUNCTUATION.contains(&c)
}

/// Normalize whitespace (collapse runs into single spaces, trim).
#[derive(Debug)]
pub struct WhitespaceRule;

impl Rule for WhitespaceRule {
    fn name(&self) -> &str {
        "whitespace"
    }

    fn apply(&self, input: &str) -> String {
        input
            .split(is_space)
            .filter(|word| !word.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Drop every character outside the allow-set.
#[derive(Debug)]
pub struct CharsetRule;

impl Rule for CharsetRule {
    fn name(&self) -> &str {
        "charset"
    }

    fn apply(&self, input: &str) -> String {
        input.chars().filter(|&c| is_allowed(c)).collect()
    }
}
