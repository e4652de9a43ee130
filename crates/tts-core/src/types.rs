//! Core data types for the document-to-speech pipeline.

use std::sync::Arc;

/// Normalized text: collapsed whitespace, allow-listed characters only, trimmed.
///
/// Produced by a [`TextNormalizer`](crate::TextNormalizer). An empty value is
/// legal and means the input carried nothing speakable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NormText {
    /// The normalized text content.
    pub text: String,
}

impl NormText {
    /// Wrap an already-normalized string.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Borrow the text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Check whether there is nothing to speak.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Consume into the inner string.
    pub fn into_string(self) -> String {
        self.text
    }
}

impl std::fmt::Display for NormText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

impl AsRef<str> for NormText {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// What a single page produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// Non-empty normalized text.
    Text(NormText),
    /// The page yielded no text, or only characters removed by normalization.
    Empty,
    /// Extraction of this page failed.
    Failed { reason: String },
}

/// Outcome of extracting one page, tagged with its 1-based index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResult {
    /// 1-based page index.
    pub page: usize,
    /// What the page produced.
    pub outcome: PageOutcome,
}

impl PageResult {
    /// Create a page result.
    pub fn new(page: usize, outcome: PageOutcome) -> Self {
        Self { page, outcome }
    }

    /// The page text, if it contributed any.
    pub fn text(&self) -> Option<&NormText> {
        match &self.outcome {
            PageOutcome::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Whether extraction of this page failed.
    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, PageOutcome::Failed { .. })
    }
}

/// A recorded, non-fatal page failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFailure {
    /// 1-based page index.
    pub page: usize,
    /// Why extraction failed.
    pub reason: String,
}

/// Newline-joined page texts of a document, in page order. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedBody {
    /// Joined text.
    pub text: String,
    /// Number of pages in the document.
    pub total_pages: usize,
    /// Number of pages that contributed text.
    pub pages_used: usize,
    /// Pages whose extraction failed.
    pub failures: Vec<PageFailure>,
}

impl AggregatedBody {
    /// Borrow the text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Number of characters (not bytes) in the body.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Mono PCM audio produced by a synthesis engine.
#[derive(Debug, Clone)]
pub struct Waveform {
    /// PCM samples (f32, mono, nominally in [-1, 1]).
    pub pcm: Arc<[f32]>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl Waveform {
    /// Create a new waveform.
    pub fn new(pcm: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            pcm: pcm.into(),
            sample_rate,
        }
    }

    /// Get the number of samples.
    pub fn num_samples(&self) -> usize {
        self.pcm.len()
    }

    /// Check whether the waveform holds no samples.
    pub fn is_empty(&self) -> bool {
        self.pcm.is_empty()
    }

    /// Duration in milliseconds.
    pub fn duration_ms(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.pcm.len() as f32 * 1000.0 / self.sample_rate as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_norm_text() {
        let text = NormText::new("Hello world");
        assert_eq!(text.as_str(), "Hello world");
        assert_eq!(text.to_string(), "Hello world");
        assert!(!text.is_empty());
        assert!(NormText::default().is_empty());
    }

    #[test]
    fn test_page_result_accessors() {
        let ok = PageResult::new(1, PageOutcome::Text(NormText::new("One")));
        assert_eq!(ok.text().map(NormText::as_str), Some("One"));
        assert!(!ok.is_failed());

        let failed = PageResult::new(
            2,
            PageOutcome::Failed {
                reason: "corrupt stream".to_string(),
            },
        );
        assert!(failed.text().is_none());
        assert!(failed.is_failed());
    }

    #[test]
    fn test_waveform() {
        let wave = Waveform::new(vec![0.0; 16000], 16000);
        assert_eq!(wave.num_samples(), 16000);
        assert!((wave.duration_ms() - 1000.0).abs() < f32::EPSILON);
        assert!(!wave.is_empty());

        let silent = Waveform::new(Vec::new(), 0);
        assert_eq!(silent.duration_ms(), 0.0);
    }

    #[test]
    fn test_body_char_count() {
        let body = AggregatedBody {
            text: "héllo\nwörld".to_string(),
            total_pages: 2,
            pages_used: 2,
            failures: Vec::new(),
        };
        assert_eq!(body.char_count(), 11);
    }
}
