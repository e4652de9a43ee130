//! Trait definitions for pipeline components.

use std::path::Path;

use crate::config::DeviceType;
use crate::error::TtsResult;
use crate::types::{NormText, Waveform};

/// Text normalization trait.
///
/// Implementations turn raw extracted text into a form the synthesis engine
/// can read aloud. Normalization never fails; empty input yields empty text.
pub trait TextNormalizer: Send + Sync {
    /// Normalize the input text.
    fn normalize(&self, input: &str) -> NormText;
}

/// An opened paginated document.
pub trait PagedDocument {
    /// Number of pages.
    fn page_count(&self) -> usize;

    /// Extract the raw text of one page.
    ///
    /// # Arguments
    /// * `page` - 1-based page index
    ///
    /// # Returns
    /// `Ok(None)` when the page carries no text layer.
    fn page_text(&self, page: usize) -> TtsResult<Option<String>>;
}

/// Opens documents from the filesystem.
pub trait DocumentSource {
    /// Open the document at `path`. The path is known to exist.
    fn open(&self, path: &Path) -> TtsResult<Box<dyn PagedDocument>>;
}

/// A loaded voice-synthesis engine.
pub trait SynthesisEngine: Send + std::fmt::Debug {
    /// Native output sample rate in Hz.
    fn sample_rate(&self) -> u32;

    /// Generate a waveform for `text`.
    ///
    /// # Arguments
    /// * `text` - Text to speak, passed whole
    /// * `voice_prompt` - Optional reference sample to condition the voice on;
    ///   `None` selects the engine's default voice
    fn generate(&self, text: &str, voice_prompt: Option<&Path>) -> TtsResult<Waveform>;
}

/// Creates synthesis engines. Loading may take seconds to minutes.
pub trait EngineLoader: Send {
    /// Human-readable backend name for logging.
    fn name(&self) -> &str;

    /// Load an engine placed on `device`.
    fn load(&self, device: DeviceType) -> TtsResult<Box<dyn SynthesisEngine>>;
}
