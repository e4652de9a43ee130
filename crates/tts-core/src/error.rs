//! Unified error types for the document-to-speech pipeline.

use std::path::PathBuf;

use crate::config::DeviceType;

/// Main error type for pdf2speech operations.
#[derive(Debug, thiserror::Error)]
pub enum TtsError {
    /// Input path does not resolve to an existing file.
    #[error("document not found: {}", path.display())]
    DocumentNotFound { path: PathBuf },

    /// The file exists but could not be parsed as a document.
    #[error("failed to open document {}: {reason}", path.display())]
    DocumentOpen { path: PathBuf, reason: String },

    /// The document has zero pages.
    #[error("document contains no pages: {}", path.display())]
    EmptyDocument { path: PathBuf },

    /// A single page could not be extracted. Recorded, never propagated.
    #[error("page {page} extraction failed: {reason}")]
    PageExtraction { page: usize, reason: String },

    /// Every page failed or yielded nothing after normalization.
    #[error("no extractable text in {} ({pages} pages)", path.display())]
    NoExtractableText { path: PathBuf, pages: usize },

    /// Synthesis invoked with blank text.
    #[error("no text to convert to speech")]
    EmptyInput,

    /// The synthesis engine failed to initialize.
    #[error("failed to load synthesis engine on {device}: {reason}")]
    ModelLoad { device: DeviceType, reason: String },

    /// Waveform generation or persistence failed.
    #[error("speech generation failed: {0}")]
    Synthesis(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Invalid input provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error (should not happen in normal operation).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Convenience type alias for Results with TtsError.
pub type TtsResult<T> = Result<T, TtsError>;

/// Error classification, for callers that branch on the failure kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    DocumentNotFound,
    DocumentOpen,
    EmptyDocument,
    PageExtraction,
    NoExtractableText,
    EmptyInput,
    ModelLoad,
    Synthesis,
    Config,
    InvalidInput,
    Io,
    Internal,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::DocumentNotFound => "document-not-found",
            Self::DocumentOpen => "document-open",
            Self::EmptyDocument => "empty-document",
            Self::PageExtraction => "page-extraction",
            Self::NoExtractableText => "no-extractable-text",
            Self::EmptyInput => "empty-input",
            Self::ModelLoad => "model-load",
            Self::Synthesis => "synthesis",
            Self::Config => "config",
            Self::InvalidInput => "invalid-input",
            Self::Io => "io",
            Self::Internal => "internal",
        };
        f.write_str(name)
    }
}

impl TtsError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DocumentNotFound { .. } => ErrorKind::DocumentNotFound,
            Self::DocumentOpen { .. } => ErrorKind::DocumentOpen,
            Self::EmptyDocument { .. } => ErrorKind::EmptyDocument,
            Self::PageExtraction { .. } => ErrorKind::PageExtraction,
            Self::NoExtractableText { .. } => ErrorKind::NoExtractableText,
            Self::EmptyInput => ErrorKind::EmptyInput,
            Self::ModelLoad { .. } => ErrorKind::ModelLoad,
            Self::Synthesis(_) => ErrorKind::Synthesis,
            Self::Config(_) => ErrorKind::Config,
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::Io(_) => ErrorKind::Io,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Create a document-not-found error.
    pub fn document_not_found(path: impl Into<PathBuf>) -> Self {
        Self::DocumentNotFound { path: path.into() }
    }

    /// Create a document-open error.
    pub fn document_open(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::DocumentOpen {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a page extraction error.
    pub fn page_extraction(page: usize, reason: impl Into<String>) -> Self {
        Self::PageExtraction {
            page,
            reason: reason.into(),
        }
    }

    /// Create a model load error.
    pub fn model_load(device: DeviceType, reason: impl Into<String>) -> Self {
        Self::ModelLoad {
            device,
            reason: reason.into(),
        }
    }

    /// Create a synthesis error with message.
    pub fn synthesis(msg: impl Into<String>) -> Self {
        Self::Synthesis(msg.into())
    }

    /// Create a config error with message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error with message.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create an internal error with message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TtsError::document_not_found("documents/report.pdf");
        assert_eq!(err.to_string(), "document not found: documents/report.pdf");

        let err = TtsError::model_load(DeviceType::Cuda, "driver missing");
        assert_eq!(
            err.to_string(),
            "failed to load synthesis engine on cuda: driver missing"
        );

        let err = TtsError::NoExtractableText {
            path: PathBuf::from("scan.pdf"),
            pages: 3,
        };
        assert_eq!(err.to_string(), "no extractable text in scan.pdf (3 pages)");
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(TtsError::EmptyInput.kind(), ErrorKind::EmptyInput);
        assert_eq!(TtsError::synthesis("boom").kind(), ErrorKind::Synthesis);
        assert_eq!(
            TtsError::page_extraction(2, "bad stream").kind(),
            ErrorKind::PageExtraction
        );
        let io = std::io::Error::other("disk full");
        assert_eq!(TtsError::from(io).kind(), ErrorKind::Io);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(ErrorKind::NoExtractableText.to_string(), "no-extractable-text");
        assert_eq!(ErrorKind::ModelLoad.to_string(), "model-load");
    }
}
