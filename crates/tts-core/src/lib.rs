//! # tts-core
//!
//! Core types, traits, and error definitions for pdf2speech.
//!
//! This crate provides the foundational abstractions used across all other crates
//! in the workspace, including:
//!
//! - Common data types (`NormText`, `Waveform`, `PageResult`, `AggregatedBody`)
//! - Trait definitions for the extraction and synthesis capabilities
//! - Unified error handling via `TtsError`
//! - Configuration structures

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::{
    AppConfig, DeviceType, EngineConfig, LoggingConfig, PathsConfig, PreviewConfig,
    SynthesisConfig,
};
pub use error::{ErrorKind, TtsError, TtsResult};
pub use traits::{DocumentSource, EngineLoader, PagedDocument, SynthesisEngine, TextNormalizer};
pub use types::{AggregatedBody, NormText, PageFailure, PageOutcome, PageResult, Waveform};
