//! # runtime
//!
//! Runtime for turning documents into speech.
//!
//! This crate provides:
//! - Synthesis engine backends (mock tone generator, external program)
//! - A speech synthesizer that loads its engine on first use
//! - The pipeline orchestrator: extraction, preview, synthesis
//! - Structured logging setup

pub mod engine;
pub mod logging;
pub mod pipeline;
pub mod preview;
pub mod synthesizer;

pub use engine::{CommandEngine, CommandLoader, MockEngine, MockLoader, loader_from_config};
pub use pipeline::{
    PipelineFailure, PipelineOrchestrator, ResolvedPaths, RunReport, RunState, Stage,
};
pub use preview::preview;
pub use synthesizer::{SpeechSynthesizer, SynthesisReport};
