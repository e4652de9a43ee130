//! Document-to-speech pipeline.
//!
//! Resolves paths, extracts the document body and hands it to the
//! synthesizer, strictly in that order. A run ends either with the path of the
//! written audio file or with a single [`PipelineFailure`].

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{error, info, instrument};

use doc_extractor::{DocumentTextExtractor, PdfSource};
use tts_core::{
    AppConfig, DocumentSource, ErrorKind, PageFailure, PathsConfig, TtsError, TtsResult,
};

use crate::preview::preview;
use crate::synthesizer::{SpeechSynthesizer, SynthesisReport};

/// Stage a run failed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Directory bootstrap or path resolution.
    Setup,
    /// Opening the document and pulling text out of it.
    Extraction,
    /// Engine load, audio generation or saving.
    Synthesis,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Setup => "setup",
            Self::Extraction => "extraction",
            Self::Synthesis => "synthesis",
        };
        f.write_str(name)
    }
}

/// Progress of a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    ExtractingText,
    ExtractionFailed,
    TextReady,
    Synthesizing,
    SynthesisFailed,
    Done,
}

impl RunState {
    /// Whether the run has finished.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::ExtractionFailed | Self::SynthesisFailed | Self::Done
        )
    }

    /// Whether `next` directly follows `self`.
    pub fn can_transition_to(self, next: RunState) -> bool {
        use RunState::*;
        matches!(
            (self, next),
            (Idle, ExtractingText)
                | (ExtractingText, ExtractionFailed)
                | (ExtractingText, TextReady)
                | (TextReady, Synthesizing)
                | (Synthesizing, SynthesisFailed)
                | (Synthesizing, Done)
        )
    }
}

/// Terminal failure of a run.
#[derive(Debug, thiserror::Error)]
#[error("{stage} failed: {error}")]
pub struct PipelineFailure {
    /// Stage the failure originated in.
    pub stage: Stage,
    /// Underlying error.
    #[source]
    pub error: TtsError,
}

impl PipelineFailure {
    /// Create a failure for `stage`.
    pub fn new(stage: Stage, error: TtsError) -> Self {
        Self { stage, error }
    }

    /// Kind of the underlying error.
    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }
}

/// Input and output locations for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    pub input: PathBuf,
    pub output: PathBuf,
}

/// Statistics of a successful run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub total_pages: usize,
    pub pages_used: usize,
    /// Pages skipped because extraction failed.
    pub failures: Vec<PageFailure>,
    /// Characters of normalized text sent to the engine.
    pub chars: usize,
    /// Elided text shown to the user.
    pub preview: String,
    pub synthesis: SynthesisReport,
    pub elapsed_ms: u64,
}

/// Drives documents through extraction and synthesis.
///
/// The synthesizer, and with it the loaded engine, lives as long as the
/// orchestrator, so consecutive runs share one engine.
#[derive(Debug)]
pub struct PipelineOrchestrator<S = PdfSource> {
    paths: PathsConfig,
    preview_chars: usize,
    extractor: DocumentTextExtractor<S>,
    synthesizer: SpeechSynthesizer,
    state: RunState,
}

impl PipelineOrchestrator<PdfSource> {
    /// Build a PDF pipeline from configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.paths.clone(),
            config.preview.max_chars,
            DocumentTextExtractor::pdf(),
            SpeechSynthesizer::from_config(&config.synthesis),
        )
    }
}

impl<S: DocumentSource> PipelineOrchestrator<S> {
    /// Create an orchestrator from its parts.
    pub fn new(
        paths: PathsConfig,
        preview_chars: usize,
        extractor: DocumentTextExtractor<S>,
        synthesizer: SpeechSynthesizer,
    ) -> Self {
        Self {
            paths,
            preview_chars,
            extractor,
            synthesizer,
            state: RunState::Idle,
        }
    }

    /// State of the current or last run.
    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn paths(&self) -> &PathsConfig {
        &self.paths
    }

    pub fn extractor(&self) -> &DocumentTextExtractor<S> {
        &self.extractor
    }

    pub fn synthesizer(&self) -> &SpeechSynthesizer {
        &self.synthesizer
    }

    pub fn synthesizer_mut(&mut self) -> &mut SpeechSynthesizer {
        &mut self.synthesizer
    }

    /// Create the input and output directories if they do not exist.
    pub fn bootstrap_dirs(&self) -> TtsResult<()> {
        for dir in [&self.paths.input_dir, &self.paths.output_dir] {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    /// Map a user-supplied filename to its input and output paths.
    ///
    /// The input extension is appended unless the name already ends with it,
    /// compared case-insensitively.
    pub fn resolve(&self, filename: &str) -> TtsResult<ResolvedPaths> {
        let filename = filename.trim();
        if filename.is_empty() {
            return Err(TtsError::invalid_input("no filename given"));
        }

        let ext = self.paths.input_extension.trim_start_matches('.');
        let suffix = format!(".{}", ext.to_lowercase());
        let name = if filename.to_lowercase().ends_with(&suffix) {
            filename.to_string()
        } else {
            format!("{filename}.{ext}")
        };

        let input = self.paths.input_dir.join(name);
        let output = self.output_path_for(&input)?;
        Ok(ResolvedPaths { input, output })
    }

    /// Audio path for a document: `<output_dir>/<stem>.<output_extension>`.
    pub fn output_path_for(&self, input: &Path) -> TtsResult<PathBuf> {
        let stem = input.file_stem().ok_or_else(|| {
            TtsError::invalid_input(format!("no file name in {}", input.display()))
        })?;
        let mut name = stem.to_os_string();
        name.push(".");
        name.push(self.paths.output_extension.trim_start_matches('.'));
        Ok(self.paths.output_dir.join(name))
    }

    /// Convert the document named `filename` in the input directory.
    pub fn run(&mut self, filename: &str) -> Result<RunReport, PipelineFailure> {
        self.bootstrap_dirs().map_err(|e| self.setup_failure(e))?;
        let paths = self.resolve(filename).map_err(|e| self.setup_failure(e))?;
        self.convert(&paths.input, &paths.output)
    }

    /// Convert `input` to speech at `output`.
    #[instrument(skip_all, fields(input = %input.display()))]
    pub fn convert(&mut self, input: &Path, output: &Path) -> Result<RunReport, PipelineFailure> {
        let start = Instant::now();
        self.state = RunState::Idle;

        self.transition(RunState::ExtractingText);
        info!("Extracting text");
        let body = match self.extractor.extract(input) {
            Ok(body) => body,
            Err(e) => return Err(self.fail(RunState::ExtractionFailed, Stage::Extraction, e)),
        };
        self.transition(RunState::TextReady);

        let chars = body.char_count();
        let preview = preview(body.as_str(), self.preview_chars);
        info!(chars, preview = %preview, "Extracted text");

        self.transition(RunState::Synthesizing);
        let synthesis = match self.synthesizer.synthesize(body.as_str(), output) {
            Ok(report) => report,
            Err(e) => return Err(self.fail(RunState::SynthesisFailed, Stage::Synthesis, e)),
        };
        self.transition(RunState::Done);

        let elapsed_ms = start.elapsed().as_millis() as u64;
        info!(output = %output.display(), elapsed_ms, "Conversion complete");

        Ok(RunReport {
            input_path: input.to_path_buf(),
            output_path: synthesis.output_path.clone(),
            total_pages: body.total_pages,
            pages_used: body.pages_used,
            failures: body.failures,
            chars,
            preview,
            synthesis,
            elapsed_ms,
        })
    }

    fn transition(&mut self, next: RunState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "invalid transition {:?} -> {next:?}",
            self.state
        );
        self.state = next;
    }

    fn fail(&mut self, state: RunState, stage: Stage, error: TtsError) -> PipelineFailure {
        self.transition(state);
        error!(stage = %stage, kind = %error.kind(), error = %error, "Conversion failed");
        PipelineFailure::new(stage, error)
    }

    fn setup_failure(&self, error: TtsError) -> PipelineFailure {
        error!(kind = %error.kind(), error = %error, "Setup failed");
        PipelineFailure::new(Stage::Setup, error)
    }
}
