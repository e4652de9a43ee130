//! Convert command implementation.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use tracing::info;

use runtime::{PipelineOrchestrator, RunReport};
use tts_core::{AppConfig, DeviceType, EngineConfig};

/// Flags overriding the `[paths]`, `[synthesis]` and `[preview]` config.
#[derive(Debug, Default, Args)]
pub struct ConvertOverrides {
    /// Directory documents are read from
    #[arg(long)]
    pub input_dir: Option<PathBuf>,

    /// Directory audio files are written to
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Compute device for the engine (cpu, cuda, metal)
    #[arg(long)]
    pub device: Option<String>,

    /// Reference voice sample used to condition synthesis
    #[arg(long)]
    pub voice_prompt: Option<PathBuf>,

    /// Synthesis engine backend
    #[arg(long)]
    pub engine: Option<EngineArg>,

    /// Characters of extracted text shown before synthesis
    #[arg(long)]
    pub preview_chars: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EngineArg {
    /// Built-in tone generator
    Mock,
    /// External synthesis program
    Command,
}

impl ConvertOverrides {
    /// Apply the given flags to `config` and re-validate it.
    pub fn apply(&self, config: &mut AppConfig) -> Result<()> {
        if let Some(dir) = &self.input_dir {
            config.paths.input_dir = dir.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.paths.output_dir = dir.clone();
        }
        if let Some(device) = &self.device {
            config.synthesis.device = device.parse::<DeviceType>()?;
        }
        if let Some(voice) = &self.voice_prompt {
            config.synthesis.voice_prompt = Some(voice.clone());
        }
        let configured_mock = matches!(config.synthesis.engine, EngineConfig::Mock { .. });
        match self.engine {
            Some(EngineArg::Mock) if !configured_mock => {
                config.synthesis.engine = EngineConfig::mock();
            }
            Some(EngineArg::Command) if configured_mock => {
                config.synthesis.engine = EngineConfig::default();
            }
            _ => {}
        }
        if let Some(max_chars) = self.preview_chars {
            config.preview.max_chars = max_chars;
        }

        config.validate()?;
        Ok(())
    }
}

/// Run the convert command.
///
/// Documents are converted in order with one engine; the first failure
/// stops the command. Without filenames, one is read from stdin and an empty
/// answer does nothing.
pub fn run(config: &AppConfig, filenames: Vec<String>) -> Result<()> {
    let mut orchestrator = PipelineOrchestrator::from_config(config);
    orchestrator
        .bootstrap_dirs()
        .context("failed to create working directories")?;

    let filenames = if filenames.is_empty() {
        let stdin = io::stdin();
        match prompt_filename(&mut stdin.lock(), &mut io::stdout(), &config.paths.input_dir)? {
            Some(name) => vec![name],
            None => {
                println!("No filename given, nothing to do.");
                return Ok(());
            }
        }
    } else {
        filenames
    };

    info!(
        documents = filenames.len(),
        backend = orchestrator.synthesizer().backend(),
        device = %orchestrator.synthesizer().device(),
        "Starting conversion"
    );

    let mut stdout = io::stdout().lock();
    for name in &filenames {
        let report = orchestrator
            .run(name)
            .with_context(|| format!("failed to convert {name}"))?;
        write_report(&mut stdout, &report)?;
    }

    if filenames.len() > 1 {
        writeln!(stdout, "Converted {} documents.", filenames.len())?;
    }
    Ok(())
}

/// Ask for a document name. Returns `None` for an empty answer or end of input.
pub fn prompt_filename<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    input_dir: &Path,
) -> io::Result<Option<String>> {
    write!(
        output,
        "Enter the name of the document in {}: ",
        input_dir.display()
    )?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let name = line.trim();
    Ok((!name.is_empty()).then(|| name.to_string()))
}

/// Print the preview and summary of a finished run.
pub fn write_report<W: Write>(out: &mut W, report: &RunReport) -> io::Result<()> {
    writeln!(out, "Text preview:")?;
    writeln!(out, "{}", report.preview)?;
    writeln!(out)?;
    writeln!(
        out,
        "Pages: {} of {} used, {} characters",
        report.pages_used, report.total_pages, report.chars
    )?;
    for failure in &report.failures {
        writeln!(out, "  skipped page {}: {}", failure.page, failure.reason)?;
    }
    writeln!(
        out,
        "Audio: {:.1} s at {} Hz, synthesized in {} ms",
        report.synthesis.duration_ms / 1000.0,
        report.synthesis.sample_rate,
        report.synthesis.synth_ms
    )?;
    writeln!(
        out,
        "Success! Audio saved to {}",
        report.output_path.display()
    )?;
    Ok(())
}
