//! Configuration structures for pdf2speech.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{TtsError, TtsResult};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory and file naming conventions.
    #[serde(default)]
    pub paths: PathsConfig,

    /// Synthesis engine settings.
    #[serde(default)]
    pub synthesis: SynthesisConfig,

    /// Extracted-text preview settings.
    #[serde(default)]
    pub preview: PreviewConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> TtsResult<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| TtsError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> TtsResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            TtsError::config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Check invariants that serde defaults cannot express.
    pub fn validate(&self) -> TtsResult<()> {
        for (name, ext) in [
            ("paths.input_extension", &self.paths.input_extension),
            ("paths.output_extension", &self.paths.output_extension),
        ] {
            if ext.trim_start_matches('.').is_empty() {
                return Err(TtsError::config(format!("{name} must not be empty")));
            }
        }
        if let EngineConfig::Command { program, .. } = &self.synthesis.engine {
            if program.trim().is_empty() {
                return Err(TtsError::config("synthesis.engine.program must not be empty"));
            }
        }
        if let EngineConfig::Mock { sample_rate } = &self.synthesis.engine {
            if *sample_rate == 0 {
                return Err(TtsError::config("synthesis.engine.sample_rate must be positive"));
            }
        }
        Ok(())
    }
}

/// Directory and extension conventions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Where input documents are read from.
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,
    /// Where audio files are written.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Extension appended to filenames that lack it.
    #[serde(default = "default_input_extension")]
    pub input_extension: String,
    /// Extension of produced audio files.
    #[serde(default = "default_output_extension")]
    pub output_extension: String,
}

fn default_input_dir() -> PathBuf {
    PathBuf::from("documents")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("audio_output")
}

fn default_input_extension() -> String {
    "pdf".to_string()
}

fn default_output_extension() -> String {
    "wav".to_string()
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            output_dir: default_output_dir(),
            input_extension: default_input_extension(),
            output_extension: default_output_extension(),
        }
    }
}

/// Synthesis settings, fixed for the lifetime of a converter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SynthesisConfig {
    /// Compute device the engine is placed on. Not validated here.
    #[serde(default)]
    pub device: DeviceType,
    /// Reference voice sample used to condition synthesis.
    #[serde(default)]
    pub voice_prompt: Option<PathBuf>,
    /// Engine backend.
    #[serde(default)]
    pub engine: EngineConfig,
}

/// Device type for computation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    /// CPU computation.
    #[default]
    Cpu,
    /// CUDA GPU computation.
    Cuda,
    /// Metal GPU computation (Apple).
    Metal,
}

impl std::fmt::Display for DeviceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cpu => write!(f, "cpu"),
            Self::Cuda => write!(f, "cuda"),
            Self::Metal => write!(f, "metal"),
        }
    }
}

impl std::str::FromStr for DeviceType {
    type Err = TtsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cpu" => Ok(Self::Cpu),
            "cuda" | "gpu" | "nvidia" => Ok(Self::Cuda),
            "metal" | "mps" | "apple" => Ok(Self::Metal),
            _ => Err(TtsError::config(format!(
                "unknown device: {s}, expected: cpu, cuda, or metal"
            ))),
        }
    }
}

/// Synthesis engine backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum EngineConfig {
    /// Deterministic tone generator, no external dependencies.
    Mock {
        #[serde(default = "default_mock_sample_rate")]
        sample_rate: u32,
    },
    /// External synthesis program reading text on stdin and writing a WAV file.
    Command {
        /// Program name (looked up on `PATH`) or path.
        #[serde(default = "default_command_program")]
        program: String,
        /// Arguments; `{output}` and `{device}` are substituted.
        #[serde(default = "default_command_args")]
        args: Vec<String>,
        /// Extra arguments appended only when a voice prompt is set; `{voice}`
        /// is substituted.
        #[serde(default)]
        voice_args: Vec<String>,
    },
}

fn default_mock_sample_rate() -> u32 {
    24000
}

fn default_command_program() -> String {
    "espeak-ng".to_string()
}

fn default_command_args() -> Vec<String> {
    vec!["--stdin".to_string(), "-w".to_string(), "{output}".to_string()]
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::Command {
            program: default_command_program(),
            args: default_command_args(),
            voice_args: Vec::new(),
        }
    }
}

impl EngineConfig {
    /// Mock backend at the default sample rate.
    pub fn mock() -> Self {
        Self::Mock {
            sample_rate: default_mock_sample_rate(),
        }
    }

    /// Backend name, as written in configuration.
    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Mock { .. } => "mock",
            Self::Command { .. } => "command",
        }
    }
}

/// Extracted-text preview configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewConfig {
    /// Maximum characters shown before the text is elided.
    #[serde(default = "default_preview_chars")]
    pub max_chars: usize,
}

fn default_preview_chars() -> usize {
    1000
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            max_chars: default_preview_chars(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Output format (json or text).
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}
