//! pdf2speech command-line interface.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{error, info};

use runtime::logging::{LogFormat, init_logging};
use tts_core::AppConfig;

mod commands;
mod exit;

/// Convert PDF documents to synthesized speech
#[derive(Debug, Parser)]
#[command(name = "pdf2speech")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log level (overrides the config file)
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Log format (overrides the config file)
    #[arg(long, global = true)]
    log_format: Option<LogFormatArg>,

    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormatArg {
    Json,
    Text,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Convert documents from the input directory to audio files
    Convert {
        /// Document names, with or without extension (prompted for when omitted)
        filenames: Vec<String>,

        #[command(flatten)]
        overrides: commands::convert::ConvertOverrides,
    },

    /// Extract and print the normalized text of a document
    Extract {
        /// Document name, with or without extension
        filename: String,

        /// Directory the document is read from
        #[arg(long)]
        input_dir: Option<PathBuf>,
    },

    /// Normalize text without synthesis (dry run)
    Normalize {
        /// Input text
        input: String,
    },

    /// Show version and configuration info
    Info,
}

fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    match path {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => Ok(AppConfig::default()),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return exit::exit_code(&e);
        }
    };

    let level = cli.log_level.unwrap_or_else(|| config.logging.level.clone());
    let format = match cli.log_format {
        Some(LogFormatArg::Json) => LogFormat::Json,
        Some(LogFormatArg::Text) => LogFormat::Text,
        None => match config.logging.format.parse() {
            Ok(format) => format,
            Err(e) => {
                eprintln!("Error: {e}");
                return ExitCode::from(exit::CONFIG);
            }
        },
    };
    init_logging(&level, format);

    info!(version = env!("CARGO_PKG_VERSION"), "Starting pdf2speech");

    let result = match cli.command {
        Commands::Convert {
            filenames,
            overrides,
        } => overrides
            .apply(&mut config)
            .and_then(|()| commands::convert::run(&config, filenames)),
        Commands::Extract {
            filename,
            input_dir,
        } => {
            if let Some(dir) = input_dir {
                config.paths.input_dir = dir;
            }
            commands::extract::run(&config, &filename)
        }
        Commands::Normalize { input } => {
            commands::normalize::run(&input);
            Ok(())
        }
        Commands::Info => {
            commands::info::run(&config);
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Command failed: {e:#}");
            eprintln!("Error: {e:#}");
            exit::exit_code(&e)
        }
    }
}
