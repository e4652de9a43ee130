//! Info command implementation.

use tts_core::{AppConfig, EngineConfig};

/// Run the info command.
pub fn run(config: &AppConfig) {
    println!("pdf2speech");
    println!("==========");
    println!();
    println!("Version: {}", env!("CARGO_PKG_VERSION"));
    println!("  Rust version: {}", env!("CARGO_PKG_RUST_VERSION"));
    println!();
    println!("Paths:");
    println!(
        "  input:  {} (*.{})",
        config.paths.input_dir.display(),
        config.paths.input_extension
    );
    println!(
        "  output: {} (*.{})",
        config.paths.output_dir.display(),
        config.paths.output_extension
    );
    println!();
    println!("Synthesis:");
    println!("  device: {}", config.synthesis.device);
    match &config.synthesis.voice_prompt {
        Some(voice) => println!("  voice prompt: {}", voice.display()),
        None => println!("  voice prompt: none (default voice)"),
    }
    match &config.synthesis.engine {
        EngineConfig::Mock { sample_rate } => {
            println!("  engine: mock ({sample_rate} Hz tone generator)");
        }
        EngineConfig::Command {
            program,
            args,
            voice_args,
        } => {
            println!("  engine: command");
            println!("    program: {program}");
            println!("    args: {}", args.join(" "));
            if !voice_args.is_empty() {
                println!("    voice args: {}", voice_args.join(" "));
            }
        }
    }
    println!();
    println!("Preview: first {} characters", config.preview.max_chars);
    println!("Logging: {} ({})", config.logging.level, config.logging.format);
    println!();
    println!("Crates:");
    println!("  tts-core: Core types, traits and configuration");
    println!("  text-normalizer: Text cleanup for speech");
    println!("  doc-extractor: Page-by-page PDF text extraction");
    println!("  audio-io: WAV reading and writing");
    println!("  runtime: Engines, synthesizer and pipeline");
    println!("  pdf2speech-cli: This CLI tool");
}
