//! Synthesis engine backends.
//!
//! - `mock`: deterministic tone generator, needs nothing installed
//! - `command`: external synthesis program (espeak-ng, piper, ...) that reads
//!   text on stdin and writes a WAV file

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Instant;

use tracing::{debug, info, warn};

use audio_io::read_wav;
use tts_core::{
    DeviceType, EngineConfig, EngineLoader, SynthesisEngine, TtsError, TtsResult, Waveform,
};

/// Text spoken once at load time to check the command backend and learn its
/// sample rate.
const WARMUP_TEXT: &str = "Ready.";

/// Build the loader for a configured backend.
pub fn loader_from_config(config: &EngineConfig) -> Box<dyn EngineLoader> {
    match config {
        EngineConfig::Mock { sample_rate } => Box::new(MockLoader::new(*sample_rate)),
        EngineConfig::Command {
            program,
            args,
            voice_args,
        } => Box::new(CommandLoader::new(
            program.clone(),
            args.clone(),
            voice_args.clone(),
        )),
    }
}

/// Loads [`MockEngine`]s.
#[derive(Debug, Clone)]
pub struct MockLoader {
    sample_rate: u32,
}

impl MockLoader {
    /// Create a loader producing engines at `sample_rate`.
    pub fn new(sample_rate: u32) -> Self {
        Self { sample_rate }
    }
}

impl Default for MockLoader {
    fn default() -> Self {
        Self::new(24000)
    }
}

impl EngineLoader for MockLoader {
    fn name(&self) -> &str {
        "mock"
    }

    fn load(&self, device: DeviceType) -> TtsResult<Box<dyn SynthesisEngine>> {
        if self.sample_rate == 0 {
            return Err(TtsError::model_load(device, "sample rate must be positive"));
        }
        Ok(Box::new(MockEngine::new(self.sample_rate, device)))
    }
}

/// Tone generator: 20 ms of sine per letter or digit, silence for the rest.
///
/// A voice prompt shifts the base pitch. The prompt must be an existing file.
#[derive(Debug, Clone)]
pub struct MockEngine {
    sample_rate: u32,
    device: DeviceType,
}

impl MockEngine {
    /// Create a mock engine.
    pub fn new(sample_rate: u32, device: DeviceType) -> Self {
        Self {
            sample_rate,
            device,
        }
    }

    /// Device this engine was "placed" on.
    pub fn device(&self) -> DeviceType {
        self.device
    }
}

impl SynthesisEngine for MockEngine {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn generate(&self, text: &str, voice_prompt: Option<&Path>) -> TtsResult<Waveform> {
        if let Some(voice) = voice_prompt {
            if !voice.is_file() {
                return Err(TtsError::synthesis(format!(
                    "voice prompt not found: {}",
                    voice.display()
                )));
            }
        }

        let base_hz = if voice_prompt.is_some() { 165.0 } else { 220.0 };
        let per_char = (self.sample_rate / 50).max(1) as usize;
        let sr = self.sample_rate as f32;
        let mut pcm = Vec::with_capacity(text.chars().count() * per_char);

        for c in text.chars() {
            if !c.is_alphanumeric() {
                pcm.resize(pcm.len() + per_char, 0.0);
                continue;
            }
            let freq = base_hz + (u32::from(c) % 32) as f32 * 12.0;
            pcm.extend((0..per_char).map(|i| {
                let t = i as f32 / sr;
                0.3 * (2.0 * std::f32::consts::PI * freq * t).sin()
            }));
        }

        Ok(Waveform::new(pcm, self.sample_rate))
    }
}

/// Loads [`CommandEngine`]s.
#[derive(Debug, Clone)]
pub struct CommandLoader {
    program: String,
    args: Vec<String>,
    voice_args: Vec<String>,
}

impl CommandLoader {
    /// Create a loader for an external synthesis program.
    pub fn new(program: String, args: Vec<String>, voice_args: Vec<String>) -> Self {
        Self {
            program,
            args,
            voice_args,
        }
    }
}

impl EngineLoader for CommandLoader {
    fn name(&self) -> &str {
        "command"
    }

    fn load(&self, device: DeviceType) -> TtsResult<Box<dyn SynthesisEngine>> {
        let program = resolve_program(&self.program).ok_or_else(|| {
            TtsError::model_load(
                device,
                format!("synthesis program '{}' not found on PATH", self.program),
            )
        })?;

        let mut engine = CommandEngine {
            program,
            args: self.args.clone(),
            voice_args: self.voice_args.clone(),
            device,
            sample_rate: 0,
        };

        let start = Instant::now();
        let warmup = engine
            .run(WARMUP_TEXT, None)
            .map_err(|e| TtsError::model_load(device, format!("warm-up synthesis failed: {e}")))?;
        engine.sample_rate = warmup.sample_rate;

        info!(
            program = %engine.program.display(),
            sample_rate = engine.sample_rate,
            warmup_ms = start.elapsed().as_millis() as u64,
            "Synthesis program ready"
        );
        Ok(Box::new(engine))
    }
}

/// External synthesis program.
#[derive(Debug, Clone)]
pub struct CommandEngine {
    program: PathBuf,
    args: Vec<String>,
    voice_args: Vec<String>,
    device: DeviceType,
    sample_rate: u32,
}

impl CommandEngine {
    fn run(&self, text: &str, voice_prompt: Option<&Path>) -> TtsResult<Waveform> {
        let workdir = tempfile::tempdir()?;
        let output = workdir.path().join("speech.wav");

        let mut cmd = Command::new(&self.program);
        for arg in &self.args {
            cmd.arg(substitute(arg, &output, self.device, None));
        }
        if let Some(voice) = voice_prompt {
            for arg in &self.voice_args {
                cmd.arg(substitute(arg, &output, self.device, Some(voice)));
            }
        }
        cmd.stdin(Stdio::piped());
        cmd.stdout(Stdio::null());
        cmd.stderr(Stdio::piped());

        debug!(command = ?cmd, "Running synthesis program");
        let mut child = cmd.spawn().map_err(|e| {
            TtsError::synthesis(format!("failed to start {}: {e}", self.program.display()))
        })?;
        // Feed stdin from its own thread so stderr is drained concurrently and
        // a program that exits early still reports its own error.
        let stdin = child.stdin.take();
        let (written, finished) = std::thread::scope(|scope| {
            let writer = scope.spawn(move || match stdin {
                Some(mut stdin) => stdin.write_all(text.as_bytes()),
                None => Ok(()),
            });
            let finished = child.wait_with_output();
            (writer.join(), finished)
        });
        let result = finished.map_err(|e| {
            TtsError::synthesis(format!("failed to wait for {}: {e}", self.program.display()))
        })?;

        if !result.status.success() {
            return Err(TtsError::synthesis(format!(
                "{} exited with {}: {}",
                self.program.display(),
                result.status,
                String::from_utf8_lossy(&result.stderr).trim()
            )));
        }
        match written {
            Ok(Ok(())) => {}
            Ok(Err(e)) if e.kind() == io::ErrorKind::BrokenPipe => {
                warn!("Synthesis program exited before reading all text");
            }
            Ok(Err(e)) => {
                return Err(TtsError::synthesis(format!("failed to send text: {e}")));
            }
            Err(_) => return Err(TtsError::internal("stdin writer thread panicked")),
        }
        if !output.is_file() {
            return Err(TtsError::synthesis(format!(
                "{} produced no audio file",
                self.program.display()
            )));
        }

        read_wav(&output).map_err(|e| TtsError::synthesis(format!("unreadable program output: {e}")))
    }
}

impl SynthesisEngine for CommandEngine {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn generate(&self, text: &str, voice_prompt: Option<&Path>) -> TtsResult<Waveform> {
        if voice_prompt.is_some() && self.voice_args.is_empty() {
            warn!("Voice prompt set but no voice_args configured; program uses its default voice");
        }

        let waveform = self.run(text, voice_prompt)?;
        if waveform.sample_rate != self.sample_rate {
            warn!(
                expected = self.sample_rate,
                actual = waveform.sample_rate,
                "Program output sample rate changed since load"
            );
        }
        Ok(waveform)
    }
}

fn substitute(arg: &str, output: &Path, device: DeviceType, voice: Option<&Path>) -> String {
    let mut arg = arg
        .replace("{output}", &output.to_string_lossy())
        .replace("{device}", &device.to_string());
    if let Some(voice) = voice {
        arg = arg.replace("{voice}", &voice.to_string_lossy());
    }
    arg
}

/// Find `program` as given (when it contains a path separator) or on `PATH`.
fn resolve_program(program: &str) -> Option<PathBuf> {
    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return candidate.is_file().then(|| candidate.to_path_buf());
    }

    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths).find_map(|dir| {
        [
            dir.join(program),
            dir.join(format!("{program}{}", std::env::consts::EXE_SUFFIX)),
        ]
        .into_iter()
        .find(|p| p.is_file())
    })
}
