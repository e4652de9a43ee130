//! Speech synthesizer with a lazily loaded engine.
//!
//! Loading an engine is expensive, so it happens on the first synthesis and
//! the handle is reused for the lifetime of the synthesizer.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{info, instrument};

use audio_io::write_wav;
use tts_core::{
    DeviceType, EngineLoader, SynthesisConfig, SynthesisEngine, TtsError, TtsResult,
};

use crate::engine::loader_from_config;

/// Summary of one synthesis call.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisReport {
    /// Where the audio was written.
    pub output_path: PathBuf,
    /// Sample rate of the written audio.
    pub sample_rate: u32,
    /// Number of samples written.
    pub num_samples: usize,
    /// Audio duration in milliseconds.
    pub duration_ms: f32,
    /// Time spent generating audio, excluding engine load.
    pub synth_ms: u64,
}

/// Converts text to WAV files through a [`SynthesisEngine`].
pub struct SpeechSynthesizer {
    loader: Box<dyn EngineLoader>,
    device: DeviceType,
    voice_prompt: Option<PathBuf>,
    engine: Option<Box<dyn SynthesisEngine>>,
}

impl std::fmt::Debug for SpeechSynthesizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeechSynthesizer")
            .field("backend", &self.loader.name())
            .field("device", &self.device)
            .field("voice_prompt", &self.voice_prompt)
            .field("loaded", &self.engine.is_some())
            .finish()
    }
}

impl SpeechSynthesizer {
    /// Create a synthesizer. Nothing is loaded until first use.
    pub fn new(
        loader: Box<dyn EngineLoader>,
        device: DeviceType,
        voice_prompt: Option<PathBuf>,
    ) -> Self {
        Self {
            loader,
            device,
            voice_prompt,
            engine: None,
        }
    }

    /// Create a synthesizer from the `[synthesis]` config section.
    pub fn from_config(config: &SynthesisConfig) -> Self {
        Self::new(
            loader_from_config(&config.engine),
            config.device,
            config.voice_prompt.clone(),
        )
    }

    /// Device the engine is placed on.
    pub fn device(&self) -> DeviceType {
        self.device
    }

    /// Reference voice used for every synthesis, if any.
    pub fn voice_prompt(&self) -> Option<&Path> {
        self.voice_prompt.as_deref()
    }

    /// Name of the engine backend.
    pub fn backend(&self) -> &str {
        self.loader.name()
    }

    /// Whether the engine has been loaded.
    pub fn is_loaded(&self) -> bool {
        self.engine.is_some()
    }

    /// Load the engine unless already loaded, and return it.
    ///
    /// A failed load leaves the synthesizer unloaded; the next call retries.
    #[instrument(skip_all, fields(backend = self.loader.name(), device = %self.device))]
    pub fn ensure_engine_loaded(&mut self) -> TtsResult<&dyn SynthesisEngine> {
        if self.engine.is_none() {
            let device = self.device;
            info!("Loading synthesis engine");
            let start = Instant::now();

            let engine = self.loader.load(device).map_err(|e| match e {
                e @ TtsError::ModelLoad { .. } => e,
                other => TtsError::model_load(device, other.to_string()),
            })?;

            info!(
                load_ms = start.elapsed().as_millis() as u64,
                sample_rate = engine.sample_rate(),
                "Synthesis engine loaded"
            );
            self.engine = Some(engine);
        }

        self.engine
            .as_deref()
            .ok_or_else(|| TtsError::internal("engine missing after load"))
    }

    /// Synthesize `text` and write it as a WAV file at `output_path`.
    ///
    /// The parent directory is created when missing and an existing file is
    /// replaced.
    ///
    /// # Errors
    /// * `EmptyInput` - `text` is blank; the engine is not loaded
    /// * `ModelLoad` - the engine could not be loaded
    /// * `Synthesis` - generation or writing the file failed
    #[instrument(skip_all, fields(chars = text.chars().count(), output = %output_path.display()))]
    pub fn synthesize(&mut self, text: &str, output_path: &Path) -> TtsResult<SynthesisReport> {
        if text.trim().is_empty() {
            return Err(TtsError::EmptyInput);
        }

        let voice_prompt = self.voice_prompt.clone();
        let engine = self.ensure_engine_loaded()?;

        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                TtsError::synthesis(format!(
                    "cannot create output directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        info!(voice_prompt = ?voice_prompt, "Converting text to speech");
        let start = Instant::now();
        let waveform = engine
            .generate(text, voice_prompt.as_deref())
            .map_err(|e| match e {
                e @ TtsError::Synthesis(_) => e,
                other => TtsError::synthesis(other.to_string()),
            })?;
        let synth_ms = start.elapsed().as_millis() as u64;

        if waveform.is_empty() {
            return Err(TtsError::synthesis("engine produced no audio"));
        }

        write_wav(output_path, &waveform).map_err(|e| {
            TtsError::synthesis(format!("failed to save {}: {e}", output_path.display()))
        })?;

        let report = SynthesisReport {
            output_path: output_path.to_path_buf(),
            sample_rate: waveform.sample_rate,
            num_samples: waveform.num_samples(),
            duration_ms: waveform.duration_ms(),
            synth_ms,
        };
        info!(
            samples = report.num_samples,
            duration_ms = report.duration_ms,
            synth_ms = report.synth_ms,
            "Speech saved"
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MockLoader;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use tts_core::Waveform;

    /// Engine that records every voice prompt it is given.
    #[derive(Debug)]
    struct RecordingEngine {
        voices: Arc<Mutex<Vec<Option<PathBuf>>>>,
    }

    impl SynthesisEngine for RecordingEngine {
        fn sample_rate(&self) -> u32 {
            8000
        }

        fn generate(&self, text: &str, voice_prompt: Option<&Path>) -> TtsResult<Waveform> {
            self.voices
                .lock()
                .unwrap()
                .push(voice_prompt.map(Path::to_path_buf));
            if text.contains("FAIL") {
                return Err(TtsError::invalid_input("unsupported token"));
            }
            Ok(Waveform::new(vec![0.1; text.len()], 8000))
        }
    }

    #[derive(Clone, Default)]
    struct CountingLoader {
        loads: Arc<AtomicUsize>,
        voices: Arc<Mutex<Vec<Option<PathBuf>>>>,
        fail: bool,
    }

    impl EngineLoader for CountingLoader {
        fn name(&self) -> &str {
            "counting"
        }

        fn load(&self, device: DeviceType) -> TtsResult<Box<dyn SynthesisEngine>> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(TtsError::config(format!("no weights for {device}")));
            }
            Ok(Box::new(RecordingEngine {
                voices: Arc::clone(&self.voices),
            }))
        }
    }

    #[test]
    fn test_engine_loaded_once() {
        let dir = tempfile::tempdir().unwrap();
        let loader = CountingLoader::default();
        let loads = Arc::clone(&loader.loads);
        let mut synth = SpeechSynthesizer::new(Box::new(loader), DeviceType::Cpu, None);
        assert!(!synth.is_loaded());

        synth.synthesize("First.", &dir.path().join("a.wav")).unwrap();
        synth.synthesize("Second.", &dir.path().join("b.wav")).unwrap();

        assert!(synth.is_loaded());
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_blank_text_does_not_load() {
        let dir = tempfile::tempdir().unwrap();
        let loader = CountingLoader::default();
        let loads = Arc::clone(&loader.loads);
        let mut synth = SpeechSynthesizer::new(Box::new(loader), DeviceType::Cpu, None);

        let out = dir.path().join("blank.wav");
        let err = synth.synthesize(" \n\t ", &out).unwrap_err();

        assert!(matches!(err, TtsError::EmptyInput));
        assert_eq!(loads.load(Ordering::SeqCst), 0);
        assert!(!out.exists());
    }

    #[test]
    fn test_voice_prompt_passed_every_call() {
        let dir = tempfile::tempdir().unwrap();
        let voice = dir.path().join("narrator.wav");
        let loader = CountingLoader::default();
        let voices = Arc::clone(&loader.voices);
        let mut synth =
            SpeechSynthesizer::new(Box::new(loader), DeviceType::Cuda, Some(voice.clone()));
        assert_eq!(synth.voice_prompt(), Some(voice.as_path()));

        synth.synthesize("One.", &dir.path().join("1.wav")).unwrap();
        synth.synthesize("Two.", &dir.path().join("2.wav")).unwrap();

        let recorded = voices.lock().unwrap().clone();
        assert_eq!(recorded, vec![Some(voice.clone()), Some(voice)]);
    }

    #[test]
    fn test_load_failure_is_model_load_and_retried() {
        let dir = tempfile::tempdir().unwrap();
        let loader = CountingLoader {
            fail: true,
            ..Default::default()
        };
        let loads = Arc::clone(&loader.loads);
        let mut synth = SpeechSynthesizer::new(Box::new(loader), DeviceType::Metal, None);

        for _ in 0..2 {
            let err = synth.synthesize("Hello.", &dir.path().join("x.wav")).unwrap_err();
            assert!(matches!(
                err,
                TtsError::ModelLoad {
                    device: DeviceType::Metal,
                    ..
                }
            ));
        }
        assert!(!synth.is_loaded());
        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_engine_error_becomes_synthesis_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut synth =
            SpeechSynthesizer::new(Box::new(CountingLoader::default()), DeviceType::Cpu, None);

        let out = dir.path().join("fail.wav");
        let err = synth.synthesize("please FAIL here", &out).unwrap_err();
        assert!(matches!(err, TtsError::Synthesis(_)));
        assert!(!out.exists());
    }

    #[test]
    fn test_creates_output_directory_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("deeper").join("speech.wav");
        let mut synth =
            SpeechSynthesizer::new(Box::new(MockLoader::default()), DeviceType::Cpu, None);

        let first = synth.synthesize("Hello world.", &out).unwrap();
        assert!(out.is_file());
        assert_eq!(first.sample_rate, 24000);

        let second = synth.synthesize("Hi.", &out).unwrap();
        assert!(second.num_samples < first.num_samples);
        assert_eq!(
            audio_io::read_wav(&out).unwrap().num_samples(),
            second.num_samples
        );
    }

    #[test]
    fn test_missing_voice_prompt_fails_synthesis() {
        let dir = tempfile::tempdir().unwrap();
        let mut synth = SpeechSynthesizer::new(
            Box::new(MockLoader::default()),
            DeviceType::Cpu,
            Some(dir.path().join("absent.wav")),
        );
        let err = synth.synthesize("Hello.", &dir.path().join("o.wav")).unwrap_err();
        assert!(matches!(err, TtsError::Synthesis(_)));
    }
}
