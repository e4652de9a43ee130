//! WAV file I/O utilities.

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::io::{self, BufWriter};
use std::path::Path;
use tracing::debug;
use tts_core::{TtsError, TtsResult, Waveform};

fn hound_error(e: hound::Error) -> TtsError {
    match e {
        hound::Error::IoError(io) => TtsError::Io(io),
        other => TtsError::Io(io::Error::other(other.to_string())),
    }
}

/// Convert a float sample to 16-bit PCM, clamping out-of-range values.
pub fn to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
}

/// Write a waveform to a 16-bit mono WAV file, replacing any existing file.
///
/// The parent directory must exist. The file appears at `path` only once it
/// has been completely written.
pub fn write_wav(path: impl AsRef<Path>, waveform: &Waveform) -> TtsResult<()> {
    let path = path.as_ref();
    if waveform.sample_rate == 0 {
        return Err(TtsError::invalid_input("waveform sample rate must be positive"));
    }

    let spec = WavSpec {
        channels: 1,
        sample_rate: waveform.sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::Builder::new()
        .prefix(".pdf2speech-")
        .suffix(".wav.part")
        .tempfile_in(dir)?;

    {
        let mut writer =
            WavWriter::new(BufWriter::new(tmp.as_file_mut()), spec).map_err(hound_error)?;
        for &sample in waveform.pcm.iter() {
            writer.write_sample(to_i16(sample)).map_err(hound_error)?;
        }
        writer.finalize().map_err(hound_error)?;
    }

    tmp.persist(path).map_err(|e| TtsError::Io(e.error))?;

    debug!(
        path = %path.display(),
        samples = waveform.num_samples(),
        sample_rate = waveform.sample_rate,
        "WAV written"
    );
    Ok(())
}

/// Read a WAV file into a mono waveform, averaging channels.
pub fn read_wav(path: impl AsRef<Path>) -> TtsResult<Waveform> {
    let mut reader = WavReader::open(path.as_ref()).map_err(hound_error)?;
    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()
            .map_err(hound_error)?,
        SampleFormat::Int => {
            let scale = 1.0 / (1i64 << (spec.bits_per_sample.clamp(1, 32) - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 * scale))
                .collect::<Result<_, _>>()
                .map_err(hound_error)?
        }
    };

    let channels = usize::from(spec.channels.max(1));
    let pcm = if channels == 1 {
        samples
    } else {
        samples
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
            .collect()
    };

    Ok(Waveform::new(pcm, spec.sample_rate))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(len: usize, sample_rate: u32) -> Waveform {
        let pcm = (0..len).map(|i| i as f32 / len as f32 - 0.5).collect();
        Waveform::new(pcm, sample_rate)
    }

    #[test]
    fn test_to_i16_clamps() {
        assert_eq!(to_i16(0.0), 0);
        assert_eq!(to_i16(1.0), i16::MAX);
        assert_eq!(to_i16(4.0), i16::MAX);
        assert_eq!(to_i16(-4.0), -i16::MAX);
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("speech.wav");
        let wave = ramp(2400, 24000);

        write_wav(&path, &wave).unwrap();
        let read = read_wav(&path).unwrap();

        assert_eq!(read.sample_rate, 24000);
        assert_eq!(read.num_samples(), 2400);
        for (a, b) in wave.pcm.iter().zip(read.pcm.iter()) {
            assert!((a - b).abs() < 1e-3, "{a} vs {b}");
        }
    }

    #[test]
    fn test_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("speech.wav");
        std::fs::write(&path, b"stale").unwrap();

        write_wav(&path, &ramp(100, 16000)).unwrap();
        assert_eq!(read_wav(&path).unwrap().num_samples(), 100);
    }

    #[test]
    fn test_no_leftovers_in_directory() {
        let dir = tempfile::tempdir().unwrap();
        write_wav(dir.path().join("a.wav"), &ramp(10, 8000)).unwrap();

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.wav".to_string()]);
    }

    #[test]
    fn test_missing_directory_fails_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("a.wav");
        assert!(write_wav(&path, &ramp(10, 8000)).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_zero_sample_rate_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = write_wav(dir.path().join("a.wav"), &Waveform::new(vec![0.0], 0)).unwrap_err();
        assert!(matches!(err, TtsError::InvalidInput(_)));
    }

    #[test]
    fn test_read_stereo_downmixes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        let spec = WavSpec {
            channels: 2,
            sample_rate: 22050,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        for _ in 0..4 {
            writer.write_sample(i16::MAX).unwrap();
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();

        let wave = read_wav(&path).unwrap();
        assert_eq!(wave.num_samples(), 4);
        assert_eq!(wave.sample_rate, 22050);
        assert!((wave.pcm[0] - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_wav("/no/such/file.wav").unwrap_err();
        assert!(matches!(err, TtsError::Io(_)));
    }
}
