//! WAV probe adapter
//!
//! Measures narration length from the RIFF/WAVE header with `hound`.
//! Duration is frames / sample rate with no rounding.

use std::io::{Cursor, ErrorKind, Read};
use std::path::Path;

use async_trait::async_trait;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// WAV-based audio probe
#[derive(Debug, Default, Clone)]
pub struct WavProbeAdapter;

/// Header facts read from a WAV stream
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WavSummary {
    pub sample_rate: u32,
    pub channels: u16,
    pub frames: u64,
    pub duration: TimeSpec,
}

impl WavProbeAdapter {
    /// Create new WAV probe adapter
    pub fn new() -> Self {
        Self
    }

    /// Inspect any WAV byte stream
    pub fn summarize<R: Read>(reader: R) -> Result<WavSummary, DomainError> {
        let wav = hound::WavReader::new(reader).map_err(Self::map_error)?;
        let spec = wav.spec();
        // hound reports the length in frames (samples per channel)
        let frames = u64::from(wav.duration());
        let duration = TimeSpec::from_frames(frames, spec.sample_rate)?;

        Ok(WavSummary {
            sample_rate: spec.sample_rate,
            channels: spec.channels,
            frames,
            duration,
        })
    }

    /// Inspect an in-memory WAV buffer
    pub fn summarize_bytes(bytes: &[u8]) -> Result<WavSummary, DomainError> {
        Self::summarize(Cursor::new(bytes))
    }

    fn map_error(e: hound::Error) -> DomainError {
        match e {
            hound::Error::IoError(io) if io.kind() == ErrorKind::NotFound => {
                DomainError::FileNotFound(io.to_string())
            }
            hound::Error::IoError(io) => {
                DomainError::InvalidMediaFormat(format!("Unreadable WAV data: {}", io))
            }
            other => DomainError::InvalidMediaFormat(other.to_string()),
        }
    }
}

#[async_trait]
impl AudioProbePort for WavProbeAdapter {
    async fn probe(&self, audio_file: &Path) -> Result<AudioTrack, DomainError> {
        let path = audio_file.to_path_buf();
        let summary = tokio::task::spawn_blocking({
            let path = path.clone();
            move || {
                let file = std::fs::File::open(&path).map_err(|e| match e.kind() {
                    ErrorKind::NotFound => DomainError::FileNotFound(path.display().to_string()),
                    _ => DomainError::FsFail(format!("Failed to open {}: {}", path.display(), e)),
                })?;
                Self::summarize(std::io::BufReader::new(file))
            }
        })
        .await
        .map_err(|e| DomainError::InternalError(format!("Probe task failed: {}", e)))??;

        tracing::debug!(
            "Probed {}: {} frames at {} Hz, {} channel(s)",
            path.display(),
            summary.frames,
            summary.sample_rate,
            summary.channels
        );

        Ok(AudioTrack {
            path,
            duration: summary.duration,
            sample_rate: summary.sample_rate,
            channels: summary.channels,
            frames: summary.frames,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_wav(path: &Path, sample_rate: u32, channels: u16, frames: u32) {
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for i in 0..frames * channels as u32 {
            writer.write_sample((i % 128) as i16).unwrap();
        }
        writer.finalize().unwrap();
    }

    fn wav_bytes(sample_rate: u32, frames: u32) -> Vec<u8> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
            for _ in 0..frames {
                writer.write_sample(0i16).unwrap();
            }
            writer.finalize().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn test_duration_is_frames_over_rate() {
        let summary = WavProbeAdapter::summarize_bytes(&wav_bytes(16_000, 160_000)).unwrap();
        assert_eq!(summary.frames, 160_000);
        assert_eq!(summary.duration.as_seconds(), 10.0);

        let odd = WavProbeAdapter::summarize_bytes(&wav_bytes(24_000, 1_001)).unwrap();
        assert_eq!(odd.duration.as_seconds(), 1_001.0 / 24_000.0);
    }

    #[test]
    fn test_garbage_is_invalid_media_format() {
        let err = WavProbeAdapter::summarize_bytes(b"definitely not a riff header").unwrap_err();
        assert!(matches!(err, DomainError::InvalidMediaFormat(_)));
    }

    #[tokio::test]
    async fn test_probe_stereo_file_counts_frames() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("voiceover.wav");
        write_wav(&path, 24_000, 2, 48_000);

        let track = WavProbeAdapter::new().probe(&path).await.unwrap();
        assert_eq!(track.channels, 2);
        assert_eq!(track.frames, 48_000);
        assert_eq!(track.duration.as_seconds(), 2.0);
        assert_eq!(track.path, path);
    }

    #[tokio::test]
    async fn test_probe_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = WavProbeAdapter::new()
            .probe(&dir.path().join("missing.wav"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::FileNotFound(_)));
    }

    #[tokio::test]
    async fn test_probe_text_file_is_invalid_format() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("voiceover.wav");
        std::fs::write(&path, "{\"error\":\"Model is loading\"}").unwrap();

        let err = WavProbeAdapter::new().probe(&path).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidMediaFormat(_)));
    }
}
