// Domain models - Core types and data structures

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;
use crate::utils::time::TimestampFormatter;

#[cfg(test)]
mod tests;

/// Time specification with precision - represents time in seconds with fractional precision
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct TimeSpec {
    pub seconds: f64,
}

impl TimeSpec {
    /// Create a new TimeSpec from seconds
    pub fn from_seconds(seconds: f64) -> Self {
        Self { seconds }
    }

    /// Exact frames / rate, no rounding
    pub fn from_frames(frames: u64, sample_rate: u32) -> Result<Self, DomainError> {
        if sample_rate == 0 {
            return Err(DomainError::InvalidMediaFormat(
                "Sample rate cannot be zero".to_string(),
            ));
        }
        Ok(Self {
            seconds: frames as f64 / sample_rate as f64,
        })
    }

    pub fn as_seconds(&self) -> f64 {
        self.seconds
    }
}

impl fmt::Display for TimeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", TimestampFormatter::format(self.seconds))
    }
}

/// Narration text for one run
#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    text: String,
}

impl Script {
    /// Create a script, rejecting blank text
    pub fn new(text: impl Into<String>) -> Result<Self, DomainError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(DomainError::EmptyInput(
                "Script text cannot be empty".to_string(),
            ));
        }
        Ok(Self { text })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// Where the narration comes from
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptSource {
    /// Ask the text-generation backend to write it
    Prompt(String),
    /// Use the given text verbatim
    Text(String),
}

/// Decoded narration audio and its measured duration
#[derive(Debug, Clone, PartialEq)]
pub struct AudioTrack {
    pub path: PathBuf,
    pub duration: TimeSpec,
    pub sample_rate: u32,
    pub channels: u16,
    pub frames: u64,
}

/// Backend-provided span of transcribed speech
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

/// Decoded shape of a backend response
#[derive(Debug, Clone, PartialEq)]
pub enum InferenceResult {
    /// Generated text with the echoed prompt removed
    Text(String),
    /// Transcription with explicit timing
    Segments(Vec<Segment>),
    /// Transcription without timing
    PlainText(String),
    /// Well-formed response with nothing usable in it
    NoResult,
}

/// One timed subtitle unit
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionEntry {
    /// 1-based, contiguous
    pub index: usize,
    pub start: f64,
    pub end: f64,
    pub text: String,
}

/// How a caption set was timed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptionSource {
    Segments,
    Proportional,
}

/// Ordered captions for one run
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionSet {
    pub entries: Vec<CaptionEntry>,
    pub source: CaptionSource,
}

impl CaptionSet {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CaptionEntry> {
        self.entries.iter()
    }

    /// End time of the last entry, 0 for an empty set
    pub fn end_time(&self) -> f64 {
        self.entries.last().map(|e| e.end).unwrap_or(0.0)
    }
}

/// Target frame size for the optional resize stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    /// Parse "WIDTHxHEIGHT", e.g. "1080x1920"
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let (w, h) = value
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(|| DomainError::BadArgs(format!("Invalid dimensions: {}", value)))?;
        let width = w
            .trim()
            .parse::<u32>()
            .map_err(|_| DomainError::BadArgs(format!("Invalid width in: {}", value)))?;
        let height = h
            .trim()
            .parse::<u32>()
            .map_err(|_| DomainError::BadArgs(format!("Invalid height in: {}", value)))?;
        if width == 0 || height == 0 {
            return Err(DomainError::BadArgs(format!(
                "Dimensions must be non-zero: {}",
                value
            )));
        }
        Ok(Self { width, height })
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Pipeline stages in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Stage {
    GeneratingScript,
    SynthesizingVoice,
    MeasuringDuration,
    TrimmingVideo,
    MergingAudioVideo,
    SynthesizingCaptions,
    ResizingVideo,
    BurningCaptions,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::GeneratingScript => "GeneratingScript",
            Stage::SynthesizingVoice => "SynthesizingVoice",
            Stage::MeasuringDuration => "MeasuringDuration",
            Stage::TrimmingVideo => "TrimmingVideo",
            Stage::MergingAudioVideo => "MergingAudioVideo",
            Stage::SynthesizingCaptions => "SynthesizingCaptions",
            Stage::ResizingVideo => "ResizingVideo",
            Stage::BurningCaptions => "BurningCaptions",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Run state machine
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineState {
    Pending,
    Running(Stage),
    Done,
    Failed { stage: Stage, cause: DomainError },
}

/// Fixed artifact names inside a run's working directory
#[derive(Debug, Clone, PartialEq)]
pub struct Artifacts {
    pub work_dir: PathBuf,
    pub voiceover: PathBuf,
    pub trimmed: PathBuf,
    pub merged: PathBuf,
    pub captions: PathBuf,
    pub resized: PathBuf,
    pub output: PathBuf,
}

impl Artifacts {
    pub const VOICEOVER: &'static str = "voiceover.wav";
    pub const TRIMMED: &'static str = "trimmed.mp4";
    pub const MERGED: &'static str = "merged.mp4";
    pub const CAPTIONS: &'static str = "captions.srt";
    pub const RESIZED: &'static str = "resized.mp4";

    /// Lay out artifacts under `work_dir`; a relative `output` is placed there too
    pub fn in_dir(work_dir: &Path, output: &Path) -> Self {
        let output = if output.is_absolute() {
            output.to_path_buf()
        } else {
            work_dir.join(output)
        };
        Self {
            work_dir: work_dir.to_path_buf(),
            voiceover: work_dir.join(Self::VOICEOVER),
            trimmed: work_dir.join(Self::TRIMMED),
            merged: work_dir.join(Self::MERGED),
            captions: work_dir.join(Self::CAPTIONS),
            resized: work_dir.join(Self::RESIZED),
            output,
        }
    }
}

/// Everything one run carries between stages
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub source_video: PathBuf,
    pub artifacts: Artifacts,
    pub script: Option<Script>,
    pub audio: Option<AudioTrack>,
    pub captions: Option<CaptionSet>,
    pub state: PipelineState,
    pub completed: Vec<Stage>,
    last_artifact: Option<PathBuf>,
}

impl PipelineRun {
    pub fn new(source_video: PathBuf, artifacts: Artifacts) -> Self {
        Self {
            source_video,
            artifacts,
            script: None,
            audio: None,
            captions: None,
            state: PipelineState::Pending,
            completed: Vec::new(),
            last_artifact: None,
        }
    }

    /// Enter `stage`; refused once the run is terminal
    pub fn begin(&mut self, stage: Stage) -> Result<(), DomainError> {
        match &self.state {
            PipelineState::Pending | PipelineState::Running(_) => {
                self.state = PipelineState::Running(stage);
                Ok(())
            }
            PipelineState::Done | PipelineState::Failed { .. } => Err(DomainError::InternalError(
                format!("Cannot start {} on a finished run", stage),
            )),
        }
    }

    /// Record success of the running stage and the file it produced, if any
    pub fn complete(&mut self, stage: Stage, artifact: Option<PathBuf>) {
        self.completed.push(stage);
        if artifact.is_some() {
            self.last_artifact = artifact;
        }
    }

    pub fn fail(&mut self, stage: Stage, cause: DomainError) {
        self.state = PipelineState::Failed { stage, cause };
    }

    pub fn finish(&mut self) {
        self.state = PipelineState::Done;
    }

    /// Most recent file a stage wrote successfully
    pub fn last_artifact(&self) -> Option<&Path> {
        self.last_artifact.as_deref()
    }

    /// The run duration; trimming and captioning must go through this
    pub fn duration(&self) -> Result<TimeSpec, DomainError> {
        self.audio.as_ref().map(|a| a.duration).ok_or_else(|| {
            DomainError::InternalError("Duration has not been measured for this run".to_string())
        })
    }

    pub fn script(&self) -> Result<&Script, DomainError> {
        self.script.as_ref().ok_or_else(|| {
            DomainError::InternalError("Script has not been produced for this run".to_string())
        })
    }
}

/// Inputs of one full pipeline run
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineRequest {
    pub script: ScriptSource,
    pub video: PathBuf,
    pub work_dir: PathBuf,
    /// Final file; relative paths land in `work_dir`
    pub output: PathBuf,
    pub resize: Option<Dimensions>,
    pub transcribe: bool,
}

/// Summary of a successful run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineReport {
    pub started_at: DateTime<Utc>,
    pub completed: Vec<Stage>,
    pub duration: TimeSpec,
    pub caption_count: usize,
    pub caption_source: CaptionSource,
    pub output: PathBuf,
    pub elapsed: std::time::Duration,
}
