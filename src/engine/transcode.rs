//! ffmpeg invocations for the video stages
//!
//! Builds argument lists and runs them through a [`ToolPort`], so the exact
//! command line can be asserted on without a real ffmpeg binary.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use crate::domain::errors::DomainError;
use crate::domain::model::{Dimensions, TimeSpec};
use crate::ports::ToolPort;

/// Re-encoding settings shared by every stage that touches video frames
#[derive(Debug, Clone, PartialEq)]
pub struct EncoderSettings {
    pub video_codec: String,
    pub audio_codec: String,
    pub preset: String,
    pub crf: u8,
}

impl Default for EncoderSettings {
    fn default() -> Self {
        Self {
            video_codec: "libx264".to_string(),
            audio_codec: "aac".to_string(),
            preset: "medium".to_string(),
            crf: 23,
        }
    }
}

impl EncoderSettings {
    /// Set the encoding preset (ultrafast, fast, medium, slow, veryslow)
    pub fn with_preset(mut self, preset: impl Into<String>) -> Self {
        self.preset = preset.into();
        self
    }

    /// Set constant rate factor for quality-based encoding
    pub fn with_crf(mut self, crf: u8) -> Self {
        self.crf = crf.min(51);
        self
    }

    fn video_args(&self) -> Vec<String> {
        vec![
            "-c:v".to_string(),
            self.video_codec.clone(),
            "-preset".to_string(),
            self.preset.clone(),
            "-crf".to_string(),
            self.crf.to_string(),
        ]
    }
}

/// Runs the trim, merge, resize and burn steps with ffmpeg
pub struct MediaEditor {
    tool: Arc<dyn ToolPort>,
    ffmpeg: String,
    settings: EncoderSettings,
}

impl MediaEditor {
    pub fn new(
        tool: Arc<dyn ToolPort>,
        ffmpeg: impl Into<String>,
        settings: EncoderSettings,
    ) -> Self {
        Self {
            tool,
            ffmpeg: ffmpeg.into(),
            settings,
        }
    }

    /// Cut (looping if needed) the source clip to exactly `duration`, dropping its audio
    pub async fn trim(
        &self,
        input: &Path,
        duration: TimeSpec,
        output: &Path,
    ) -> Result<PathBuf, DomainError> {
        info!("Trimming {} to {}s", input.display(), duration.as_seconds());
        self.execute(self.trim_args(input, duration, output)).await?;
        Ok(output.to_path_buf())
    }

    /// Put the narration under the trimmed video
    pub async fn merge(
        &self,
        video: &Path,
        audio: &Path,
        output: &Path,
    ) -> Result<PathBuf, DomainError> {
        info!("Merging {} with {}", video.display(), audio.display());
        self.execute(self.merge_args(video, audio, output)).await?;
        Ok(output.to_path_buf())
    }

    /// Scale to the target frame size
    pub async fn resize(
        &self,
        input: &Path,
        target: Dimensions,
        output: &Path,
    ) -> Result<PathBuf, DomainError> {
        info!("Resizing {} to {}", input.display(), target);
        self.execute(self.resize_args(input, target, output)).await?;
        Ok(output.to_path_buf())
    }

    /// Render the caption file into the frames
    pub async fn burn_captions(
        &self,
        video: &Path,
        captions: &Path,
        output: &Path,
    ) -> Result<PathBuf, DomainError> {
        info!("Burning {} into {}", captions.display(), video.display());
        self.execute(self.burn_args(video, captions, output)).await?;
        Ok(output.to_path_buf())
    }

    async fn execute(&self, args: Vec<String>) -> Result<(), DomainError> {
        self.tool.run(&self.ffmpeg, &args).await.map(|_| ())
    }

    pub fn trim_args(&self, input: &Path, duration: TimeSpec, output: &Path) -> Vec<String> {
        let mut args = strings(&["-y", "-stream_loop", "-1", "-i"]);
        args.push(path_arg(input));
        args.push("-t".to_string());
        // shortest round-trip repr keeps the measured value intact
        args.push(duration.as_seconds().to_string());
        args.push("-an".to_string());
        args.extend(self.settings.video_args());
        args.push(path_arg(output));
        args
    }

    pub fn merge_args(&self, video: &Path, audio: &Path, output: &Path) -> Vec<String> {
        let mut args = strings(&["-y", "-i"]);
        args.push(path_arg(video));
        args.push("-i".to_string());
        args.push(path_arg(audio));
        args.extend(strings(&["-map", "0:v:0", "-map", "1:a:0", "-c:v", "copy", "-c:a"]));
        args.push(self.settings.audio_codec.clone());
        args.push("-shortest".to_string());
        args.push(path_arg(output));
        args
    }

    pub fn resize_args(&self, input: &Path, target: Dimensions, output: &Path) -> Vec<String> {
        let mut args = strings(&["-y", "-i"]);
        args.push(path_arg(input));
        args.push("-vf".to_string());
        args.push(format!("scale={}:{}", target.width, target.height));
        args.extend(self.settings.video_args());
        args.extend(strings(&["-c:a", "copy"]));
        args.push(path_arg(output));
        args
    }

    pub fn burn_args(&self, video: &Path, captions: &Path, output: &Path) -> Vec<String> {
        let mut args = strings(&["-y", "-i"]);
        args.push(path_arg(video));
        args.push("-vf".to_string());
        args.push(format!("subtitles={}", escape_filter_value(&path_arg(captions))));
        args.extend(self.settings.video_args());
        args.extend(strings(&["-c:a", "copy"]));
        args.push(path_arg(output));
        args
    }
}

/// Runs the local text-to-speech helper (e.g. `python3 bark_tts.py "<text>"`)
pub struct VoiceTool {
    tool: Arc<dyn ToolPort>,
    program: String,
    script: Option<String>,
}

impl VoiceTool {
    pub fn new(
        tool: Arc<dyn ToolPort>,
        program: impl Into<String>,
        script: Option<String>,
    ) -> Self {
        Self {
            tool,
            program: program.into(),
            script: script.filter(|s| !s.trim().is_empty()),
        }
    }

    /// The helper takes the narration as its last argument
    pub fn args(&self, text: &str) -> Vec<String> {
        let mut args = Vec::with_capacity(2);
        if let Some(script) = &self.script {
            args.push(script.clone());
        }
        args.push(text.to_string());
        args
    }

    pub async fn synthesize(&self, text: &str) -> Result<(), DomainError> {
        info!("Synthesizing narration with {}", self.program);
        self.tool.run(&self.program, &self.args(text)).await.map(|_| ())
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Escape a value for an ffmpeg filter option, then for the filtergraph
pub fn escape_filter_value(value: &str) -> String {
    let option_level = escape_chars(value, &['\\', '\'', ':']);
    escape_chars(&option_level, &['\\', '\'', '[', ']', ',', ';'])
}

fn escape_chars(value: &str, special: &[char]) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if special.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
