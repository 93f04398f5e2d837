// Captions interactor - Captions and duration for an existing narration

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::*;
use crate::output::{CaptionVerifier, SrtWriter};
use crate::ports::*;

/// Caption an existing narration file
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionsRequest {
    pub audio: PathBuf,
    pub text: String,
    /// Write the SRT here; `None` returns it only
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaptionsResponse {
    pub track: AudioTrack,
    pub captions: CaptionSet,
    pub srt: String,
    pub written_to: Option<PathBuf>,
}

/// Interactor for the standalone caption and probe commands
pub struct CaptionsInteractor {
    probe_port: Arc<dyn AudioProbePort>,
    fs_port: Arc<dyn FsPort>,
    log_port: Arc<dyn LogPort>,
    captions: CaptionSynthesizer,
}

impl CaptionsInteractor {
    /// Create new captions interactor with injected ports
    pub fn new(
        probe_port: Arc<dyn AudioProbePort>,
        fs_port: Arc<dyn FsPort>,
        log_port: Arc<dyn LogPort>,
        captions: CaptionSynthesizer,
    ) -> Self {
        Self {
            probe_port,
            fs_port,
            log_port,
            captions,
        }
    }

    /// Measure a narration file
    pub async fn probe(&self, audio: &Path) -> Result<AudioTrack, DomainError> {
        if !self.fs_port.file_exists(audio).await? {
            return Err(DomainError::FileNotFound(format!(
                "Audio file does not exist: {}",
                audio.display()
            )));
        }

        let track = self.probe_port.probe(audio).await?;
        self.log_port
            .info(&format!(
                "{}: {:.3}s ({} frames at {} Hz)",
                audio.display(),
                track.duration.as_seconds(),
                track.frames,
                track.sample_rate
            ))
            .await;
        Ok(track)
    }

    /// Spread `text` evenly over the narration
    pub async fn execute(&self, request: CaptionsRequest) -> Result<CaptionsResponse, DomainError> {
        let track = self.probe(&request.audio).await?;
        let captions = self.captions.proportional(&request.text, track.duration)?;

        let issues = CaptionVerifier::check(&captions, track.duration);
        if let Some(issue) = issues.first() {
            return Err(DomainError::InternalError(format!(
                "Generated captions are inconsistent: {}",
                issue
            )));
        }

        let srt = SrtWriter::render(&captions);
        if let Some(path) = &request.output {
            SrtWriter::write(self.fs_port.as_ref(), path, &captions).await?;
        }

        self.log_port
            .debug(&format!(
                "{} captions of up to {} words",
                captions.len(),
                self.captions.chunk_size()
            ))
            .await;

        Ok(CaptionsResponse {
            track,
            captions,
            srt,
            written_to: request.output,
        })
    }
}
