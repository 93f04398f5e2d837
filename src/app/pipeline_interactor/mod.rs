// Pipeline interactor - Runs one narrated-video job stage by stage

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::*;
use crate::engine::{MediaEditor, VoiceTool};
use crate::output::{CaptionVerifier, SrtWriter};
use crate::ports::*;


/// Where narration audio comes from
pub enum VoiceBackend {
    /// Speech-synthesis endpoint behind the inference port
    Remote,
    /// Helper program that writes voiceover.wav into the work dir
    Local(VoiceTool),
}

/// Interactor for the full pipeline
pub struct PipelineInteractor {
    inference_port: Arc<dyn InferencePort>,
    probe_port: Arc<dyn AudioProbePort>,
    fs_port: Arc<dyn FsPort>,
    log_port: Arc<dyn LogPort>,
    editor: MediaEditor,
    voice: VoiceBackend,
    captions: CaptionSynthesizer,
}

impl PipelineInteractor {
    /// Create new pipeline interactor with injected ports
    pub fn new(
        inference_port: Arc<dyn InferencePort>,
        probe_port: Arc<dyn AudioProbePort>,
        fs_port: Arc<dyn FsPort>,
        log_port: Arc<dyn LogPort>,
        editor: MediaEditor,
        voice: VoiceBackend,
        captions: CaptionSynthesizer,
    ) -> Self {
        Self {
            inference_port,
            probe_port,
            fs_port,
            log_port,
            editor,
            voice,
            captions,
        }
    }

    /// Stages this request goes through, in order
    pub fn plan(request: &PipelineRequest) -> Vec<Stage> {
        let mut stages = vec![
            Stage::GeneratingScript,
            Stage::SynthesizingVoice,
            Stage::MeasuringDuration,
            Stage::TrimmingVideo,
            Stage::MergingAudioVideo,
            Stage::SynthesizingCaptions,
        ];
        if request.resize.is_some() {
            stages.push(Stage::ResizingVideo);
        }
        stages.push(Stage::BurningCaptions);
        stages
    }

    /// Run every stage; the first failure ends the run
    pub async fn execute(
        &self,
        request: PipelineRequest,
    ) -> Result<PipelineReport, PipelineFailure> {
        let started_at = Utc::now();
        let clock = Instant::now();
        let artifacts = Artifacts::in_dir(&request.work_dir, &request.output);
        let mut run = PipelineRun::new(request.video.clone(), artifacts);

        self.log_port
            .info(&format!(
                "Starting pipeline for {} in {}",
                request.video.display(),
                request.work_dir.display()
            ))
            .await;

        for stage in Self::plan(&request) {
            if let Err(cause) = self.advance(&mut run, &request, stage).await {
                return Err(self.halt(&mut run, stage, cause).await);
            }
        }
        run.finish();

        let report = self
            .report(&run, started_at, clock)
            .map_err(|cause| PipelineFailure {
                stage: Stage::BurningCaptions,
                cause,
                last_artifact: run.last_artifact().map(Path::to_path_buf),
            })?;

        self.log_port
            .info(&format!(
                "Pipeline finished in {:.1}s. Output: {}",
                report.elapsed.as_secs_f64(),
                report.output.display()
            ))
            .await;

        Ok(report)
    }

    async fn advance(
        &self,
        run: &mut PipelineRun,
        request: &PipelineRequest,
        stage: Stage,
    ) -> Result<(), DomainError> {
        run.begin(stage)?;
        self.log_port.info(&format!("Stage {}", stage)).await;

        let artifact = match stage {
            Stage::GeneratingScript => self.generate_script(run, &request.script).await?,
            Stage::SynthesizingVoice => self.synthesize_voice(run).await?,
            Stage::MeasuringDuration => self.measure_duration(run).await?,
            Stage::TrimmingVideo => self.trim_video(run).await?,
            Stage::MergingAudioVideo => self.merge_audio_video(run).await?,
            Stage::SynthesizingCaptions => {
                self.synthesize_captions(run, request.transcribe).await?
            }
            Stage::ResizingVideo => self.resize_video(run, request.resize).await?,
            Stage::BurningCaptions => self.burn_captions(run, request.resize.is_some()).await?,
        };

        run.complete(stage, artifact);
        Ok(())
    }

    async fn halt(
        &self,
        run: &mut PipelineRun,
        stage: Stage,
        cause: DomainError,
    ) -> PipelineFailure {
        self.log_port
            .error(&format!("Stage {} failed: {}", stage, cause))
            .await;
        run.fail(stage, cause.clone());

        let last_artifact = run.last_artifact().map(Path::to_path_buf);
        if let Some(path) = &last_artifact {
            self.log_port
                .info(&format!("Last artifact kept at {}", path.display()))
                .await;
        }

        PipelineFailure {
            stage,
            cause,
            last_artifact,
        }
    }

    async fn generate_script(
        &self,
        run: &mut PipelineRun,
        source: &ScriptSource,
    ) -> Result<Option<PathBuf>, DomainError> {
        let script = match source {
            ScriptSource::Text(text) => Script::new(text.clone())?,
            ScriptSource::Prompt(prompt) if prompt.trim().is_empty() => {
                return Err(DomainError::BadArgs("Prompt cannot be empty".to_string()))
            }
            ScriptSource::Prompt(prompt) => {
                match self.inference_port.generate_text(prompt).await? {
                    InferenceResult::Text(text) => Script::new(text)?,
                    _ => {
                        return Err(DomainError::NoResult(
                            "Text generation returned no story".to_string(),
                        ))
                    }
                }
            }
        };

        self.log_port
            .debug(&format!("Script has {} words", script.word_count()))
            .await;
        run.script = Some(script);
        Ok(None)
    }

    async fn synthesize_voice(
        &self,
        run: &mut PipelineRun,
    ) -> Result<Option<PathBuf>, DomainError> {
        let text = run.script()?.as_str().to_string();
        let target = run.artifacts.voiceover.clone();
        self.fs_port.create_directory(&run.artifacts.work_dir).await?;

        match &self.voice {
            VoiceBackend::Remote => {
                let audio = self.inference_port.synthesize_speech(&text).await?;
                self.fs_port.write_file(&target, &audio).await?;
            }
            VoiceBackend::Local(tool) => {
                // a narration left by an earlier run must not pass for this one
                self.fs_port.remove_file(&target).await?;
                tool.synthesize(&text).await?;
                if !self.fs_port.file_exists(&target).await? {
                    return Err(DomainError::FileNotFound(format!(
                        "Voice helper did not produce {}",
                        target.display()
                    )));
                }
            }
        }

        Ok(Some(target))
    }

    async fn measure_duration(
        &self,
        run: &mut PipelineRun,
    ) -> Result<Option<PathBuf>, DomainError> {
        let track = self.probe_port.probe(&run.artifacts.voiceover).await?;
        if track.frames == 0 {
            return Err(DomainError::InvalidMediaFormat(format!(
                "{} contains no audio frames",
                track.path.display()
            )));
        }

        self.log_port
            .info(&format!("Narration lasts {:.3}s", track.duration.as_seconds()))
            .await;
        run.audio = Some(track);
        Ok(None)
    }

    async fn trim_video(
        &self,
        run: &mut PipelineRun,
    ) -> Result<Option<PathBuf>, DomainError> {
        let duration = run.duration()?;
        if !self.fs_port.file_exists(&run.source_video).await? {
            return Err(DomainError::FileNotFound(format!(
                "Input video does not exist: {}",
                run.source_video.display()
            )));
        }

        let out = self
            .editor
            .trim(&run.source_video, duration, &run.artifacts.trimmed)
            .await?;
        Ok(Some(out))
    }

    async fn merge_audio_video(
        &self,
        run: &mut PipelineRun,
    ) -> Result<Option<PathBuf>, DomainError> {
        let out = self
            .editor
            .merge(
                &run.artifacts.trimmed,
                &run.artifacts.voiceover,
                &run.artifacts.merged,
            )
            .await?;
        Ok(Some(out))
    }

    async fn synthesize_captions(
        &self,
        run: &mut PipelineRun,
        transcribe: bool,
    ) -> Result<Option<PathBuf>, DomainError> {
        let duration = run.duration()?;
        let transcription = if transcribe {
            self.transcribe(&run.artifacts.voiceover).await?
        } else {
            None
        };

        let input = CaptionInput::select(transcription.as_ref(), run.script()?);
        let captions = self.captions.synthesize(input, duration)?;

        let issues = CaptionVerifier::check(&captions, duration);
        if !issues.is_empty() {
            let summary = issues
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            match captions.source {
                // backend timing is kept as delivered
                CaptionSource::Segments => {
                    self.log_port
                        .warn(&format!("Transcribed timing is irregular: {}", summary))
                        .await
                }
                CaptionSource::Proportional => {
                    return Err(DomainError::InternalError(format!(
                        "Proportional captions are inconsistent: {}",
                        summary
                    )))
                }
            }
        }

        SrtWriter::write(self.fs_port.as_ref(), &run.artifacts.captions, &captions).await?;
        self.log_port
            .info(&format!(
                "{} captions ({:?})",
                captions.len(),
                captions.source
            ))
            .await;

        let path = run.artifacts.captions.clone();
        run.captions = Some(captions);
        Ok(Some(path))
    }

    /// Transcription is best effort: an unreachable or empty backend
    /// falls back to the script
    async fn transcribe(&self, audio: &Path) -> Result<Option<InferenceResult>, DomainError> {
        let bytes = self.fs_port.read_file(audio).await?;
        match self.inference_port.transcribe(&bytes).await {
            Ok(InferenceResult::NoResult) => {
                self.log_port
                    .warn("Transcription returned nothing, captioning the script instead")
                    .await;
                Ok(None)
            }
            Ok(result) => Ok(Some(result)),
            Err(DomainError::Transport(msg)) => {
                self.log_port
                    .warn(&format!(
                        "Transcription unavailable ({}), captioning the script instead",
                        msg
                    ))
                    .await;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn resize_video(
        &self,
        run: &mut PipelineRun,
        target: Option<Dimensions>,
    ) -> Result<Option<PathBuf>, DomainError> {
        let target = target.ok_or_else(|| {
            DomainError::InternalError("Resize stage planned without dimensions".to_string())
        })?;
        let out = self
            .editor
            .resize(&run.artifacts.merged, target, &run.artifacts.resized)
            .await?;
        Ok(Some(out))
    }

    async fn burn_captions(
        &self,
        run: &mut PipelineRun,
        resized: bool,
    ) -> Result<Option<PathBuf>, DomainError> {
        let input = if resized {
            &run.artifacts.resized
        } else {
            &run.artifacts.merged
        };
        let out = self
            .editor
            .burn_captions(input, &run.artifacts.captions, &run.artifacts.output)
            .await?;
        Ok(Some(out))
    }

    fn report(
        &self,
        run: &PipelineRun,
        started_at: chrono::DateTime<Utc>,
        clock: Instant,
    ) -> Result<PipelineReport, DomainError> {
        let captions = run.captions.as_ref().ok_or_else(|| {
            DomainError::InternalError("Run finished without captions".to_string())
        })?;

        Ok(PipelineReport {
            started_at,
            completed: run.completed.clone(),
            duration: run.duration()?,
            caption_count: captions.len(),
            caption_source: captions.source,
            output: run.artifacts.output.clone(),
            elapsed: clock.elapsed(),
        })
    }
}
