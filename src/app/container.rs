use std::sync::Arc;
use std::time::Duration;

use crate::adapters::{
    FsLocalAdapter, HttpInferenceAdapter, InferenceEndpoints, ProcessToolAdapter,
    TracingLogAdapter, WavProbeAdapter,
};
use crate::adapters::toml_config::{AppConfig, VoiceMode};
use crate::app::{
    captions_interactor::CaptionsInteractor,
    pipeline_interactor::{PipelineInteractor, VoiceBackend},
    story_interactor::StoryInteractor,
};
use crate::domain::errors::DomainError;
use crate::domain::model::ScriptSource;
use crate::domain::rules::CaptionSynthesizer;
use crate::engine::{EncoderSettings, MediaEditor, VoiceTool};
use crate::ports::{AudioProbePort, FsPort, InferencePort, LogPort, ToolPort};

/// Builds interactors from a resolved configuration
pub struct AppContainer {
    config: AppConfig,
    client: reqwest::Client,
    probe_port: Arc<dyn AudioProbePort>,
    fs_port: Arc<dyn FsPort>,
    log_port: Arc<dyn LogPort>,
}

impl AppContainer {
    pub fn new(config: AppConfig) -> Result<Self, DomainError> {
        config.validate()?;

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.inference.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| DomainError::Config(format!("Failed to build HTTP client: {}", e)))?;

        let log_port = Arc::new(TracingLogAdapter::new(config.log_level()?));

        Ok(Self {
            config,
            client,
            probe_port: Arc::new(WavProbeAdapter::new()),
            fs_port: Arc::new(FsLocalAdapter::new()),
            log_port,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn story_interactor(&self) -> Result<StoryInteractor, DomainError> {
        Ok(StoryInteractor::new(
            self.inference_port(true)?,
            Arc::clone(&self.log_port),
        ))
    }

    pub fn captions_interactor(&self) -> Result<CaptionsInteractor, DomainError> {
        Ok(CaptionsInteractor::new(
            Arc::clone(&self.probe_port),
            Arc::clone(&self.fs_port),
            Arc::clone(&self.log_port),
            CaptionSynthesizer::new(self.config.captions.chunk_size)?,
        ))
    }

    /// The token is only demanded when this run reaches a hosted backend
    pub fn pipeline_interactor(
        &self,
        source: &ScriptSource,
    ) -> Result<PipelineInteractor, DomainError> {
        let remote_needed = matches!(source, ScriptSource::Prompt(_))
            || self.config.voice.mode == VoiceMode::Remote
            || self.config.captions.transcribe;

        let editor = MediaEditor::new(
            self.tool_port(None),
            self.config.tools.ffmpeg.clone(),
            EncoderSettings::default()
                .with_preset(self.config.video.preset.clone())
                .with_crf(self.config.video.crf),
        );

        let voice = match self.config.voice.mode {
            VoiceMode::Remote => VoiceBackend::Remote,
            // the helper writes voiceover.wav into its working directory
            VoiceMode::LocalTool => VoiceBackend::Local(VoiceTool::new(
                self.tool_port(Some(self.config.output.work_dir.as_path())),
                self.config.voice.program.clone(),
                Some(resolve_script(&self.config.voice.script)),
            )),
        };

        Ok(PipelineInteractor::new(
            self.inference_port(remote_needed)?,
            Arc::clone(&self.probe_port),
            Arc::clone(&self.fs_port),
            Arc::clone(&self.log_port),
            editor,
            voice,
            CaptionSynthesizer::new(self.config.captions.chunk_size)?,
        ))
    }

    fn inference_port(&self, required: bool) -> Result<Arc<dyn InferencePort>, DomainError> {
        let token = match self.config.api_token() {
            Ok(token) => token,
            Err(e) if required => return Err(e),
            Err(_) => String::new(),
        };
        let endpoints = InferenceEndpoints {
            text_generation: self.config.inference.text_model_url.clone(),
            speech: self.config.inference.speech_model_url.clone(),
            transcription: self.config.inference.transcription_model_url.clone(),
        };
        Ok(Arc::new(HttpInferenceAdapter::new(
            self.client.clone(),
            endpoints,
            token,
        )))
    }

    fn tool_port(&self, working_dir: Option<&std::path::Path>) -> Arc<dyn ToolPort> {
        let mut tool = ProcessToolAdapter::new();
        if let Some(dir) = working_dir {
            tool = tool.with_working_dir(dir);
        }
        if let Some(secs) = self.config.tools.timeout_secs {
            tool = tool.with_timeout(Duration::from_secs(secs));
        }
        Arc::new(tool)
    }
}

/// A helper script given relative to the caller's directory must still be
/// found once the child runs inside the work dir
fn resolve_script(script: &str) -> String {
    std::fs::canonicalize(script)
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|_| script.to_string())
}
