// TOML config adapter - Typed configuration loaded from TOML files and the environment

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::errors::*;
use crate::domain::model::Dimensions;
use crate::domain::rules::DEFAULT_CHUNK_SIZE;
use crate::ports::LogLevel;
use crate::utils::logging::LogFormat;

/// File picked up from the working directory when no --config is given
pub const DEFAULT_CONFIG_FILE: &str = "reelsmith.toml";

/// Prefix of environment overrides
pub const ENV_PREFIX: &str = "REELSMITH_";

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub log: LogConfig,
    pub inference: InferenceConfig,
    pub voice: VoiceConfig,
    pub tools: ToolsConfig,
    pub captions: CaptionConfig,
    pub video: VideoConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    pub text_model_url: String,
    pub speech_model_url: String,
    pub transcription_model_url: String,
    /// Name of the variable holding the bearer token
    pub api_key_env: String,
    /// No client-side timeout when unset
    pub request_timeout_secs: Option<u64>,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            text_model_url:
                "https://api-inference.huggingface.co/models/tiiuae/falcon-7b-instruct".to_string(),
            speech_model_url: "https://api-inference.huggingface.co/models/facebook/mms-tts-eng"
                .to_string(),
            transcription_model_url:
                "https://api-inference.huggingface.co/models/openai/whisper-large-v3".to_string(),
            api_key_env: "HUGGINGFACE_API_KEY".to_string(),
            request_timeout_secs: None,
        }
    }
}

/// How narration audio is produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoiceMode {
    /// Hosted speech-synthesis endpoint
    #[default]
    Remote,
    /// Local helper program that writes voiceover.wav
    LocalTool,
}

impl VoiceMode {
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value.to_lowercase().replace('-', "_").as_str() {
            "remote" => Ok(VoiceMode::Remote),
            "local_tool" | "local" => Ok(VoiceMode::LocalTool),
            _ => Err(DomainError::BadArgs(format!(
                "Invalid voice mode: {}. Valid modes: remote, local-tool",
                value
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    pub mode: VoiceMode,
    pub program: String,
    pub script: String,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            mode: VoiceMode::Remote,
            program: "python3".to_string(),
            script: "bark_tts.py".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub ffmpeg: String,
    /// Kill a tool that runs longer than this
    pub timeout_secs: Option<u64>,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ffmpeg: "ffmpeg".to_string(),
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptionConfig {
    pub chunk_size: usize,
    pub transcribe: bool,
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            transcribe: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    /// "WIDTHxHEIGHT"; no resize stage when unset
    pub resize: Option<String>,
    /// x264 preset for re-encoding stages
    pub preset: String,
    /// Constant Rate Factor (0-51)
    pub crf: u8,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            resize: None,
            preset: "medium".to_string(),
            crf: 23,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub work_dir: PathBuf,
    pub final_name: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("."),
            final_name: PathBuf::from("final.mp4"),
        }
    }
}

impl AppConfig {
    /// Parsed log level
    pub fn log_level(&self) -> Result<LogLevel, DomainError> {
        LogLevel::parse(&self.log.level)
    }

    /// Parsed resize target, if any
    pub fn resize(&self) -> Result<Option<Dimensions>, DomainError> {
        self.video.resize.as_deref().map(Dimensions::parse).transpose()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), DomainError> {
        self.log_level()?;
        self.resize()?;
        if self.captions.chunk_size == 0 {
            return Err(DomainError::Config(
                "captions.chunk_size must be at least 1".to_string(),
            ));
        }
        if self.video.crf > 51 {
            return Err(DomainError::Config(
                "video.crf cannot exceed 51".to_string(),
            ));
        }
        if self.tools.ffmpeg.trim().is_empty() {
            return Err(DomainError::Config("tools.ffmpeg cannot be empty".to_string()));
        }
        if self.voice.mode == VoiceMode::LocalTool && self.voice.program.trim().is_empty() {
            return Err(DomainError::Config(
                "voice.program is required for local_tool mode".to_string(),
            ));
        }
        Ok(())
    }

    /// Bearer token for the inference backends, read from the configured variable
    pub fn api_token(&self) -> Result<String, DomainError> {
        match std::env::var(&self.inference.api_key_env) {
            Ok(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
            _ => Err(DomainError::Config(format!(
                "Set {} to authenticate with the inference backends",
                self.inference.api_key_env
            ))),
        }
    }
}

/// TOML configuration adapter
pub struct TomlConfigAdapter;

impl TomlConfigAdapter {
    /// Parse configuration from TOML text; missing keys take defaults
    pub fn from_toml_str(content: &str) -> Result<AppConfig, DomainError> {
        toml::from_str(content)
            .map_err(|e| DomainError::Config(format!("Failed to parse TOML config: {}", e)))
    }

    /// Load configuration from file
    pub fn load(path: &Path) -> Result<AppConfig, DomainError> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                DomainError::FileNotFound(format!("Config file {}", path.display()))
            }
            _ => DomainError::Config(format!("Failed to read {}: {}", path.display(), e)),
        })?;
        Self::from_toml_str(&content)
    }

    /// Explicit path must exist; otherwise use reelsmith.toml if present, else defaults
    pub fn discover(explicit: Option<&Path>) -> Result<(AppConfig, Option<PathBuf>), DomainError> {
        if let Some(path) = explicit {
            return Ok((Self::load(path)?, Some(path.to_path_buf())));
        }
        let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
        if default_path.exists() {
            return Ok((Self::load(&default_path)?, Some(default_path)));
        }
        Ok((AppConfig::default(), None))
    }

    /// Serialize config to TOML string
    pub fn to_toml_string(config: &AppConfig) -> Result<String, DomainError> {
        toml::to_string_pretty(config)
            .map_err(|e| DomainError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Apply `REELSMITH_*` overrides. `lookup` is `std::env::var` outside tests.
    /// Returns the names of the variables that were applied.
    pub fn apply_env<F>(config: &mut AppConfig, lookup: F) -> Result<Vec<String>, DomainError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut applied = Vec::new();
        let mut take = |suffix: &str| -> Option<String> {
            let name = format!("{}{}", ENV_PREFIX, suffix);
            let value = lookup(&name)?;
            applied.push(name);
            Some(value)
        };

        if let Some(v) = take("LOG_LEVEL") {
            config.log.level = v;
        }
        if let Some(v) = take("LOG_FORMAT") {
            config.log.format = LogFormat::parse(&v)?;
        }
        if let Some(v) = take("TEXT_MODEL_URL") {
            config.inference.text_model_url = v;
        }
        if let Some(v) = take("SPEECH_MODEL_URL") {
            config.inference.speech_model_url = v;
        }
        if let Some(v) = take("TRANSCRIPTION_MODEL_URL") {
            config.inference.transcription_model_url = v;
        }
        if let Some(v) = take("VOICE_MODE") {
            config.voice.mode = VoiceMode::parse(&v)?;
        }
        if let Some(v) = take("FFMPEG") {
            config.tools.ffmpeg = v;
        }
        if let Some(v) = take("TOOL_TIMEOUT_SECS") {
            config.tools.timeout_secs = Some(parse_number(&v, "TOOL_TIMEOUT_SECS")?);
        }
        if let Some(v) = take("CHUNK_SIZE") {
            config.captions.chunk_size = parse_number(&v, "CHUNK_SIZE")? as usize;
        }
        if let Some(v) = take("TRANSCRIBE") {
            config.captions.transcribe = v.parse::<bool>().map_err(|e| {
                DomainError::Config(format!("Invalid boolean for {}TRANSCRIBE: {}", ENV_PREFIX, e))
            })?;
        }
        if let Some(v) = take("RESIZE") {
            config.video.resize = Some(v);
        }
        if let Some(v) = take("WORK_DIR") {
            config.output.work_dir = PathBuf::from(v);
        }

        Ok(applied)
    }
}

fn parse_number(value: &str, name: &str) -> Result<u64, DomainError> {
    value.trim().parse::<u64>().map_err(|e| {
        DomainError::Config(format!("Invalid number for {}{}: {}", ENV_PREFIX, name, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.captions.chunk_size, 5);
        assert!(!config.captions.transcribe);
        assert_eq!(config.voice.mode, VoiceMode::Remote);
        assert_eq!(config.inference.api_key_env, "HUGGINGFACE_API_KEY");
        assert_eq!(config.output.final_name, PathBuf::from("final.mp4"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = TomlConfigAdapter::from_toml_str(
            r#"
            [captions]
            chunk_size = 3

            [voice]
            mode = "local_tool"
            script = "tts/bark_tts.py"

            [video]
            resize = "1080x1920"
            "#,
        )
        .unwrap();

        assert_eq!(config.captions.chunk_size, 3);
        assert_eq!(config.voice.mode, VoiceMode::LocalTool);
        assert_eq!(config.voice.program, "python3");
        assert_eq!(config.voice.script, "tts/bark_tts.py");
        assert_eq!(config.resize().unwrap().unwrap().height, 1920);
        assert_eq!(config.tools.ffmpeg, "ffmpeg");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = TomlConfigAdapter::from_toml_str("[captions\nchunk_size = ").unwrap_err();
        assert!(matches!(err, DomainError::Config(_)));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.captions.chunk_size = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.video.resize = Some("huge".to_string());
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.log.level = "chatty".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.video.crf = 60;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("REELSMITH_CHUNK_SIZE", "7"),
            ("REELSMITH_TRANSCRIBE", "true"),
            ("REELSMITH_VOICE_MODE", "local-tool"),
            ("REELSMITH_TOOL_TIMEOUT_SECS", "600"),
            ("REELSMITH_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        let applied =
            TomlConfigAdapter::apply_env(&mut config, |k| vars.get(k).map(|v| v.to_string()))
                .unwrap();

        assert_eq!(applied.len(), 5);
        assert_eq!(config.captions.chunk_size, 7);
        assert!(config.captions.transcribe);
        assert_eq!(config.voice.mode, VoiceMode::LocalTool);
        assert_eq!(config.tools.timeout_secs, Some(600));
        assert_eq!(config.log.format, LogFormat::Json);
    }

    #[test]
    fn test_env_override_bad_number() {
        let mut config = AppConfig::default();
        let err = TomlConfigAdapter::apply_env(&mut config, |k| {
            (k == "REELSMITH_CHUNK_SIZE").then(|| "many".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, DomainError::Config(_)));
    }

    #[test]
    fn test_round_trip_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("reelsmith.toml");
        let mut config = AppConfig::default();
        config.tools.timeout_secs = Some(120);
        std::fs::write(&path, TomlConfigAdapter::to_toml_string(&config).unwrap()).unwrap();

        let (loaded, source) = TomlConfigAdapter::discover(Some(&path)).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(source, Some(path));
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let err = TomlConfigAdapter::discover(Some(Path::new("/nonexistent/reelsmith.toml")))
            .unwrap_err();
        assert!(matches!(err, DomainError::FileNotFound(_)));
    }
}
