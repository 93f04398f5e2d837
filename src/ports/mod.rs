// Ports - Interface definitions (contracts)

use std::path::Path;

use async_trait::async_trait;

use crate::domain::errors::*;
use crate::domain::model::*;

/// Port for the remote inference backends.
///
/// One attempt per call; retry policy belongs to the caller.
#[async_trait]
pub trait InferencePort: Send + Sync {
    /// Generate text from a prompt; yields `Text` or `NoResult`
    async fn generate_text(&self, prompt: &str) -> Result<InferenceResult, DomainError>;

    /// Synthesize speech; returns the audio bytes exactly as received
    async fn synthesize_speech(&self, text: &str) -> Result<Vec<u8>, DomainError>;

    /// Transcribe audio; yields `Segments`, `PlainText` or `NoResult`
    async fn transcribe(&self, audio: &[u8]) -> Result<InferenceResult, DomainError>;
}

/// Captured result of one external tool invocation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolOutput {
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// Port for running an external program to completion
#[async_trait]
pub trait ToolPort: Send + Sync {
    /// Run `tool` with `args`. Failing to start or a non-zero exit is an
    /// `ExternalToolFailure` carrying the captured output.
    async fn run(&self, tool: &str, args: &[String]) -> Result<ToolOutput, DomainError>;
}

/// Port for measuring narration audio
#[async_trait]
pub trait AudioProbePort: Send + Sync {
    /// Validate the container and measure frames / sample rate
    async fn probe(&self, audio_file: &Path) -> Result<AudioTrack, DomainError>;
}

/// Port for file system operations
#[async_trait]
pub trait FsPort: Send + Sync {
    /// Check if file exists
    async fn file_exists(&self, file_path: &Path) -> Result<bool, DomainError>;

    /// Create directory (including parent directories)
    async fn create_directory(&self, dir_path: &Path) -> Result<(), DomainError>;

    /// Read a whole file
    async fn read_file(&self, file_path: &Path) -> Result<Vec<u8>, DomainError>;

    /// Write a whole file, replacing any previous content
    async fn write_file(&self, file_path: &Path, contents: &[u8]) -> Result<(), DomainError>;

    /// Remove a file; a file that is already gone is not an error
    async fn remove_file(&self, file_path: &Path) -> Result<(), DomainError>;
}

/// Port for logging and observability
#[async_trait]
pub trait LogPort: Send + Sync {
    /// Log info message
    async fn info(&self, message: &str);

    /// Log warning message
    async fn warn(&self, message: &str);

    /// Log error message
    async fn error(&self, message: &str);

    /// Log debug message
    async fn debug(&self, message: &str);
}

/// Log level enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Parse log level from string
    pub fn parse(level_str: &str) -> Result<Self, DomainError> {
        match level_str.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(DomainError::BadArgs(format!(
                "Invalid log level: {}. Valid levels: trace, debug, info, warn, error",
                level_str
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
