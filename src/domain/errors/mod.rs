// Domain errors - Error types for the domain layer

use std::fmt;
use std::path::PathBuf;

use crate::domain::model::Stage;

/// Domain-specific error types
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Backend unreachable or the request failed in transit
    Transport(String),
    /// Backend answered with a well-formed but unusable payload
    NoResult(String),
    /// Audio file is not a readable container
    InvalidMediaFormat(String),
    /// File not found
    FileNotFound(String),
    /// External tool could not be spawned or exited non-zero
    ExternalToolFailure {
        tool: String,
        status: Option<i32>,
        stdout: String,
        stderr: String,
    },
    /// Nothing to caption
    EmptyInput(String),
    /// Invalid arguments provided
    BadArgs(String),
    /// Filesystem operation failed
    FsFail(String),
    /// Configuration is missing or invalid
    Config(String),
    /// Internal error
    InternalError(String),
}

impl DomainError {
    /// Short machine-friendly name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            DomainError::Transport(_) => "transport",
            DomainError::NoResult(_) => "no_result",
            DomainError::InvalidMediaFormat(_) => "invalid_media_format",
            DomainError::FileNotFound(_) => "file_not_found",
            DomainError::ExternalToolFailure { .. } => "external_tool_failure",
            DomainError::EmptyInput(_) => "empty_input",
            DomainError::BadArgs(_) => "bad_args",
            DomainError::FsFail(_) => "fs_fail",
            DomainError::Config(_) => "config",
            DomainError::InternalError(_) => "internal",
        }
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::Transport(msg) => write!(f, "Transport error: {}", msg),
            DomainError::NoResult(msg) => write!(f, "No result: {}", msg),
            DomainError::InvalidMediaFormat(msg) => write!(f, "Invalid media format: {}", msg),
            DomainError::FileNotFound(msg) => write!(f, "File not found: {}", msg),
            DomainError::ExternalToolFailure {
                tool,
                status,
                stdout,
                stderr,
            } => {
                match status {
                    Some(code) => write!(f, "{} exited with status {}", tool, code)?,
                    None => write!(f, "{} did not run to completion", tool)?,
                }
                if !stderr.trim().is_empty() {
                    write!(f, "\nStderr: {}", stderr.trim())?;
                }
                if !stdout.trim().is_empty() {
                    write!(f, "\nStdout: {}", stdout.trim())?;
                }
                Ok(())
            }
            DomainError::EmptyInput(msg) => write!(f, "Empty input: {}", msg),
            DomainError::BadArgs(msg) => write!(f, "Bad arguments: {}", msg),
            DomainError::FsFail(msg) => write!(f, "Filesystem error: {}", msg),
            DomainError::Config(msg) => write!(f, "Configuration error: {}", msg),
            DomainError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}

/// Terminal failure of a pipeline run
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineFailure {
    pub stage: Stage,
    pub cause: DomainError,
    /// Newest file a completed stage left on disk
    pub last_artifact: Option<PathBuf>,
}

impl fmt::Display for PipelineFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Stage {} failed: {}", self.stage, self.cause)
    }
}

impl std::error::Error for PipelineFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.cause)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_failure_surfaces_output() {
        let err = DomainError::ExternalToolFailure {
            tool: "ffmpeg".to_string(),
            status: Some(1),
            stdout: String::new(),
            stderr: "No such file or directory".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("ffmpeg exited with status 1"));
        assert!(text.contains("No such file or directory"));
        assert_eq!(err.kind(), "external_tool_failure");
    }

    #[test]
    fn test_spawn_failure_has_no_status() {
        let err = DomainError::ExternalToolFailure {
            tool: "ffmpeg".to_string(),
            status: None,
            stdout: String::new(),
            stderr: "program not found".to_string(),
        };
        assert!(err.to_string().starts_with("ffmpeg did not run to completion"));
    }

    #[test]
    fn test_pipeline_failure_names_stage() {
        let failure = PipelineFailure {
            stage: Stage::MeasuringDuration,
            cause: DomainError::InvalidMediaFormat("not a WAV".to_string()),
            last_artifact: Some(PathBuf::from("voiceover.wav")),
        };
        assert_eq!(
            failure.to_string(),
            "Stage MeasuringDuration failed: Invalid media format: not a WAV"
        );
        assert!(std::error::Error::source(&failure).is_some());
    }
}
