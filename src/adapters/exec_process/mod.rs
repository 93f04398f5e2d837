//! External process execution adapter
//!
//! Runs ffmpeg and the local TTS helper to completion, capturing both
//! output streams. An optional timeout kills the child when it elapses.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::domain::errors::*;
use crate::ports::*;

/// Process-spawning tool adapter
#[derive(Debug, Clone, Default)]
pub struct ProcessToolAdapter {
    working_dir: Option<PathBuf>,
    timeout: Option<Duration>,
}

impl ProcessToolAdapter {
    /// Create new process adapter with no timeout
    pub fn new() -> Self {
        Self::default()
    }

    /// Run children inside `dir`
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Kill children that run longer than `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn failure(tool: &str, status: Option<i32>, stdout: String, stderr: String) -> DomainError {
        DomainError::ExternalToolFailure {
            tool: tool.to_string(),
            status,
            stdout,
            stderr,
        }
    }
}

#[async_trait]
impl ToolPort for ProcessToolAdapter {
    async fn run(&self, tool: &str, args: &[String]) -> Result<ToolOutput, DomainError> {
        debug!("Executing {} {:?}", tool, args);

        let mut command = Command::new(tool);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }

        let child_output = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, command.output()).await {
                Ok(result) => result,
                Err(_) => {
                    warn!("{} exceeded {:?} and was killed", tool, limit);
                    return Err(Self::failure(
                        tool,
                        None,
                        String::new(),
                        format!("timed out after {:?}", limit),
                    ));
                }
            },
            None => command.output().await,
        };

        let output = child_output.map_err(|e| {
            Self::failure(tool, None, String::new(), format!("failed to start: {}", e))
        })?;

        let captured = ToolOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if !output.status.success() {
            return Err(Self::failure(
                tool,
                captured.status,
                captured.stdout,
                captured.stderr,
            ));
        }

        debug!("{} finished: {}", tool, captured.stderr.trim());
        Ok(captured)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_captures_stdout_on_success() {
        let adapter = ProcessToolAdapter::new();
        let output = adapter
            .run("sh", &args(&["-c", "echo hello"]))
            .await
            .unwrap();
        assert!(output.success());
        assert_eq!(output.stdout.trim(), "hello");
    }

    #[tokio::test]
    async fn test_non_zero_exit_surfaces_output() {
        let adapter = ProcessToolAdapter::new();
        let err = adapter
            .run("sh", &args(&["-c", "echo partial; echo broken >&2; exit 3"]))
            .await
            .unwrap_err();

        match err {
            DomainError::ExternalToolFailure {
                tool,
                status,
                stdout,
                stderr,
            } => {
                assert_eq!(tool, "sh");
                assert_eq!(status, Some(3));
                assert_eq!(stdout.trim(), "partial");
                assert_eq!(stderr.trim(), "broken");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_tool_is_tool_failure() {
        let adapter = ProcessToolAdapter::new();
        let err = adapter
            .run("reelsmith-definitely-not-installed", &[])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::ExternalToolFailure { status: None, .. }
        ));
    }

    #[tokio::test]
    async fn test_timeout_kills_child() {
        let adapter = ProcessToolAdapter::new().with_timeout(Duration::from_millis(100));
        let err = adapter.run("sleep", &args(&["5"])).await.unwrap_err();
        match err {
            DomainError::ExternalToolFailure { status, stderr, .. } => {
                assert_eq!(status, None);
                assert!(stderr.contains("timed out"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_runs_in_working_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let adapter = ProcessToolAdapter::new().with_working_dir(dir.path());
        adapter
            .run("sh", &args(&["-c", "echo data > marker.txt"]))
            .await
            .unwrap();
        assert!(dir.path().join("marker.txt").exists());
    }
}
