// Local filesystem adapter - File system operations backed by tokio::fs

use crate::domain::errors::*;
use crate::ports::*;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::Path;

/// Local filesystem adapter
#[derive(Debug, Default, Clone)]
pub struct FsLocalAdapter;

impl FsLocalAdapter {
    /// Create new local filesystem adapter
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FsPort for FsLocalAdapter {
    async fn file_exists(&self, file_path: &Path) -> Result<bool, DomainError> {
        tokio::fs::try_exists(file_path).await.map_err(|e| {
            DomainError::FsFail(format!("Failed to stat {}: {}", file_path.display(), e))
        })
    }

    async fn create_directory(&self, dir_path: &Path) -> Result<(), DomainError> {
        tokio::fs::create_dir_all(dir_path).await.map_err(|e| {
            DomainError::FsFail(format!(
                "Failed to create directory {}: {}",
                dir_path.display(),
                e
            ))
        })
    }

    async fn read_file(&self, file_path: &Path) -> Result<Vec<u8>, DomainError> {
        tokio::fs::read(file_path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => DomainError::FileNotFound(file_path.display().to_string()),
            _ => DomainError::FsFail(format!("Failed to read {}: {}", file_path.display(), e)),
        })
    }

    async fn write_file(&self, file_path: &Path, contents: &[u8]) -> Result<(), DomainError> {
        tokio::fs::write(file_path, contents).await.map_err(|e| {
            DomainError::FsFail(format!("Failed to write {}: {}", file_path.display(), e))
        })
    }

    async fn remove_file(&self, file_path: &Path) -> Result<(), DomainError> {
        match tokio::fs::remove_file(file_path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DomainError::FsFail(format!(
                "Failed to remove {}: {}",
                file_path.display(),
                e
            ))),
        }
    }
}
