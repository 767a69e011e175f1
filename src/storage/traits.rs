//! Storage traits and error types
//!
//! This module defines the trait interface for blob storage backends and
//! associated error types.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid blob name: {0}")]
    InvalidName(String),
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for blob storage implementations
///
/// A blob store persists bytes under a relative name. Implementations must be
/// safe to share between concurrently running download jobs.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Returns true if a blob is already stored under `name`
    async fn exists(&self, name: &Path) -> StorageResult<bool>;

    /// Stores `bytes` under `name`, replacing any previous blob
    ///
    /// The write must be crash-atomic: a reader sees either the previous
    /// blob, nothing, or the complete new content, never a prefix of it.
    async fn write(&self, name: &Path, bytes: &[u8]) -> StorageResult<()>;
}
