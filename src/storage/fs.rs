//! Filesystem blob store
//!
//! Blobs are plain files below a root directory. Writes go to a hidden
//! sibling temp file which is synced and then renamed over the target, so an
//! interrupted process never leaves a truncated file under the final name.

use crate::storage::traits::{BlobStore, StorageError, StorageResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::io::AsyncWriteExt;

/// Temp file marker; files carrying it are never valid blobs
const PARTIAL_MARKER: &str = ".part-";

/// Blob store backed by a local directory
#[derive(Debug)]
pub struct FsBlobStore {
    root: PathBuf,
    counter: AtomicU64,
}

impl FsBlobStore {
    /// Creates a store rooted at `root`
    ///
    /// Names are joined onto the root, so an absolute name bypasses it.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            counter: AtomicU64::new(0),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a blob name to its on-disk path
    pub fn resolve(&self, name: &Path) -> PathBuf {
        self.root.join(name)
    }

    fn temp_path(&self, target: &Path) -> StorageResult<PathBuf> {
        let file_name = target
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| StorageError::InvalidName(target.display().to_string()))?;
        let seq = self.counter.fetch_add(1, Ordering::Relaxed);
        let temp_name = format!(".{}{}{}-{}", file_name, PARTIAL_MARKER, std::process::id(), seq);
        Ok(target.with_file_name(temp_name))
    }
}

/// Returns true if `path` names an in-progress temp file
pub fn is_partial_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('.') && n.contains(PARTIAL_MARKER))
        .unwrap_or(false)
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn exists(&self, name: &Path) -> StorageResult<bool> {
        let path = self.resolve(name);
        tokio::fs::try_exists(&path)
            .await
            .map_err(|e| StorageError::io(path, e))
    }

    async fn write(&self, name: &Path, bytes: &[u8]) -> StorageResult<()> {
        let target = self.resolve(name);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::io(parent, e))?;
        }

        let temp = self.temp_path(&target)?;
        if let Err(e) = write_synced(&temp, bytes).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(StorageError::io(&temp, e));
        }

        if let Err(e) = tokio::fs::rename(&temp, &target).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(StorageError::io(&target, e));
        }

        tracing::trace!("Stored {} bytes at {}", bytes.len(), target.display());
        Ok(())
    }
}

async fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = tokio::fs::File::create(path).await?;
    file.write_all(bytes).await?;
    file.sync_all().await?;
    Ok(())
}
