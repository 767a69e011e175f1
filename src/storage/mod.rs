//! Storage module for persisting harvested blobs
//!
//! This module handles:
//! - The `BlobStore` interface used by the downloader and the page writer
//! - A crash-atomic filesystem implementation (write, sync, rename)

mod fs;
mod traits;

pub use fs::{is_partial_file, FsBlobStore};
pub use traits::{BlobStore, StorageError, StorageResult};

use crate::HarvestError;
use std::path::Path;

/// Creates `path` and any missing parents
///
/// Used for the output layout (`pages/`, `pics/`, `videos/`) before a run.
pub async fn ensure_dir(path: &Path) -> Result<(), HarvestError> {
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|e| StorageError::io(path, e))?;
    Ok(())
}
