//! Filesystem output for harvested listings
//!
//! Layout under the destination directory:
//!
//! ```text
//! dest/
//!   posts.txt    post permalinks, appended per page
//!   pics.txt     image URLs, appended per page
//!   videos.txt   video URLs, appended per page
//!   pages/       listing page bodies
//!   pics/        downloaded images
//!   videos/      downloaded videos
//! ```

use crate::config::OutputConfig;
use crate::crawler::{Page, UrlKind};
use crate::fetch::{BatchReport, BoundedFetcher};
use crate::output::traits::PageSink;
use crate::storage::{ensure_dir, BlobStore, FsBlobStore, StorageError};
use crate::HarvestError;
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tokio::task::JoinSet;

const PAGES_DIR: &str = "pages";

/// List file receiving URLs of `kind`
pub fn list_file_name(kind: UrlKind) -> &'static str {
    match kind {
        UrlKind::Posts => "posts.txt",
        UrlKind::Images => "pics.txt",
        UrlKind::Videos => "videos.txt",
    }
}

/// Download directory for URLs of `kind`; posts are never downloaded
pub fn media_dir_name(kind: UrlKind) -> Option<&'static str> {
    match kind {
        UrlKind::Posts => None,
        UrlKind::Images => Some("pics"),
        UrlKind::Videos => Some("videos"),
    }
}

/// Page sink writing URL lists and page bodies, and starting media downloads
///
/// Media batches are started without waiting for them, so the crawl keeps
/// moving while files download. All batches share the fetcher's permit
/// pool. Call [`LikesWriter::finish`] to wait for them.
pub struct LikesWriter {
    config: OutputConfig,
    pages: FsBlobStore,
    fetcher: BoundedFetcher,
    batches: JoinSet<BatchReport>,
}

impl LikesWriter {
    /// Prepares the destination layout for the enabled outputs
    pub async fn create(config: OutputConfig, fetcher: BoundedFetcher) -> Result<Self, HarvestError> {
        let dest = config.dest_path.clone();
        ensure_dir(&dest).await?;

        if config.pages {
            ensure_dir(&dest.join(PAGES_DIR)).await?;
        }
        if config.download_media {
            for kind in [UrlKind::Images, UrlKind::Videos] {
                if let (true, Some(dir)) = (kind_enabled(&config, kind), media_dir_name(kind)) {
                    ensure_dir(&dest.join(dir)).await?;
                }
            }
        }

        Ok(Self {
            pages: FsBlobStore::new(dest.join(PAGES_DIR)),
            config,
            fetcher,
            batches: JoinSet::new(),
        })
    }

    pub fn dest_path(&self) -> &Path {
        &self.config.dest_path
    }

    /// Media batches started and not yet collected by [`LikesWriter::finish`]
    pub fn pending_batches(&self) -> usize {
        self.batches.len()
    }

    /// Appends `urls` to the list of `kind` and starts their download
    ///
    /// Does nothing for a kind that is switched off.
    pub async fn record_urls(
        &mut self,
        kind: UrlKind,
        urls: &BTreeSet<String>,
    ) -> Result<(), HarvestError> {
        if !kind_enabled(&self.config, kind) || urls.is_empty() {
            return Ok(());
        }

        let list = self.config.dest_path.join(list_file_name(kind));
        append_lines(&list, urls).await?;
        tracing::debug!("Appended {} {} to {}", urls.len(), kind, list.display());

        if let (true, Some(dir)) = (self.config.download_media, media_dir_name(kind)) {
            let fetcher = self.fetcher.clone();
            let target = self.config.dest_path.join(dir);
            let urls = urls.clone();
            self.batches
                .spawn(async move { fetcher.fetch(&target, urls).await });
        }
        Ok(())
    }

    /// Waits for every media batch started so far
    ///
    /// Returns the merged counts of all batches.
    pub async fn finish(mut self) -> BatchReport {
        let mut report = BatchReport::default();
        if !self.batches.is_empty() {
            tracing::info!("Waiting for {} download batches", self.batches.len());
        }

        while let Some(joined) = self.batches.join_next().await {
            match joined {
                Ok(batch) => report.merge(&batch),
                Err(e) => tracing::warn!("Download batch ended abnormally: {}", e),
            }
        }
        report
    }
}

#[async_trait]
impl PageSink for LikesWriter {
    async fn accept(&mut self, page: Page) -> Result<(), HarvestError> {
        if self.config.pages {
            self.pages
                .write(Path::new(&page.body_name), page.body.as_bytes())
                .await?;
        }

        for kind in UrlKind::all() {
            self.record_urls(kind, page.urls(kind)).await?;
        }
        Ok(())
    }
}

fn kind_enabled(config: &OutputConfig, kind: UrlKind) -> bool {
    match kind {
        UrlKind::Posts => config.posts,
        UrlKind::Images => config.pics,
        UrlKind::Videos => config.videos,
    }
}

/// Appends one line per URL in a single write
async fn append_lines(path: &Path, urls: &BTreeSet<String>) -> Result<(), StorageError> {
    let mut buf = String::new();
    for url in urls {
        buf.push_str(url);
        buf.push('\n');
    }

    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .map_err(|e| StorageError::io(path, e))?;
    file.write_all(buf.as_bytes())
        .await
        .map_err(|e| StorageError::io(path, e))?;
    file.flush().await.map_err(|e| StorageError::io(path, e))?;
    Ok(())
}
