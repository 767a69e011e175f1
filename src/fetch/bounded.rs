//! Bounded-concurrency media downloader
//!
//! Every URL of a batch becomes its own task. A task derives its target,
//! skips targets that already exist, then waits for a permit from the pool
//! shared by all batches of this fetcher. The permit is an owned guard held
//! for the rest of the task, so it is released on every exit path. The batch
//! call drains all tasks before returning and logs progress while it waits.

use crate::config::{FetcherConfig, UserAgentConfig};
use crate::fetch::job::DownloadJob;
use crate::fetch::progress::{BatchProgress, BatchReport};
use crate::fetch::transport::{FetchError, HttpTransport, Transport};
use crate::state::JobState;
use crate::storage::{ensure_dir, BlobStore, FsBlobStore};
use crate::HarvestError;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Default number of downloads in flight at once
pub const DEFAULT_CONCURRENCY: usize = 20;

/// Downloads URL sets into a blob store under a concurrency cap
///
/// Cloning is cheap; clones share the transport, the store and the permit
/// pool, so the cap holds across every batch started from any clone.
#[derive(Clone)]
pub struct BoundedFetcher {
    transport: Arc<dyn Transport>,
    store: Arc<dyn BlobStore>,
    permits: Arc<Semaphore>,
    capacity: usize,
    request_timeout: Duration,
    progress_interval: Duration,
    cancel: CancellationToken,
}

impl BoundedFetcher {
    /// Creates a fetcher with an explicit transport and store
    pub fn new(
        transport: Arc<dyn Transport>,
        store: Arc<dyn BlobStore>,
        config: &FetcherConfig,
    ) -> Self {
        let capacity = config.max_concurrent_downloads.max(1) as usize;
        Self {
            transport,
            store,
            permits: Arc::new(Semaphore::new(capacity)),
            capacity,
            request_timeout: config.request_timeout(),
            progress_interval: config.progress_interval(),
            cancel: CancellationToken::new(),
        }
    }

    /// Creates a fetcher that downloads over HTTP into the local filesystem
    ///
    /// Target directories passed to [`BoundedFetcher::fetch`] are resolved
    /// against the current directory unless they are absolute.
    pub fn from_config(
        user_agent: &UserAgentConfig,
        config: &FetcherConfig,
    ) -> Result<Self, HarvestError> {
        let transport = HttpTransport::from_config(user_agent, config)?;
        Ok(Self::new(
            Arc::new(transport),
            Arc::new(FsBlobStore::new(PathBuf::new())),
            config,
        ))
    }

    /// Ties the fetcher to a parent cancellation token
    ///
    /// Once the token fires, jobs still waiting for a permit resolve to
    /// `Cancelled`; jobs already in flight run to completion.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Size of the permit pool
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Permits not currently held by a job
    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }

    /// Downloads every URL into `target_dir`
    ///
    /// Duplicate URLs collapse. Returns once every job is `Done`, `Skipped`,
    /// `Failed` or `Cancelled`; individual failures are only visible in the
    /// returned counts.
    pub async fn fetch<I, S>(&self, target_dir: &Path, urls: I) -> BatchReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let urls: BTreeSet<String> = urls
            .into_iter()
            .map(|u| u.as_ref().trim().to_string())
            .filter(|u| !u.is_empty())
            .collect();

        if urls.is_empty() {
            return BatchReport::default();
        }

        let total = urls.len();
        tracing::info!("Downloading {} files to {}", total, target_dir.display());

        let mut jobs = JoinSet::new();
        for url in urls {
            jobs.spawn(run_job(
                url,
                target_dir.to_path_buf(),
                Arc::clone(&self.transport),
                Arc::clone(&self.store),
                Arc::clone(&self.permits),
                self.cancel.clone(),
                self.request_timeout,
            ));
        }

        let report = self.wait_for_batch(jobs, total).await;

        tracing::info!(
            "Downloading {} files finished: {} done, {} skipped, {} failed, {} cancelled",
            total,
            report.done,
            report.skipped,
            report.failed,
            report.cancelled
        );
        report
    }

    /// Reads a newline-delimited URL list and downloads it into `target_dir`
    ///
    /// Blank lines are ignored; the directory is created when missing.
    pub async fn fetch_from_list(
        &self,
        list_file: &Path,
        target_dir: &Path,
    ) -> Result<BatchReport, HarvestError> {
        ensure_dir(target_dir).await?;
        tracing::info!("Reading URL list {}", list_file.display());
        let content = tokio::fs::read_to_string(list_file).await?;
        Ok(self.fetch(target_dir, content.lines()).await)
    }

    /// Counting barrier over the batch's tasks with periodic progress lines
    async fn wait_for_batch(&self, mut jobs: JoinSet<JobState>, total: usize) -> BatchReport {
        let mut report = BatchReport::new(total);
        let mut progress = BatchProgress::new(total);
        let start = tokio::time::Instant::now() + self.progress_interval;
        let mut ticker = tokio::time::interval_at(start, self.progress_interval);

        loop {
            tokio::select! {
                joined = jobs.join_next() => match joined {
                    Some(Ok(state)) => {
                        report.record(state);
                        progress.completed += 1;
                    }
                    Some(Err(e)) => {
                        tracing::warn!("Download task ended abnormally: {}", e);
                        report.record(JobState::Failed);
                        progress.completed += 1;
                    }
                    None => break,
                },
                _ = ticker.tick() => progress.log(),
            }
        }

        report
    }
}

/// Runs one job to a terminal state
async fn run_job(
    url: String,
    target_dir: PathBuf,
    transport: Arc<dyn Transport>,
    store: Arc<dyn BlobStore>,
    permits: Arc<Semaphore>,
    cancel: CancellationToken,
    request_timeout: Duration,
) -> JobState {
    let mut job = match DownloadJob::new(url.as_str(), &target_dir) {
        Ok(job) => job,
        Err(e) => {
            tracing::warn!("Skipping unusable URL {}: {}", url, e);
            return JobState::Failed;
        }
    };

    match store.exists(&job.target).await {
        Ok(true) => {
            tracing::debug!("Already downloaded: {}", job.target.display());
            job.transition(JobState::Skipped);
            return job.state();
        }
        Ok(false) => {}
        Err(e) => {
            tracing::warn!("Cannot check {}: {}", job.target.display(), e);
            return JobState::Failed;
        }
    }

    let permit = tokio::select! {
        biased;
        _ = cancel.cancelled() => None,
        permit = permits.acquire_owned() => permit.ok(),
    };
    let Some(_permit) = permit else {
        tracing::debug!("Cancelled before start: {}", job.source_url);
        job.transition(JobState::Cancelled);
        return job.state();
    };

    job.transition(JobState::InFlight);
    let started = Instant::now();
    tracing::debug!("Download start: {}", job.source_url);

    match download(&job, transport.as_ref(), store.as_ref(), request_timeout).await {
        Ok(bytes) => {
            tracing::debug!(
                "Download success: {} bytes in {} ms: {}",
                bytes,
                started.elapsed().as_millis(),
                job.source_url
            );
            job.transition(JobState::Done);
        }
        Err(e) => {
            tracing::warn!("Download failed: {} -> {}", job.source_url, e);
            job.transition(JobState::Failed);
        }
    }

    job.state()
}

async fn download(
    job: &DownloadJob,
    transport: &dyn Transport,
    store: &dyn BlobStore,
    request_timeout: Duration,
) -> Result<usize, FetchError> {
    let body = tokio::time::timeout(request_timeout, transport.get(&job.source_url))
        .await
        .map_err(|_| FetchError::Timeout)??;
    store.write(&job.target, &body).await?;
    Ok(body.len())
}
