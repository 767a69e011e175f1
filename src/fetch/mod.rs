//! Media download module
//!
//! This module contains the bounded-concurrency downloader, including:
//! - A permit pool capping downloads in flight across all batches
//! - Skip-if-exists handling for idempotent re-runs
//! - Per-job failure isolation and timeouts
//! - A completion barrier with throughput/ETA reporting

mod bounded;
mod job;
mod progress;
mod transport;

pub use bounded::{BoundedFetcher, DEFAULT_CONCURRENCY};
pub use job::DownloadJob;
pub use progress::{BatchProgress, BatchReport};
pub use transport::{build_http_client, FetchError, HttpTransport, Transport};
