//! Like-Harvester: extracts liked content from a paginated timeline
//!
//! This crate walks a rendered listing of liked posts page by page, persists
//! the listing pages and the URL lists found on them, and downloads the
//! referenced media under a bounded concurrency cap. A cursor pager with
//! rate-limit backoff covers the remote API side of the same collection.

pub mod api;
pub mod config;
pub mod crawler;
pub mod fetch;
pub mod harvest;
pub mod output;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Like-Harvester operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Page source error: {0}")]
    Source(#[from] crawler::SourceError),

    #[error("API error: {0}")]
    Api(#[from] api::ApiError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Output error: {0}")]
    Output(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("URL has no usable file name: {0}")]
    MissingFileName(String),
}

/// Result type alias for Like-Harvester operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlReport, LikesCrawler, Page, PageSource, Termination, UrlKind};
pub use fetch::{BatchReport, BoundedFetcher};
pub use harvest::Harvester;
pub use state::{CrawlState, JobState};
