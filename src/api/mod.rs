//! Remote API module
//!
//! This module contains:
//! - `CursorPager`, an offset pager with rate-limit cooldown
//! - The `RemoteApi` interface and its reqwest-backed `ApiClient`
//! - The post model and per-variant media extraction
//! - The followed-blog model

mod blogs;
mod client;
mod pager;
mod posts;

pub use blogs::{blog_names, Blog};
pub use client::ApiClient;
pub use pager::CursorPager;
pub use posts::{media_urls, post_urls, Photo, PhotoSize, Post, PostContent, VideoPlayer};

use async_trait::async_trait;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Errors returned by one remote page request
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server is throttling requests; the same page can be retried later
    #[error("Rate limited by remote API")]
    RateLimited { retry_after: Option<Duration> },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Remote API returned status {status}")]
    Status { status: u16 },

    #[error("Failed to decode API response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }
}

/// Paged remote collection
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Posts published on a blog
    BlogPosts { blog: String },
    /// Posts a blog has liked
    BlogLikes { blog: String },
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BlogPosts { blog } => write!(f, "posts of {}", blog),
            Self::BlogLikes { blog } => write!(f, "likes of {}", blog),
        }
    }
}

/// A remote API serving collections one offset-addressed page at a time
#[async_trait]
pub trait RemoteApi: Send + Sync {
    /// Fetches the page of `kind` starting at `offset`
    ///
    /// An empty page means the collection is exhausted.
    async fn fetch_page(&self, kind: &ResourceKind, offset: u64) -> Result<Vec<Post>, ApiError>;

    /// Fetches the page of blogs followed by the account, starting at `offset`
    async fn fetch_following_page(&self, offset: u64) -> Result<Vec<Blog>, ApiError>;
}
