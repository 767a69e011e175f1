//! Offset pager with rate-limit cooldown
//!
//! Requests pages at offsets 0, n, 2n, ... (n = the server's page size)
//! until a page comes back empty. A rate-limited request is retried at the
//! same offset after a fixed cooldown. Any other error ends paging early and
//! the items gathered so far are returned.

use crate::api::{blog_names, ApiError, Post, RemoteApi, ResourceKind};
use crate::config::ApiConfig;
use std::collections::{BTreeSet, HashSet};
use std::future::Future;
use std::hash::Hash;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone)]
pub struct CursorPager {
    page_size: u64,
    cooldown: Duration,
    cancel: CancellationToken,
}

impl CursorPager {
    pub fn new(page_size: u64, cooldown: Duration) -> Self {
        Self {
            page_size: page_size.max(1),
            cooldown,
            cancel: CancellationToken::new(),
        }
    }

    pub fn from_config(config: &ApiConfig) -> Self {
        Self::new(u64::from(config.page_size), config.rate_limit_cooldown())
    }

    /// Ties the pager to a parent cancellation token
    ///
    /// Cancellation is observed between requests and during a cooldown; the
    /// items gathered so far are returned.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Pages a collection exhaustively through `fetch_page(offset)`
    ///
    /// If the first request fails the result is empty, which callers cannot
    /// tell apart from an empty collection; the failure is only logged.
    pub async fn fetch_all<T, F, Fut>(&self, mut fetch_page: F) -> HashSet<T>
    where
        T: Eq + Hash,
        F: FnMut(u64) -> Fut,
        Fut: Future<Output = Result<Vec<T>, ApiError>>,
    {
        let mut items = HashSet::new();
        let mut offset = 0;

        loop {
            if self.cancel.is_cancelled() {
                tracing::info!("Paging cancelled at offset {}", offset);
                break;
            }

            match fetch_page(offset).await {
                Ok(page) if page.is_empty() => break,
                Ok(page) => {
                    tracing::debug!("Offset {}: {} items", offset, page.len());
                    items.extend(page);
                    offset += self.page_size;
                }
                Err(e) if e.is_rate_limited() => {
                    tracing::info!(
                        "{} at offset {}, waiting {} seconds",
                        e,
                        offset,
                        self.cooldown.as_secs()
                    );
                    tokio::select! {
                        _ = tokio::time::sleep(self.cooldown) => {}
                        _ = self.cancel.cancelled() => {}
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        "Paging stopped at offset {} with {} items: {}",
                        offset,
                        items.len(),
                        e
                    );
                    break;
                }
            }
        }

        items
    }

    /// Pages one remote collection of posts
    pub async fn fetch_remote(&self, api: &dyn RemoteApi, kind: &ResourceKind) -> HashSet<Post> {
        tracing::info!("Paging {}", kind);
        let posts = self.fetch_all(|offset| api.fetch_page(kind, offset)).await;
        tracing::info!("Collected {} posts ({})", posts.len(), kind);
        posts
    }

    /// Pages the blogs followed by the account and returns their names
    pub async fn fetch_following(&self, api: &dyn RemoteApi) -> BTreeSet<String> {
        tracing::info!("Paging followed blogs");
        let blogs = self.fetch_all(|offset| api.fetch_following_page(offset)).await;
        let names = blog_names(&blogs);
        tracing::info!("Collected {} followed blogs", names.len());
        names
    }
}
