//! Liked-posts listing crawler
//!
//! Drives a [`PageSource`] through the listing, one page at a time:
//!
//! ```text
//! LoadingFirstPage -> AnalyzingPage -> AdvancingPage -> AnalyzingPage -> ...
//!                                          |
//!                                          v
//!                                  RetryingEmptyRender -> AnalyzingPage | Done
//! ```
//!
//! Each analyzed page goes to the sink before the crawler touches the source
//! again. The "next page" control is followed at most once per analyzed
//! page. A missing control, or a page stuck on its "no results" indicator
//! after the bounded wait, is the normal end of the listing.

use crate::config::CrawlerConfig;
use crate::crawler::page::Page;
use crate::crawler::source::{PageSource, SourceError, UrlKind};
use crate::output::PageSink;
use crate::state::CrawlState;
use crate::url::page_body_name;
use crate::HarvestError;
use chrono::{DateTime, Utc};
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// How a crawl session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// No further page: the listing is exhausted
    Exhausted,
    /// Parent cancellation stopped the session before the next advance
    Cancelled,
    /// The page source or the sink failed; earlier pages were delivered
    Aborted(String),
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exhausted => write!(f, "exhausted"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::Aborted(reason) => write!(f, "aborted: {}", reason),
        }
    }
}

/// Summary of one crawl session
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Pages analyzed and delivered to the sink
    pub pages: usize,

    /// Waits spent on "no results" renders
    pub empty_render_retries: u32,

    pub termination: Termination,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CrawlReport {
    fn start() -> Self {
        let now = Utc::now();
        Self {
            pages: 0,
            empty_render_retries: 0,
            termination: Termination::Exhausted,
            started_at: now,
            finished_at: now,
        }
    }

    /// Returns true if the listing was walked to its end
    pub fn is_exhausted(&self) -> bool {
        self.termination == Termination::Exhausted
    }

    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }
}

/// State machine walking one listing session
///
/// Consumed by [`LikesCrawler::run`]; a session cannot be restarted.
pub struct LikesCrawler<'a, S: PageSource + ?Sized> {
    source: &'a mut S,
    config: CrawlerConfig,
    cancel: CancellationToken,
    state: CrawlState,
}

impl<'a, S: PageSource + ?Sized> LikesCrawler<'a, S> {
    pub fn new(source: &'a mut S, config: CrawlerConfig) -> Self {
        Self {
            source,
            config,
            cancel: CancellationToken::new(),
            state: CrawlState::LoadingFirstPage,
        }
    }

    /// Ties the session to a parent cancellation token
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn state(&self) -> CrawlState {
        self.state
    }

    /// Walks the listing, handing every analyzed page to `sink` immediately
    ///
    /// Never fails: a source or sink error ends the session as
    /// [`Termination::Aborted`], with every page analyzed so far already
    /// delivered.
    pub async fn run<K: PageSink + ?Sized>(mut self, sink: &mut K) -> CrawlReport {
        let mut report = CrawlReport::start();
        tracing::info!("Analyzing pages ...");

        report.termination = match self.drive(sink, &mut report).await {
            Ok(termination) => termination,
            Err(e) => {
                tracing::error!("Crawl aborted after {} pages: {}", report.pages, e);
                Termination::Aborted(e.to_string())
            }
        };
        self.state = CrawlState::Done;
        report.finished_at = Utc::now();

        tracing::info!(
            "Done analyzing pages: {} pages, {} empty-render waits, {}",
            report.pages,
            report.empty_render_retries,
            report.termination
        );
        report
    }

    async fn drive<K: PageSink + ?Sized>(
        &mut self,
        sink: &mut K,
        report: &mut CrawlReport,
    ) -> Result<Termination, HarvestError> {
        let timeout = self.config.operation_timeout();
        // true when the current cycle already followed the next-page control
        let mut advanced = false;

        loop {
            tracing::trace!("Crawl state: {}", self.state);
            match self.state {
                CrawlState::LoadingFirstPage => {
                    if self.cancel.is_cancelled() {
                        return Ok(Termination::Cancelled);
                    }
                    bounded(timeout, "open first page", self.source.open_first_page()).await?;
                    self.state = CrawlState::AnalyzingPage;
                }

                CrawlState::AnalyzingPage => {
                    let page = self.analyze(report.pages + 1).await?;
                    tracing::info!(
                        "Analyzed: {} ({} urls: {} posts, {} images, {} videos)",
                        page.body_name,
                        page.url_count(),
                        page.post_urls.len(),
                        page.image_urls.len(),
                        page.video_urls.len()
                    );
                    sink.accept(page).await?;
                    report.pages += 1;
                    advanced = false;
                    self.state = CrawlState::AdvancingPage;
                }

                CrawlState::AdvancingPage => {
                    if self.cancel.is_cancelled() {
                        tracing::info!("Cancellation requested, stopping before next page");
                        return Ok(Termination::Cancelled);
                    }
                    advanced = self.try_advance().await?;
                    self.state = if advanced && !self.empty_indicator().await? {
                        CrawlState::AnalyzingPage
                    } else {
                        CrawlState::RetryingEmptyRender
                    };
                }

                CrawlState::RetryingEmptyRender => {
                    let cleared = self.wait_for_render(report).await?;

                    if advanced {
                        // Advancing again would skip the page that just loaded.
                        if !cleared {
                            tracing::info!("Next page stayed empty, end of listing");
                            return Ok(Termination::Exhausted);
                        }
                        self.state = CrawlState::AnalyzingPage;
                        continue;
                    }

                    if self.cancel.is_cancelled() {
                        return Ok(Termination::Cancelled);
                    }
                    if self.try_advance().await? {
                        advanced = true;
                        self.state = CrawlState::AnalyzingPage;
                    } else {
                        tracing::info!("No next page, end of listing");
                        return Ok(Termination::Exhausted);
                    }
                }

                CrawlState::Done => return Ok(Termination::Exhausted),
            }
        }
    }

    /// Reads the loaded page into a [`Page`]
    async fn analyze(&mut self, index: usize) -> Result<Page, SourceError> {
        let timeout = self.config.operation_timeout();

        let markers = bounded(timeout, "read page markers", self.source.current_page_markers()).await?;
        let post_urls = bounded(timeout, "extract post urls", self.source.extract_urls(UrlKind::Posts)).await?;
        let image_urls =
            bounded(timeout, "extract image urls", self.source.extract_urls(UrlKind::Images)).await?;
        let video_urls =
            bounded(timeout, "extract video urls", self.source.extract_urls(UrlKind::Videos)).await?;
        let body = bounded(timeout, "read page body", self.source.page_body()).await?;

        Ok(Page {
            index,
            body_name: page_body_name(&markers, index),
            body,
            post_urls,
            image_urls,
            video_urls,
        })
    }

    /// Follows the next-page control if the page has one
    async fn try_advance(&mut self) -> Result<bool, SourceError> {
        let timeout = self.config.operation_timeout();

        if !bounded(timeout, "look for next page", self.source.has_next_page_control()).await? {
            return Ok(false);
        }
        bounded(timeout, "load next page", self.source.advance_to_next_page()).await?;
        Ok(true)
    }

    async fn empty_indicator(&mut self) -> Result<bool, SourceError> {
        let timeout = self.config.operation_timeout();
        bounded(
            timeout,
            "check empty result",
            self.source.has_empty_result_indicator(),
        )
        .await
    }

    /// Polls the "no results" indicator with a fixed delay between polls
    ///
    /// Returns true once the indicator is gone, false if it is still shown
    /// after the configured number of waits.
    async fn wait_for_render(&mut self, report: &mut CrawlReport) -> Result<bool, SourceError> {
        let retries = self.config.empty_render_retries;
        let delay = self.config.empty_render_delay();
        let mut attempt = 0;

        loop {
            if !self.empty_indicator().await? {
                return Ok(true);
            }
            if attempt >= retries || self.cancel.is_cancelled() {
                return Ok(false);
            }

            attempt += 1;
            report.empty_render_retries += 1;
            tracing::info!(
                "Waiting for {} seconds ({}/{})",
                delay.as_secs_f64(),
                attempt,
                retries
            );
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = self.cancel.cancelled() => {}
            }
        }
    }
}

/// Runs one page-source operation under its own timeout
async fn bounded<T, F>(timeout: Duration, operation: &'static str, fut: F) -> Result<T, SourceError>
where
    F: Future<Output = Result<T, SourceError>>,
{
    tokio::time::timeout(timeout, fut)
        .await
        .map_err(|_| SourceError::Timeout { operation })?
}
