//! Run orchestration
//!
//! A [`Harvester`] wires the pieces together for one run: the crawler or the
//! API pager produces URL sets, a [`LikesWriter`] persists them and starts
//! downloads, and a [`RunSummary`] is written next to the output.

use crate::api::{post_urls, CursorPager, RemoteApi, ResourceKind};
use crate::config::Config;
use crate::crawler::{LikesCrawler, PageSource, UrlKind};
use crate::fetch::BoundedFetcher;
use crate::output::{write_markdown_summary, LikesWriter, RunSummary, SUMMARY_FILE};
use crate::HarvestError;
use std::collections::BTreeSet;
use std::path::Path;
use tokio_util::sync::CancellationToken;

/// Runs harvests against one configuration and one download pool
pub struct Harvester {
    config: Config,
    config_hash: Option<String>,
    fetcher: BoundedFetcher,
    cancel: CancellationToken,
}

impl Harvester {
    pub fn new(config: Config, fetcher: BoundedFetcher) -> Self {
        Self {
            config,
            config_hash: None,
            fetcher,
            cancel: CancellationToken::new(),
        }
    }

    /// Creates a harvester downloading over HTTP
    pub fn from_config(config: Config) -> Result<Self, HarvestError> {
        let fetcher = BoundedFetcher::from_config(&config.user_agent, &config.fetcher)?;
        Ok(Self::new(config, fetcher))
    }

    /// Records the configuration hash in run summaries
    pub fn with_config_hash(mut self, hash: impl Into<String>) -> Self {
        self.config_hash = Some(hash.into());
        self
    }

    /// Ties crawling, paging and downloading to a parent cancellation token
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.fetcher = self.fetcher.with_cancellation(token.clone());
        self.cancel = token;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Crawls the liked-posts listing behind `source`
    ///
    /// Pages are written as they are analyzed. Returns once the crawl ended
    /// and every download it started has finished.
    pub async fn harvest_likes<S>(&self, label: &str, source: &mut S) -> Result<RunSummary, HarvestError>
    where
        S: PageSource + ?Sized,
    {
        let mut summary = self.start_summary(label);
        let mut writer = LikesWriter::create(self.config.output.clone(), self.fetcher.clone()).await?;

        let report = LikesCrawler::new(source, self.config.crawler.clone())
            .with_cancellation(self.cancel.clone())
            .run(&mut writer)
            .await;

        summary.downloads = writer.finish().await;
        summary.crawl = Some(report);
        self.finish_summary(summary).await
    }

    /// Pages a remote collection and harvests its posts and media
    ///
    /// A list that cannot be written does not stop the other lists. Every
    /// download already started is waited for and the summary is written
    /// before the first such error is returned.
    pub async fn harvest_remote(
        &self,
        api: &dyn RemoteApi,
        kind: ResourceKind,
    ) -> Result<RunSummary, HarvestError> {
        let mut summary = self.start_summary(&kind.to_string());

        let pager = CursorPager::from_config(&self.config.api).with_cancellation(self.cancel.clone());
        let posts = pager.fetch_remote(api, &kind).await;
        summary.api_posts = Some(posts.len());

        let mut lists = vec![(UrlKind::Posts, post_urls(&posts))];
        for media_kind in [UrlKind::Images, UrlKind::Videos] {
            let urls: BTreeSet<String> = posts
                .iter()
                .filter(|post| post.media_kind() == Some(media_kind))
                .flat_map(|post| post.media_urls())
                .collect();
            lists.push((media_kind, urls));
        }

        let mut writer = LikesWriter::create(self.config.output.clone(), self.fetcher.clone()).await?;
        let mut first_error = None;
        for (list_kind, urls) in &lists {
            if let Err(e) = writer.record_urls(*list_kind, urls).await {
                tracing::error!("Failed to record {} of {}: {}", list_kind, kind, e);
                first_error.get_or_insert(e);
            }
        }

        summary.downloads = writer.finish().await;
        let summary = self.finish_summary(summary).await?;
        match first_error {
            Some(e) => Err(e),
            None => Ok(summary),
        }
    }

    /// Pages the blogs followed by the account behind the API key
    pub async fn followed_blogs(&self, api: &dyn RemoteApi) -> BTreeSet<String> {
        CursorPager::from_config(&self.config.api)
            .with_cancellation(self.cancel.clone())
            .fetch_following(api)
            .await
    }

    /// Downloads a newline-delimited URL list into `target_dir`
    pub async fn download_list(
        &self,
        list_file: &Path,
        target_dir: &Path,
    ) -> Result<RunSummary, HarvestError> {
        let mut summary = self.start_summary(&format!("URL list {}", list_file.display()));
        summary.downloads = self.fetcher.fetch_from_list(list_file, target_dir).await?;
        summary.finish();
        Ok(summary)
    }

    fn start_summary(&self, label: &str) -> RunSummary {
        tracing::info!("Starting harvest: {}", label);
        let mut summary = RunSummary::new(label);
        summary.config_hash = self.config_hash.clone();
        summary
    }

    async fn finish_summary(&self, mut summary: RunSummary) -> Result<RunSummary, HarvestError> {
        summary.finish();
        let path = self.config.output.dest_path.join(SUMMARY_FILE);
        write_markdown_summary(&summary, &path).await?;
        tracing::info!("Summary written to {}", path.display());
        Ok(summary)
    }
}
