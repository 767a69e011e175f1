use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for Like-Harvester
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub api: ApiConfig,
    pub output: OutputConfig,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct UserAgentConfig {
    /// Name sent in the User-Agent header
    pub client_name: String,

    /// Version sent in the User-Agent header
    pub client_version: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            client_name: "like-harvester".to_string(),
            client_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header value (`Name/Version`)
    pub fn header_value(&self) -> String {
        format!("{}/{}", self.client_name, self.client_version)
    }
}

/// Media download configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct FetcherConfig {
    /// Size of the permit pool shared by every download batch
    pub max_concurrent_downloads: u32,

    /// Upper bound for a single download, including the body
    pub request_timeout_secs: u64,

    /// Upper bound for establishing a connection
    pub connect_timeout_secs: u64,

    /// How often a waiting batch reports its progress
    pub progress_interval_secs: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            max_concurrent_downloads: crate::fetch::DEFAULT_CONCURRENCY as u32,
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
            progress_interval_secs: 10,
        }
    }
}

impl FetcherConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn progress_interval(&self) -> Duration {
        Duration::from_secs(self.progress_interval_secs)
    }
}

/// Listing crawl configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CrawlerConfig {
    /// How many times an empty-result render is polled before giving up
    pub empty_render_retries: u32,

    /// Delay between two empty-result polls (milliseconds)
    pub empty_render_delay_ms: u64,

    /// Upper bound for any single page-source operation
    pub operation_timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            empty_render_retries: 3,
            empty_render_delay_ms: 7000,
            operation_timeout_secs: 30,
        }
    }
}

impl CrawlerConfig {
    pub fn empty_render_delay(&self) -> Duration {
        Duration::from_millis(self.empty_render_delay_ms)
    }

    pub fn operation_timeout(&self) -> Duration {
        Duration::from_secs(self.operation_timeout_secs)
    }
}

/// Remote API configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ApiConfig {
    /// Base URL of the API, without trailing slash
    pub base_url: String,

    /// Consumer key sent as the `api_key` query parameter
    pub api_key: String,

    /// Server page size; the pager advances its offset by this stride
    pub page_size: u32,

    /// Pause before retrying an offset that was rate limited
    pub rate_limit_cooldown_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.tumblr.com/v2".to_string(),
            api_key: String::new(),
            page_size: 20,
            rate_limit_cooldown_secs: 60,
        }
    }
}

impl ApiConfig {
    pub fn rate_limit_cooldown(&self) -> Duration {
        Duration::from_secs(self.rate_limit_cooldown_secs)
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Directory receiving URL lists, pages and media
    pub dest_path: PathBuf,

    /// Save each listing page body under `pages/`
    #[serde(default = "enabled")]
    pub pages: bool,

    /// Append post permalinks to `posts.txt`
    #[serde(default = "enabled")]
    pub posts: bool,

    /// Append image URLs to `pics.txt`
    #[serde(default = "enabled")]
    pub pics: bool,

    /// Append video URLs to `videos.txt`
    #[serde(default = "enabled")]
    pub videos: bool,

    /// Download images and videos into `pics/` and `videos/`
    #[serde(default = "enabled")]
    pub download_media: bool,
}

fn enabled() -> bool {
    true
}

impl OutputConfig {
    /// Output configuration with every kind enabled
    pub fn all(dest_path: impl Into<PathBuf>) -> Self {
        Self {
            dest_path: dest_path.into(),
            pages: true,
            posts: true,
            pics: true,
            videos: true,
            download_media: true,
        }
    }

    /// Returns true if at least one kind of output is enabled
    pub fn extracts_anything(&self) -> bool {
        self.pages || self.posts || self.pics || self.videos
    }
}
