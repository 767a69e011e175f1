//! HTTP client for the remote blog API
//!
//! Pages are requested as `GET {base}/blog/{blog}/posts`,
//! `GET {base}/blog/{blog}/likes` or `GET {base}/user/following` with
//! `api_key` and `offset` query parameters. Responses wrap the page in a
//! `response` object.

use crate::api::{ApiError, Blog, Post, RemoteApi, ResourceKind};
use crate::config::{ApiConfig, FetcherConfig, UserAgentConfig};
use crate::fetch::build_http_client;
use crate::HarvestError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    response: T,
}

/// Posts pages carry `posts`, likes pages carry `liked_posts`
#[derive(Debug, Deserialize)]
struct PostsPage {
    #[serde(default)]
    posts: Vec<Post>,
    #[serde(default)]
    liked_posts: Vec<Post>,
}

#[derive(Debug, Deserialize)]
struct FollowingPage {
    #[serde(default)]
    blogs: Vec<Blog>,
}

/// Client owning one reqwest connection pool
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl ApiClient {
    pub fn new(client: Client, config: &ApiConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    /// Builds the client with the same user agent and timeouts as downloads
    pub fn from_config(
        user_agent: &UserAgentConfig,
        fetcher: &FetcherConfig,
        api: &ApiConfig,
    ) -> Result<Self, HarvestError> {
        let client = build_http_client(user_agent, fetcher)?;
        Ok(Self::new(client, api))
    }

    /// Request URL for one page of `kind`
    pub fn page_url(&self, kind: &ResourceKind, offset: u64) -> Result<Url, ApiError> {
        let (blog, collection) = match kind {
            ResourceKind::BlogPosts { blog } => (blog, "posts"),
            ResourceKind::BlogLikes { blog } => (blog, "likes"),
        };
        self.endpoint(&format!("blog/{}/{}", blog, collection), offset)
    }

    /// Request URL for one page of followed blogs
    pub fn following_url(&self, offset: u64) -> Result<Url, ApiError> {
        self.endpoint("user/following", offset)
    }

    fn endpoint(&self, path: &str, offset: u64) -> Result<Url, ApiError> {
        let mut url = Url::parse(&format!("{}/{}", self.base_url, path))
            .map_err(|e| ApiError::Decode(format!("bad request URL: {}", e)))?;
        url.query_pairs_mut()
            .append_pair("api_key", &self.api_key)
            .append_pair("offset", &offset.to_string());
        Ok(url)
    }

    /// Sends one GET and decodes the `response` object of the envelope
    async fn get_page<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs);
            return Err(ApiError::RateLimited { retry_after });
        }
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let envelope: Envelope<T> =
            serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(envelope.response)
    }
}

#[async_trait]
impl RemoteApi for ApiClient {
    async fn fetch_page(&self, kind: &ResourceKind, offset: u64) -> Result<Vec<Post>, ApiError> {
        let url = self.page_url(kind, offset)?;
        tracing::debug!("API request: {} offset {}", kind, offset);

        let page: PostsPage = self.get_page(url).await?;
        Ok(match kind {
            ResourceKind::BlogPosts { .. } => page.posts,
            ResourceKind::BlogLikes { .. } => page.liked_posts,
        })
    }

    async fn fetch_following_page(&self, offset: u64) -> Result<Vec<Blog>, ApiError> {
        let url = self.following_url(offset)?;
        tracing::debug!("API request: followed blogs offset {}", offset);

        let page: FollowingPage = self.get_page(url).await?;
        Ok(page.blogs)
    }
}
