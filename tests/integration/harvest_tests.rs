//! Listing crawl through the file writer, with downloads over HTTP

use async_trait::async_trait;
use like_harvester::config::{Config, CrawlerConfig, OutputConfig};
use like_harvester::crawler::{PageSource, SourceError, Termination, UrlKind};
use like_harvester::Harvester;
use std::collections::BTreeSet;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Three listing pages, each showing one image hosted on `media_base`
struct ListingSource {
    media_base: String,
    current: usize,
    pages: usize,
    fail_on: Option<usize>,
}

impl ListingSource {
    fn new(media_base: &str) -> Self {
        Self {
            media_base: media_base.to_string(),
            current: 0,
            pages: 3,
            fail_on: None,
        }
    }
}

#[async_trait]
impl PageSource for ListingSource {
    async fn current_page_markers(&mut self) -> Result<String, SourceError> {
        Ok(match self.current {
            0 => "https://www.example.com/liked/by/someblog".to_string(),
            n => format!("https://www.example.com/liked/by/someblog/page/{}/17000{}", n + 1, n),
        })
    }

    async fn has_next_page_control(&mut self) -> Result<bool, SourceError> {
        Ok(self.current + 1 < self.pages)
    }

    async fn advance_to_next_page(&mut self) -> Result<(), SourceError> {
        self.current += 1;
        Ok(())
    }

    async fn extract_urls(&mut self, kind: UrlKind) -> Result<BTreeSet<String>, SourceError> {
        if self.fail_on == Some(self.current) {
            return Err(SourceError::Extraction("page went away".to_string()));
        }
        let urls = match kind {
            UrlKind::Posts => vec![format!("https://someblog.example.com/post/{}", self.current)],
            UrlKind::Images => vec![format!("{}/media/img{}.jpg", self.media_base, self.current)],
            UrlKind::Videos if self.current == 1 => {
                vec![format!("{}/media/clip.mp4", self.media_base)]
            }
            UrlKind::Videos => vec![],
        };
        Ok(urls.into_iter().collect())
    }

    async fn page_body(&mut self) -> Result<String, SourceError> {
        Ok(format!("<html><body>listing {}</body></html>", self.current))
    }

    async fn has_empty_result_indicator(&mut self) -> Result<bool, SourceError> {
        Ok(false)
    }
}

async fn media_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/media/.+$"))
        .respond_with(ResponseTemplate::new(200).set_body_string("bytes"))
        .mount(&server)
        .await;
    server
}

fn config(dest: &std::path::Path) -> Config {
    Config {
        user_agent: Default::default(),
        fetcher: Default::default(),
        crawler: CrawlerConfig {
            empty_render_delay_ms: 10,
            ..CrawlerConfig::default()
        },
        api: Default::default(),
        output: OutputConfig::all(dest),
    }
}

#[tokio::test]
async fn test_crawl_writes_pages_lists_and_media() {
    let server = media_server().await;
    let dest = TempDir::new().unwrap();
    let harvester = Harvester::from_config(config(dest.path())).unwrap();
    let mut source = ListingSource::new(&server.uri());

    let summary = harvester
        .harvest_likes("likes of someblog", &mut source)
        .await
        .unwrap();

    let crawl = summary.crawl.as_ref().unwrap();
    assert_eq!(crawl.termination, Termination::Exhausted);
    assert_eq!(crawl.pages, 3);
    assert_eq!(summary.downloads.done, 4);

    let pages = dest.path().join("pages");
    for name in ["page1.html", "page2.html", "page3.html"] {
        assert!(pages.join(name).exists(), "missing {}", name);
    }
    assert_eq!(
        std::fs::read_to_string(pages.join("page1.html")).unwrap(),
        "<html><body>listing 0</body></html>"
    );

    let posts = std::fs::read_to_string(dest.path().join("posts.txt")).unwrap();
    let posts: Vec<&str> = posts.lines().collect();
    assert_eq!(
        posts,
        vec![
            "https://someblog.example.com/post/0",
            "https://someblog.example.com/post/1",
            "https://someblog.example.com/post/2"
        ]
    );

    for file in ["img0.jpg", "img1.jpg", "img2.jpg"] {
        assert!(dest.path().join("pics").join(file).exists());
    }
    assert!(dest.path().join("videos").join("clip.mp4").exists());

    let md = std::fs::read_to_string(dest.path().join("summary.md")).unwrap();
    assert!(md.contains("- **Pages**: 3"));
}

#[tokio::test]
async fn test_aborted_crawl_keeps_earlier_pages() {
    let server = media_server().await;
    let dest = TempDir::new().unwrap();
    let harvester = Harvester::from_config(config(dest.path())).unwrap();
    let mut source = ListingSource::new(&server.uri());
    source.fail_on = Some(2);

    let summary = harvester
        .harvest_likes("likes of someblog", &mut source)
        .await
        .unwrap();

    let crawl = summary.crawl.as_ref().unwrap();
    assert!(matches!(crawl.termination, Termination::Aborted(_)));
    assert_eq!(crawl.pages, 2);
    assert!(summary.has_failures());

    assert!(dest.path().join("pages").join("page2.html").exists());
    assert!(!dest.path().join("pages").join("page3.html").exists());
    assert!(dest.path().join("pics").join("img1.jpg").exists());
}

#[tokio::test]
async fn test_cancelled_harvest_stops_before_navigating() {
    let server = media_server().await;
    let dest = TempDir::new().unwrap();
    let token = CancellationToken::new();
    token.cancel();
    let harvester = Harvester::from_config(config(dest.path()))
        .unwrap()
        .with_cancellation(token);
    let mut source = ListingSource::new(&server.uri());

    let summary = harvester
        .harvest_likes("likes of someblog", &mut source)
        .await
        .unwrap();

    let crawl = summary.crawl.as_ref().unwrap();
    assert_eq!(crawl.termination, Termination::Cancelled);
    assert_eq!(crawl.pages, 0);
    assert_eq!(source.current, 0);
    assert_eq!(summary.downloads.total, 0);
}
