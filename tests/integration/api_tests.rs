//! Remote API paging and harvesting

use like_harvester::api::{ApiClient, CursorPager, ResourceKind};
use like_harvester::config::{ApiConfig, Config, CrawlerConfig, FetcherConfig, OutputConfig};
use like_harvester::Harvester;
use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api_config(base_url: &str) -> ApiConfig {
    ApiConfig {
        base_url: base_url.to_string(),
        api_key: "test-key".to_string(),
        page_size: 20,
        rate_limit_cooldown_secs: 0,
    }
}

fn config(base_url: &str, dest: &std::path::Path) -> Config {
    Config {
        user_agent: Default::default(),
        fetcher: FetcherConfig::default(),
        crawler: CrawlerConfig::default(),
        api: api_config(base_url),
        output: OutputConfig::all(dest),
    }
}

fn page(collection: &str, posts: Value) -> ResponseTemplate {
    let mut response = serde_json::Map::new();
    response.insert(collection.to_string(), posts);
    ResponseTemplate::new(200).set_body_json(json!({
        "meta": {"status": 200, "msg": "OK"},
        "response": response
    }))
}

async fn mount_page(server: &MockServer, blog_path: &str, offset: &str, body: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(blog_path))
        .and(query_param("offset", offset))
        .respond_with(body)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_pager_walks_remote_collection() {
    let server = MockServer::start().await;
    let posts_path = "/blog/someblog/posts";
    mount_page(
        &server,
        posts_path,
        "0",
        page("posts", json!([{"id": 1, "type": "text"}, {"id": 2, "type": "text"}])),
    )
    .await;
    mount_page(
        &server,
        posts_path,
        "20",
        page("posts", json!([{"id": 2, "type": "text"}, {"id": 3, "type": "text"}])),
    )
    .await;
    mount_page(&server, posts_path, "40", page("posts", json!([]))).await;

    let client = ApiClient::new(reqwest::Client::new(), &api_config(&server.uri()));
    let posts = CursorPager::from_config(&api_config(&server.uri()))
        .fetch_remote(&client, &ResourceKind::BlogPosts { blog: "someblog".to_string() })
        .await;

    let mut ids: Vec<u64> = posts.iter().map(|p| p.id).collect();
    ids.sort();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_rate_limited_offset_is_retried() {
    let server = MockServer::start().await;
    let likes_path = "/blog/someblog/likes";
    mount_page(
        &server,
        likes_path,
        "0",
        page("liked_posts", json!([{"id": 10, "type": "text"}])),
    )
    .await;
    // First request at offset 20 is throttled, the retry succeeds
    Mock::given(method("GET"))
        .and(path(likes_path))
        .and(query_param("offset", "20"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    mount_page(
        &server,
        likes_path,
        "20",
        page("liked_posts", json!([{"id": 11, "type": "text"}])),
    )
    .await;
    mount_page(&server, likes_path, "40", page("liked_posts", json!([]))).await;

    let kind = ResourceKind::BlogLikes { blog: "someblog".to_string() };
    let client = ApiClient::new(reqwest::Client::new(), &api_config(&server.uri()));
    let posts = CursorPager::from_config(&api_config(&server.uri()))
        .fetch_remote(&client, &kind)
        .await;

    assert_eq!(posts.len(), 2);
    let requests = server.received_requests().await.unwrap();
    let offsets: Vec<String> = requests
        .iter()
        .filter_map(|r| {
            r.url
                .query_pairs()
                .find(|(k, _)| k == "offset")
                .map(|(_, v)| v.to_string())
        })
        .collect();
    assert_eq!(offsets, vec!["0", "20", "20", "40"]);
}

#[tokio::test]
async fn test_harvest_blog_media() {
    let server = MockServer::start().await;
    let uri = server.uri();
    let posts_path = "/blog/someblog/posts";
    mount_page(
        &server,
        posts_path,
        "0",
        page(
            "posts",
            json!([
                {"id": 1, "type": "photo", "post_url": "https://someblog.example.com/post/1",
                 "photos": [{"original_size": {"url": format!("{}/media/p1.jpg", uri)}}]},
                {"id": 2, "type": "text", "post_url": "https://someblog.example.com/post/2",
                 "body": format!("<p><img src=\"{}/media/t2.png\"></p>", uri)},
                {"id": 3, "type": "video", "post_url": "https://someblog.example.com/post/3",
                 "player": [{"width": 400, "embed_code": format!("<video><source src=\"{}/media/v3.mp4\"></video>", uri)}]},
                {"id": 4, "type": "chat", "post_url": "https://someblog.example.com/post/4"}
            ]),
        ),
    )
    .await;
    mount_page(&server, posts_path, "20", page("posts", json!([]))).await;
    for (file, body) in [("p1.jpg", "photo"), ("t2.png", "inline"), ("v3.mp4", "video")] {
        Mock::given(method("GET"))
            .and(path(format!("/media/{}", file)))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&server)
            .await;
    }

    let dest = TempDir::new().unwrap();
    let config = config(&uri, dest.path());
    let client = ApiClient::new(reqwest::Client::new(), &config.api);
    let harvester = Harvester::from_config(config).unwrap();

    let summary = harvester
        .harvest_remote(&client, ResourceKind::BlogPosts { blog: "someblog".to_string() })
        .await
        .unwrap();

    assert_eq!(summary.api_posts, Some(4));
    assert_eq!(summary.downloads.done, 3);
    assert!(!summary.has_failures());

    let posts = std::fs::read_to_string(dest.path().join("posts.txt")).unwrap();
    assert_eq!(posts.lines().count(), 4);
    let pics = std::fs::read_to_string(dest.path().join("pics.txt")).unwrap();
    assert_eq!(pics.lines().count(), 2);
    let videos = std::fs::read_to_string(dest.path().join("videos.txt")).unwrap();
    assert_eq!(videos.trim(), format!("{}/media/v3.mp4", uri));

    assert_eq!(
        std::fs::read_to_string(dest.path().join("pics").join("p1.jpg")).unwrap(),
        "photo"
    );
    assert!(dest.path().join("pics").join("t2.png").exists());
    assert!(dest.path().join("videos").join("v3.mp4").exists());
    assert!(dest.path().join("summary.md").exists());
}

#[tokio::test]
async fn test_failing_first_page_yields_empty_harvest() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dest = TempDir::new().unwrap();
    let config = config(&server.uri(), dest.path());
    let client = ApiClient::new(reqwest::Client::new(), &config.api);
    let harvester = Harvester::from_config(config).unwrap();

    let summary = harvester
        .harvest_remote(&client, ResourceKind::BlogLikes { blog: "someblog".to_string() })
        .await
        .unwrap();

    assert_eq!(summary.api_posts, Some(0));
    assert_eq!(summary.downloads.total, 0);
    assert!(!dest.path().join("posts.txt").exists());
}

#[tokio::test]
async fn test_followed_blogs_are_paged_by_offset() {
    let server = MockServer::start().await;
    let following = "/user/following";
    mount_page(
        &server,
        following,
        "0",
        page("blogs", json!([{"name": "beta"}, {"name": "alpha"}])),
    )
    .await;
    mount_page(
        &server,
        following,
        "20",
        page("blogs", json!([{"name": "alpha"}, {"name": "gamma"}])),
    )
    .await;
    mount_page(&server, following, "40", page("blogs", json!([]))).await;

    let dest = TempDir::new().unwrap();
    let config = config(&server.uri(), dest.path());
    let client = ApiClient::new(reqwest::Client::new(), &config.api);
    let harvester = Harvester::from_config(config).unwrap();

    let names: Vec<String> = harvester.followed_blogs(&client).await.into_iter().collect();

    assert_eq!(names, vec!["alpha", "beta", "gamma"]);
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}
