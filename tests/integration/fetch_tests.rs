//! Bounded downloads over real HTTP

use like_harvester::config::{FetcherConfig, UserAgentConfig};
use like_harvester::fetch::BoundedFetcher;
use like_harvester::storage::is_partial_file;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn http_fetcher() -> BoundedFetcher {
    let config = FetcherConfig {
        max_concurrent_downloads: 4,
        request_timeout_secs: 5,
        ..FetcherConfig::default()
    };
    BoundedFetcher::from_config(&UserAgentConfig::default(), &config).unwrap()
}

async fn serve(server: &MockServer, file: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/media/{}", file)))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_unreachable_urls_do_not_abort_batch() {
    let server = MockServer::start().await;
    for i in 0..3 {
        serve(&server, &format!("ok{}.jpg", i), &format!("image {}", i)).await;
    }
    Mock::given(method("GET"))
        .and(path("/media/missing.jpg"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let urls: Vec<String> = vec![
        format!("{}/media/ok0.jpg", server.uri()),
        format!("{}/media/ok1.jpg", server.uri()),
        format!("{}/media/missing.jpg", server.uri()),
        format!("{}/media/ok2.jpg", server.uri()),
        // Nothing listens on port 9 of the loopback interface
        "http://127.0.0.1:9/media/refused.jpg".to_string(),
    ];

    let report = http_fetcher().fetch(dir.path(), &urls).await;

    assert_eq!(report.total, 5);
    assert_eq!(report.done, 3);
    assert_eq!(report.failed, 2);
    assert!(report.is_complete());

    for i in 0..3 {
        let content = std::fs::read_to_string(dir.path().join(format!("ok{}.jpg", i))).unwrap();
        assert_eq!(content, format!("image {}", i));
    }
    assert!(!dir.path().join("missing.jpg").exists());
    assert!(!dir.path().join("refused.jpg").exists());

    // No temporary file survives a batch
    for entry in std::fs::read_dir(dir.path()).unwrap() {
        assert!(!is_partial_file(&entry.unwrap().path()));
    }
}

#[tokio::test]
async fn test_rerun_over_populated_directory_makes_no_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/media/a.mp4"))
        .respond_with(ResponseTemplate::new(200).set_body_string("video a"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/media/b.mp4"))
        .respond_with(ResponseTemplate::new(200).set_body_string("video b"))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let urls = vec![
        format!("{}/media/a.mp4", server.uri()),
        format!("{}/media/b.mp4", server.uri()),
    ];
    let fetcher = http_fetcher();

    let first = fetcher.fetch(dir.path(), &urls).await;
    assert_eq!(first.done, 2);

    let second = fetcher.fetch(dir.path(), &urls).await;
    assert_eq!(second.skipped, 2);
    assert_eq!(second.done, 0);

    // Existing files are kept, not overwritten
    std::fs::write(dir.path().join("a.mp4"), "local edit").unwrap();
    let third = fetcher.fetch(dir.path(), &urls).await;
    assert_eq!(third.skipped, 2);
    assert_eq!(
        std::fs::read_to_string(dir.path().join("a.mp4")).unwrap(),
        "local edit"
    );
}

#[tokio::test]
async fn test_download_from_list_file() {
    let server = MockServer::start().await;
    serve(&server, "one.png", "1").await;
    serve(&server, "two.png", "2").await;

    let work = TempDir::new().unwrap();
    let list = work.path().join("pics.txt");
    std::fs::write(
        &list,
        format!(
            "{uri}/media/one.png\n\n{uri}/media/two.png\n{uri}/media/one.png\n",
            uri = server.uri()
        ),
    )
    .unwrap();
    let target = work.path().join("pics");

    let report = http_fetcher().fetch_from_list(&list, &target).await.unwrap();

    assert_eq!(report.total, 2);
    assert_eq!(report.done, 2);
    assert_eq!(std::fs::read_to_string(target.join("two.png")).unwrap(), "2");
}

#[tokio::test]
async fn test_missing_list_file_is_an_error() {
    let work = TempDir::new().unwrap();
    let result = http_fetcher()
        .fetch_from_list(&work.path().join("absent.txt"), &work.path().join("out"))
        .await;

    assert!(result.is_err());
}
