//! Integration tests for page loading
//!
//! Covers status and content-type gating, the per-request deadline, and the
//! JSON-index source with its fallback to plain HTML.

use snapshot_scout::config::CrawlerConfig;
use snapshot_scout::crawler::{build_http_client, PageLoader, JSON_INDEX_LINK_TEXT};
use snapshot_scout::url::SitePolicy;
use std::time::{Duration, Instant};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_loader(policy: &SitePolicy, timeout: Duration) -> PageLoader {
    let client = build_http_client(&CrawlerConfig::default()).expect("Failed to build client");
    PageLoader::new(client, timeout, policy)
}

fn root(server: &MockServer) -> Url {
    Url::parse(&format!("{}/", server.uri())).unwrap()
}

/// Serves one fixed raw HTTP response to every connection
async fn serve_raw(response: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    format!("http://{}/", addr)
}

#[tokio::test]
async fn test_loads_html_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"<a href="/wax/">WAX</a>"#, "text/html; charset=utf-8"),
        )
        .mount(&server)
        .await;

    let loader = create_loader(&SitePolicy::empty(), Duration::from_secs(2));
    let document = loader.load(&root(&server)).await.expect("page should load");

    let links = document.links(&SitePolicy::empty());
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].href, format!("{}/wax/", server.uri()));
    assert_eq!(links[0].text, "WAX");
}

#[tokio::test]
async fn test_error_status_yields_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_raw("<p>gone</p>", "text/html"))
        .mount(&server)
        .await;

    let loader = create_loader(&SitePolicy::empty(), Duration::from_secs(2));
    assert!(loader.load(&root(&server)).await.is_none());
}

#[tokio::test]
async fn test_non_html_content_yields_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(vec![0u8; 128], "application/octet-stream"),
        )
        .mount(&server)
        .await;

    let loader = create_loader(&SitePolicy::empty(), Duration::from_secs(2));
    assert!(loader.load(&root(&server)).await.is_none());
}

#[tokio::test]
async fn test_missing_content_type_is_accepted() {
    let url = serve_raw(concat!(
        "HTTP/1.1 200 OK\r\n",
        "Content-Length: 25\r\n",
        "Connection: close\r\n\r\n",
        "<a href=\"/wax/\">WAX</a>\r\n",
    ))
    .await;

    let loader = create_loader(&SitePolicy::empty(), Duration::from_secs(2));
    let document = loader
        .load(&Url::parse(&url).unwrap())
        .await
        .expect("page without content type should load");

    assert!(document.html().contains("/wax/"));
}

#[tokio::test]
async fn test_slow_page_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<p>late</p>", "text/html")
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let loader = create_loader(&SitePolicy::empty(), Duration::from_millis(300));
    let started = Instant::now();
    assert!(loader.load(&root(&server)).await.is_none());
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn test_json_index_builds_document() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/snapshots.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "name": "<a href='wax-1.bin'>wax-1.bin</a>" },
            { "name": "plain text" },
            { "date": "2024-05-01" },
            { "name": "<a href=\"nested/wax-2.bin\">wax-2.bin</a>" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let policy = SitePolicy::empty().with_json_index_hosts(["127.0.0.1"]);
    let loader = create_loader(&policy, Duration::from_secs(2));
    let document = loader.load(&root(&server)).await.expect("index should load");

    let links = document.links(&policy);
    let hrefs: Vec<_> = links.iter().map(|l| l.href.clone()).collect();
    assert_eq!(
        hrefs,
        [
            format!("{}/wax-1.bin", server.uri()),
            format!("{}/nested/wax-2.bin", server.uri())
        ]
    );
    assert!(links.iter().all(|l| l.text == JSON_INDEX_LINK_TEXT));
}

#[tokio::test]
async fn test_failed_json_index_falls_back_to_html() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/snapshots.json"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(r#"<a href="/wax.bin">wax</a>"#, "text/html"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let policy = SitePolicy::empty().with_json_index_hosts(["127.0.0.1"]);
    let loader = create_loader(&policy, Duration::from_secs(2));
    let document = loader.load(&root(&server)).await.expect("HTML fallback should load");

    assert_eq!(document.links(&policy)[0].text, "wax");
}

#[tokio::test]
async fn test_malformed_json_index_falls_back_to_html() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/snapshots.json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{ not json", "application/json"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<p>listing</p>", "text/html"))
        .expect(1)
        .mount(&server)
        .await;

    let policy = SitePolicy::empty().with_json_index_hosts(["127.0.0.1"]);
    let loader = create_loader(&policy, Duration::from_secs(2));
    assert!(loader.load(&root(&server)).await.is_some());
}

#[tokio::test]
async fn test_loader_does_not_remember_pages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<p>hi</p>", "text/html"))
        .expect(2)
        .mount(&server)
        .await;

    let loader = create_loader(&SitePolicy::empty(), Duration::from_secs(2));
    assert!(loader.load(&root(&server)).await.is_some());
    assert!(loader.load(&root(&server)).await.is_some());
}
