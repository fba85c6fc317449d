//! Integration tests for the throughput tester
//!
//! wiremock cannot pace a response body, so the rate-sensitive tests use a
//! small TCP server that writes a fixed chunk on a fixed interval.

use snapshot_scout::config::SpeedTestConfig;
use snapshot_scout::crawler::SnapshotCandidate;
use snapshot_scout::speedtest::{transfer_rate_mbps, Measurement, TestStatus, ThroughputTester};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::time::MissedTickBehavior;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CHUNK_SIZE: usize = 16 * 1024;
const CHUNK_INTERVAL: Duration = Duration::from_millis(10);
const BINARY_HEADERS: &str = concat!(
    "HTTP/1.1 200 OK\r\n",
    "Content-Type: application/octet-stream\r\n",
    "Connection: close\r\n\r\n",
);

/// Streams `CHUNK_SIZE` bytes every `CHUNK_INTERVAL` until the client goes away
async fn paced_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                if socket.write_all(BINARY_HEADERS.as_bytes()).await.is_err() {
                    return;
                }

                let payload = vec![0x5au8; CHUNK_SIZE];
                let mut ticker = tokio::time::interval(CHUNK_INTERVAL);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Burst);
                // Hard stop after a minute in case the client never disconnects
                for _ in 0..6_000 {
                    ticker.tick().await;
                    if socket.write_all(&payload).await.is_err() {
                        return;
                    }
                }
            });
        }
    });

    addr
}

/// Accepts connections, sends headers, then never sends a body
async fn silent_server(send_headers: bool) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                if send_headers {
                    let _ = socket.write_all(BINARY_HEADERS.as_bytes()).await;
                }
                tokio::time::sleep(Duration::from_secs(30)).await;
            });
        }
    });

    addr
}

fn create_tester(duration_ms: u64, timeout_grace_ms: u64) -> ThroughputTester {
    let config = SpeedTestConfig {
        duration_ms,
        timeout_grace_ms,
    };
    ThroughputTester::new(&config, "TestScout/1.0").expect("Failed to build tester")
}

fn candidate(url: String) -> SnapshotCandidate {
    SnapshotCandidate::new("fixture", Some(url))
}

#[tokio::test]
async fn test_measures_fixed_rate_stream() {
    let addr = paced_server().await;
    let tester = create_tester(2_000, 5_000);

    let started = Instant::now();
    let result = tester.measure(&candidate(format!("http://{}/wax.bin", addr))).await;
    let elapsed = started.elapsed();

    let expected = transfer_rate_mbps(CHUNK_SIZE as u64, CHUNK_INTERVAL);
    let measured = result.speed_mbps.expect("successful test reports a speed");

    assert_eq!(result.status, TestStatus::Success);
    assert!(
        (measured - expected).abs() / expected < 0.05,
        "measured {:.3} Mbps, expected {:.3} Mbps",
        measured,
        expected
    );
    // The transfer is cut off at the window, not run to completion
    assert!(elapsed < Duration::from_secs(4));
}

#[tokio::test]
async fn test_progress_is_monotonic_and_matches_result() {
    let addr = paced_server().await;
    let samples: Arc<Mutex<Vec<Measurement>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = samples.clone();
    let tester = create_tester(500, 5_000).with_progress(Arc::new(move |m: &Measurement| {
        sink.lock().unwrap().push(*m);
    }));

    let result = tester.measure(&candidate(format!("http://{}/wax.bin", addr))).await;
    assert!(result.is_success());

    let samples = samples.lock().unwrap();
    assert!(samples.len() > 1);
    assert!(samples.windows(2).all(|w| w[0].bytes <= w[1].bytes));

    let last = samples.last().unwrap();
    assert_eq!(result.bytes_received, Some(last.bytes));
    let speed = result.speed_mbps.unwrap();
    assert!((speed - transfer_rate_mbps(last.bytes, last.elapsed)).abs() < 1e-9);
}

#[tokio::test]
async fn test_short_body_is_a_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wax.bin"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(vec![1u8; 100_000], "application/octet-stream"),
        )
        .mount(&server)
        .await;

    let tester = create_tester(2_000, 1_000);
    let started = Instant::now();
    let result = tester.measure(&candidate(format!("{}/wax.bin", server.uri()))).await;

    assert!(result.is_success());
    assert_eq!(result.bytes_received, Some(100_000));
    assert!(result.speed_mbps.unwrap() > 0.0);
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn test_error_status_is_an_error_result() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let tester = create_tester(1_000, 1_000);
    let result = tester.measure(&candidate(format!("{}/wax.bin", server.uri()))).await;

    assert_eq!(result.status, TestStatus::Error);
    assert_eq!(result.error.as_deref(), Some("HTTP 404"));
    assert!(result.bytes_received.is_none());
}

#[tokio::test]
async fn test_silent_body_ends_at_the_window() {
    let addr = silent_server(true).await;
    let tester = create_tester(500, 5_000);

    let started = Instant::now();
    let result = tester.measure(&candidate(format!("http://{}/wax.bin", addr))).await;

    assert_eq!(result.status, TestStatus::Error);
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn test_missing_headers_hit_the_request_timeout() {
    let addr = silent_server(false).await;
    let tester = create_tester(300, 300);

    let started = Instant::now();
    let result = tester.measure(&candidate(format!("http://{}/wax.bin", addr))).await;

    assert_eq!(result.status, TestStatus::Error);
    assert!(result.error.is_some());
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn test_connection_refused_is_an_error_result() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let tester = create_tester(500, 500);
    let result = tester.measure(&candidate(format!("http://{}/wax.bin", addr))).await;

    assert_eq!(result.status, TestStatus::Error);
    assert_eq!(result.url, format!("http://{}/wax.bin", addr));
}
