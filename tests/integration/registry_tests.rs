//! Integration tests for the producer registry source

use reqwest::Client;
use snapshot_scout::providers::{ProducerRegistry, Provider, ProviderSource, RegistryError};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn producer(name: &str, resources: &str) -> serde_json::Value {
    let json = serde_json::json!({
        "producer_account_name": name,
        "org": { "candidate_name": name, "chain_resources": resources }
    });
    serde_json::json!({ "owner": name, "json": json.to_string() })
}

#[tokio::test]
async fn test_reads_producers_from_table() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chain/get_table_rows"))
        .and(body_partial_json(serde_json::json!({
            "json": true,
            "code": "producerjson",
            "scope": "producerjson",
            "table": "producerjson",
            "limit": 25
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "rows": [
                producer("alpha", "https://snapshots.alpha.io/"),
                producer("beta", ""),
                { "owner": "broken", "json": "{oops" },
                producer("gamma", "(https://gamma.io/wax/) ")
            ],
            "more": false,
            "next_key": ""
        })))
        .expect(1)
        .mount(&server)
        .await;

    let registry = ProducerRegistry::with_client(Client::new(), &server.uri(), 25).unwrap();
    let providers = registry.fetch().await.expect("registry read failed");

    assert_eq!(
        providers,
        vec![
            Provider::new("alpha", "https://snapshots.alpha.io/"),
            Provider::new("gamma", "https://gamma.io/wax/"),
        ]
    );
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let registry = ProducerRegistry::with_client(Client::new(), &server.uri(), 100).unwrap();
    let result = registry.fetch().await;

    assert!(matches!(result, Err(RegistryError::Status(503))));
}

#[tokio::test]
async fn test_malformed_response_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("<html>maintenance</html>", "text/html"),
        )
        .mount(&server)
        .await;

    let registry = ProducerRegistry::with_client(Client::new(), &server.uri(), 100).unwrap();
    assert!(matches!(registry.fetch().await, Err(RegistryError::Response(_))));
}

#[tokio::test]
async fn test_empty_table() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "rows": [] })))
        .mount(&server)
        .await;

    let registry = ProducerRegistry::with_client(Client::new(), &server.uri(), 100).unwrap();
    assert!(registry.fetch().await.unwrap().is_empty());
    assert!(registry.describe().contains("127.0.0.1"));
}
