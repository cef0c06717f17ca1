//! Integration tests for the HTTP API
//!
//! Each test serves the router on an ephemeral port, with the registry, geo
//! provider and credits API mocked, and calls it over real HTTP.

mod helpers;

use std::sync::Arc;

use helpers::{registry_body, test_client, test_registry, test_resolver, GeoEcho};
use pod_atlas::error_handling::ProcessingStats;
use pod_atlas::leaderboard::LeaderboardClient;
use pod_atlas::status_server::{serve, StatusState};
use pod_atlas::NetworkMonitor;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct TestApi {
    base: String,
    monitor: NetworkMonitor,
    cancel: CancellationToken,
    http: reqwest::Client,
}

impl Drop for TestApi {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn start_api(upstream: &MockServer) -> TestApi {
    let monitor = NetworkMonitor::new(
        test_registry(&upstream.uri()),
        test_resolver(&upstream.uri()),
        Arc::new(ProcessingStats::new()),
    );
    let leaderboard = LeaderboardClient::new(
        test_client(),
        format!("{}/mainnet/credits", upstream.uri()).parse().unwrap(),
        format!("{}/devnet/credits", upstream.uri()).parse().unwrap(),
    );
    let state = StatusState::new(monitor.clone(), leaderboard);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let cancel = CancellationToken::new();
    tokio::spawn(serve(listener, state, cancel.clone()));

    TestApi {
        base,
        monitor,
        cancel,
        http: reqwest::Client::new(),
    }
}

async fn mount_upstreams(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/batch"))
        .respond_with(GeoEcho::new())
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rpc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(registry_body(json!([
            {"pubkey": "podA", "address": "1.2.3.4:9001", "is_public": true},
            {"pubkey": "podB", "address": "1.2.3.4:9002", "is_public": false}
        ]))))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_geo_rejects_invalid_input() {
    let upstream = MockServer::start().await;
    mount_upstreams(&upstream).await;
    let api = start_api(&upstream).await;

    for body in ["[]", "{\"ips\": []}", "not json", "[1, 2]"] {
        let response = api
            .http
            .post(format!("{}/geo", api.base))
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 400, "body {:?}", body);
        let json: Value = response.json().await.unwrap();
        assert_eq!(json, json!({"error": "Invalid input"}));
    }
}

#[tokio::test]
async fn test_geo_resolves_through_shared_cache() {
    let upstream = MockServer::start().await;
    mount_upstreams(&upstream).await;
    let api = start_api(&upstream).await;

    let response = api
        .http
        .post(format!("{}/geo", api.base))
        .json(&json!(["1.1.1.1", "1.1.1.1", "8.8.8.8"]))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let points: Vec<Value> = response.json().await.unwrap();
    assert_eq!(points.len(), 2);
    assert!(points.iter().all(|p| p["lat"].is_f64() && p["query"].is_string()));
    assert_eq!(api.monitor.resolver().cache().len(), 2);
}

#[tokio::test]
async fn test_refresh_then_map_and_status() {
    let upstream = MockServer::start().await;
    mount_upstreams(&upstream).await;
    let api = start_api(&upstream).await;

    let refresh = api
        .http
        .post(format!("{}/refresh", api.base))
        .send()
        .await
        .unwrap();
    assert_eq!(refresh.status(), 200);

    let map: Vec<Value> = api
        .http
        .get(format!("{}/map", api.base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(map.len(), 1);
    assert_eq!(map[0]["node_pubkeys"], json!(["podA", "podB"]));

    let nodes: Vec<Value> = api
        .http
        .get(format!("{}/nodes", api.base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(nodes.len(), 2);

    let stats: Value = api
        .http
        .get(format!("{}/stats", api.base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stats["total_nodes"], 2);

    let status: Value = api
        .http
        .get(format!("{}/status", api.base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(status["sequence"], 1);
    assert_eq!(status["nodes"], 2);
    assert_eq!(status["map_points"], 1);
    assert_eq!(status["geo_cache_entries"], 1);
    assert_eq!(status["errors"]["total"], 0);
    assert!(status.get("last_error").is_none());
}

#[tokio::test]
async fn test_refresh_reports_registry_failure() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rpc"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&upstream)
        .await;
    let api = start_api(&upstream).await;

    let response = api
        .http
        .post(format!("{}/refresh", api.base))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 502);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("500"));
    assert_eq!(
        api.monitor.snapshot().last_error.as_deref(),
        Some("Registry responded with status 500")
    );
}

#[tokio::test]
async fn test_leaderboard_is_sorted_and_defaults_to_mainnet() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/mainnet/credits"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "pods_credits": [
                {"pod_id": "low", "credits": 10.0},
                {"pod_id": "high", "credits": 900.5},
                {"pod_id": "mid", "credits": 120.0}
            ]
        })))
        .mount(&upstream)
        .await;
    Mock::given(method("GET"))
        .and(path("/devnet/credits"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "pods_credits": [{"pod_id": "dev", "credits": 1.0}]
        })))
        .mount(&upstream)
        .await;
    let api = start_api(&upstream).await;

    let mainnet: Vec<Value> = api
        .http
        .get(format!("{}/leaderboard", api.base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let ids: Vec<&str> = mainnet
        .iter()
        .map(|e| e["pod_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["high", "mid", "low"]);

    let devnet: Vec<Value> = api
        .http
        .get(format!("{}/leaderboard?network=devnet", api.base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(devnet, vec![json!({"pod_id": "dev", "credits": 1.0})]);
}

#[tokio::test]
async fn test_leaderboard_upstream_failure_is_500() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/mainnet/credits"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&upstream)
        .await;
    let api = start_api(&upstream).await;

    let response = api
        .http
        .get(format!("{}/leaderboard?network=mainnet", api.base))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 500);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"error": "Failed to fetch leaderboard data"}));
    assert_eq!(api.monitor.error_stats().total_errors(), 1);
}
