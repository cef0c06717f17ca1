// Shared test helpers for mock upstreams and component setup.
//
// The geo mock answers every batch query with coordinates derived from the
// queried address, so tests can predict results without listing them.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::{json, Value};
use wiremock::{Request, Respond, ResponseTemplate};

use pod_atlas::geo::{GeoCache, GeoResolver};
use pod_atlas::RegistryClient;

/// Builds a plain client for tests.
#[allow(dead_code)]
pub fn test_client() -> Arc<reqwest::Client> {
    Arc::new(
        reqwest::Client::builder()
            .user_agent("pod_atlas_test/1.0")
            .build()
            .expect("Failed to build test client"),
    )
}

/// Resolver pointed at `<server>/batch` with a fresh cache.
#[allow(dead_code)]
pub fn test_resolver(server_uri: &str) -> GeoResolver {
    GeoResolver::new(
        test_client(),
        format!("{}/batch", server_uri).parse().expect("Invalid mock URL"),
        GeoCache::new(),
    )
}

/// Registry client pointed at `<server>/rpc`.
#[allow(dead_code)]
pub fn test_registry(server_uri: &str) -> RegistryClient {
    RegistryClient::new(
        test_client(),
        format!("{}/rpc", server_uri).parse().expect("Invalid mock URL"),
        "get-pods-with-stats",
    )
}

/// `n` distinct IPv4 addresses.
#[allow(dead_code)]
pub fn distinct_ips(n: usize) -> Vec<String> {
    (0..n)
        .map(|i| format!("10.{}.{}.{}", i / 62500 % 256, i / 250 % 250, i % 250 + 1))
        .collect()
}

/// Coordinates the geo mock assigns to `ip`.
#[allow(dead_code)]
pub fn expected_coordinates(ip: &str) -> (f64, f64) {
    let octets: Vec<f64> = ip
        .split('.')
        .map(|o| o.parse::<f64>().unwrap_or(1.0))
        .collect();
    let last = octets.last().copied().unwrap_or(1.0);
    let third = octets.get(2).copied().unwrap_or(1.0);
    (1.0 + last / 10.0, 1.0 + third / 10.0)
}

/// Wiremock responder emulating the batch geolocation provider.
///
/// Addresses in `unresolved` come back with `lat: null`. Calls whose
/// zero-based index is in `fail_calls` get a 500.
#[derive(Default)]
pub struct GeoEcho {
    pub unresolved: HashSet<String>,
    pub fail_calls: HashSet<usize>,
    pub calls: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl GeoEcho {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_unresolved(mut self, ip: &str) -> Self {
        self.unresolved.insert(ip.to_string());
        self
    }

    pub fn failing_call(mut self, index: usize) -> Self {
        self.fail_calls.insert(index);
        self
    }
}

impl Respond for GeoEcho {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_calls.contains(&call) {
            return ResponseTemplate::new(500).set_body_string("upstream exploded");
        }

        let queries: Vec<Value> = match serde_json::from_slice(&request.body) {
            Ok(queries) => queries,
            Err(_) => return ResponseTemplate::new(400),
        };

        let entries: Vec<Value> = queries
            .iter()
            .filter_map(|q| q.get("query").and_then(Value::as_str))
            .map(|ip| {
                if self.unresolved.contains(ip) {
                    json!({"query": ip, "status": "fail", "message": "reserved range", "lat": null, "lon": null})
                } else {
                    let (lat, lon) = expected_coordinates(ip);
                    json!({"query": ip, "status": "success", "lat": lat, "lon": lon, "country": "Testland", "city": "Mockville"})
                }
            })
            .collect();

        ResponseTemplate::new(200).set_body_json(entries)
    }
}

/// JSON-RPC body carrying `pods`.
#[allow(dead_code)]
pub fn registry_body(pods: Value) -> Value {
    json!({"jsonrpc": "2.0", "id": 1, "result": {"pods": pods}})
}
