//! Configuration constants.
//!
//! This module defines the constants used throughout the application,
//! including upstream limits, polling cadence, and default endpoints.

use std::time::Duration;

// Geolocation batching
/// Maximum number of queries per batch request.
/// This is the upstream provider's documented per-request limit, not a tunable.
pub const GEO_BATCH_SIZE: usize = 100;
/// Delay between consecutive batch requests within one resolution.
/// Not applied after the last chunk.
pub const GEO_BATCH_DELAY: Duration = Duration::from_millis(500);
/// Fields requested for every query in a batch request.
pub const GEO_QUERY_FIELDS: &str = "lat,lon,country,city,query";

// Polling
/// Interval between automatic registry polls
pub const POLL_INTERVAL: Duration = Duration::from_secs(30);

// Node freshness thresholds (seconds)
/// Nodes last seen within this window count as active for the health score
pub const ACTIVE_WINDOW_SECS: i64 = 15 * 60;
/// Nodes last seen before this window are reported as "not recently seen"
pub const STALE_WINDOW_SECS: i64 = 60 * 60;

// Network operation timeouts
/// Overall per-request HTTP timeout in seconds
pub const HTTP_TIMEOUT_SECS: u64 = 10;
/// TCP connection timeout in seconds
pub const TCP_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Default User-Agent string for upstream requests.
pub const DEFAULT_USER_AGENT: &str = concat!("pod_atlas/", env!("CARGO_PKG_VERSION"));

// Upstream endpoints (overridable from the CLI or environment)
/// JSON-RPC endpoint of the pod registry
pub const DEFAULT_RPC_URL: &str = "https://api.devnet.xandeum.com:8899";
/// JSON-RPC method returning the pod list
pub const DEFAULT_RPC_METHOD: &str = "get-pods-with-stats";
/// Batch geolocation endpoint
pub const DEFAULT_GEO_URL: &str = "http://ip-api.com/batch";
/// Pod credits for mainnet
pub const DEFAULT_LEADERBOARD_MAINNET_URL: &str =
    "https://podcredits.xandeum.network/api/mainnet-pod-credits";
/// Pod credits for devnet
pub const DEFAULT_LEADERBOARD_DEVNET_URL: &str =
    "https://podcredits.xandeum.network/api/pods-credits";

/// Default port for the HTTP API
pub const DEFAULT_PORT: u16 = 8080;
