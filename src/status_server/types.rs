//! Status server data structures.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use crate::leaderboard::LeaderboardClient;
use crate::monitor::NetworkMonitor;

/// Shared state for the status server
#[derive(Clone)]
pub struct StatusState {
    /// Poll loop and snapshot owner
    pub monitor: NetworkMonitor,
    /// Credits API client
    pub leaderboard: LeaderboardClient,
    /// Server start, for `uptime_seconds`
    pub start_time: Arc<Instant>,
}

impl StatusState {
    /// Wraps the shared components; the uptime clock starts now.
    pub fn new(monitor: NetworkMonitor, leaderboard: LeaderboardClient) -> Self {
        Self {
            monitor,
            leaderboard,
            start_time: Arc::new(Instant::now()),
        }
    }
}

/// JSON response for `/status` and `/refresh`
#[derive(Serialize)]
pub struct StatusResponse {
    /// Completion time of the applied poll
    pub last_updated: Option<DateTime<Utc>>,
    /// Registry method and host
    pub data_source: String,
    /// Sequence number of the applied poll
    pub sequence: u64,
    /// Error of the latest failed poll, if not yet superseded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    /// Nodes in the snapshot
    pub nodes: usize,
    /// Map points in the snapshot
    pub map_points: usize,
    /// Addresses in the geo cache
    pub geo_cache_entries: usize,
    /// Seconds since the server started
    pub uptime_seconds: f64,
    /// Upstream failure counters
    pub errors: ErrorCounts,
}

/// Upstream failure counters by category.
#[derive(Serialize)]
pub struct ErrorCounts {
    /// Sum of all counters
    pub total: usize,
    /// Non-zero counters by display name
    pub by_type: BTreeMap<&'static str, usize>,
}

/// Body of every error response
#[derive(Serialize)]
pub struct ErrorBody {
    /// Error message
    pub error: String,
}
