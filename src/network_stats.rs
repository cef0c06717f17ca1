//! Dashboard aggregates over one poll's nodes and resolved addresses.

use std::collections::HashMap;

use serde::Serialize;

use crate::config::{ACTIVE_WINDOW_SECS, STALE_WINDOW_SECS};
use crate::geo::GeoPoint;
use crate::registry::NodeRecord;

/// Number of named countries/cities before the tail is folded away.
const TOP_LOCATIONS: usize = 10;

/// Storage totals across all nodes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StorageSummary {
    /// Committed bytes
    pub total_committed: u64,
    /// Used bytes
    pub total_used: u64,
    /// Committed minus used, never negative
    pub available: u64,
    /// Used as a percentage of committed (0 when nothing is committed)
    pub utilization_percent: f64,
    /// Nodes committing any storage
    pub nodes_with_storage: usize,
}

/// How many nodes are in each visibility state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusDistribution {
    /// Seen within the hour and exposing a public RPC
    pub public_rpc: usize,
    /// Seen within the hour, private
    pub private: usize,
    /// Last seen more than an hour ago
    pub not_recently_seen: usize,
}

/// Activity of the network.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthSummary {
    /// Nodes seen within the active window
    pub active_nodes: usize,
    /// Rounded percentage of nodes seen within the active window
    pub score: u32,
    /// `Excellent`, `Good`, `Fair` or `Poor`
    pub label: &'static str,
    /// Rounded percentage of public nodes
    pub public_rpc_percent: u32,
}

/// A named count, used for every distribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bucket {
    /// Display name
    pub name: String,
    /// Count
    pub value: usize,
}

impl Bucket {
    fn new(name: impl Into<String>, value: usize) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Aggregates rendered by the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkStats {
    /// Nodes in the snapshot
    pub total_nodes: usize,
    /// Storage totals
    pub storage: StorageSummary,
    /// Visibility breakdown
    pub status: StatusDistribution,
    /// Activity score
    pub health: HealthSummary,
    /// Nodes per version, most common first
    pub versions: Vec<Bucket>,
    /// Nodes per uptime range, shortest first
    pub uptime: Vec<Bucket>,
    /// Resolved addresses per country, top ten plus `Others`
    pub countries: Vec<Bucket>,
    /// Resolved addresses per city, top ten
    pub cities: Vec<Bucket>,
}

impl NetworkStats {
    /// Computes every aggregate. `now` is epoch seconds.
    ///
    /// Country and city counts are per resolved address, so two hosts placed
    /// at the same coordinate count twice.
    pub fn compute(nodes: &[NodeRecord], points: &[GeoPoint], now: i64) -> Self {
        Self {
            total_nodes: nodes.len(),
            storage: storage_summary(nodes),
            status: status_distribution(nodes, now),
            health: health_summary(nodes, now),
            versions: version_distribution(nodes),
            uptime: uptime_buckets(nodes),
            countries: country_distribution(points),
            cities: city_distribution(points),
        }
    }
}

fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        0
    } else {
        ((part as f64 / whole as f64) * 100.0).round() as u32
    }
}

fn storage_summary(nodes: &[NodeRecord]) -> StorageSummary {
    let total_committed = nodes
        .iter()
        .map(|n| n.storage_committed)
        .fold(0u64, u64::saturating_add);
    let total_used = nodes
        .iter()
        .map(|n| n.storage_used)
        .fold(0u64, u64::saturating_add);
    let utilization_percent = if total_committed > 0 {
        total_used as f64 / total_committed as f64 * 100.0
    } else {
        0.0
    };
    StorageSummary {
        total_committed,
        total_used,
        available: total_committed.saturating_sub(total_used),
        utilization_percent,
        nodes_with_storage: nodes.iter().filter(|n| n.storage_committed > 0).count(),
    }
}

fn status_distribution(nodes: &[NodeRecord], now: i64) -> StatusDistribution {
    let stale_before = now - STALE_WINDOW_SECS;
    let mut status = StatusDistribution {
        public_rpc: 0,
        private: 0,
        not_recently_seen: 0,
    };
    for node in nodes {
        match node.last_seen_timestamp {
            Some(ts) if ts < stale_before => status.not_recently_seen += 1,
            _ if node.is_public => status.public_rpc += 1,
            _ => status.private += 1,
        }
    }
    status
}

fn health_label(score: u32) -> &'static str {
    match score {
        s if s > 80 => "Excellent",
        s if s > 60 => "Good",
        s if s > 40 => "Fair",
        _ => "Poor",
    }
}

fn health_summary(nodes: &[NodeRecord], now: i64) -> HealthSummary {
    let active_after = now - ACTIVE_WINDOW_SECS;
    let active_nodes = nodes
        .iter()
        .filter(|n| n.last_seen_timestamp.is_some_and(|ts| ts > active_after))
        .count();
    let score = percent(active_nodes, nodes.len());
    let public = nodes.iter().filter(|n| n.is_public).count();
    HealthSummary {
        active_nodes,
        score,
        label: health_label(score),
        public_rpc_percent: percent(public, nodes.len()),
    }
}

/// Sorts by count descending, then name, so output is deterministic.
fn sorted_buckets(counts: HashMap<String, usize>) -> Vec<Bucket> {
    let mut buckets: Vec<Bucket> = counts
        .into_iter()
        .map(|(name, value)| Bucket::new(name, value))
        .collect();
    buckets.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.name.cmp(&b.name)));
    buckets
}

fn version_distribution(nodes: &[NodeRecord]) -> Vec<Bucket> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for node in nodes {
        let version = if node.version.trim().is_empty() {
            "Unknown"
        } else {
            node.version.as_str()
        };
        *counts.entry(version.to_string()).or_default() += 1;
    }
    sorted_buckets(counts)
}

fn uptime_buckets(nodes: &[NodeRecord]) -> Vec<Bucket> {
    const HOUR: u64 = 3_600;
    const DAY: u64 = 86_400;
    const WEEK: u64 = 604_800;

    let mut counts = [0usize; 4];
    for node in nodes {
        let slot = match node.uptime {
            u if u < HOUR => 0,
            u if u < DAY => 1,
            u if u < WEEK => 2,
            _ => 3,
        };
        counts[slot] += 1;
    }
    ["< 1h", "1h - 24h", "1d - 7d", "> 7d"]
        .iter()
        .zip(counts)
        .map(|(name, value)| Bucket::new(*name, value))
        .collect()
}

fn country_distribution(points: &[GeoPoint]) -> Vec<Bucket> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for country in points.iter().filter_map(|p| p.record.country.as_deref()) {
        *counts.entry(country.to_string()).or_default() += 1;
    }
    let mut sorted = sorted_buckets(counts);
    if sorted.len() > TOP_LOCATIONS {
        let others: usize = sorted.split_off(TOP_LOCATIONS).iter().map(|b| b.value).sum();
        sorted.push(Bucket::new("Others", others));
    }
    sorted
}

fn city_distribution(points: &[GeoPoint]) -> Vec<Bucket> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for city in points.iter().filter_map(|p| p.record.city.as_deref()) {
        *counts.entry(city.to_string()).or_default() += 1;
    }
    let mut sorted = sorted_buckets(counts);
    sorted.truncate(TOP_LOCATIONS);
    sorted
}

/// Formats a byte count with 1024-based units, e.g. `1.5 GB`.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];
    if bytes == 0 {
        return "0 B".to_string();
    }
    let mut exponent = 0;
    let mut value = bytes as f64;
    while value >= 1024.0 && exponent < UNITS.len() - 1 {
        value /= 1024.0;
        exponent += 1;
    }
    let rounded = format!("{:.2}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[exponent])
}
