//! Network poll cycle.
//!
//! Every poll fetches the full pod list, resolves the unique endpoint
//! addresses through the shared geo cache, groups nodes by coordinate,
//! computes dashboard statistics and publishes a `NetworkSnapshot`.
//!
//! Polls may overlap (a manual refresh while the timer fires). Each poll takes
//! a sequence number when it starts, and its result is applied only if no newer
//! poll has been applied in the meantime.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::Serialize;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::config::POLL_INTERVAL;
use crate::error_handling::{ProcessingStats, RegistryError};
use crate::geo::{group_nodes_by_coordinate, GeoResolver, MapPoint, Resolution};
use crate::network_stats::NetworkStats;
use crate::registry::{unique_mappable_ips, NodeRecord, RegistryClient};

/// Everything the API serves, as of one applied poll.
#[derive(Debug, Clone, Serialize)]
pub struct NetworkSnapshot {
    /// Nodes from the registry, deduplicated by public key
    pub nodes: Vec<NodeRecord>,
    /// One entry per distinct coordinate
    pub map_points: Vec<MapPoint>,
    /// Dashboard aggregates
    pub stats: NetworkStats,
    /// When the poll that produced this snapshot finished; `None` before the first
    pub last_updated: Option<DateTime<Utc>>,
    /// Registry method and host the nodes came from
    pub data_source: String,
    /// Sequence number of the poll that produced this snapshot (0 before the first)
    pub sequence: u64,
    /// Error of the most recent failed poll, cleared by the next success
    pub last_error: Option<String>,
}

impl NetworkSnapshot {
    fn empty(data_source: String) -> Self {
        Self {
            nodes: Vec::new(),
            map_points: Vec::new(),
            stats: NetworkStats::compute(&[], &[], Utc::now().timestamp()),
            last_updated: None,
            data_source,
            sequence: 0,
            last_error: None,
        }
    }
}

/// Summary of one successful poll.
#[derive(Debug, Clone, Serialize)]
pub struct PollReport {
    /// Sequence number taken when the poll started
    pub sequence: u64,
    /// False when a newer poll had already been applied
    pub applied: bool,
    /// Nodes returned by the registry
    pub nodes: usize,
    /// Unique mappable endpoint addresses
    pub addresses: usize,
    /// Addresses with coordinates
    pub resolved: usize,
    /// Addresses served from the geo cache
    pub cache_hits: usize,
    /// Batch requests sent to the geo provider
    pub upstream_calls: usize,
    /// Batch requests that failed
    pub failed_chunks: usize,
    /// Map points built
    pub map_points: usize,
}

/// Polls the registry and owns the current snapshot.
///
/// Cheap to clone; clones share the snapshot, sequence counter and geo cache.
#[derive(Clone)]
pub struct NetworkMonitor {
    registry: RegistryClient,
    resolver: GeoResolver,
    error_stats: Arc<ProcessingStats>,
    snapshot: Arc<RwLock<Arc<NetworkSnapshot>>>,
    next_sequence: Arc<AtomicU64>,
    poll_interval: Duration,
}

impl NetworkMonitor {
    /// Creates a monitor with an empty snapshot. Polling starts with `run` or `poll_once`.
    pub fn new(
        registry: RegistryClient,
        resolver: GeoResolver,
        error_stats: Arc<ProcessingStats>,
    ) -> Self {
        let snapshot = NetworkSnapshot::empty(registry.source());
        Self {
            registry,
            resolver,
            error_stats,
            snapshot: Arc::new(RwLock::new(Arc::new(snapshot))),
            next_sequence: Arc::new(AtomicU64::new(0)),
            poll_interval: POLL_INTERVAL,
        }
    }

    /// Overrides the poll interval (defaults to `POLL_INTERVAL`).
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// The most recently applied snapshot.
    pub fn snapshot(&self) -> Arc<NetworkSnapshot> {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The geo resolver, shared with the `/geo` endpoint.
    pub fn resolver(&self) -> &GeoResolver {
        &self.resolver
    }

    /// Upstream failure counters.
    pub fn error_stats(&self) -> &Arc<ProcessingStats> {
        &self.error_stats
    }

    /// Runs one full poll cycle and publishes its snapshot.
    ///
    /// # Errors
    ///
    /// Returns the registry error if the pod list could not be fetched. The
    /// previous snapshot stays in place with `last_error` set. Geo failures are
    /// never errors; they only reduce the number of map points.
    pub async fn poll_once(&self) -> Result<PollReport, RegistryError> {
        let sequence = self.next_sequence.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("Starting poll #{}", sequence);

        let nodes = match self.registry.fetch_nodes().await {
            Ok(nodes) => nodes,
            Err(e) => {
                self.error_stats.increment_error(e.error_type());
                let message = e.to_string();
                self.apply(sequence, |current| NetworkSnapshot {
                    sequence,
                    last_error: Some(message),
                    ..current.clone()
                });
                return Err(e);
            }
        };

        let addresses = unique_mappable_ips(&nodes);
        let resolution = if addresses.is_empty() {
            Resolution::default()
        } else {
            self.resolver.resolve(&addresses).await
        };
        for failure in resolution.failed_chunks() {
            self.error_stats.increment_error(failure.kind);
        }

        let map_points = group_nodes_by_coordinate(&nodes, &resolution.points);
        let now = Utc::now();
        let stats = NetworkStats::compute(&nodes, &resolution.points, now.timestamp());

        let report = PollReport {
            sequence,
            applied: false,
            nodes: nodes.len(),
            addresses: addresses.len(),
            resolved: resolution.points.len(),
            cache_hits: resolution.cache_hits,
            upstream_calls: resolution.upstream_calls(),
            failed_chunks: resolution.failed_chunks().count(),
            map_points: map_points.len(),
        };

        let snapshot = NetworkSnapshot {
            nodes,
            map_points,
            stats,
            last_updated: Some(now),
            data_source: self.registry.source(),
            sequence,
            last_error: None,
        };
        let applied = self.apply(sequence, move |_| snapshot);

        info!(
            "Poll #{}: {} node(s), {} of {} address(es) located, {} map point(s){}",
            sequence,
            report.nodes,
            report.resolved,
            report.addresses,
            report.map_points,
            if applied { "" } else { " (stale, discarded)" }
        );

        Ok(PollReport { applied, ..report })
    }

    /// Polls immediately, outside the timer.
    pub async fn refresh(&self) -> Result<PollReport, RegistryError> {
        info!("Manual refresh requested");
        self.poll_once().await
    }

    /// Replaces the snapshot if `sequence` is newer than the applied one.
    fn apply<F>(&self, sequence: u64, build: F) -> bool
    where
        F: FnOnce(&NetworkSnapshot) -> NetworkSnapshot,
    {
        let mut current = self.snapshot.write().unwrap_or_else(PoisonError::into_inner);
        if sequence <= current.sequence {
            debug!(
                "Discarding result of poll #{}: poll #{} already applied",
                sequence, current.sequence
            );
            return false;
        }
        let next = build(current.as_ref());
        *current = Arc::new(next);
        true
    }

    /// Polls immediately and then every poll interval until `cancel` fires.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            tokio::select! {
                _ = cancel.cancelled() => break,
                result = self.poll_once() => {
                    if let Err(e) = result {
                        warn!("Poll failed, keeping previous snapshot: {}", e);
                    }
                }
            }
        }

        info!("Poll loop stopped");
    }
}
