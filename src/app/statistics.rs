//! Statistics printing.

use log::info;

use crate::error_handling::ProcessingStats;
use crate::monitor::NetworkSnapshot;
use crate::network_stats::format_bytes;

/// Logs upstream failure counts, if any.
pub fn print_error_statistics(error_stats: &ProcessingStats) {
    let total_errors = error_stats.total_errors();
    if total_errors > 0 {
        info!("Error Counts ({} total):", total_errors);
        for (name, count) in error_stats.snapshot() {
            info!("   {}: {}", name, count);
        }
    }
}

/// Logs the headline numbers of a snapshot.
pub fn print_snapshot_summary(snapshot: &NetworkSnapshot) {
    let stats = &snapshot.stats;
    info!(
        "Nodes: {} ({} public, {} private, {} not recently seen)",
        stats.total_nodes,
        stats.status.public_rpc,
        stats.status.private,
        stats.status.not_recently_seen
    );
    info!(
        "Storage: {} used of {} committed ({:.2}%) across {} node(s)",
        format_bytes(stats.storage.total_used),
        format_bytes(stats.storage.total_committed),
        stats.storage.utilization_percent,
        stats.storage.nodes_with_storage
    );
    info!(
        "Health: {} ({}% active)",
        stats.health.label, stats.health.score
    );
    if let Some(top) = stats.versions.first() {
        info!("Most common version: {} ({} node(s))", top.name, top.value);
    }
    let located: usize = snapshot
        .map_points
        .iter()
        .map(|p| p.node_pubkeys.len())
        .sum();
    info!(
        "Map: {} point(s) covering {} node(s)",
        snapshot.map_points.len(),
        located
    );
}
