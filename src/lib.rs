//! pod_atlas library: pod registry polling and batched IP geolocation
//!
//! This library polls a storage network's pod registry, resolves pod
//! endpoints to coordinates through a cache-first batch geolocation client,
//! groups pods that share a coordinate into map points, and serves the result
//! (plus dashboard statistics and the credits leaderboard) as JSON.
//!
//! # Example
//!
//! ```no_run
//! use pod_atlas::{run_monitor, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     once: true,
//!     ..Default::default()
//! };
//!
//! let report = run_monitor(config).await?;
//! println!("{} nodes on {} map points", report.nodes, report.map_points);
//! # Ok(())
//! # }
//! ```
//!
//! The geolocation layer can be used on its own:
//!
//! ```no_run
//! use std::sync::Arc;
//! use pod_atlas::geo::{GeoCache, GeoResolver};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let resolver = GeoResolver::new(
//!     Arc::new(reqwest::Client::new()),
//!     "http://ip-api.com/batch".parse()?,
//!     GeoCache::new(),
//! );
//! let resolution = resolver.resolve(&["1.1.1.1", "8.8.8.8"]).await;
//! println!("{} located", resolution.points.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime.

#![warn(missing_docs)]

mod app;
pub mod config;
pub mod error_handling;
pub mod geo;
pub mod initialization;
pub mod leaderboard;
pub mod monitor;
pub mod network_stats;
pub mod registry;
pub mod status_server;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel};
pub use geo::{GeoCache, GeoPoint, GeoRecord, GeoResolver, MapPoint, Resolution};
pub use monitor::{NetworkMonitor, NetworkSnapshot, PollReport};
pub use registry::{NodeRecord, RegistryClient};
pub use run::{run_monitor, RunReport};

// Internal run module (wires the components together)
mod run {
    use std::sync::Arc;
    use std::time::Instant;

    use anyhow::{Context, Result};
    use chrono::{DateTime, Utc};
    use log::info;
    use tokio_util::sync::CancellationToken;

    use crate::app::{print_error_statistics, print_snapshot_summary, shutdown_gracefully};
    use crate::config::Config;
    use crate::error_handling::ProcessingStats;
    use crate::geo::{GeoCache, GeoResolver};
    use crate::initialization::init_client;
    use crate::leaderboard::LeaderboardClient;
    use crate::monitor::NetworkMonitor;
    use crate::registry::RegistryClient;
    use crate::status_server::{start_status_server, StatusState};

    /// Results of a monitoring run.
    #[derive(Debug, Clone)]
    pub struct RunReport {
        /// Nodes in the last applied snapshot
        pub nodes: usize,
        /// Map points in the last applied snapshot
        pub map_points: usize,
        /// Sequence number of the last applied poll
        pub sequence: u64,
        /// Completion time of the last applied poll
        pub last_updated: Option<DateTime<Utc>>,
        /// Error of the most recent failed poll, if it was not followed by a success
        pub last_error: Option<String>,
        /// Elapsed time in seconds
        pub elapsed_seconds: f64,
    }

    /// Builds the shared cache, clients and monitor from `config`.
    fn build_monitor(config: &Config, client: Arc<reqwest::Client>) -> NetworkMonitor {
        let registry = RegistryClient::new(
            client.clone(),
            config.rpc_url.clone(),
            config.rpc_method.clone(),
        );
        let resolver = GeoResolver::new(client, config.geo_url.clone(), GeoCache::new());
        NetworkMonitor::new(registry, resolver, Arc::new(ProcessingStats::new()))
    }

    /// Runs the monitor with the provided configuration.
    ///
    /// With `config.once` set, performs a single poll and returns. Otherwise
    /// polls every `POLL_INTERVAL` and serves the HTTP API on `config.port`
    /// until Ctrl-C.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The HTTP client cannot be built
    /// - In `once` mode, the registry cannot be polled
    /// - The status server cannot bind its port
    pub async fn run_monitor(config: Config) -> Result<RunReport> {
        let start = Instant::now();
        let client = init_client(&config).context("Failed to initialize HTTP client")?;
        let monitor = build_monitor(&config, client.clone());

        if config.once {
            monitor
                .poll_once()
                .await
                .context("Failed to fetch pods from the registry")?;
        } else {
            let leaderboard = LeaderboardClient::new(
                client,
                config.leaderboard_mainnet_url.clone(),
                config.leaderboard_devnet_url.clone(),
            );
            let cancel = CancellationToken::new();
            let state = StatusState::new(monitor.clone(), leaderboard);

            let mut server = tokio::spawn(start_status_server(config.port, state, cancel.clone()));
            let poller = {
                let monitor = monitor.clone();
                let cancel = cancel.clone();
                tokio::spawn(async move { monitor.run(cancel).await })
            };

            let server_exit = tokio::select! {
                signal = tokio::signal::ctrl_c() => {
                    signal.context("Failed to listen for Ctrl-C")?;
                    info!("Shutdown requested");
                    None
                }
                joined = &mut server => Some(joined),
            };

            match server_exit {
                None => shutdown_gracefully(cancel, poller, Some(server)).await,
                Some(joined) => {
                    shutdown_gracefully(cancel, poller, None).await;
                    joined.context("Status server task panicked")??;
                }
            }
        }

        let snapshot = monitor.snapshot();
        print_snapshot_summary(&snapshot);
        print_error_statistics(monitor.error_stats());

        Ok(RunReport {
            nodes: snapshot.nodes.len(),
            map_points: snapshot.map_points.len(),
            sequence: snapshot.sequence,
            last_updated: snapshot.last_updated,
            last_error: snapshot.last_error.clone(),
            elapsed_seconds: start.elapsed().as_secs_f64(),
        })
    }
}
