//! HTTP API over the current network snapshot.
//!
//! Endpoints:
//! - `GET /nodes`, `GET /map`, `GET /stats` - views of the latest applied poll
//! - `GET /status` - poll progress, cache size and upstream failure counters
//! - `POST /refresh` - poll immediately
//! - `POST /geo` - resolve a JSON array of addresses through the shared cache
//! - `GET /leaderboard?network=mainnet|devnet` - pod credits, highest first
//!
//! The server runs in the background and does not block polling.

mod handlers;
mod types;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use handlers::{
    geo_handler, leaderboard_handler, map_handler, nodes_handler, refresh_handler,
    stats_handler, status_handler,
};
pub use types::StatusState;

/// Builds the API router.
pub fn router(state: StatusState) -> Router {
    Router::new()
        .route("/nodes", get(nodes_handler))
        .route("/map", get(map_handler))
        .route("/stats", get(stats_handler))
        .route("/status", get(status_handler))
        .route("/refresh", post(refresh_handler))
        .route("/geo", post(geo_handler))
        .route("/leaderboard", get(leaderboard_handler))
        .with_state(state)
}

/// Serves the API on an already-bound listener until `cancel` fires.
pub async fn serve(
    listener: TcpListener,
    state: StatusState,
    cancel: CancellationToken,
) -> Result<(), anyhow::Error> {
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await
        .map_err(|e| anyhow::anyhow!("Status server error: {}", e))
}

/// Binds `127.0.0.1:<port>` and serves the API until `cancel` fires.
pub async fn start_status_server(
    port: u16,
    state: StatusState,
    cancel: CancellationToken,
) -> Result<(), anyhow::Error> {
    let listener = TcpListener::bind(format!("127.0.0.1:{}", port))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind status server to port {}: {}", port, e))?;

    log::info!("Status server listening on http://127.0.0.1:{}/", port);
    log::info!("  - Map points: http://127.0.0.1:{}/map", port);
    log::info!("  - Status: http://127.0.0.1:{}/status", port);

    serve(listener, state, cancel).await
}
