//! Snapshot views: nodes, map points, statistics.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};

use super::super::types::StatusState;

/// Current node list
pub async fn nodes_handler(State(state): State<StatusState>) -> Response {
    let snapshot = state.monitor.snapshot();
    Json(&snapshot.nodes).into_response()
}

/// Current map points
pub async fn map_handler(State(state): State<StatusState>) -> Response {
    let snapshot = state.monitor.snapshot();
    Json(&snapshot.map_points).into_response()
}

/// Current network statistics
pub async fn stats_handler(State(state): State<StatusState>) -> Response {
    let snapshot = state.monitor.snapshot();
    Json(&snapshot.stats).into_response()
}
