//! JSON status and refresh handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::super::types::{ErrorBody, ErrorCounts, StatusResponse, StatusState};

fn build_status(state: &StatusState) -> StatusResponse {
    let snapshot = state.monitor.snapshot();
    let error_stats = state.monitor.error_stats();

    StatusResponse {
        last_updated: snapshot.last_updated,
        data_source: snapshot.data_source.clone(),
        sequence: snapshot.sequence,
        last_error: snapshot.last_error.clone(),
        nodes: snapshot.nodes.len(),
        map_points: snapshot.map_points.len(),
        geo_cache_entries: state.monitor.resolver().cache().len(),
        uptime_seconds: state.start_time.elapsed().as_secs_f64(),
        errors: ErrorCounts {
            total: error_stats.total_errors(),
            by_type: error_stats.snapshot().into_iter().collect(),
        },
    }
}

/// Poll progress, cache size and upstream failure counters
pub async fn status_handler(State(state): State<StatusState>) -> Response {
    Json(build_status(&state)).into_response()
}

/// Polls immediately and returns the resulting status.
///
/// A registry failure is reported as `502` with the error message; the
/// previous snapshot stays in place.
pub async fn refresh_handler(State(state): State<StatusState>) -> Response {
    match state.monitor.refresh().await {
        Ok(_) => Json(build_status(&state)).into_response(),
        Err(e) => (
            StatusCode::BAD_GATEWAY,
            Json(ErrorBody {
                error: e.to_string(),
            }),
        )
            .into_response(),
    }
}
