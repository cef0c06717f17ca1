//! Geolocation proxy handler.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::super::types::{ErrorBody, StatusState};

/// Resolves a JSON array of addresses through the shared cache.
///
/// Anything other than a non-empty array of strings is `400 Invalid input`.
/// Partial resolution is not an error: unresolved addresses are simply absent.
pub async fn geo_handler(State(state): State<StatusState>, body: Bytes) -> Response {
    let ips: Vec<String> = match serde_json::from_slice(&body) {
        Ok(ips) => ips,
        Err(_) => return invalid_input(),
    };
    if ips.is_empty() {
        return invalid_input();
    }

    let resolution = state.monitor.resolver().resolve(&ips).await;
    for failure in resolution.failed_chunks() {
        state.monitor.error_stats().increment_error(failure.kind);
    }
    Json(resolution.points).into_response()
}

fn invalid_input() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody {
            error: "Invalid input".to_string(),
        }),
    )
        .into_response()
}
