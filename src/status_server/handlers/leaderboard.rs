//! Leaderboard proxy handler.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use super::super::types::{ErrorBody, StatusState};
use crate::leaderboard::Network;

/// Query string of `/leaderboard`.
#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    /// `mainnet` (default) or anything else for devnet
    pub network: Option<String>,
}

/// Pod credits for `?network=mainnet|devnet`, highest first
pub async fn leaderboard_handler(
    State(state): State<StatusState>,
    Query(query): Query<LeaderboardQuery>,
) -> Response {
    let network = Network::from_param(query.network.as_deref());
    match state.leaderboard.fetch(network).await {
        Ok(entries) => Json(entries).into_response(),
        Err(e) => {
            log::error!("Error fetching leaderboard data: {}", e);
            state.monitor.error_stats().increment_error(e.error_type());
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody {
                    error: "Failed to fetch leaderboard data".to_string(),
                }),
            )
                .into_response()
        }
    }
}
