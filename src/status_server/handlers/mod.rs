//! HTTP request handlers.

mod geo;
mod leaderboard;
mod network;
mod status;

pub use geo::geo_handler;
pub use leaderboard::leaderboard_handler;
pub use network::{map_handler, nodes_handler, stats_handler};
pub use status::{refresh_handler, status_handler};
