//! Error handling and failure statistics.
//!
//! This module provides:
//! - Error enums returned by the registry and leaderboard clients
//! - Initialization errors
//! - Categorization of `reqwest` errors into counted `ErrorType`s
//! - `ProcessingStats`, the shared counters exposed on `/status`

mod categorization;
mod stats;
mod types;

// Re-export public API
pub use categorization::categorize_reqwest_error;
pub use stats::ProcessingStats;
pub use types::{ErrorType, InitializationError, LeaderboardError, RegistryError};
