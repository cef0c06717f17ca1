//! Main application modules.
//!
//! Shutdown handling and summary printing used by the run loop.

pub mod shutdown;
pub mod statistics;

// Re-export public API
pub use shutdown::shutdown_gracefully;
pub use statistics::{print_error_statistics, print_snapshot_summary};
