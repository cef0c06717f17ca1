//! IP geolocation through a batch provider.
//!
//! - `GeoCache`: process-lifetime memo of IP lookups, constructed explicitly
//!   and shared by handle
//! - `GeoResolver`: cache-first, chunked, paced upstream resolution with
//!   per-chunk failure isolation
//! - `group_nodes_by_coordinate`: turns resolved points and the current node
//!   list into map points

mod cache;
mod grouping;
mod provider;
mod resolver;
mod types;

// Re-export public API
pub use cache::GeoCache;
pub use grouping::{group_nodes_by_coordinate, MapPoint};
pub use provider::{parse_entry, EntryRejection};
pub use resolver::{ChunkFailure, ChunkOutcome, GeoResolver, Resolution};
pub use types::{GeoPoint, GeoRecord};
