//! Pod registry access.
//!
//! The registry is polled over JSON-RPC for the complete pod list. Responses
//! are validated into `NodeRecord`s at this boundary and deduplicated by
//! public key.

mod client;
mod endpoint;
mod types;

// Re-export public API
pub use client::RegistryClient;
pub use endpoint::{endpoint_host, is_mappable_host, unique_mappable_ips};
pub use types::{dedup_by_pubkey, extract_pods, parse_pod, NodeRecord};
