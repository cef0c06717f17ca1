//! JSON-RPC client for the pod registry.

use std::sync::Arc;

use log::debug;
use serde::Serialize;
use url::Url;

use super::types::{dedup_by_pubkey, extract_pods, parse_pod, NodeRecord};
use crate::error_handling::RegistryError;

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: &'static [()],
}

/// Fetches the full pod list. There is no delta protocol: every call returns
/// the complete current set.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    client: Arc<reqwest::Client>,
    endpoint: Url,
    method: String,
}

impl RegistryClient {
    /// Creates a client calling `method` on `endpoint`.
    pub fn new(client: Arc<reqwest::Client>, endpoint: Url, method: impl Into<String>) -> Self {
        Self {
            client,
            endpoint,
            method: method.into(),
        }
    }

    /// Human-readable description of where nodes come from.
    pub fn source(&self) -> String {
        format!(
            "{} via {}",
            self.method,
            self.endpoint.host_str().unwrap_or("registry")
        )
    }

    /// Fetches, validates, and deduplicates the current pod list.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError` on transport failure, non-success status, a
    /// JSON-RPC error object, or a body without a recognizable pod list.
    pub async fn fetch_nodes(&self) -> Result<Vec<NodeRecord>, RegistryError> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: 1,
            method: &self.method,
            params: &[],
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RegistryError::Status(status.as_u16()));
        }

        let body: serde_json::Value = response.json().await?;
        let pods = extract_pods(body)?;
        let received = pods.len();

        let nodes: Vec<NodeRecord> = pods.into_iter().filter_map(parse_pod).collect();
        let rejected = received - nodes.len();
        if rejected > 0 {
            debug!(
                "Rejected {} pod entr(ies) that are not objects or lack a public key",
                rejected
            );
        }

        let nodes = dedup_by_pubkey(nodes);
        debug!(
            "Registry returned {} pod(s), {} unique",
            received,
            nodes.len()
        );
        Ok(nodes)
    }
}
