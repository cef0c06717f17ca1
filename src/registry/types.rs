//! Pod registry data structures and response validation.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::endpoint::endpoint_host;
use crate::error_handling::RegistryError;

/// One pod as reported by the registry, after validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeRecord {
    /// Identity key
    pub pubkey: String,
    /// Gossip endpoint, `host:port`
    pub address: String,
    /// Exposes a public RPC endpoint
    pub is_public: bool,
    /// Committed storage in bytes
    pub storage_committed: u64,
    /// Used storage in bytes
    pub storage_used: u64,
    /// Used as a percentage of committed
    pub storage_usage_percent: f64,
    /// Port of the pod's RPC service, when reported
    pub rpc_port: Option<u16>,
    /// Epoch seconds; `None` when the registry reported nothing (or zero)
    pub last_seen_timestamp: Option<i64>,
    /// Seconds
    pub uptime: u64,
    /// Software version; empty when unknown
    pub version: String,
}

impl NodeRecord {
    /// Host part of the endpoint, if any.
    pub fn ip(&self) -> Option<&str> {
        endpoint_host(&self.address)
    }

    #[cfg(test)]
    pub(crate) fn for_test(pubkey: &str, address: &str) -> Self {
        Self {
            pubkey: pubkey.to_string(),
            address: address.to_string(),
            is_public: false,
            storage_committed: 0,
            storage_used: 0,
            storage_usage_percent: 0.0,
            rpc_port: None,
            last_seen_timestamp: None,
            uptime: 0,
            version: String::new(),
        }
    }
}

/// Pod entry as it arrives on the wire. Every field is optional and decoded
/// leniently: a value of the wrong type reads as absent instead of failing the
/// whole entry, and numeric fields tolerate floats and numeric strings.
#[derive(Debug, Default, Deserialize)]
struct RawPod {
    #[serde(default, deserialize_with = "lenient_string")]
    pubkey: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    address: Option<String>,
    #[serde(default, deserialize_with = "lenient_bool")]
    is_public: Option<bool>,
    #[serde(default, deserialize_with = "lenient_u64")]
    storage_committed: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    storage_used: Option<u64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    storage_usage_percent: Option<f64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    rpc_port: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    last_seen_timestamp: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    uptime: Option<u64>,
    #[serde(default, deserialize_with = "lenient_string")]
    version: Option<String>,
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }))
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(|v| match v {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
        .filter(|f| f.is_finite()))
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::Bool(b) => Some(b),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }))
}

/// Strings as-is, numbers in their JSON spelling, anything else absent.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }))
}

impl RawPod {
    fn into_node(self) -> Option<NodeRecord> {
        let pubkey = self.pubkey.map(|p| p.trim().to_string()).filter(|p| !p.is_empty())?;
        Some(NodeRecord {
            pubkey,
            address: self.address.unwrap_or_default(),
            is_public: self.is_public.unwrap_or(false),
            storage_committed: self.storage_committed.unwrap_or(0),
            storage_used: self.storage_used.unwrap_or(0),
            storage_usage_percent: self.storage_usage_percent.unwrap_or(0.0),
            rpc_port: self.rpc_port.and_then(|p| u16::try_from(p).ok()),
            last_seen_timestamp: self
                .last_seen_timestamp
                .filter(|ts| *ts > 0)
                .and_then(|ts| i64::try_from(ts).ok()),
            uptime: self.uptime.unwrap_or(0),
            version: self.version.unwrap_or_default(),
        })
    }
}

/// Validates one pod entry. Entries without a public key are rejected.
pub fn parse_pod(value: Value) -> Option<NodeRecord> {
    serde_json::from_value::<RawPod>(value).ok()?.into_node()
}

/// Extracts the pod array from a JSON-RPC response body.
///
/// Accepted shapes of `result`: `{"pods": [...]}`, `{"value": {"pods": [...]}}`
/// or a bare array.
pub fn extract_pods(body: Value) -> Result<Vec<Value>, RegistryError> {
    let mut body = match body {
        Value::Object(map) => map,
        _ => {
            return Err(RegistryError::InvalidResponse(
                "response is not a JSON object".to_string(),
            ))
        }
    };

    match body.remove("result") {
        Some(Value::Array(pods)) => return Ok(pods),
        Some(Value::Object(mut result)) => {
            if let Some(Value::Array(pods)) = result.remove("pods") {
                return Ok(pods);
            }
            if let Some(Value::Object(mut value)) = result.remove("value") {
                if let Some(Value::Array(pods)) = value.remove("pods") {
                    return Ok(pods);
                }
            }
        }
        _ => {}
    }

    match body.remove("error") {
        Some(Value::Object(error)) => Err(RegistryError::Rpc {
            code: error.get("code").and_then(Value::as_i64).unwrap_or(0),
            message: error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string(),
        }),
        Some(Value::String(message)) => Err(RegistryError::Rpc { code: 0, message }),
        _ => Err(RegistryError::InvalidResponse(
            "no pod list in result".to_string(),
        )),
    }
}

/// Deduplicates by public key.
///
/// Keeps the position of the first occurrence and the contents of the last,
/// like inserting every record into a keyed map.
pub fn dedup_by_pubkey(nodes: Vec<NodeRecord>) -> Vec<NodeRecord> {
    let mut index: HashMap<String, usize> = HashMap::with_capacity(nodes.len());
    let mut unique: Vec<NodeRecord> = Vec::with_capacity(nodes.len());
    for node in nodes {
        match index.get(&node.pubkey) {
            Some(&position) => unique[position] = node,
            None => {
                index.insert(node.pubkey.clone(), unique.len());
                unique.push(node);
            }
        }
    }
    unique
}
