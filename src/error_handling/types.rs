//! Error type definitions.
//!
//! This module defines the error enums returned at module boundaries and the
//! `ErrorType` categories tracked by `ProcessingStats`.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

use super::categorization::categorize_reqwest_error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Errors returned by the pod registry client.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Transport failure, timeout, or undecodable body.
    #[error("Registry request failed: {0}")]
    Request(#[from] ReqwestError),

    /// The registry answered with a non-success HTTP status.
    #[error("Registry responded with status {0}")]
    Status(u16),

    /// The registry answered with a JSON-RPC error object.
    #[error("Registry RPC error {code}: {message}")]
    Rpc {
        /// JSON-RPC error code
        code: i64,
        /// JSON-RPC error message
        message: String,
    },

    /// The response carried neither a pod list nor an error.
    #[error("Invalid registry response: {0}")]
    InvalidResponse(String),
}

impl RegistryError {
    /// Maps this error onto the category counted in `ProcessingStats`.
    pub fn error_type(&self) -> ErrorType {
        match self {
            RegistryError::Request(e) => categorize_reqwest_error(e),
            RegistryError::Status(429) => ErrorType::HttpRequestTooManyRequests,
            RegistryError::Status(_) => ErrorType::HttpRequestStatusError,
            RegistryError::Rpc { .. } => ErrorType::RegistryRpcError,
            RegistryError::InvalidResponse(_) => ErrorType::RegistryResponseError,
        }
    }
}

/// Errors returned by the leaderboard client.
#[derive(Error, Debug)]
pub enum LeaderboardError {
    /// Transport failure, timeout, or undecodable body.
    #[error("Leaderboard request failed: {0}")]
    Request(#[from] ReqwestError),

    /// The credits API answered with a non-success HTTP status.
    #[error("External API responded with status: {0}")]
    Status(u16),
}

impl LeaderboardError {
    /// Maps this error onto the category counted in `ProcessingStats`.
    pub fn error_type(&self) -> ErrorType {
        match self {
            LeaderboardError::Request(e) => categorize_reqwest_error(e),
            LeaderboardError::Status(429) => ErrorType::HttpRequestTooManyRequests,
            LeaderboardError::Status(_) => ErrorType::HttpRequestStatusError,
        }
    }
}

/// Categories of upstream failures.
///
/// Every failed call against the registry, the geolocation provider, or the
/// credits API is counted under exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    /// The request timed out
    HttpRequestTimeoutError,
    /// The connection could not be established
    HttpRequestConnectError,
    /// The upstream answered 429
    HttpRequestTooManyRequests,
    /// The upstream answered another non-success status
    HttpRequestStatusError,
    /// The response body could not be decoded
    HttpRequestDecodeError,
    /// Any other transport failure
    HttpRequestOtherError,
    /// The registry returned a JSON-RPC error object
    RegistryRpcError,
    /// The registry response had no recognizable pod list
    RegistryResponseError,
}

impl ErrorType {
    /// Display name used in logs and on `/status`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::HttpRequestTimeoutError => "HTTP request timeout error",
            ErrorType::HttpRequestConnectError => "HTTP request connect error",
            ErrorType::HttpRequestTooManyRequests => "Too many requests",
            ErrorType::HttpRequestStatusError => "HTTP request status error",
            ErrorType::HttpRequestDecodeError => "HTTP response decode error",
            ErrorType::HttpRequestOtherError => "HTTP request other error",
            ErrorType::RegistryRpcError => "Registry RPC error",
            ErrorType::RegistryResponseError => "Invalid registry response",
        }
    }
}
