//! HTTP client initialization.

use std::sync::Arc;
use std::time::Duration;

use reqwest::ClientBuilder;

use crate::config::{Config, TCP_CONNECT_TIMEOUT_SECS};
use crate::error_handling::InitializationError;

/// Initializes the HTTP client shared by every upstream caller.
///
/// Creates a `reqwest::Client` configured with:
/// - User-Agent header from the configuration
/// - Overall timeout from the configuration, at least one second
/// - A connect timeout of `TCP_CONNECT_TIMEOUT_SECS`, capped by the overall timeout
///
/// # Errors
///
/// Returns `InitializationError::HttpClientError` if client creation fails.
pub fn init_client(config: &Config) -> Result<Arc<reqwest::Client>, InitializationError> {
    let timeout = config.timeout_seconds.max(1);
    let connect_timeout = TCP_CONNECT_TIMEOUT_SECS.min(timeout);
    let client = ClientBuilder::new()
        .timeout(Duration::from_secs(timeout))
        .connect_timeout(Duration::from_secs(connect_timeout))
        .user_agent(config.user_agent.clone())
        .build()?;
    Ok(Arc::new(client))
}
