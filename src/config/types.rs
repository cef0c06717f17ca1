//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use clap::{Parser, ValueEnum};
use url::Url;

use crate::config::constants::{
    DEFAULT_GEO_URL, DEFAULT_LEADERBOARD_DEVNET_URL, DEFAULT_LEADERBOARD_MAINNET_URL,
    DEFAULT_PORT, DEFAULT_RPC_METHOD, DEFAULT_RPC_URL, DEFAULT_USER_AGENT, HTTP_TIMEOUT_SECS,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Library configuration (no CLI dependencies).
///
/// This is the core configuration struct used by the library. It can be
/// constructed programmatically without going through `clap`.
///
/// # Examples
///
/// ```no_run
/// use pod_atlas::Config;
///
/// let config = Config {
///     port: 9090,
///     once: true,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,

    /// Pod registry JSON-RPC endpoint
    pub rpc_url: Url,

    /// JSON-RPC method that returns the pod list
    pub rpc_method: String,

    /// Batch geolocation endpoint
    pub geo_url: Url,

    /// Pod credits endpoint for mainnet
    pub leaderboard_mainnet_url: Url,

    /// Pod credits endpoint for devnet
    pub leaderboard_devnet_url: Url,

    /// Port for the HTTP API
    pub port: u16,

    /// Per-request timeout in seconds
    pub timeout_seconds: u64,

    /// HTTP User-Agent header value
    pub user_agent: String,

    /// Poll once, print a summary, and exit
    pub once: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            rpc_url: default_url(DEFAULT_RPC_URL),
            rpc_method: DEFAULT_RPC_METHOD.to_string(),
            geo_url: default_url(DEFAULT_GEO_URL),
            leaderboard_mainnet_url: default_url(DEFAULT_LEADERBOARD_MAINNET_URL),
            leaderboard_devnet_url: default_url(DEFAULT_LEADERBOARD_DEVNET_URL),
            port: DEFAULT_PORT,
            timeout_seconds: HTTP_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            once: false,
        }
    }
}

fn default_url(raw: &'static str) -> Url {
    // Only called with the compile-time constants above
    Url::parse(raw).expect("default URL constants are valid")
}

/// Command-line options.
///
/// Every endpoint can also be supplied through the environment (or a `.env`
/// file), which keeps deployment-specific URLs out of shell history.
///
/// # Examples
///
/// ```bash
/// # Poll the default registry and serve the API on :8080
/// pod_atlas
///
/// # One-off poll against a local registry
/// pod_atlas --rpc-url http://127.0.0.1:6000/rpc --once
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "pod_atlas",
    about = "Polls a pod registry, geolocates pods, and serves map points and network statistics."
)]
pub struct Opt {
    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Pod registry JSON-RPC endpoint
    #[arg(long, env = "POD_ATLAS_RPC_URL", default_value = DEFAULT_RPC_URL)]
    pub rpc_url: Url,

    /// JSON-RPC method that returns the pod list
    #[arg(long, env = "POD_ATLAS_RPC_METHOD", default_value = DEFAULT_RPC_METHOD)]
    pub rpc_method: String,

    /// Batch geolocation endpoint (accepts up to 100 queries per request)
    #[arg(long, env = "POD_ATLAS_GEO_URL", default_value = DEFAULT_GEO_URL)]
    pub geo_url: Url,

    /// Pod credits endpoint for mainnet
    #[arg(long, env = "POD_ATLAS_LEADERBOARD_MAINNET_URL", default_value = DEFAULT_LEADERBOARD_MAINNET_URL)]
    pub leaderboard_mainnet_url: Url,

    /// Pod credits endpoint for devnet
    #[arg(long, env = "POD_ATLAS_LEADERBOARD_DEVNET_URL", default_value = DEFAULT_LEADERBOARD_DEVNET_URL)]
    pub leaderboard_devnet_url: Url,

    /// Port for the HTTP API (bound on 127.0.0.1)
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Per-request timeout in seconds (at least 1)
    #[arg(long, default_value_t = HTTP_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_seconds: u64,

    /// HTTP User-Agent header value
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Poll once, print a summary, and exit
    #[arg(long)]
    pub once: bool,
}

impl From<Opt> for Config {
    fn from(opt: Opt) -> Self {
        Self {
            log_level: opt.log_level,
            log_format: opt.log_format,
            rpc_url: opt.rpc_url,
            rpc_method: opt.rpc_method,
            geo_url: opt.geo_url,
            leaderboard_mainnet_url: opt.leaderboard_mainnet_url,
            leaderboard_devnet_url: opt.leaderboard_devnet_url,
            port: opt.port,
            timeout_seconds: opt.timeout_seconds,
            user_agent: opt.user_agent,
            once: opt.once,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Warn),
            log::LevelFilter::Warn
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Info),
            log::LevelFilter::Info
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Trace),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.timeout_seconds, HTTP_TIMEOUT_SECS);
        assert_eq!(config.rpc_method, DEFAULT_RPC_METHOD);
        assert_eq!(config.geo_url.as_str(), DEFAULT_GEO_URL);
        assert!(!config.once);
    }

    #[test]
    fn test_opt_defaults_match_config_defaults() {
        let opt = Opt::try_parse_from(["pod_atlas"]).expect("defaults should parse");
        let config = Config::from(opt);
        let default = Config::default();
        assert_eq!(config.rpc_url, default.rpc_url);
        assert_eq!(config.geo_url, default.geo_url);
        assert_eq!(config.port, default.port);
        assert_eq!(config.user_agent, default.user_agent);
    }

    #[test]
    fn test_opt_parses_overrides() {
        let opt = Opt::try_parse_from([
            "pod_atlas",
            "--rpc-url",
            "http://127.0.0.1:6000/rpc",
            "--port",
            "9999",
            "--log-format",
            "json",
            "--once",
        ])
        .expect("overrides should parse");
        let config = Config::from(opt);
        assert_eq!(config.rpc_url.as_str(), "http://127.0.0.1:6000/rpc");
        assert_eq!(config.port, 9999);
        assert!(matches!(config.log_format, LogFormat::Json));
        assert!(config.once);
    }

    #[test]
    fn test_opt_rejects_zero_timeout() {
        let result = Opt::try_parse_from(["pod_atlas", "--timeout-seconds", "0"]);
        assert!(result.is_err());

        let opt = Opt::try_parse_from(["pod_atlas", "--timeout-seconds", "1"])
            .expect("one second is accepted");
        assert_eq!(Config::from(opt).timeout_seconds, 1);
    }

    #[test]
    fn test_opt_rejects_invalid_url() {
        let result = Opt::try_parse_from(["pod_atlas", "--geo-url", "not a url"]);
        assert!(result.is_err());
    }
}
