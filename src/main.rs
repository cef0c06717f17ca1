//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `pod_atlas` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use pod_atlas::config::Opt;
use pod_atlas::initialization::init_logger_with;
use pod_atlas::{run_monitor, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists),
    // falling back to a .env next to the executable
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let config = Config::from(Opt::parse());

    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    match run_monitor(config).await {
        Ok(report) => {
            println!(
                "Mapped {} node{} onto {} point{} (poll #{}) in {:.1}s",
                report.nodes,
                if report.nodes == 1 { "" } else { "s" },
                report.map_points,
                if report.map_points == 1 { "" } else { "s" },
                report.sequence,
                report.elapsed_seconds
            );
            if let Some(error) = report.last_error {
                println!("Last poll failed: {}", error);
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("pod_atlas error: {:#}", e);
            process::exit(1);
        }
    }
}
