//! Server provisioning webhook receiver
//!
//! Translates reservation lifecycle events into bare-metal host
//! provisioning actions.

use metalhook::server;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env before reading any configuration
    dotenvy::dotenv().ok();

    // Initialize logging system; LOG_LEVEL mirrors RUST_LOG for
    // deployments that only know the former
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| match std::env::var("LOG_LEVEL") {
            Ok(level) if !level.is_empty() => EnvFilter::try_new(level),
            _ => EnvFilter::try_new("info"),
        })
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    match server::builder::run_server().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Print error using Display (not Debug) to preserve newlines
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
