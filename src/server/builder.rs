//! Server startup
//!
//! This module provides the run_server function with automatic
//! configuration loading.

use crate::config::Config;
use crate::server::server::HttpServer;
use crate::utils::error::Result;
use tracing::info;

/// Run the server with automatic configuration loading.
///
/// Configuration comes from a YAML file when `CONFIG_FILE` is set,
/// otherwise from environment variables.
pub async fn run_server() -> Result<()> {
    info!("Starting {}", crate::SERVICE_NAME);

    let config = match std::env::var("CONFIG_FILE") {
        Ok(path) => {
            info!("Loading configuration file: {}", path);
            Config::from_file(&path).await?
        }
        Err(_) => Config::from_env()?,
    };

    let server = HttpServer::new(&config).await?;
    info!(
        "Server starting at: http://{}:{}",
        config.server.host, config.server.port
    );
    info!("API Endpoints:");
    info!("   GET  /healthz - Health check");
    info!("   POST /webhook - Reservation lifecycle events");

    server.start().await
}
