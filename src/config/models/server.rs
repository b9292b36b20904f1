//! HTTP server configuration

use super::{env_or, env_parse};
use serde::{Deserialize, Serialize};

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Number of worker threads
    pub workers: Option<usize>,
    /// Exclude /healthz requests from access logs
    #[serde(default = "default_true")]
    pub disable_healthz_logs: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
            disable_healthz_logs: true,
        }
    }
}

impl ServerConfig {
    /// Load server configuration from environment variables
    pub fn from_env() -> Result<Self, crate::utils::error::WebhookError> {
        Ok(Self {
            host: env_or("HOST", &default_host()),
            port: env_parse("PORT", default_port())
                .map_err(crate::utils::error::WebhookError::Config)?,
            workers: None,
            disable_healthz_logs: env_or("DISABLE_HEALTHZ_LOGS", "true").to_lowercase() == "true",
        })
    }

    /// Get the server bind address
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the number of workers (defaults to CPU count)
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(num_cpus::get)
    }

    /// Validate server configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.port == 0 {
            return Err("Port cannot be 0".to_string());
        }

        if self.host.is_empty() {
            return Err("Host cannot be empty".to_string());
        }

        Ok(())
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_true() -> bool {
    true
}
