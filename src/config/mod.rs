//! Configuration management for the webhook receiver
//!
//! This module handles loading and validation of all service configuration.
//! Configuration is read from environment variables (the deployment
//! surface) or from a YAML file, and is passed explicitly into each
//! component at startup. No component reads ambient global state.

pub mod models;

pub use models::*;

use crate::utils::error::{Result, WebhookError};
use std::path::Path;
use tracing::{debug, info, warn};

/// Main configuration struct for the webhook receiver
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Cluster coordinates of the host custom resource
    #[serde(default)]
    pub cluster: ClusterConfig,
    /// Provisioning image configuration
    #[serde(default)]
    pub provisioning: ProvisioningConfig,
    /// Shared webhook signing secret
    #[serde(default)]
    pub security: SecurityConfig,
    /// Notification and audit log endpoints
    #[serde(default)]
    pub reporting: ReportingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| WebhookError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| WebhookError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let config = Self {
            server: ServerConfig::from_env()?,
            cluster: ClusterConfig::from_env(),
            provisioning: ProvisioningConfig::from_env()?,
            security: SecurityConfig::from_env(),
            reporting: ReportingConfig::from_env()?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the entire configuration
    ///
    /// Hard errors abort startup; soft misconfiguration (missing secret,
    /// missing endpoints, default image) only produces warnings because
    /// each of those features degrades to a no-op at runtime.
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.server
            .validate()
            .map_err(|e| WebhookError::Config(format!("Server config error: {}", e)))?;

        self.reporting
            .validate()
            .map_err(|e| WebhookError::Config(format!("Reporting config error: {}", e)))?;

        if self.provisioning.uses_default_image() {
            warn!("PROVISION_IMAGE not configured or using default value.");
        }

        if self.security.webhook_secret.is_none() {
            warn!("WEBHOOK_SECRET not configured. Signature verification will be skipped.");
        }

        if self.reporting.notification_endpoint.is_none() {
            warn!("NOTIFICATION_ENDPOINT not configured. Notifications will be skipped.");
        }

        if self.reporting.webhook_log_endpoint.is_none() {
            warn!("WEBHOOK_LOG_ENDPOINT not configured. Webhook logging will be skipped.");
        }

        debug!("Configuration validation completed");
        Ok(())
    }
}
