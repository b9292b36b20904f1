//! Notification and audit log endpoint configuration

use super::{env_opt, env_parse};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Endpoints and timeouts for the two best-effort outcome channels.
///
/// Both endpoints are optional; an unset endpoint silently disables
/// its channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportingConfig {
    /// End-user-facing notification endpoint
    #[serde(default)]
    pub notification_endpoint: Option<String>,
    /// Notification request timeout, in seconds
    #[serde(default = "default_timeout_secs")]
    pub notification_timeout_secs: u64,
    /// Operations-facing audit log endpoint
    #[serde(default)]
    pub webhook_log_endpoint: Option<String>,
    /// Audit log request timeout, in seconds
    #[serde(default = "default_timeout_secs")]
    pub webhook_log_timeout_secs: u64,
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            notification_endpoint: None,
            notification_timeout_secs: default_timeout_secs(),
            webhook_log_endpoint: None,
            webhook_log_timeout_secs: default_timeout_secs(),
        }
    }
}

impl ReportingConfig {
    /// Load reporting configuration from environment variables
    pub fn from_env() -> Result<Self, crate::utils::error::WebhookError> {
        Ok(Self {
            notification_endpoint: env_opt("NOTIFICATION_ENDPOINT"),
            notification_timeout_secs: env_parse("NOTIFICATION_TIMEOUT", default_timeout_secs())
                .map_err(crate::utils::error::WebhookError::Config)?,
            webhook_log_endpoint: env_opt("WEBHOOK_LOG_ENDPOINT"),
            webhook_log_timeout_secs: env_parse("WEBHOOK_LOG_TIMEOUT", default_timeout_secs())
                .map_err(crate::utils::error::WebhookError::Config)?,
        })
    }

    /// Notification timeout as a Duration
    pub fn notification_timeout(&self) -> Duration {
        Duration::from_secs(self.notification_timeout_secs)
    }

    /// Audit log timeout as a Duration
    pub fn webhook_log_timeout(&self) -> Duration {
        Duration::from_secs(self.webhook_log_timeout_secs)
    }

    /// Validate endpoint URLs
    pub fn validate(&self) -> Result<(), String> {
        for (name, endpoint) in [
            ("notification_endpoint", &self.notification_endpoint),
            ("webhook_log_endpoint", &self.webhook_log_endpoint),
        ] {
            if let Some(endpoint) = endpoint {
                let parsed = url::Url::parse(endpoint)
                    .map_err(|e| format!("{} is not a valid URL: {}", name, e))?;
                if parsed.scheme() != "http" && parsed.scheme() != "https" {
                    return Err(format!("{} must be HTTP or HTTPS", name));
                }
            }
        }

        Ok(())
    }
}

fn default_timeout_secs() -> u64 {
    30
}
