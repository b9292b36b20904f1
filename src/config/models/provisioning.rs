//! Provisioning image configuration

use super::{env_or, env_parse};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_IMAGE: &str = "default-provision-image-url";
const DEFAULT_CHECKSUM: &str = "default-provision-checksum-image-url";

/// Image and timeout settings applied to every provision action.
///
/// These are deployment configuration, never derived from the event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisioningConfig {
    /// URL of the image written to the host's desired state
    #[serde(default = "default_image")]
    pub image: String,
    /// URL of the image checksum
    #[serde(default = "default_checksum")]
    pub checksum: String,
    /// Checksum algorithm, e.g. "sha256"
    #[serde(default = "default_checksum_algorithm")]
    pub checksum_algorithm: String,
    /// Upper bound on a single provisioning mutation, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ProvisioningConfig {
    fn default() -> Self {
        Self {
            image: default_image(),
            checksum: default_checksum(),
            checksum_algorithm: default_checksum_algorithm(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ProvisioningConfig {
    /// Load provisioning configuration from environment variables
    pub fn from_env() -> Result<Self, crate::utils::error::WebhookError> {
        Ok(Self {
            image: env_or("PROVISION_IMAGE", DEFAULT_IMAGE),
            checksum: env_or("PROVISION_CHECKSUM", DEFAULT_CHECKSUM),
            checksum_algorithm: env_or("PROVISION_CHECKSUM_TYPE", "sha256"),
            timeout_secs: env_parse("PROVISIONING_TIMEOUT", default_timeout_secs())
                .map_err(crate::utils::error::WebhookError::Config)?,
        })
    }

    /// Provisioning timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Whether the image is unset or left at its placeholder default
    pub fn uses_default_image(&self) -> bool {
        self.image.is_empty() || self.image == DEFAULT_IMAGE
    }
}

fn default_image() -> String {
    DEFAULT_IMAGE.to_string()
}

fn default_checksum() -> String {
    DEFAULT_CHECKSUM.to_string()
}

fn default_checksum_algorithm() -> String {
    "sha256".to_string()
}

fn default_timeout_secs() -> u64 {
    600
}
