//! Webhook signing secret configuration

use super::env_opt;
use serde::{Deserialize, Serialize};

/// Shared secret for inbound verification and outbound signing.
///
/// Signature enforcement is opt-in: when the secret is absent every
/// request passes verification and outbound payloads are unsigned.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// HMAC key shared with the webhook sender and the reporting endpoints
    #[serde(default)]
    pub webhook_secret: Option<String>,
}

impl SecurityConfig {
    /// Load security configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            webhook_secret: env_opt("WEBHOOK_SECRET"),
        }
    }
}
