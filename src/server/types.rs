//! HTTP response types

use serde::Serialize;

/// Standard webhook response body
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookResponse {
    /// Always "success" for 200 responses; failures use the error body
    pub status: &'static str,
    /// Human-readable outcome description
    pub message: String,
    /// User the action was performed for, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Time the response was produced
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl WebhookResponse {
    /// Response for an accepted action
    pub fn accepted(message: String, user_id: Option<String>) -> Self {
        Self {
            status: "success",
            message,
            user_id,
            timestamp: Some(chrono::Utc::now().to_rfc3339()),
        }
    }

    /// Response for an event that required no action
    pub fn no_action(message: String) -> Self {
        Self {
            status: "success",
            message,
            user_id: None,
            timestamp: None,
        }
    }
}
