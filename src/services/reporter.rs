//! Outcome reporting to external endpoints
//!
//! Two independent, best-effort channels: a human-readable notification
//! to an end-user-facing endpoint and a structured audit record to an
//! operations endpoint. Both are optional, both are signed with the same
//! HMAC scheme as inbound verification, and neither can fail a request —
//! delivery errors are returned for logging and then dropped.

use crate::config::ReportingConfig;
use crate::utils::auth::signature;
use crate::utils::auth::signature::SIGNATURE_HEADER;
use crate::utils::error::{Result, WebhookError};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

/// Maximum length of audit log text fields, in characters
pub const MAX_FIELD_CHARS: usize = 4000;

const TRUNCATED_CHARS: usize = 3997;
const ELLIPSIS: &str = "...";

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Which action a notification reports on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Provision,
    Deprovision,
}

/// An end-user notification about one action outcome
#[derive(Debug, Clone)]
pub struct ProvisioningNotification {
    pub webhook_id: i64,
    pub user_id: String,
    pub resource_name: String,
    pub kind: NotificationKind,
    pub success: bool,
    pub error_message: Option<String>,
    pub event_id: Option<String>,
}

impl ProvisioningNotification {
    /// Human-readable message for this outcome
    fn message(&self) -> String {
        match (self.kind, self.success) {
            (NotificationKind::Provision, true) => format!(
                "Your bare metal server reservation '{}' has been successfully \
                 provisioned and will be available soon after the system boot completes. \
                 This could take some minutes. You can login using SSH with the user 'prognose' \
                 and your configured SSH key to the IP address specified in the resource specification.",
                self.resource_name
            ),
            (NotificationKind::Provision, false) => format!(
                "Your bare metal server reservation '{}' provisioning failed. Error: {}",
                self.resource_name,
                self.error_message.as_deref().unwrap_or("Unknown error occurred")
            ),
            (NotificationKind::Deprovision, true) => format!(
                "Your bare metal server reservation '{}' has been deprovisioned and the \
                 reservation has ended.",
                self.resource_name
            ),
            (NotificationKind::Deprovision, false) => format!(
                "Your bare metal server reservation '{}' deprovisioning failed. Error: {}",
                self.resource_name,
                self.error_message.as_deref().unwrap_or("Unknown error occurred")
            ),
        }
    }

    fn notification_type(&self) -> &'static str {
        if self.success { "SUCCESS" } else { "ERROR" }
    }

    fn event_type(&self) -> &'static str {
        match (self.kind, self.success) {
            (NotificationKind::Provision, true) => "PROVISIONING_COMPLETED",
            (NotificationKind::Provision, false) => "PROVISIONING_FAILED",
            (NotificationKind::Deprovision, true) => "DEPROVISIONING_COMPLETED",
            (NotificationKind::Deprovision, false) => "DEPROVISIONING_FAILED",
        }
    }
}

/// A structured audit record of one processing outcome
#[derive(Debug, Clone)]
pub struct AuditLogEntry {
    pub webhook_id: i64,
    pub event_type: String,
    pub payload: String,
    pub success: bool,
    pub status_code: Option<u16>,
    pub response: Option<String>,
    pub retry_count: u32,
    pub resource_id: Option<i64>,
    pub metadata: Option<serde_json::Value>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NotificationPayload<'a> {
    webhook_id: i64,
    user_id: &'a str,
    message: String,
    #[serde(rename = "type")]
    notification_type: &'static str,
    event_id: Option<&'a str>,
    resource_id: &'a str,
    event_type: &'static str,
    metadata: serde_json::Value,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AuditLogPayload<'a> {
    webhook_id: i64,
    event_type: &'a str,
    payload: String,
    success: bool,
    status_code: Option<u16>,
    response: Option<String>,
    retry_count: u32,
    resource_id: Option<i64>,
    metadata: Option<&'a serde_json::Value>,
}

/// Truncate a text field to the audit log limit.
///
/// Fields over 4000 characters become the first 3997 characters plus
/// `"..."` — exactly 4000. The rule is character-based and must stay
/// bit-for-bit stable for audit-log compatibility.
pub fn truncate_field(text: &str) -> String {
    if text.chars().count() > MAX_FIELD_CHARS {
        let mut truncated: String = text.chars().take(TRUNCATED_CHARS).collect();
        truncated.push_str(ELLIPSIS);
        truncated
    } else {
        text.to_string()
    }
}

/// Best-effort reporter for the two outcome channels.
///
/// Constructed once per process around a shared HTTP client and used
/// read-only by concurrent request handlers.
#[derive(Clone)]
pub struct OutcomeReporter {
    client: reqwest::Client,
    config: ReportingConfig,
    secret: Option<String>,
    namespace: String,
}

impl OutcomeReporter {
    /// Create a new reporter
    pub fn new(
        client: reqwest::Client,
        config: ReportingConfig,
        secret: Option<String>,
        namespace: String,
    ) -> Self {
        Self {
            client,
            config,
            secret,
            namespace,
        }
    }

    /// Send an end-user notification. An unconfigured endpoint is a
    /// silent skip, counted as success.
    pub async fn send_notification(&self, notification: &ProvisioningNotification) -> Result<()> {
        let Some(endpoint) = self.config.notification_endpoint.as_deref() else {
            debug!("No notification endpoint configured, skipping notification");
            return Ok(());
        };

        let payload = NotificationPayload {
            webhook_id: notification.webhook_id,
            user_id: &notification.user_id,
            message: notification.message(),
            notification_type: notification.notification_type(),
            event_id: notification.event_id.as_deref(),
            resource_id: &notification.resource_name,
            event_type: notification.event_type(),
            metadata: serde_json::json!({
                "resourceType": "BareMetalHost",
                "resourceName": notification.resource_name,
                "namespace": self.namespace,
            }),
        };

        info!(
            "Sending provisioning notification for resource '{}' (success: {})",
            notification.resource_name, notification.success
        );
        self.post_signed(
            endpoint,
            serde_json::to_vec(&payload)?,
            self.config.notification_timeout(),
        )
        .await
    }

    /// Send a structured audit record. An unconfigured endpoint is a
    /// silent skip, counted as success.
    pub async fn send_audit_log(&self, entry: &AuditLogEntry) -> Result<()> {
        let Some(endpoint) = self.config.webhook_log_endpoint.as_deref() else {
            debug!("No webhook log endpoint configured, skipping webhook log");
            return Ok(());
        };

        let payload = AuditLogPayload {
            webhook_id: entry.webhook_id,
            event_type: &entry.event_type,
            payload: truncate_field(&entry.payload),
            success: entry.success,
            status_code: entry.status_code,
            response: entry.response.as_deref().map(truncate_field),
            retry_count: entry.retry_count,
            resource_id: entry.resource_id,
            metadata: entry.metadata.as_ref(),
        };

        info!(
            "Sending webhook log for event '{}' (success: {})",
            entry.event_type, entry.success
        );
        self.post_signed(
            endpoint,
            serde_json::to_vec(&payload)?,
            self.config.webhook_log_timeout(),
        )
        .await
    }

    /// POST a payload, signing the exact bytes that go on the wire
    async fn post_signed(&self, endpoint: &str, body: Vec<u8>, timeout: Duration) -> Result<()> {
        let delivery_id = Uuid::new_v4();

        let mut request = self
            .client
            .post(endpoint)
            .timeout(timeout)
            .header("Content-Type", "application/json")
            .header("User-Agent", USER_AGENT);

        if let Some(secret) = &self.secret {
            let signature = signature::sign(secret, &body)?;
            request = request.header(SIGNATURE_HEADER, signature);
        }

        debug!("Sending report {} to {}", delivery_id, endpoint);

        let response = request
            .body(body)
            .send()
            .await
            .map_err(|e| WebhookError::Delivery(format!("error sending to {}: {}", endpoint, e)))?;

        let status = response.status();
        if status.is_success() {
            debug!("Delivered report {} to {}: {}", delivery_id, endpoint, status);
            Ok(())
        } else {
            Err(WebhookError::Delivery(format!(
                "{} returned status {}",
                endpoint, status
            )))
        }
    }
}
