//! Action dispatch
//!
//! Maps a classified event to exactly one of provision, deprovision or
//! no-op, invokes the host lifecycle collaborator and fires the outcome
//! reporter. Every path resolves to an [`Outcome`]; no error crosses
//! this boundary.

use crate::config::ProvisioningConfig;
use crate::core::events::{
    EVENT_DELETED, EVENT_END, EVENT_START, InboundEvent, ReservationEvent, ResourceEvent,
    SERVER_RESOURCE_TYPE,
};
use crate::core::host::{HostLifecycle, ProvisionSpec};
use crate::core::reservation;
use crate::services::reporter::{
    AuditLogEntry, NotificationKind, OutcomeReporter, ProvisioningNotification,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Result of dispatching one event
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The mutation was accepted by the lifecycle collaborator
    Accepted {
        message: String,
        user_id: Option<String>,
    },
    /// The mutation was not accepted
    Rejected { message: String },
    /// The event required no action
    NoAction { message: String },
}

struct DeprovisionContext<'a> {
    resource_name: &'a str,
    event_id: &'a str,
    webhook_id: i64,
    user_id: Option<&'a str>,
    payload_snapshot: String,
}

/// The event-to-action state machine.
///
/// Stateless across invocations: each dispatch is a pure function of the
/// classified event plus the injected configuration.
pub struct Dispatcher {
    host: Arc<dyn HostLifecycle>,
    reporter: OutcomeReporter,
    provisioning: ProvisioningConfig,
}

impl Dispatcher {
    /// Create a new dispatcher
    pub fn new(
        host: Arc<dyn HostLifecycle>,
        reporter: OutcomeReporter,
        provisioning: ProvisioningConfig,
    ) -> Self {
        Self {
            host,
            reporter,
            provisioning,
        }
    }

    /// Dispatch one classified event
    pub async fn dispatch(&self, event: &InboundEvent) -> Outcome {
        match event {
            InboundEvent::Resource(event) => self.dispatch_resource(event).await,
            InboundEvent::Reservation(event) => self.dispatch_reservation(event).await,
        }
    }

    async fn dispatch_resource(&self, event: &ResourceEvent) -> Outcome {
        info!(
            "Processing single server webhook event. Event Type: '{}', User: '{}', \
             Resource: '{}', Resource Type: '{}'.",
            event.event_type,
            event.username.as_deref().unwrap_or("N/A"),
            event.resource_name,
            event.resource_type
        );

        if event.resource_type != SERVER_RESOURCE_TYPE {
            info!(
                "Skipping non-Server resource '{}' of type '{}'. No action taken.",
                event.resource_name, event.resource_type
            );
            return Outcome::NoAction {
                message: format!(
                    "No action needed for resource type '{}'.",
                    event.resource_type
                ),
            };
        }

        match event.event_type.as_str() {
            EVENT_START => {
                if self.provision(event).await {
                    Outcome::Accepted {
                        message: format!(
                            "Successfully provisioned server '{}'",
                            event.resource_name
                        ),
                        user_id: event.user_id.clone(),
                    }
                } else {
                    error!(
                        "Failed to provision server '{}' for event {}",
                        event.resource_name, event.event_id
                    );
                    Outcome::Rejected {
                        message: format!("Failed to provision server '{}'", event.resource_name),
                    }
                }
            }
            EVENT_END => {
                let context = DeprovisionContext {
                    resource_name: &event.resource_name,
                    event_id: &event.event_id,
                    webhook_id: event.webhook_id,
                    user_id: event.user_id.as_deref(),
                    payload_snapshot: serde_json::to_string(event).unwrap_or_default(),
                };

                if self.deprovision(context).await {
                    Outcome::Accepted {
                        message: format!(
                            "Successfully deprovisioned server '{}'",
                            event.resource_name
                        ),
                        user_id: event.user_id.clone(),
                    }
                } else {
                    error!(
                        "Failed to deprovision server '{}' for event {}",
                        event.resource_name, event.event_id
                    );
                    Outcome::Rejected {
                        message: format!("Failed to deprovision server '{}'", event.resource_name),
                    }
                }
            }
            other => {
                info!("No action configured for event type '{}'.", other);
                Outcome::NoAction {
                    message: format!("No action needed for event type '{}'.", other),
                }
            }
        }
    }

    async fn dispatch_reservation(&self, event: &ReservationEvent) -> Outcome {
        let resource_name = &event.data.resource.name;

        info!(
            "Processing server {} webhook. Resource Name: '{}'.",
            event.event_type, resource_name
        );

        if event.event_type != EVENT_DELETED {
            return Outcome::NoAction {
                message: format!("No action needed for event type '{}'.", event.event_type),
            };
        }

        // The event's own timestamp is the reference instant, not wall
        // clock at processing time
        let now = event.timestamp;
        debug!(
            "Reference time (UTC): {}, Reservation Start: {}, Reservation End: {}",
            now, event.data.start, event.data.end
        );

        if reservation::is_active(now, event.data.start, event.data.end) {
            info!(
                "Reservation for server '{}' is currently active. Initiating deprovision.",
                resource_name
            );

            let event_id = event.data.id.to_string();
            let context = DeprovisionContext {
                resource_name,
                event_id: &event_id,
                webhook_id: event.webhook_id,
                user_id: event.data.keycloak_id.as_deref(),
                payload_snapshot: serde_json::to_string(event).unwrap_or_default(),
            };

            if self.deprovision(context).await {
                Outcome::Accepted {
                    message: format!(
                        "Deprovisioning initiated for server '{}' due to active reservation deletion.",
                        resource_name
                    ),
                    user_id: event.data.keycloak_id.clone(),
                }
            } else {
                error!(
                    "Failed to initiate deprovisioning for server '{}' for {}.",
                    resource_name, EVENT_DELETED
                );
                Outcome::Rejected {
                    message: format!(
                        "Failed to deprovision server '{}' after {}.",
                        resource_name, EVENT_DELETED
                    ),
                }
            }
        } else {
            info!(
                "Reservation for server '{}' is not currently active. No deprovision action \
                 taken for {}.",
                resource_name, EVENT_DELETED
            );
            Outcome::NoAction {
                message: format!(
                    "No deprovision action taken for server '{}' as reservation is not currently active.",
                    resource_name
                ),
            }
        }
    }

    /// Provision a host and report the outcome. Returns whether the
    /// mutation was accepted.
    async fn provision(&self, event: &ResourceEvent) -> bool {
        let resource_name = &event.resource_name;

        let spec = ProvisionSpec {
            image: self.provisioning.image.clone(),
            checksum: self.provisioning.checksum.clone(),
            checksum_algorithm: self.provisioning.checksum_algorithm.clone(),
            ssh_public_key: event.ssh_public_key.clone(),
            timeout: self.provisioning.timeout(),
        };

        let accepted = match self.host.set_desired_state(resource_name, Some(spec)).await {
            Ok(accepted) => accepted,
            Err(e) => {
                error!("Error provisioning server '{}': {}", resource_name, e);
                false
            }
        };

        let user_id = event.user_id.clone().unwrap_or_else(|| "unknown".to_string());

        let notification = ProvisioningNotification {
            webhook_id: event.webhook_id,
            user_id: user_id.clone(),
            resource_name: resource_name.clone(),
            kind: NotificationKind::Provision,
            success: accepted,
            error_message: (!accepted).then(|| "Provisioning was not accepted".to_string()),
            event_id: Some(event.event_id.clone()),
        };

        let audit = AuditLogEntry {
            webhook_id: event.webhook_id,
            event_type: EVENT_START.to_string(),
            payload: serde_json::to_string(event).unwrap_or_default(),
            success: accepted,
            status_code: Some(if accepted { 200 } else { 500 }),
            response: Some(if accepted {
                format!("Provisioning initiated for server '{}'", resource_name)
            } else {
                format!("Failed to start provisioning for server '{}'", resource_name)
            }),
            retry_count: 0,
            resource_id: None,
            metadata: Some(json!({
                "resourceName": resource_name,
                "userId": user_id,
                "eventId": event.event_id,
            })),
        };

        let (notified, audited) = tokio::join!(
            self.reporter.send_notification(&notification),
            self.reporter.send_audit_log(&audit),
        );
        if let Err(e) = notified {
            warn!("Failed to send notification for server '{}': {}", resource_name, e);
        }
        if let Err(e) = audited {
            warn!("Failed to send webhook log for server '{}': {}", resource_name, e);
        }

        if accepted {
            info!(
                "[{}] Successfully initiated provisioning for server '{}' (Event ID: {}).",
                EVENT_START, resource_name, event.event_id
            );
        } else {
            error!(
                "[{}] Failed to start provisioning for server '{}' (Event ID: {}).",
                EVENT_START, resource_name, event.event_id
            );
        }

        accepted
    }

    /// Deprovision a host and report the outcome. Returns whether the
    /// mutation was accepted.
    async fn deprovision(&self, context: DeprovisionContext<'_>) -> bool {
        let resource_name = context.resource_name;

        let accepted = match self.host.set_desired_state(resource_name, None).await {
            Ok(accepted) => accepted,
            Err(e) => {
                error!("Error deprovisioning server '{}': {}", resource_name, e);
                false
            }
        };

        let user_id = context.user_id.unwrap_or("unknown").to_string();

        let notification = ProvisioningNotification {
            webhook_id: context.webhook_id,
            user_id: user_id.clone(),
            resource_name: resource_name.to_string(),
            kind: NotificationKind::Deprovision,
            success: accepted,
            error_message: (!accepted).then(|| "Deprovisioning was not accepted".to_string()),
            event_id: Some(context.event_id.to_string()),
        };

        let audit = AuditLogEntry {
            webhook_id: context.webhook_id,
            event_type: EVENT_END.to_string(),
            payload: context.payload_snapshot,
            success: accepted,
            status_code: Some(if accepted { 200 } else { 500 }),
            response: Some(if accepted {
                format!("Deprovisioning completed for server '{}'", resource_name)
            } else {
                format!("Failed to deprovision server '{}'", resource_name)
            }),
            retry_count: 0,
            resource_id: None,
            metadata: Some(json!({
                "resourceName": resource_name,
                "userId": user_id,
                "eventId": context.event_id,
            })),
        };

        let (notified, audited) = tokio::join!(
            self.reporter.send_notification(&notification),
            self.reporter.send_audit_log(&audit),
        );
        if let Err(e) = notified {
            warn!("Failed to send notification for server '{}': {}", resource_name, e);
        }
        if let Err(e) = audited {
            warn!(
                "Failed to send webhook log for server '{}' deprovisioning: {}",
                resource_name, e
            );
        }

        if accepted {
            info!(
                "[{}] Successfully initiated deprovisioning for server '{}' (Event ID: {}).",
                EVENT_END, resource_name, context.event_id
            );
        } else {
            error!(
                "[{}] Failed to deprovision server '{}' (Event ID: {}).",
                EVENT_END, resource_name, context.event_id
            );
        }

        accepted
    }
}
