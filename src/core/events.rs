//! Inbound webhook event model and payload classification
//!
//! Two mutually exclusive envelope shapes arrive on the same endpoint:
//! a single-resource lifecycle transition, and a reservation record
//! change from which a server action must be derived. Classification is
//! a two-attempt decode; a payload matching neither shape is reported
//! as an explicit error so the endpoint's accept-with-no-op policy is a
//! deliberate branch rather than a fallthrough.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A reservation has started
pub const EVENT_START: &str = "EVENT_START";
/// A reservation has ended
pub const EVENT_END: &str = "EVENT_END";
/// A reservation record was deleted
pub const EVENT_DELETED: &str = "EVENT_DELETED";

/// Resource type for which provisioning actions are performed
pub const SERVER_RESOURCE_TYPE: &str = "Server";

/// A lifecycle transition for one server resource
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceEvent {
    pub event_type: String,
    pub resource_type: String,
    pub resource_name: String,
    pub webhook_id: i64,
    pub event_id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub ssh_public_key: Option<String>,
}

/// A reservation record change
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationEvent {
    pub event_type: String,
    pub webhook_id: i64,
    /// Reference instant at which the event was emitted; reservation
    /// window decisions are evaluated against this, not wall clock
    pub timestamp: DateTime<Utc>,
    pub data: ReservationData,
}

/// Reservation record carried by a [`ReservationEvent`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationData {
    pub id: i64,
    pub resource: ReservationResource,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub keycloak_id: Option<String>,
}

/// Resource reference inside a reservation record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationResource {
    pub name: String,
}

/// A classified inbound event
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum InboundEvent {
    Resource(ResourceEvent),
    Reservation(ReservationEvent),
}

impl InboundEvent {
    /// The name of the server resource this event acts on.
    /// This is the sole identifier used for the downstream mutation.
    pub fn resource_name(&self) -> &str {
        match self {
            InboundEvent::Resource(event) => &event.resource_name,
            InboundEvent::Reservation(event) => &event.data.resource.name,
        }
    }

    /// The event type string of either envelope
    pub fn event_type(&self) -> &str {
        match self {
            InboundEvent::Resource(event) => &event.event_type,
            InboundEvent::Reservation(event) => &event.event_type,
        }
    }
}

/// Classification failure
#[derive(Debug, Error)]
pub enum ClassificationError {
    /// The payload satisfied neither envelope's required field set
    #[error("payload matches no known event shape: {0}")]
    UnknownShape(String),
}

/// Classify a raw payload into one of the two event shapes.
///
/// The single-resource shape is attempted first; field requirements make
/// the shapes mutually exclusive. Timestamps must carry an explicit
/// offset — a naive timestamp fails the decode rather than being
/// compared against zone-aware instants later.
pub fn classify(raw: &[u8]) -> Result<InboundEvent, ClassificationError> {
    let resource_err = match serde_json::from_slice::<ResourceEvent>(raw) {
        Ok(event) => {
            if event.resource_name.trim().is_empty() {
                return Err(ClassificationError::UnknownShape(
                    "resourceName is empty".to_string(),
                ));
            }
            return Ok(InboundEvent::Resource(event));
        }
        Err(e) => e,
    };

    match serde_json::from_slice::<ReservationEvent>(raw) {
        Ok(event) => {
            if event.data.resource.name.trim().is_empty() {
                return Err(ClassificationError::UnknownShape(
                    "data.resource.name is empty".to_string(),
                ));
            }
            Ok(InboundEvent::Reservation(event))
        }
        Err(reservation_err) => Err(ClassificationError::UnknownShape(format!(
            "not a resource event ({}) and not a reservation event ({})",
            resource_err, reservation_err
        ))),
    }
}
