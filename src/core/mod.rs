//! Core event processing
//!
//! This module contains the event model, the payload classifier, the
//! reservation window evaluator, the host lifecycle seam and the action
//! dispatcher.

pub mod dispatcher;
pub mod events;
pub mod host;
pub mod reservation;

pub use dispatcher::{Dispatcher, Outcome};
pub use events::{ClassificationError, InboundEvent, classify};
pub use host::{HostLifecycle, ProvisionSpec};
