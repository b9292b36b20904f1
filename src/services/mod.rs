//! Service modules
//!
//! - **reporter**: best-effort notification and audit log delivery

pub mod reporter;

pub use reporter::{AuditLogEntry, NotificationKind, OutcomeReporter, ProvisioningNotification};
