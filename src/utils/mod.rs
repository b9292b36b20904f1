//! Utility modules for the webhook receiver
//!
//! - **auth**: HMAC signing and verification for webhook payloads
//! - **error**: Error handling and HTTP error responses

pub mod auth;
pub mod error;

pub use error::{Result, WebhookError};
