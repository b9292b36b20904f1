//! Error handling for the webhook receiver
//!
//! This module defines the error taxonomy and its HTTP mapping.

pub mod error;

pub use error::{ErrorDetail, ErrorResponse, Result, WebhookError};
