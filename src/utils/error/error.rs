//! Error types for the webhook receiver
//!
//! This module defines all error types used throughout the service and
//! their mapping to HTTP responses.

use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

/// Result type alias for the webhook receiver
pub type Result<T> = std::result::Result<T, WebhookError>;

/// Main error type for the webhook receiver
#[derive(Error, Debug)]
pub enum WebhookError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Signature verification failed or the signature header is missing
    #[error("Invalid webhook signature")]
    InvalidSignature,

    /// The payload matched neither known event shape
    #[error("Unknown payload shape: {0}")]
    UnknownShape(String),

    /// The resource lifecycle mutation was not accepted
    #[error("{0}")]
    ActionFailed(String),

    /// Outbound notification or audit log delivery failed.
    /// Never surfaced to the caller; logged by the reporter's callers.
    #[error("Delivery error: {0}")]
    Delivery(String),

    /// HMAC key or digest errors
    #[error("Crypto error: {0}")]
    Crypto(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Kubernetes API errors
    #[error("Kubernetes error: {0}")]
    Kube(#[from] kube::Error),

    /// HTTP server errors
    #[error("Server error: {0}")]
    Server(String),
}

impl ResponseError for WebhookError {
    fn error_response(&self) -> HttpResponse {
        let (status_code, error_code, message) = match self {
            WebhookError::InvalidSignature => (
                actix_web::http::StatusCode::UNAUTHORIZED,
                "INVALID_SIGNATURE",
                self.to_string(),
            ),
            WebhookError::UnknownShape(_) => (
                actix_web::http::StatusCode::BAD_REQUEST,
                "UNKNOWN_PAYLOAD_SHAPE",
                self.to_string(),
            ),
            WebhookError::ActionFailed(_) => (
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                "ACTION_FAILED",
                self.to_string(),
            ),
            WebhookError::Config(_) => (
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                "CONFIG_ERROR",
                self.to_string(),
            ),
            _ => (
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            ),
        };

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: error_code.to_string(),
                message,
                timestamp: chrono::Utc::now().timestamp(),
            },
        };

        HttpResponse::build(status_code).json(error_response)
    }
}

/// Standard error response format
#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail structure
#[derive(serde::Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub timestamp: i64,
}

impl WebhookError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn action_failed<S: Into<String>>(message: S) -> Self {
        Self::ActionFailed(message.into())
    }

    pub fn delivery<S: Into<String>>(message: S) -> Self {
        Self::Delivery(message.into())
    }

    pub fn server<S: Into<String>>(message: S) -> Self {
        Self::Server(message.into())
    }
}
