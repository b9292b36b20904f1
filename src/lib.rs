//! # metalhook
//!
//! A webhook receiver that translates external reservation lifecycle
//! events into bare-metal server provisioning and deprovisioning actions
//! against cluster-managed BareMetalHost resources, reporting outcomes
//! to external notification and audit endpoints.
//!
//! ## Request flow
//!
//! Every request follows one direction: signature verification over the
//! raw body, payload classification into one of two event shapes, action
//! dispatch (provision, deprovision or no-op), then best-effort outcome
//! reporting. The core is stateless per request — nothing is stored,
//! retried or merged across deliveries.
//!
//! ## Running
//!
//! ```rust,no_run
//! use metalhook::{Config, server::HttpServer};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let server = HttpServer::new(&config).await?;
//!     server.start().await?;
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]

pub mod config;
pub mod core;
pub mod server;
pub mod services;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use utils::error::{Result, WebhookError};

/// Service identifier reported by the health endpoint
pub const SERVICE_NAME: &str = "server-provisioning-webhook";

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
