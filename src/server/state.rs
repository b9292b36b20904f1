//! Application state shared across HTTP handlers

use crate::config::Config;
use crate::core::dispatcher::Dispatcher;
use crate::core::host::HostLifecycle;
use crate::services::reporter::OutcomeReporter;
use crate::utils::error::Result;
use std::sync::Arc;

/// HTTP server state shared across handlers.
///
/// All fields are wrapped in Arc and read-only after startup, so the
/// state clones cheaply into each worker and holds no per-request data.
#[derive(Clone)]
pub struct AppState {
    /// Service configuration (shared read-only)
    pub config: Arc<Config>,
    /// Event dispatcher
    pub dispatcher: Arc<Dispatcher>,
}

impl AppState {
    /// Build the state around an injected host lifecycle collaborator.
    ///
    /// The HTTP client for the reporter is constructed here, once per
    /// process, and shared by all request handlers.
    pub fn with_host(config: Config, host: Arc<dyn HostLifecycle>) -> Result<Self> {
        let client = reqwest::Client::builder().build()?;

        let reporter = OutcomeReporter::new(
            client,
            config.reporting.clone(),
            config.security.webhook_secret.clone(),
            config.cluster.namespace.clone(),
        );

        let dispatcher = Dispatcher::new(host, reporter, config.provisioning.clone());

        Ok(Self {
            config: Arc::new(config),
            dispatcher: Arc::new(dispatcher),
        })
    }
}
