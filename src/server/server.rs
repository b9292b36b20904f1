//! HTTP server core implementation
//!
//! This module provides the HttpServer struct and its core methods.

use crate::config::{Config, ServerConfig};
use crate::core::host::{HostLifecycle, KubeHostClient};
use crate::server::routes;
use crate::server::state::AppState;
use crate::utils::error::{Result, WebhookError};
use actix_web::{
    App, HttpServer as ActixHttpServer,
    middleware::{DefaultHeaders, Logger},
    web,
};
use std::sync::Arc;
use tracing::info;

/// HTTP server
pub struct HttpServer {
    /// Server configuration
    config: ServerConfig,
    /// Application state
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server with the cluster-backed host client
    pub async fn new(config: &Config) -> Result<Self> {
        info!("Creating HTTP server");

        let host = KubeHostClient::new(config.cluster.clone()).await?;
        Self::with_host(config, Arc::new(host))
    }

    /// Create a new HTTP server around an injected host lifecycle
    /// collaborator
    pub fn with_host(config: &Config, host: Arc<dyn HostLifecycle>) -> Result<Self> {
        let state = AppState::with_host(config.clone(), host)?;

        Ok(Self {
            config: config.server.clone(),
            state,
        })
    }

    /// Create the Actix-web application
    pub fn create_app(
        state: web::Data<AppState>,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let mut access_log = Logger::default();
        if state.config.server.disable_healthz_logs {
            access_log = access_log.exclude("/healthz");
        }

        App::new()
            .app_data(state)
            .wrap(access_log)
            .wrap(DefaultHeaders::new().add(("Server", env!("CARGO_PKG_NAME"))))
            .configure(routes::health::configure_routes)
            .configure(routes::webhook::configure_routes)
    }

    /// Start the HTTP server
    pub async fn start(self) -> Result<()> {
        let bind_addr = self.config.address();
        let workers = self.config.worker_count();

        info!("Starting HTTP server on {}", bind_addr);

        let state = web::Data::new(self.state);

        let server = ActixHttpServer::new(move || Self::create_app(state.clone()))
            .workers(workers)
            .bind(&bind_addr)
            .map_err(|e| {
                WebhookError::Server(format!("Failed to bind to {}: {}", bind_addr, e))
            })?
            .run();

        info!("HTTP server listening on {}", bind_addr);

        server
            .await
            .map_err(|e| WebhookError::Server(format!("Server error: {}", e)))?;

        info!("HTTP server stopped");
        Ok(())
    }

    /// Get server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get application state
    pub fn state(&self) -> &AppState {
        &self.state
    }
}
