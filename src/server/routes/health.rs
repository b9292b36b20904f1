//! Health check endpoint

use actix_web::{HttpResponse, web};
use serde_json::json;

/// Configure health check routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/healthz", web::get().to(health_check));
}

/// Health check endpoint handler.
///
/// Used by the cluster's liveness and readiness probes; always returns
/// 200 while the process is serving.
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": crate::SERVICE_NAME,
    }))
}
