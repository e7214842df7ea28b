use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

use crate::core::TimezoneConverter;

/// Health check response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: String,
}

/// GET /health - Liveness probe
/// Returns 200 whenever the process can answer; the stores live in memory,
/// so there are no dependencies to check
pub async fn health_check() -> impl Responder {
    let response = HealthResponse {
        status: "healthy".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: TimezoneConverter::format_iso8601_utc(chrono::Utc::now()),
    };

    HttpResponse::Ok().json(response)
}

/// Configure health check routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}
