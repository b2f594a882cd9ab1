//! Health check endpoints
//!
//! Liveness plus a database connectivity probe.

use actix_web::web::{Data, Json};
use actix_web::{HttpResponse, Responder, get};
use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};

/// Liveness health check response (simple)
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LivenessResponse {
    /// Service status
    pub status: String,
    /// Timestamp of the check
    pub timestamp: DateTime<Utc>,
}

/// Health check response (detailed)
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Application version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// Liveness check endpoint
///
/// Always returns 200 OK while the process is up; no dependencies are
/// checked.
#[get("/health")]
pub async fn health() -> impl Responder {
    let response = LivenessResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
    };

    ::tracing::debug!("Liveness check: healthy");
    Json(response)
}

/// Detailed health check including database connectivity
#[get("/health/db")]
pub async fn health_db(db: Data<DatabaseConnection>) -> impl Responder {
    let connected = db.ping().await.is_ok();

    let response = HealthResponse {
        status: if connected { "healthy" } else { "unhealthy" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: if connected { "connected" } else { "disconnected" }.to_string(),
    };

    if connected {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}
