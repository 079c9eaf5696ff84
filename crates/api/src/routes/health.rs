//! Liveness endpoint.

use axum::{Router, routing::get};
use serde::Serialize;

use crate::{AppState, response::ApiResponse};

/// Health check payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
}

async fn health_check() -> ApiResponse<HealthResponse> {
    ApiResponse::ok(
        "Server is running",
        HealthResponse {
            status: "healthy",
            version: env!("CARGO_PKG_VERSION"),
        },
    )
}

/// Creates health check routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
