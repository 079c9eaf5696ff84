//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes under `/api/v1`
//! - Authentication middleware (bearer header or cookie)
//! - Request extractors with enveloped rejections
//! - Success and error response envelopes

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod response;
pub mod routes;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use spendwise_shared::{JwtService, config::CookieConfig};

pub use error::ApiError;
pub use response::ApiResponse;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// JWT service for token operations.
    pub jwt_service: Arc<JwtService>,
    /// Auth cookie attributes.
    pub cookies: CookieConfig,
}

/// Creates the main application router.
///
/// With a `frontend_url` the CORS layer allows that single origin with
/// credentials so the auth cookies travel; without one it is permissive.
pub fn create_router(state: AppState, frontend_url: Option<&str>) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(frontend_url))
        .with_state(state)
}

fn cors_layer(frontend_url: Option<&str>) -> CorsLayer {
    let origin = frontend_url.and_then(|url| match HeaderValue::from_str(url) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(%url, error = %e, "Ignoring unusable frontend_url for CORS");
            None
        }
    });

    match origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_credentials(true)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    }
}
