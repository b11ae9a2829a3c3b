//! Health check endpoint

use axum::{routing::get, Json, Router};
use serde::Serialize;

/// Health check response: status, listener name and version
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
}

/// GET /health
pub async fn health_check(module: &'static str) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        module: module.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Build health check routes for the listener named `module`
pub fn health_routes<S>(module: &'static str) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/health", get(move || health_check(module)))
}
