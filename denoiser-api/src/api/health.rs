//! Health check endpoint

use axum::{extract::State, routing::get, Json, Router};
use denoiser_common::ComputeDevice;
use serde::Serialize;

use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always "healthy" while the process is serving
    pub status: String,
    /// Compute device selected at startup
    pub device: ComputeDevice,
    pub module: String,
    /// Crate version from Cargo.toml
    pub version: String,
}

/// GET /health
///
/// Health check endpoint for monitoring. Never fails.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        device: state.device,
        module: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
