//! Service information endpoint

use axum::{extract::State, routing::get, Json, Router};
use denoiser_common::ComputeDevice;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::AppState;

/// Endpoint map advertised at `/`
const ENDPOINTS: &[(&str, &str)] = &[
    ("/health", "GET - Health check"),
    ("/denoise", "POST - Upload WAV file to denoise"),
    ("/", "GET - This information"),
];

#[derive(Debug, Serialize)]
pub struct InfoResponse {
    pub message: String,
    pub endpoints: BTreeMap<&'static str, &'static str>,
    pub device: ComputeDevice,
}

/// GET /
pub async fn service_info(State(state): State<AppState>) -> Json<InfoResponse> {
    Json(InfoResponse {
        message: "Audio Denoiser API".to_string(),
        endpoints: ENDPOINTS.iter().copied().collect(),
        device: state.device,
    })
}

pub fn info_routes() -> Router<AppState> {
    Router::new().route("/", get(service_info))
}
