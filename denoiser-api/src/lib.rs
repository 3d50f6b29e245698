//! denoiser-api library - audio denoising HTTP service
//!
//! Exposes the router and state for the binary and for integration tests.

pub mod api;
pub mod engine;
pub mod error;
pub mod pipeline;
pub mod temp;
pub mod upload;

pub use crate::error::{ApiError, ApiResult, ErrorKind};

use axum::Router;
use denoiser_common::config::DEFAULT_MAX_UPLOAD_BYTES;
use denoiser_common::ComputeDevice;
use engine::Denoiser;
use pipeline::DenoisePipeline;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Application state shared across HTTP handlers
///
/// Read-only after startup; nothing here changes between requests.
#[derive(Clone)]
pub struct AppState {
    /// Compute device selected once at startup
    pub device: ComputeDevice,
    /// Upload-to-download pipeline
    pub pipeline: Arc<DenoisePipeline>,
    /// Request body limit for `/denoise`
    pub max_upload_bytes: usize,
}

impl AppState {
    /// Create new application state
    pub fn new(device: ComputeDevice, denoiser: Arc<dyn Denoiser>, temp_dir: PathBuf) -> Self {
        Self {
            device,
            pipeline: Arc::new(DenoisePipeline::new(denoiser, device, temp_dir)),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    pub fn with_upload_limit(mut self, max_upload_bytes: usize) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::info_routes())
        .merge(api::health_routes())
        .merge(api::denoise_routes(state.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
