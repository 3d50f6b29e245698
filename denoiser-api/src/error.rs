//! Error types for denoiser-api
//!
//! Every failure of a request is one of three kinds; an oversized upload is
//! invalid input answered with 413 instead of 400. All of them are turned
//! into a JSON body of the form `{"error": "<message>"}` at the request
//! boundary; nothing escapes to the caller as an unhandled fault.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Kind of failure, for branching without matching on message text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    ProcessingFailure,
    Internal,
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing file field, empty filename, disallowed extension (400)
    #[error("{0}")]
    InvalidInput(String),

    /// Request body exceeded the `/denoise` upload limit (413)
    #[error("File too large: uploads are limited to {limit} bytes")]
    PayloadTooLarge { limit: usize },

    /// Denoising engine produced no result (500)
    #[error("Failed to process the audio file")]
    ProcessingFailure,

    /// Anything else: decode, encode, filesystem, engine crash (500)
    #[error("Internal server error: {0:#}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::InvalidInput(_) | ApiError::PayloadTooLarge { .. } => {
                ErrorKind::InvalidInput
            }
            ApiError::ProcessingFailure => ErrorKind::ProcessingFailure,
            ApiError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn status(&self) -> StatusCode {
        if let ApiError::PayloadTooLarge { .. } = self {
            return StatusCode::PAYLOAD_TOO_LARGE;
        }
        match self.kind() {
            ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorKind::ProcessingFailure | ErrorKind::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<denoiser_common::Error> for ApiError {
    fn from(err: denoiser_common::Error) -> Self {
        ApiError::Internal(err.into())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::Internal(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Internal(err) => {
                // {:?} on anyhow prints the full cause chain (and backtrace when enabled)
                tracing::error!("Error processing audio file: {:?}", err);
            }
            ApiError::ProcessingFailure => {
                tracing::warn!("Denoising engine returned no result");
            }
            ApiError::InvalidInput(msg) => {
                tracing::debug!(reason = %msg, "Rejected upload");
            }
            ApiError::PayloadTooLarge { limit } => {
                tracing::warn!(limit = *limit, "Rejected oversized upload");
            }
        }

        let status = self.status();
        let body = Json(json!({ "error": self.to_string() }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
