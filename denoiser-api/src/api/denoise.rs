//! POST /denoise
//!
//! Accepts a multipart upload with a `file` part holding a WAV file and
//! answers with the denoised WAV as an attachment.

use axum::{
    body::Body,
    extract::{
        multipart::{MultipartError, MultipartRejection},
        DefaultBodyLimit, Multipart, State,
    },
    http::{header, StatusCode},
    response::Response,
    routing::post,
    Router,
};
use tokio_util::io::ReaderStream;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::upload::{validate_filename, UploadedAudio};
use crate::AppState;

/// Multipart field carrying the audio file
const FILE_FIELD: &str = "file";

/// POST /denoise
#[tracing::instrument(skip_all, fields(request_id = %Uuid::new_v4()))]
pub async fn denoise_audio(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Response> {
    let upload = read_upload(multipart, state.max_upload_bytes).await?;
    tracing::info!(
        filename = %upload.filename(),
        bytes = upload.bytes().len(),
        "Received upload"
    );

    let pipeline = state.pipeline.clone();
    let result = tokio::task::spawn_blocking(move || pipeline.run(&upload))
        .await
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("Denoising task failed: {}", e)))??;

    let body = Body::from_stream(ReaderStream::new(tokio::fs::File::from_std(result.file)));

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "audio/wav")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", result.download_name),
        )
        .header(header::CONTENT_LENGTH, result.len)
        .body(body)
        .map_err(|e| ApiError::Internal(e.into()))?;

    Ok(response)
}

/// Pull the `file` part out of the request without touching disk
///
/// A part only counts as the file when it carries a filename; a plain form
/// value named `file` is treated as missing.
async fn read_upload(
    multipart: Result<Multipart, MultipartRejection>,
    limit: usize,
) -> ApiResult<UploadedAudio> {
    let malformed = |err: MultipartError| {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge { limit }
        } else {
            ApiError::InvalidInput(format!("Malformed upload: {}", err))
        }
    };

    let Ok(mut multipart) = multipart else {
        return Err(no_file());
    };

    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let Some(filename) = field.file_name().map(str::to_owned) else {
            continue;
        };

        // Reject before buffering the part
        validate_filename(&filename)?;

        let bytes = field.bytes().await.map_err(malformed)?;
        return UploadedAudio::new(filename, bytes.to_vec());
    }

    Err(no_file())
}

fn no_file() -> ApiError {
    ApiError::InvalidInput("No file provided".to_string())
}

/// Build denoise routes with the given request body limit
pub fn denoise_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new().route(
        "/denoise",
        post(denoise_audio).layer(DefaultBodyLimit::max(max_upload_bytes)),
    )
}
