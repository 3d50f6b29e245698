//! Upload-to-download denoising pipeline
//!
//! One call handles one upload start to finish: persist the upload to a
//! scoped temp file, decode it, hand the samples to the engine, encode the
//! result to a second scoped temp file and return a read handle on it.
//! Both temp files are unlinked before [`DenoisePipeline::run`] returns,
//! whatever the outcome.
//!
//! The work here is blocking (file I/O, decoding, inference); callers on the
//! async runtime go through `spawn_blocking`.

use crate::engine::Denoiser;
use crate::error::{ApiError, ApiResult};
use crate::temp::ScopedTempFile;
use crate::upload::UploadedAudio;
use anyhow::Context;
use denoiser_common::{audio, ComputeDevice};
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

const INPUT_PREFIX: &str = "denoise-in-";
const OUTPUT_PREFIX: &str = "denoise-out-";

/// Encoded result, detached from the filesystem
#[derive(Debug)]
pub struct DenoisedFile {
    /// Read handle positioned at the start of the WAV data
    pub file: File,
    /// Size of the WAV data in bytes
    pub len: u64,
    /// Attachment name (`denoised_<sanitized name>`)
    pub download_name: String,
}

/// Stateless pipeline shared by all requests
pub struct DenoisePipeline {
    denoiser: Arc<dyn Denoiser>,
    device: ComputeDevice,
    temp_dir: PathBuf,
}

impl DenoisePipeline {
    pub fn new(denoiser: Arc<dyn Denoiser>, device: ComputeDevice, temp_dir: PathBuf) -> Self {
        Self {
            denoiser,
            device,
            temp_dir,
        }
    }

    /// Denoise one upload
    ///
    /// # Errors
    /// * `ProcessingFailure` when the engine returns no result
    /// * `Internal` for filesystem, decode, encode or engine errors
    pub fn run(&self, upload: &UploadedAudio) -> ApiResult<DenoisedFile> {
        let mut input = ScopedTempFile::create_in(&self.temp_dir, INPUT_PREFIX)
            .context("Failed to create temp file for upload")?;
        input
            .write_all(upload.bytes())
            .context("Failed to write upload to temp file")?;

        let decoded = audio::decode_wav(input.path()).context("Failed to decode uploaded audio")?;
        debug!(
            sample_rate = decoded.sample_rate,
            channels = decoded.channels,
            samples = decoded.samples.len(),
            "Decoded upload (first channel only)"
        );

        let denoised = self
            .denoiser
            .denoise(&decoded.samples, decoded.sample_rate, self.device)
            .context("Denoising engine failed")?
            .ok_or(ApiError::ProcessingFailure)?;

        let output = ScopedTempFile::create_in(&self.temp_dir, OUTPUT_PREFIX)
            .context("Failed to create temp file for result")?;
        audio::encode_wav(output.path(), &denoised).context("Failed to encode denoised audio")?;

        let file = output.reopen().context("Failed to open encoded result")?;
        let len = file.metadata().context("Failed to stat encoded result")?.len();

        info!(
            filename = %upload.filename(),
            input_rate = decoded.sample_rate,
            output_rate = denoised.sample_rate,
            bytes = len,
            "Denoised upload"
        );

        Ok(DenoisedFile {
            file,
            len,
            download_name: upload.download_name(),
        })
        // `output` and `input` drop here, unlinking both temp files
    }
}
