//! RNNoise neural noise suppression via nnnoiseless
//!
//! RNNoise only runs at 48 kHz, so input is resampled up front. The result
//! stays at 48 kHz unless the engine is configured to restore the source rate.

use super::Denoiser;
use anyhow::{Context, Result};
use denoiser_common::config::DenoiserConfig;
use denoiser_common::{ComputeDevice, DenoisedSignal};
use nnnoiseless::DenoiseState;
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};

/// RNNoise sample rate (fixed at 48kHz)
const RNNOISE_SAMPLE_RATE: u32 = 48000;

/// RNNoise frame size (480 samples at 48kHz = 10ms)
const RNNOISE_FRAME_SIZE: usize = 480;

/// RNNoise expects samples in 16-bit PCM range rather than [-1.0, 1.0]
const PCM_SCALE: f32 = 32767.0;

/// Bundled denoising engine
#[derive(Debug, Clone)]
pub struct RnnoiseDenoiser {
    strength: f32,
    restore_sample_rate: bool,
}

impl RnnoiseDenoiser {
    /// # Arguments
    /// * `strength` - Blend strength (0.0 = original, 1.0 = fully denoised)
    /// * `restore_sample_rate` - Resample the result back to the input rate
    pub fn new(strength: f32, restore_sample_rate: bool) -> Self {
        Self {
            strength: strength.clamp(0.0, 1.0),
            restore_sample_rate,
        }
    }

    pub fn from_config(config: &DenoiserConfig) -> Self {
        Self::new(config.strength, config.restore_sample_rate)
    }

    fn run_rnnoise(&self, samples: &[f32]) -> Vec<f32> {
        let mut state = DenoiseState::new();
        let mut output = Vec::with_capacity(samples.len());

        let mut input_frame = [0.0f32; RNNOISE_FRAME_SIZE];
        let mut output_frame = [0.0f32; RNNOISE_FRAME_SIZE];

        for chunk in samples.chunks(RNNOISE_FRAME_SIZE) {
            // Zero-pad the trailing partial frame
            input_frame.fill(0.0);
            for (dst, src) in input_frame.iter_mut().zip(chunk) {
                *dst = src * PCM_SCALE;
            }

            state.process_frame(&mut output_frame, &input_frame);

            output.extend(output_frame[..chunk.len()].iter().map(|s| s / PCM_SCALE));
        }

        output
    }

    fn blend(&self, original: &[f32], denoised: &mut [f32]) {
        if self.strength >= 1.0 {
            return;
        }
        for (out, orig) in denoised.iter_mut().zip(original) {
            *out = orig * (1.0 - self.strength) + *out * self.strength;
        }
    }
}

impl Denoiser for RnnoiseDenoiser {
    fn denoise(
        &self,
        samples: &[f32],
        sample_rate: u32,
        device: ComputeDevice,
    ) -> Result<Option<DenoisedSignal>> {
        if samples.is_empty() || sample_rate == 0 {
            return Ok(None);
        }

        // nnnoiseless has no accelerator backend
        tracing::debug!(
            requested_device = %device,
            samples = samples.len(),
            sample_rate,
            "Running RNNoise on CPU"
        );

        let input_48k = resample(samples, sample_rate, RNNOISE_SAMPLE_RATE)
            .context("Failed to resample input to 48 kHz")?;

        let mut denoised = self.run_rnnoise(&input_48k);
        self.blend(&input_48k, &mut denoised);

        if self.restore_sample_rate && sample_rate != RNNOISE_SAMPLE_RATE {
            let mut restored = resample(&denoised, RNNOISE_SAMPLE_RATE, sample_rate)
                .context("Failed to resample output to source rate")?;
            restored.resize(samples.len(), 0.0);
            return Ok(Some(DenoisedSignal::new(restored, sample_rate)));
        }

        Ok(Some(DenoisedSignal::new(denoised, RNNOISE_SAMPLE_RATE)))
    }
}

/// Resample a mono buffer in one pass, compensating for the filter delay
fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>> {
    if from_rate == to_rate || samples.is_empty() {
        return Ok(samples.to_vec());
    }

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let ratio = to_rate as f64 / from_rate as f64;
    let expected_len = (samples.len() as f64 * ratio).round() as usize;

    let mut resampler = SincFixedIn::<f32>::new(ratio, 2.0, params, samples.len(), 1)?;
    let delay = resampler.output_delay();

    let mut output = resampler
        .process(&[samples], None)?
        .into_iter()
        .next()
        .unwrap_or_default();

    // Flush the samples still held back by the filter
    let tail = resampler
        .process_partial(None::<&[Vec<f32>]>, None)?
        .into_iter()
        .next()
        .unwrap_or_default();
    output.extend(tail);

    let mut aligned: Vec<f32> = output.into_iter().skip(delay).collect();
    aligned.resize(expected_len, 0.0);
    Ok(aligned)
}
