//! Denoising engine seam
//!
//! The request pipeline treats the model as an opaque collaborator: samples,
//! a sample rate and the compute device go in, a denoised buffer (possibly at
//! a different sample rate) or nothing comes out.

mod rnnoise;

pub use rnnoise::RnnoiseDenoiser;

use denoiser_common::{ComputeDevice, DenoisedSignal};

/// External denoising routine
///
/// `Ok(None)` means the engine produced no usable result; `Err` means the
/// engine itself failed.
pub trait Denoiser: Send + Sync {
    fn denoise(
        &self,
        samples: &[f32],
        sample_rate: u32,
        device: ComputeDevice,
    ) -> anyhow::Result<Option<DenoisedSignal>>;
}
