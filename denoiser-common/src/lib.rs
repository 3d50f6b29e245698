//! # Audio Denoiser Common Library
//!
//! Shared code for the denoiser service including:
//! - Error types
//! - Configuration loading (TOML bootstrap + defaults)
//! - Compute device selection
//! - WAV decoding/encoding and signal buffers

pub mod audio;
pub mod config;
pub mod device;
pub mod error;

pub use audio::{DecodedSignal, DenoisedSignal};
pub use device::{ComputeDevice, DevicePreference};
pub use error::{Error, Result};
