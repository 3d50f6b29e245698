//! Compute device selection
//!
//! The device is resolved once at startup and passed by value into the
//! request handlers. It is never changed while the process runs.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Paths that only exist when the NVIDIA kernel driver is loaded
const NVIDIA_DRIVER_PROBES: &[&str] = &["/proc/driver/nvidia/version", "/dev/nvidiactl"];

/// Hardware target handed to the denoising engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComputeDevice {
    /// CUDA-capable GPU
    Cuda,
    /// General-purpose processor
    Cpu,
}

impl ComputeDevice {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComputeDevice::Cuda => "cuda",
            ComputeDevice::Cpu => "cpu",
        }
    }

    /// Probe the host for an accelerator, falling back to the CPU
    pub fn detect() -> Self {
        Self::detect_with(|path| Path::new(path).exists())
    }

    fn detect_with(probe: impl Fn(&str) -> bool) -> Self {
        if NVIDIA_DRIVER_PROBES.iter().any(|p| probe(p)) {
            ComputeDevice::Cuda
        } else {
            ComputeDevice::Cpu
        }
    }
}

impl fmt::Display for ComputeDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configured device preference (`auto` defers to [`ComputeDevice::detect`])
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum DevicePreference {
    #[default]
    Auto,
    Cuda,
    Cpu,
}

impl DevicePreference {
    /// Turn the preference into a concrete device
    pub fn resolve(self) -> ComputeDevice {
        match self {
            DevicePreference::Auto => ComputeDevice::detect(),
            DevicePreference::Cuda => ComputeDevice::Cuda,
            DevicePreference::Cpu => ComputeDevice::Cpu,
        }
    }
}

impl FromStr for DevicePreference {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(DevicePreference::Auto),
            "cuda" | "gpu" => Ok(DevicePreference::Cuda),
            "cpu" => Ok(DevicePreference::Cpu),
            other => Err(Error::Config(format!(
                "Unknown device '{}' (expected auto, cuda or cpu)",
                other
            ))),
        }
    }
}

impl TryFrom<String> for DevicePreference {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}
