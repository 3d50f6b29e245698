//! Configuration loading
//!
//! Bootstrap configuration is resolved in this priority order:
//! 1. Command-line arguments
//! 2. Environment variables (bound to the same arguments)
//! 3. TOML configuration file
//! 4. Built-in defaults
//!
//! A missing TOML file is not an error: a warning is logged and defaults are
//! used. A file that exists but cannot be parsed is a configuration error.

use crate::device::DevicePreference;
use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Application directory name used under the platform config dir
const APP_DIR: &str = "audio-denoiser";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 6488;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 256 * 1024 * 1024;

/// Bootstrap configuration loaded from TOML file
///
/// Every key is optional. These settings cannot change during runtime.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    /// Interface to bind (default: all interfaces)
    pub host: String,

    /// HTTP server port (default: 6488)
    pub port: u16,

    /// Compute device preference
    pub device: DevicePreference,

    /// Directory for scoped temp files (default: OS temp dir)
    pub temp_dir: Option<PathBuf>,

    /// Upper bound for `/denoise` request bodies
    pub max_upload_bytes: usize,

    pub logging: LoggingConfig,

    pub denoiser: DenoiserConfig,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            device: DevicePreference::Auto,
            temp_dir: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            logging: LoggingConfig::default(),
            denoiser: DenoiserConfig::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Settings for the bundled RNNoise engine
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DenoiserConfig {
    /// Blend between original (0.0) and fully denoised (1.0) audio
    pub strength: f32,

    /// Resample output back to the upload's rate instead of the model's 48 kHz
    pub restore_sample_rate: bool,
}

impl Default for DenoiserConfig {
    fn default() -> Self {
        Self {
            strength: 1.0,
            restore_sample_rate: false,
        }
    }
}

/// Where the bootstrap configuration came from
///
/// Loading happens before the tracing subscriber exists, so the outcome is
/// returned to the caller and logged once logging is up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Parsed from this file
    File(PathBuf),
    /// This file was requested but does not exist; defaults used
    Missing(PathBuf),
    /// No file given and none at the platform locations; defaults used
    Defaults,
}

impl ConfigSource {
    /// Report the outcome at the appropriate level
    pub fn log(&self) {
        match self {
            ConfigSource::File(path) => {
                info!("Loaded configuration from {}", path.display());
            }
            ConfigSource::Missing(path) => {
                warn!(
                    "Configuration file {} not found, using defaults",
                    path.display()
                );
            }
            ConfigSource::Defaults => {
                info!("No configuration file found, using defaults");
            }
        }
    }
}

impl TomlConfig {
    /// Load configuration from `path`, or from the platform default location
    pub fn load(path: Option<&Path>) -> Result<(Self, ConfigSource)> {
        let path = match path {
            Some(p) => Some(p.to_path_buf()),
            None => default_config_path(),
        };

        let Some(path) = path else {
            return Ok((Self::default(), ConfigSource::Defaults));
        };

        if !path.exists() {
            return Ok((Self::default(), ConfigSource::Missing(path)));
        }

        let content = std::fs::read_to_string(&path)?;
        let config = Self::from_toml_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;

        Ok((config, ConfigSource::File(path)))
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Merge command-line/environment overrides on top of this file config
    pub fn with_overrides(self, overrides: ConfigOverrides) -> Result<ServiceConfig> {
        let config = ServiceConfig {
            host: overrides.host.unwrap_or(self.host),
            port: overrides.port.unwrap_or(self.port),
            device: overrides.device.unwrap_or(self.device),
            temp_dir: overrides
                .temp_dir
                .or(self.temp_dir)
                .unwrap_or_else(std::env::temp_dir),
            max_upload_bytes: self.max_upload_bytes,
            log_level: overrides.log_level.unwrap_or(self.logging.level),
            denoiser: self.denoiser,
        };

        config.validate()?;
        Ok(config)
    }
}

/// Values supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub device: Option<DevicePreference>,
    pub temp_dir: Option<PathBuf>,
    pub log_level: Option<String>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub device: DevicePreference,
    pub temp_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub log_level: String,
    pub denoiser: DenoiserConfig,
}

impl ServiceConfig {
    /// `host:port` string suitable for a TCP listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(Error::Config("host must not be empty".to_string()));
        }
        if self.max_upload_bytes == 0 {
            return Err(Error::Config(
                "max_upload_bytes must be greater than zero".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.denoiser.strength) {
            return Err(Error::Config(format!(
                "denoiser.strength must be within [0.0, 1.0], got {}",
                self.denoiser.strength
            )));
        }
        Ok(())
    }
}

/// Platform default configuration file, if one exists
///
/// Linux checks `~/.config/audio-denoiser/config.toml` then
/// `/etc/audio-denoiser/config.toml`; other platforms use the platform
/// config directory only.
fn default_config_path() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc").join(APP_DIR).join("config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}
