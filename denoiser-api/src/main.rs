//! denoiser-api - Audio denoising HTTP service
//!
//! **Module Identity:**
//! - Name: denoiser-api
//! - Port: 6488 (all interfaces)
//!
//! Accepts WAV uploads on `POST /denoise`, runs them through the neural
//! denoiser and streams the result back as a WAV attachment.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use denoiser_api::engine::RnnoiseDenoiser;
use denoiser_api::{build_router, AppState};
use denoiser_common::config::{ConfigOverrides, TomlConfig};
use denoiser_common::DevicePreference;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for denoiser-api
#[derive(Parser, Debug)]
#[command(name = "denoiser-api")]
#[command(about = "Audio denoising HTTP service")]
#[command(version)]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, env = "DENOISER_CONFIG")]
    config: Option<PathBuf>,

    /// Interface to bind
    #[arg(long, env = "DENOISER_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "DENOISER_PORT")]
    port: Option<u16>,

    /// Compute device: auto, cuda or cpu
    #[arg(short, long, env = "DENOISER_DEVICE")]
    device: Option<DevicePreference>,

    /// Directory for per-request temp files
    #[arg(long, env = "DENOISER_TEMP_DIR")]
    temp_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "DENOISER_LOG_LEVEL")]
    log_level: Option<String>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            host: self.host.clone(),
            port: self.port,
            device: self.device,
            temp_dir: self.temp_dir.clone(),
            log_level: self.log_level.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config is read before tracing init so the log level can come from the TOML file
    let (file_config, config_source) = TomlConfig::load(args.config.as_deref())?;
    let config = file_config
        .with_overrides(args.overrides())
        .context("Invalid configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("denoiser_api={0},denoiser_common={0},tower_http={0}", config.log_level)
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting Audio Denoiser API (denoiser-api) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    config_source.log();
    info!(?config, "Resolved configuration");

    // Resolved once; read-only for the life of the process
    let device = config.device.resolve();
    info!("Using device: {}", device);
    info!("Temp directory: {}", config.temp_dir.display());

    let denoiser = Arc::new(RnnoiseDenoiser::from_config(&config.denoiser));
    let state = AppState::new(device, denoiser, config.temp_dir.clone())
        .with_upload_limit(config.max_upload_bytes);
    let app = build_router(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("denoiser-api listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
