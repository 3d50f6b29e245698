//! HTTP API handlers for denoiser-api

pub mod denoise;
pub mod health;
pub mod info;

pub use denoise::denoise_routes;
pub use health::health_routes;
pub use info::info_routes;
