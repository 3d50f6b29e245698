//! Common error types for the denoiser service

use thiserror::Error;

/// Common result type for denoiser operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the denoiser crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Audio could not be decoded from the input file
    #[error("Audio decode error: {0}")]
    Decode(String),

    /// Audio could not be written to the output file
    #[error("Audio encode error: {0}")]
    Encode(String),
}

impl From<symphonia::core::errors::Error> for Error {
    fn from(err: symphonia::core::errors::Error) -> Self {
        Error::Decode(err.to_string())
    }
}

impl From<hound::Error> for Error {
    fn from(err: hound::Error) -> Self {
        match err {
            hound::Error::IoError(io) => Error::Io(io),
            other => Error::Encode(other.to_string()),
        }
    }
}
