//! Volumes service error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VolumesError {
    #[error("invalid volume ID {input:?}: {reason}")]
    InvalidId { input: String, reason: String },

    #[error("volume not found: {0}")]
    NotFound(String),

    #[error("volumes API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, VolumesError>;
