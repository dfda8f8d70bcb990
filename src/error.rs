//! Error types for binwise

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Malformed rule table or service configuration. Fatal at startup;
    /// the process must not serve requests with a bad table.
    #[error("configuration error: {0}")]
    Config(String),

    /// The external label-detection service failed (network, quota,
    /// unreadable image). Surfaced to the client as a request failure,
    /// never mapped to an "Unknown" classification.
    #[error("label detection failed: {0}")]
    LabelDetection(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
