//! Error types for the capture engine.

use thiserror::Error;

/// Errors raised while exporting, decoding or configuring a signature pad.
///
/// Drawing itself never fails; these only surface at the edges where
/// bytes or configuration enter or leave the engine.
#[derive(Debug, Error)]
pub enum SignatureError {
    #[error("Surface has no pixels to export")]
    EmptySurface,
    #[error("PNG encoding failed: {0}")]
    Encode(String),
    #[error("Invalid signature data URI: {0}")]
    InvalidDataUri(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(String),
}

/// Result type for signature operations.
pub type SignatureResult<T> = Result<T, SignatureError>;
