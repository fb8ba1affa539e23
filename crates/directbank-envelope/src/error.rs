//! Error types for envelope construction

use thiserror::Error;

/// Errors that can occur while building an envelope
#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("Missing required statement fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("Failed to write envelope XML: {0}")]
    Write(#[from] std::io::Error),

    #[error("Envelope is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
