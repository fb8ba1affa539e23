//! Client error taxonomy
//!
//! Callers react differently to a bank rejection (re-logon on an auth code,
//! give up on a malformed-document code) than to a transport or parse
//! failure, so the variants keep those conditions apart instead of collapsing
//! everything into one message.

use directbank_core::{ConfigError, ResponseError};
use directbank_envelope::EnvelopeError;
use thiserror::Error;

use crate::transport::TransportError;

/// Errors surfaced by protocol operations
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Bank session not started, call logon() first")]
    SessionNotStarted,

    #[error("Transport failure: {0}")]
    Transport(#[from] TransportError),

    #[error("Failed to parse bank response: {0}")]
    ResponseParse(String),

    #[error("Bank error {code}: {description}")]
    Bank { code: i32, description: String },

    #[error("Bank response contains neither Success nor Error")]
    UnknownResponse,

    #[error("Missing required statement fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("Failed to build envelope: {0}")]
    Envelope(String),
}

impl From<ResponseError> for ClientError {
    fn from(error: ResponseError) -> Self {
        match error {
            ResponseError::Parse(message) => ClientError::ResponseParse(message),
            ResponseError::Bank { code, description } => ClientError::Bank { code, description },
            ResponseError::UnknownShape => ClientError::UnknownResponse,
        }
    }
}

impl From<EnvelopeError> for ClientError {
    fn from(error: EnvelopeError) -> Self {
        match error {
            EnvelopeError::MissingFields(fields) => ClientError::MissingFields(fields),
            other => ClientError::Envelope(other.to_string()),
        }
    }
}
