//! Error types for DirectBank core

use thiserror::Error;

use crate::response::ResponseError;
use crate::settings::ConfigError;
use crate::version::VersionError;

/// Errors that can occur in core DirectBank operations
#[derive(Debug, Error)]
pub enum DirectBankError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Version error: {0}")]
    Version(#[from] VersionError),

    #[error("Response error: {0}")]
    Response(#[from] ResponseError),
}
