//! # DirectBank Core
//!
//! Core types for the DirectBank exchange protocol used between accounting
//! systems and Russian commercial banks.
//!
//! This crate provides:
//! - The typed exchange configuration and its settings-document loader
//! - Format version parsing and matching
//! - The fixed document-kind catalogue
//! - Bank reply envelopes and the Success/Error classification rules
//!
//! ## Example
//!
//! ```rust,ignore
//! use directbank_core::{ExchangeConfig, response::classify};
//!
//! // Load the settings document the bank issued during enrollment
//! let config = ExchangeConfig::from_settings_file("settings.xml")?;
//!
//! // Classify a reply body
//! let success = classify(&body)?;
//! ```

pub mod dockind;
pub mod error;
pub mod response;
pub mod settings;
pub mod types;
pub mod version;

// Re-exports for convenience
pub use error::DirectBankError;
pub use response::{ResponseEnvelope, ResponseError, SuccessBody};
pub use settings::ConfigError;
pub use types::{BankIdentity, CustomerIdentity, ExchangeConfig};
pub use version::{FormatVersion, VersionError, PROTOCOL_VERSION};
