//! Exchange settings loading
//!
//! The bank issues a static XML settings document during enrollment. It names
//! the endpoint, the customer's identifiers and the document kinds enabled for
//! the connection. This module parses it into an [`ExchangeConfig`].
//!
//! The document is written from the bank's point of view: its `Sender` block
//! is the bank, its `Recipient` block is the customer.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::types::{BankIdentity, CustomerIdentity, ExchangeConfig};
use crate::version::{FormatVersion, VersionError};

/// Errors that can occur while loading the settings document
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Settings file could not be read: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings document is malformed: {0}")]
    Malformed(String),

    #[error(transparent)]
    Version(#[from] VersionError),
}

#[derive(Debug, Deserialize)]
struct SettingsDoc {
    #[serde(rename = "@formatVersion")]
    format_version: String,
    #[serde(rename = "Sender")]
    sender: SenderSettings,
    #[serde(rename = "Recipient")]
    recipient: RecipientSettings,
    #[serde(rename = "Data")]
    data: SettingsData,
}

#[derive(Debug, Deserialize)]
struct SenderSettings {
    #[serde(rename = "@bic")]
    bic: String,
    #[serde(rename = "@name")]
    name: String,
}

#[derive(Debug, Deserialize)]
struct RecipientSettings {
    #[serde(rename = "@id")]
    id: String,
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "@inn")]
    inn: String,
    #[serde(rename = "@kpp", default)]
    kpp: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SettingsData {
    #[serde(rename = "BankServerAddress")]
    bank_server_address: String,
    #[serde(rename = "CustomerID")]
    customer_id: String,
    #[serde(rename = "Logon")]
    logon: LogonSettings,
    #[serde(rename = "Document", default)]
    documents: Vec<DocumentSettings>,
}

#[derive(Debug, Deserialize)]
struct LogonSettings {
    #[serde(rename = "Login")]
    login: LoginSettings,
}

#[derive(Debug, Deserialize)]
struct LoginSettings {
    #[serde(rename = "User")]
    user: String,
}

#[derive(Debug, Deserialize)]
struct DocumentSettings {
    #[serde(rename = "@docKind")]
    doc_kind: String,
}

impl ExchangeConfig {
    /// Parse a settings document from a string
    ///
    /// Fails when the document is malformed or was issued for a format
    /// version other than [`crate::PROTOCOL_VERSION`].
    pub fn from_settings_str(xml: &str) -> Result<Self, ConfigError> {
        let doc: SettingsDoc =
            quick_xml::de::from_str(xml).map_err(|e| ConfigError::Malformed(e.to_string()))?;

        let format_version = FormatVersion::parse(&doc.format_version)?;
        format_version.require_current()?;

        let mut base_url = doc.data.bank_server_address;
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Ok(ExchangeConfig {
            base_url,
            customer_id: doc.data.customer_id,
            login: doc.data.logon.login.user,
            format_version,
            bank: BankIdentity {
                bic: doc.sender.bic,
                name: doc.sender.name,
            },
            customer: CustomerIdentity {
                id: doc.recipient.id,
                name: doc.recipient.name,
                inn: doc.recipient.inn,
                kpp: doc.recipient.kpp.filter(|kpp| !kpp.is_empty()),
            },
            doc_kinds: doc
                .data
                .documents
                .into_iter()
                .map(|d| d.doc_kind)
                .collect(),
        })
    }

    /// Load the settings document from a file
    pub fn from_settings_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let xml = fs::read_to_string(path)?;
        Self::from_settings_str(&xml)
    }
}
