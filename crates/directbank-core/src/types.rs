//! Core types for the DirectBank exchange

use crate::dockind;
use crate::version::FormatVersion;

/// The bank side of the exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankIdentity {
    /// Bank identification code
    pub bic: String,
    /// Display name of the bank
    pub name: String,
}

/// The customer side of the exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerIdentity {
    /// Identifier assigned to the customer by the bank
    pub id: String,
    /// Legal name of the customer
    pub name: String,
    /// Taxpayer identification number
    pub inn: String,
    /// Tax registration reason code. Individual entrepreneurs have none,
    /// and the attribute must then be omitted from envelopes entirely.
    pub kpp: Option<String>,
}

/// Resolved exchange configuration
///
/// Produced by the settings loader (see [`ExchangeConfig::from_settings_str`]),
/// consumed read-only by the envelope builder and the protocol client.
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeConfig {
    /// Bank endpoint base URL, guaranteed to end with a slash
    pub base_url: String,
    /// Value of the `CustomerID` header on every call
    pub customer_id: String,
    /// Basic-auth user for `logon`
    pub login: String,
    /// Format version the settings document was issued for
    pub format_version: FormatVersion,
    /// The bank this configuration talks to
    pub bank: BankIdentity,
    /// The customer this configuration identifies
    pub customer: CustomerIdentity,
    /// Dockind codes enabled for this customer
    pub doc_kinds: Vec<String>,
}

impl ExchangeConfig {
    /// Enabled document kinds annotated with their catalogue descriptions
    ///
    /// Codes missing from the catalogue are skipped.
    pub fn allowed_doc_kinds(&self) -> Vec<(&str, &'static str)> {
        self.doc_kinds
            .iter()
            .filter_map(|code| dockind::description(code).map(|text| (code.as_str(), text)))
            .collect()
    }
}
