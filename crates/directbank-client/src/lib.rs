//! # DirectBank Client
//!
//! Session and protocol client for the DirectBank exchange protocol.
//!
//! This crate provides:
//! - [`DirectBankClient`], the session state machine and operation set
//! - The [`Transport`] contract plus the production [`HttpTransport`]
//! - The client error taxonomy separating bank rejections from transport
//!   and parse failures
//! - An optional raw-exchange logging hook
//!
//! ## Example
//!
//! ```rust,ignore
//! use directbank_client::DirectBankClient;
//! use directbank_core::ExchangeConfig;
//! use directbank_envelope::StatementQuery;
//!
//! let config = ExchangeConfig::from_settings_file("settings.xml")?;
//! let mut client = DirectBankClient::new(config)?;
//!
//! client.logon("secret").await?;
//! let request_id = client
//!     .statement_request(&StatementQuery::for_account("40702810000000000001"))
//!     .await?;
//!
//! for id in client.pack_list(None).await? {
//!     let document = client.pack_data(&id).await?;
//!     // hand the statement to the accounting system...
//! }
//! ```

mod client;
mod error;
mod log;
mod transport;

pub use client::{fetch_exchange_settings, DirectBankClient, LastExchange};
pub use error::ClientError;
pub use log::ExchangeLog;
pub use transport::{
    HttpTransport, Method, Transport, TransportError, TransportRequest, TransportResponse,
};
