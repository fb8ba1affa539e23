//! # DirectBank Envelope
//!
//! Envelope construction for the DirectBank exchange protocol.
//!
//! This crate provides:
//! - Transport-packet assembly with a base64-encoded document payload
//! - The statement request and status probe document bodies
//! - One shared envelope header (namespaces, fresh UUID, format version,
//!   creation timestamp, client identifier) behind both shapes
//!
//! ## Example
//!
//! ```rust,ignore
//! use directbank_envelope::{statement_request, transport_packet, StatementQuery};
//!
//! let query = StatementQuery::for_account("40702810000000000001");
//! let document = statement_request(&query, &config)?;
//! let packet = transport_packet("14", &document, &config)?;
//! ```

mod builder;
mod error;
mod statement;

pub use builder::{transport_packet, SCHEMA_NAMESPACE, USER_AGENT};
pub use error::EnvelopeError;
pub use statement::{statement_request, status_probe, StatementQuery, StatementType};
