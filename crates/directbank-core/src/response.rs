//! Bank response envelopes and their classification
//!
//! Every reply from the bank is an XML envelope holding either a `Success`
//! node with an operation-specific payload, or an `Error` node with a numeric
//! code and a human-readable description. A reply carrying neither is treated
//! as its own failure condition: the HTTP call went through, but the payload
//! shape is unrecognized, which must stay distinguishable from a parse
//! failure and from an ordinary bank rejection.

use serde::Deserialize;
use thiserror::Error;

/// Errors produced while interpreting a bank reply
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResponseError {
    #[error("Failed to parse bank response: {0}")]
    Parse(String),

    #[error("Bank error {code}: {description}")]
    Bank { code: i32, description: String },

    #[error("Bank response contains neither Success nor Error")]
    UnknownShape,
}

/// Parsed reply envelope, before classification
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResponseEnvelope {
    #[serde(rename = "Success")]
    pub success: Option<SuccessBody>,
    #[serde(rename = "Error")]
    pub error: Option<BankFault>,
}

/// Payload of a `Success` node; exactly one field is populated per operation
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SuccessBody {
    #[serde(rename = "LogonResponse")]
    pub logon: Option<LogonResponse>,
    #[serde(rename = "GetPacketListResponse")]
    pub packet_list: Option<PacketListResponse>,
    #[serde(rename = "GetPacketResponse")]
    pub packet: Option<PacketResponse>,
    #[serde(rename = "SendPacketResponse")]
    pub sent: Option<SendPacketResponse>,
}

/// Session identifier issued on successful logon
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LogonResponse {
    #[serde(rename = "SID")]
    pub sid: String,
}

/// Identifiers of packets ready for pickup
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PacketListResponse {
    #[serde(rename = "PacketID", default)]
    pub packet_ids: Vec<String>,
}

/// A fetched packet with its base64-encoded document
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PacketResponse {
    #[serde(rename = "Document")]
    pub document: Option<PacketDocument>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PacketDocument {
    #[serde(rename = "Data")]
    pub data: String,
}

/// Identifier assigned by the bank to an accepted packet
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SendPacketResponse {
    #[serde(rename = "ID")]
    pub id: String,
}

/// Business-level rejection reported by the bank
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BankFault {
    #[serde(rename = "Code")]
    pub code: i32,
    #[serde(rename = "Description")]
    pub description: String,
}

/// Parse a reply body into the envelope without classifying it
///
/// The root element name varies between banks and is ignored; only the
/// `Success`/`Error` children matter.
pub fn parse_response(body: &str) -> Result<ResponseEnvelope, ResponseError> {
    quick_xml::de::from_str(body).map_err(|e| ResponseError::Parse(e.to_string()))
}

/// Classify a reply body into a success payload or a typed error
///
/// # Example
///
/// ```
/// use directbank_core::response::classify;
///
/// let body = "<Root><Success><LogonResponse><SID>abc-123</SID></LogonResponse></Success></Root>";
/// let success = classify(body).unwrap();
/// assert_eq!(success.logon.unwrap().sid, "abc-123");
/// ```
pub fn classify(body: &str) -> Result<SuccessBody, ResponseError> {
    let envelope = parse_response(body)?;

    if let Some(fault) = envelope.error {
        return Err(ResponseError::Bank {
            code: fault.code,
            description: fault.description,
        });
    }

    match envelope.success {
        Some(success) => Ok(success),
        None => Err(ResponseError::UnknownShape),
    }
}
