//! Raw exchange logging hook
//!
//! Banks routinely ask for the raw request/response bodies when an exchange
//! misbehaves. The client hands every artifact to an optional sink; where
//! and how it is persisted (files, rotation) is the caller's concern.

/// Sink for raw protocol artifacts
pub trait ExchangeLog: Send + Sync {
    /// Record one artifact under a short tag (`"request"` or `"response"`)
    fn record(&self, message: &str, tag: &str);
}
