//! DirectBank session and protocol client
//!
//! The client owns the session state machine: it starts unauthenticated,
//! `logon` moves it to authenticated by storing the SID the bank issued, and
//! there is no way back short of dropping the instance (the protocol has no
//! logout). Session-gated operations check the SID before touching the
//! network. Operations take `&mut self`, so calls on one instance cannot
//! interleave; run one client per bank connection.

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use directbank_core::response::{classify, parse_response};
use directbank_core::version::PROTOCOL_VERSION;
use directbank_core::{dockind, ExchangeConfig};
use directbank_envelope as envelope;
use directbank_envelope::StatementQuery;

use crate::error::ClientError;
use crate::log::ExchangeLog;
use crate::transport::{HttpTransport, Method, Transport, TransportError, TransportRequest};

/// Date filter sent when the caller does not supply one; some banks reject
/// a `GetPackList` call with an empty date
const DEFAULT_PACK_LIST_DATE: &str = "01.01.1970 00:00:00";

/// Diagnostic snapshot of the most recent call, overwritten every time
#[derive(Debug, Clone, Default)]
pub struct LastExchange {
    pub request_body: Option<String>,
    pub response_body: Option<String>,
    pub http_status: Option<u16>,
}

/// Protocol client bound to one bank connection
pub struct DirectBankClient<T: Transport = HttpTransport> {
    config: ExchangeConfig,
    transport: T,
    sid: Option<String>,
    last: LastExchange,
    log: Option<Arc<dyn ExchangeLog>>,
}

impl DirectBankClient<HttpTransport> {
    /// Create a client over the production HTTP transport
    pub fn new(config: ExchangeConfig) -> Result<Self, ClientError> {
        Ok(Self::with_transport(config, HttpTransport::new()?))
    }
}

impl<T: Transport> DirectBankClient<T> {
    /// Create a client over a custom transport
    pub fn with_transport(config: ExchangeConfig, transport: T) -> Self {
        Self {
            config,
            transport,
            sid: None,
            last: LastExchange::default(),
            log: None,
        }
    }

    /// Attach a sink for raw request/response bodies
    pub fn with_log(mut self, log: Arc<dyn ExchangeLog>) -> Self {
        self.log = Some(log);
        self
    }

    /// The configuration this client was built from
    pub fn config(&self) -> &ExchangeConfig {
        &self.config
    }

    /// Session identifier, once `logon` succeeded
    pub fn sid(&self) -> Option<&str> {
        self.sid.as_deref()
    }

    /// Whether a bank session is established
    pub fn is_authenticated(&self) -> bool {
        self.sid.is_some()
    }

    /// Diagnostic snapshot of the most recent call
    pub fn last_exchange(&self) -> &LastExchange {
        &self.last
    }

    /// Authenticate against the bank
    ///
    /// On success the issued SID is stored and sent with every subsequent
    /// call. A bank rejection (bad credentials and the like) surfaces as
    /// [`ClientError::Bank`] and leaves the session state untouched.
    pub async fn logon(&mut self, password: &str) -> Result<(), ClientError> {
        let url = self.endpoint("Logon", &[])?;
        let mut headers = self.headers();
        let token = BASE64.encode(format!("{}:{}", self.config.login, password));
        headers.push(("Authorization".to_string(), format!("Basic {token}")));

        let body = self.call(Method::Post, url, headers, None).await?;
        let success = classify(&body)?;
        let logon = success.logon.ok_or(ClientError::UnknownResponse)?;
        self.sid = Some(logon.sid);
        tracing::info!("bank session established");
        Ok(())
    }

    /// List packets ready for pickup
    ///
    /// `since` is passed to the bank as an opaque date filter. A reply
    /// without a packet list means nothing is waiting and yields an empty
    /// vector.
    pub async fn pack_list(&mut self, since: Option<&str>) -> Result<Vec<String>, ClientError> {
        let date = since.unwrap_or(DEFAULT_PACK_LIST_DATE);
        let url = self.endpoint("GetPackList", &[("date", date)])?;
        let headers = self.headers();
        let body = self.call(Method::Get, url, headers, None).await?;

        let reply = parse_response(&body)?;
        Ok(reply
            .success
            .and_then(|success| success.packet_list)
            .map(|list| list.packet_ids)
            .unwrap_or_default())
    }

    /// Fetch one packet and decode its document
    pub async fn pack_data(&mut self, id: &str) -> Result<String, ClientError> {
        self.require_session()?;
        let url = self.endpoint("GetPack", &[("id", id)])?;
        let headers = self.headers();
        let body = self.call(Method::Get, url, headers, None).await?;

        let success = classify(&body)?;
        let document = success
            .packet
            .and_then(|packet| packet.document)
            .ok_or(ClientError::UnknownResponse)?;
        let decoded = BASE64.decode(document.data.trim()).map_err(|e| {
            ClientError::ResponseParse(format!("packet data is not valid base64: {e}"))
        })?;
        String::from_utf8(decoded).map_err(|e| {
            ClientError::ResponseParse(format!("packet data is not valid UTF-8: {e}"))
        })
    }

    /// Submit a statement request; returns the packet id the bank assigned
    ///
    /// Missing required query fields are reported before anything is sent.
    pub async fn statement_request(
        &mut self,
        query: &StatementQuery,
    ) -> Result<String, ClientError> {
        self.require_session()?;
        let document = envelope::statement_request(query, &self.config)?;
        self.send_pack(dockind::STATEMENT_REQUEST, &document).await
    }

    /// Ask the bank about a previously submitted request
    ///
    /// The probe travels as its own packet; the returned id identifies the
    /// probe, the answer arrives later via [`Self::pack_list`].
    pub async fn status_request(&mut self, ext_id: &str) -> Result<String, ClientError> {
        self.require_session()?;
        let document = envelope::status_probe(ext_id, &self.config)?;
        self.send_pack(dockind::STATEMENT_REQUEST, &document).await
    }

    /// Fetch the exchange settings document for this connection
    ///
    /// Works without a session: the call exists for enrollment, when no
    /// settings file has been issued yet. The raw document is returned after
    /// checking it parses and is not an error envelope.
    pub async fn exchange_settings(
        &mut self,
        account: &str,
        inn: &str,
        bic: &str,
    ) -> Result<String, ClientError> {
        let url = self.endpoint("GetSettings", &[])?;
        let headers = enrollment_headers(account, inn, bic);
        let body = self.call(Method::Post, url, headers, None).await?;
        settings_from_body(body)
    }

    async fn send_pack(&mut self, dockind: &str, document: &str) -> Result<String, ClientError> {
        let packet = envelope::transport_packet(dockind, document, &self.config)?;
        let url = self.endpoint("SendPack", &[])?;
        let headers = self.headers();
        let body = self.call(Method::Post, url, headers, Some(packet)).await?;

        let success = classify(&body)?;
        let sent = success.sent.ok_or(ClientError::UnknownResponse)?;
        Ok(sent.id)
    }

    fn require_session(&self) -> Result<(), ClientError> {
        if self.sid.is_none() {
            return Err(ClientError::SessionNotStarted);
        }
        Ok(())
    }

    fn headers(&self) -> Vec<(String, String)> {
        let mut headers = common_headers(
            &self.config.customer_id,
            &self.config.format_version.to_string(),
        );
        if let Some(sid) = &self.sid {
            headers.push(("SID".to_string(), sid.clone()));
        }
        headers
    }

    fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> Result<String, ClientError> {
        let url = format!("{}{}", self.config.base_url, path);
        if query.is_empty() {
            return Ok(url);
        }
        let url = reqwest::Url::parse_with_params(&url, query)
            .map_err(|e| TransportError::InvalidUrl(e.to_string()))?;
        Ok(url.into())
    }

    async fn call(
        &mut self,
        method: Method,
        url: String,
        headers: Vec<(String, String)>,
        body: Option<String>,
    ) -> Result<String, ClientError> {
        tracing::debug!(%method, %url, "sending request to bank");
        self.last = LastExchange {
            request_body: body.clone(),
            response_body: None,
            http_status: None,
        };
        if let Some(log) = &self.log {
            log.record(
                &format!("{method} {url}\n{}", body.as_deref().unwrap_or("")),
                "request",
            );
        }

        let response = self
            .transport
            .send(TransportRequest {
                method,
                url,
                headers,
                body,
            })
            .await?;

        tracing::debug!(status = response.status, "received bank response");
        self.last.http_status = Some(response.status);
        self.last.response_body = Some(response.body.clone());
        if let Some(log) = &self.log {
            log.record(
                &format!("HTTP {}\n{}", response.status, response.body),
                "response",
            );
        }

        Ok(response.body)
    }
}

/// Fetch the exchange settings document without any configuration
///
/// Enrollment entry point: at this stage there is no settings file, no
/// customer id and no session, only the bank's URL and the identifiers the
/// bank asked for.
pub async fn fetch_exchange_settings<T: Transport>(
    transport: &T,
    base_url: &str,
    account: &str,
    inn: &str,
    bic: &str,
) -> Result<String, ClientError> {
    let mut url = base_url.to_string();
    if !url.ends_with('/') {
        url.push('/');
    }
    url.push_str("GetSettings");

    let response = transport
        .send(TransportRequest {
            method: Method::Post,
            url,
            headers: enrollment_headers(account, inn, bic),
            body: None,
        })
        .await?;
    settings_from_body(response.body)
}

fn settings_from_body(body: String) -> Result<String, ClientError> {
    let reply = parse_response(&body)?;
    if let Some(fault) = reply.error {
        return Err(ClientError::Bank {
            code: fault.code,
            description: fault.description,
        });
    }
    Ok(body)
}

fn common_headers(customer_id: &str, api_version: &str) -> Vec<(String, String)> {
    vec![
        ("CustomerID".to_string(), customer_id.to_string()),
        (
            "Content-Type".to_string(),
            "application/xml; charset=utf-8".to_string(),
        ),
        ("Accept-Language".to_string(), "ru-RU".to_string()),
        ("APIVersion".to_string(), api_version.to_string()),
        ("AvailableAPIVersion".to_string(), api_version.to_string()),
    ]
}

// CustomerID is fixed to zero here: enrollment happens before the bank
// assigns one.
fn enrollment_headers(account: &str, inn: &str, bic: &str) -> Vec<(String, String)> {
    let mut headers = common_headers("0", PROTOCOL_VERSION);
    headers.push(("Account".to_string(), account.to_string()));
    headers.push(("Inn".to_string(), inn.to_string()));
    headers.push(("Bic".to_string(), bic.to_string()));
    headers
}
