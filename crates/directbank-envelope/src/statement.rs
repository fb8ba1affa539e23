//! Statement request and status probe documents
//!
//! Both documents reuse the bare `StatementRequest` envelope with the flat
//! party layout and get wrapped into a dockind-`14` transport packet before
//! submission. The bank parses the `Data` children positionally, so the
//! emission order is fixed.

use chrono::{Duration, Local};
use directbank_core::ExchangeConfig;
use quick_xml::events::{BytesEnd, BytesStart, Event};

use crate::builder::{build_envelope, write_field, PartyLayout};
use crate::error::EnvelopeError;

/// Kind of statement requested from the bank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatementType {
    /// Final statement for a closed period
    #[default]
    Final,
    /// Intermediate statement
    Intermediate,
    /// Current balance on the account
    CurrentBalance,
}

impl StatementType {
    /// Wire code of this statement type
    pub fn code(self) -> &'static str {
        match self {
            StatementType::Final => "0",
            StatementType::Intermediate => "1",
            StatementType::CurrentBalance => "2",
        }
    }

    /// Parse a wire code back into a statement type
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "0" => Some(StatementType::Final),
            "1" => Some(StatementType::Intermediate),
            "2" => Some(StatementType::CurrentBalance),
            _ => None,
        }
    }
}

/// Parameters of a statement request
///
/// Only `account` is mandatory. The rest defaults to a final statement
/// covering yesterday from midnight through today `23:59:59`. Dates use the
/// protocol's `YYYY-MM-DDTHH:MM:SS` format. `extra` fields are appended
/// after the standard four in their insertion order.
#[derive(Debug, Clone, Default)]
pub struct StatementQuery {
    pub statement_type: Option<StatementType>,
    pub account: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub extra: Vec<(String, String)>,
}

impl StatementQuery {
    /// Query with defaults for everything but the account number
    pub fn for_account(account: impl Into<String>) -> Self {
        Self {
            account: Some(account.into()),
            ..Self::default()
        }
    }

    /// Set an explicit statement period
    pub fn period(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.date_from = Some(from.into());
        self.date_to = Some(to.into());
        self
    }
}

/// Build the statement request document
///
/// Field order within `Data` is fixed: `StatementType`, `DateFrom`,
/// `DateTo`, `Account`, then any extra fields, then the `Bank` block.
pub fn statement_request(
    query: &StatementQuery,
    config: &ExchangeConfig,
) -> Result<String, EnvelopeError> {
    let account = query
        .account
        .clone()
        .ok_or_else(|| EnvelopeError::MissingFields(vec!["Account".to_string()]))?;
    let statement_type = query.statement_type.unwrap_or_default();
    let date_from = query.date_from.clone().unwrap_or_else(|| {
        (Local::now().date_naive() - Duration::days(1))
            .format("%Y-%m-%dT00:00:00")
            .to_string()
    });
    let date_to = query.date_to.clone().unwrap_or_else(|| {
        Local::now()
            .date_naive()
            .format("%Y-%m-%dT23:59:59")
            .to_string()
    });

    build_envelope("StatementRequest", PartyLayout::Flat, config, |writer| {
        writer.write_event(Event::Start(BytesStart::new("Data")))?;
        write_field(writer, "StatementType", statement_type.code())?;
        write_field(writer, "DateFrom", &date_from)?;
        write_field(writer, "DateTo", &date_to)?;
        write_field(writer, "Account", &account)?;
        for (name, value) in &query.extra {
            write_field(writer, name, value)?;
        }
        writer.write_event(Event::Start(BytesStart::new("Bank")))?;
        write_field(writer, "BIC", &config.bank.bic)?;
        write_field(writer, "Name", &config.bank.name)?;
        writer.write_event(Event::End(BytesEnd::new("Bank")))?;
        writer.write_event(Event::End(BytesEnd::new("Data")))?;
        Ok(())
    })
}

/// Build the status probe for a previously submitted request
pub fn status_probe(ext_id: &str, config: &ExchangeConfig) -> Result<String, EnvelopeError> {
    build_envelope("StatementRequest", PartyLayout::Flat, config, |writer| {
        write_field(writer, "ExtID", ext_id)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statement_type_codes() {
        assert_eq!(StatementType::Final.code(), "0");
        assert_eq!(StatementType::Intermediate.code(), "1");
        assert_eq!(StatementType::CurrentBalance.code(), "2");
    }

    #[test]
    fn test_statement_type_from_code() {
        assert_eq!(StatementType::from_code("0"), Some(StatementType::Final));
        assert_eq!(
            StatementType::from_code("2"),
            Some(StatementType::CurrentBalance)
        );
        assert_eq!(StatementType::from_code("3"), None);
    }

    #[test]
    fn test_default_statement_type_is_final() {
        assert_eq!(StatementType::default(), StatementType::Final);
    }

    #[test]
    fn test_query_builders() {
        let query = StatementQuery::for_account("40702810000000000001")
            .period("2024-01-01T00:00:00", "2024-01-31T23:59:59");
        assert_eq!(query.account.as_deref(), Some("40702810000000000001"));
        assert_eq!(query.date_from.as_deref(), Some("2024-01-01T00:00:00"));
        assert_eq!(query.date_to.as_deref(), Some("2024-01-31T23:59:59"));
        assert!(query.statement_type.is_none());
    }
}
