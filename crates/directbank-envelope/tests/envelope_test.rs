//! Envelope construction tests

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use directbank_core::{BankIdentity, CustomerIdentity, ExchangeConfig, FormatVersion};
use directbank_envelope::{
    statement_request, status_probe, transport_packet, StatementQuery, StatementType, USER_AGENT,
};
use pretty_assertions::assert_eq;
use std::collections::HashSet;
use uuid::Uuid;

fn test_config(kpp: Option<&str>) -> ExchangeConfig {
    ExchangeConfig {
        base_url: "https://dbo.testbank.ru/directbank/".to_string(),
        customer_id: "123456".to_string(),
        login: "romashka".to_string(),
        format_version: FormatVersion::current(),
        bank: BankIdentity {
            bic: "044525225".to_string(),
            name: "ПАО ТЕСТБАНК".to_string(),
        },
        customer: CustomerIdentity {
            id: "c0a8e2b4-0001-4f00-9e00-000000000001".to_string(),
            name: "ООО Ромашка".to_string(),
            inn: "7701234567".to_string(),
            kpp: kpp.map(str::to_string),
        },
        doc_kinds: vec!["10".to_string(), "14".to_string()],
    }
}

/// Collect every value of `attr="…"` in document order
fn attr_values<'a>(xml: &'a str, attr: &str) -> Vec<&'a str> {
    let needle = format!(" {attr}=\"");
    let mut values = Vec::new();
    let mut rest = xml;
    while let Some(pos) = rest.find(&needle) {
        let tail = &rest[pos + needle.len()..];
        let end = tail.find('"').expect("unterminated attribute");
        values.push(&tail[..end]);
        rest = &tail[end..];
    }
    values
}

/// Text content of the first `<name>…</name>` element
fn element_text<'a>(xml: &'a str, name: &str) -> Option<&'a str> {
    let open = format!("<{name}>");
    let close = format!("</{name}>");
    let start = xml.find(&open)? + open.len();
    let end = xml[start..].find(&close)? + start;
    Some(&xml[start..end])
}

#[test]
fn test_transport_packet_structure() {
    let config = test_config(Some("770101001"));
    let packet = transport_packet("14", "<StatementRequest/>", &config).unwrap();

    assert!(packet.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
    assert!(packet.contains("<Packet xmlns=\"http://directbank.1c.ru/XMLSchema\""));
    assert!(packet.contains("xmlns:xs=\"http://www.w3.org/2001/XMLSchema\""));
    assert!(packet.contains("xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\""));
    assert!(packet.contains(&format!("userAgent=\"{USER_AGENT}\"")));
    assert!(packet.contains("formatVersion=\"2.3.1\""));
    assert!(packet.contains("<Sender><Customer "));
    assert!(packet.contains("<Recipient><Bank "));
    assert!(packet.contains("dockind=\"14\""));
    assert!(packet.ends_with("</Packet>"));
}

#[test]
fn test_envelope_and_document_ids_differ() {
    let config = test_config(None);
    let packet = transport_packet("14", "<StatementRequest/>", &config).unwrap();

    let ids = attr_values(&packet, "id");
    // envelope id, customer id, document id
    assert_eq!(ids.len(), 3);
    let envelope_id = ids[0];
    let document_id = ids[2];
    assert_ne!(envelope_id, document_id);
    assert!(Uuid::parse_str(envelope_id).is_ok());
    assert!(Uuid::parse_str(document_id).is_ok());
}

#[test]
fn test_fresh_ids_on_every_packet() {
    let config = test_config(None);
    let first = transport_packet("14", "<StatementRequest/>", &config).unwrap();
    let second = transport_packet("14", "<StatementRequest/>", &config).unwrap();
    assert_ne!(attr_values(&first, "id")[0], attr_values(&second, "id")[0]);
}

#[test]
fn test_id_generator_does_not_repeat_within_10000_generations() {
    let mut seen = HashSet::new();
    for _ in 0..10_000 {
        let id = Uuid::new_v4().to_string();
        assert!(seen.insert(id), "UUID generator produced a duplicate");
    }
}

#[test]
fn test_kpp_omitted_when_absent() {
    let config = test_config(None);
    let document = statement_request(&StatementQuery::for_account("40702810000000000001"), &config)
        .unwrap();
    let packet = transport_packet("14", &document, &config).unwrap();

    assert!(!document.contains("kpp="));
    assert!(!packet.contains("kpp="));
}

#[test]
fn test_kpp_omitted_when_blank() {
    let config = test_config(Some(""));
    let document = statement_request(&StatementQuery::for_account("40702810000000000001"), &config)
        .unwrap();
    let packet = transport_packet("14", &document, &config).unwrap();

    assert!(!document.contains("kpp="));
    assert!(!packet.contains("kpp="));
}

#[test]
fn test_kpp_present_when_set() {
    let config = test_config(Some("770101001"));
    let document = statement_request(&StatementQuery::for_account("40702810000000000001"), &config)
        .unwrap();
    let packet = transport_packet("14", &document, &config).unwrap();

    assert!(document.contains("kpp=\"770101001\""));
    assert!(packet.contains("kpp=\"770101001\""));
}

#[test]
fn test_statement_uses_flat_party_layout() {
    let config = test_config(Some("770101001"));
    let document = statement_request(&StatementQuery::for_account("40702810000000000001"), &config)
        .unwrap();

    assert!(document.contains("<StatementRequest "));
    assert!(document.contains("<Sender id=\"c0a8e2b4-0001-4f00-9e00-000000000001\""));
    assert!(document.contains("<Recipient bic=\"044525225\""));
    assert!(!document.contains("<Customer"));
}

#[test]
fn test_statement_field_order_and_date_to_autofill() {
    let config = test_config(None);
    let query = StatementQuery {
        statement_type: Some(StatementType::Final),
        account: Some("40702810000000000001".to_string()),
        date_from: Some("2024-01-01T00:00:00".to_string()),
        date_to: None,
        extra: Vec::new(),
    };
    let document = statement_request(&query, &config).unwrap();

    let positions: Vec<usize> = ["<StatementType>", "<DateFrom>", "<DateTo>", "<Account>"]
        .iter()
        .map(|tag| document.find(tag).unwrap_or_else(|| panic!("{tag} missing")))
        .collect();
    assert!(
        positions.windows(2).all(|pair| pair[0] < pair[1]),
        "fields out of order in {document}"
    );

    assert_eq!(element_text(&document, "StatementType"), Some("0"));
    assert_eq!(element_text(&document, "DateFrom"), Some("2024-01-01T00:00:00"));
    let date_to = element_text(&document, "DateTo").unwrap();
    assert!(date_to.ends_with("T23:59:59"), "DateTo not autofilled: {date_to}");
}

#[test]
fn test_statement_defaults_cover_yesterday_through_today() {
    let config = test_config(None);
    let document = statement_request(&StatementQuery::for_account("40702810000000000001"), &config)
        .unwrap();

    let date_from = element_text(&document, "DateFrom").unwrap();
    let date_to = element_text(&document, "DateTo").unwrap();
    assert!(date_from.ends_with("T00:00:00"));
    assert!(date_to.ends_with("T23:59:59"));
    assert!(date_from < date_to);
}

#[test]
fn test_statement_extra_fields_follow_standard_ones_in_order() {
    let config = test_config(None);
    let query = StatementQuery {
        extra: vec![
            ("PayerAccount".to_string(), "40702810000000000002".to_string()),
            ("Comment".to_string(), "срочно".to_string()),
        ],
        ..StatementQuery::for_account("40702810000000000001")
    };
    let document = statement_request(&query, &config).unwrap();

    let account = document.find("<Account>").unwrap();
    let payer = document.find("<PayerAccount>").unwrap();
    let comment = document.find("<Comment>").unwrap();
    let bank = document.find("<Bank>").unwrap();
    assert!(account < payer && payer < comment && comment < bank);
}

#[test]
fn test_statement_bank_block_carries_configured_identity() {
    let config = test_config(None);
    let document = statement_request(&StatementQuery::for_account("40702810000000000001"), &config)
        .unwrap();

    assert_eq!(element_text(&document, "BIC"), Some("044525225"));
    assert_eq!(element_text(&document, "Name"), Some("ПАО ТЕСТБАНК"));
}

#[test]
fn test_statement_without_account_is_rejected() {
    let config = test_config(None);
    let err = statement_request(&StatementQuery::default(), &config).unwrap_err();
    match err {
        directbank_envelope::EnvelopeError::MissingFields(fields) => {
            assert_eq!(fields, vec!["Account".to_string()]);
        }
        other => panic!("expected missing fields, got {other:?}"),
    }
}

#[test]
fn test_status_probe_carries_ext_id() {
    let config = test_config(None);
    let document = status_probe("req-77", &config).unwrap();

    assert!(document.contains("<StatementRequest "));
    assert_eq!(element_text(&document, "ExtID"), Some("req-77"));
    assert!(!document.contains("<Data>"));
}

#[test]
fn test_packet_data_round_trips_to_original_document() {
    let config = test_config(Some("770101001"));
    let document = statement_request(&StatementQuery::for_account("40702810000000000001"), &config)
        .unwrap();
    let packet = transport_packet("14", &document, &config).unwrap();

    let data = element_text(&packet, "Data").unwrap();
    let decoded = BASE64.decode(data).unwrap();
    assert_eq!(String::from_utf8(decoded).unwrap(), document);
}
