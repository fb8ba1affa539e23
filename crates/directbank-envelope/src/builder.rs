//! Protocol envelope construction
//!
//! Both envelope shapes the protocol knows share one header: the schema
//! namespace declarations, a fresh UUID, the format version, a local creation
//! timestamp and the client identifier. They differ only in how the two
//! parties are laid out. A bare document envelope carries the customer and
//! bank attributes directly on `Sender`/`Recipient`; a transport packet nests
//! them inside `Sender/Customer` and `Recipient/Bank` and adds the `Document`
//! child with the base64-encoded payload.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::Local;
use directbank_core::ExchangeConfig;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use uuid::Uuid;

use crate::error::EnvelopeError;

/// Schema namespace stamped on every envelope root
pub const SCHEMA_NAMESPACE: &str = "http://directbank.1c.ru/XMLSchema";

const XS_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";
const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Client identifier reported to the bank in the `userAgent` attribute
pub const USER_AGENT: &str = concat!("directbank-rs/", env!("CARGO_PKG_VERSION"));

/// How the sender and recipient blocks are laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PartyLayout {
    /// Identity attributes directly on `Sender` and `Recipient`
    Flat,
    /// `Sender` wraps a `Customer` child, `Recipient` wraps a `Bank` child
    Nested,
}

/// Build an envelope with the shared header and party blocks, then let the
/// caller append the operation-specific children.
pub(crate) fn build_envelope<F>(
    root: &str,
    layout: PartyLayout,
    config: &ExchangeConfig,
    body: F,
) -> Result<String, EnvelopeError>
where
    F: FnOnce(&mut Writer<Vec<u8>>) -> std::io::Result<()>,
{
    let envelope_id = Uuid::new_v4().to_string();
    let format_version = config.format_version.to_string();
    let creation_date = Local::now().format("%Y-%m-%dT%H:%M:%S").to_string();

    let mut writer = Writer::new(Vec::new());
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

    let mut start = BytesStart::new(root);
    start.push_attribute(("xmlns", SCHEMA_NAMESPACE));
    start.push_attribute(("xmlns:xs", XS_NAMESPACE));
    start.push_attribute(("xmlns:xsi", XSI_NAMESPACE));
    start.push_attribute(("id", envelope_id.as_str()));
    start.push_attribute(("formatVersion", format_version.as_str()));
    start.push_attribute(("creationDate", creation_date.as_str()));
    start.push_attribute(("userAgent", USER_AGENT));
    writer.write_event(Event::Start(start))?;

    write_parties(&mut writer, layout, config)?;
    body(&mut writer)?;

    writer.write_event(Event::End(BytesEnd::new(root)))?;
    Ok(String::from_utf8(writer.into_inner())?)
}

fn write_parties(
    writer: &mut Writer<Vec<u8>>,
    layout: PartyLayout,
    config: &ExchangeConfig,
) -> std::io::Result<()> {
    let customer = &config.customer;
    let bank = &config.bank;

    let customer_tag = match layout {
        PartyLayout::Flat => "Sender",
        PartyLayout::Nested => "Customer",
    };
    let mut customer_block = BytesStart::new(customer_tag);
    customer_block.push_attribute(("id", customer.id.as_str()));
    customer_block.push_attribute(("name", customer.name.as_str()));
    customer_block.push_attribute(("inn", customer.inn.as_str()));
    // kpp is omitted entirely when blank; the bank rejects kpp=""
    if let Some(kpp) = customer.kpp.as_deref().filter(|kpp| !kpp.is_empty()) {
        customer_block.push_attribute(("kpp", kpp));
    }

    let bank_tag = match layout {
        PartyLayout::Flat => "Recipient",
        PartyLayout::Nested => "Bank",
    };
    let mut bank_block = BytesStart::new(bank_tag);
    bank_block.push_attribute(("bic", bank.bic.as_str()));
    bank_block.push_attribute(("name", bank.name.as_str()));

    match layout {
        PartyLayout::Flat => {
            writer.write_event(Event::Empty(customer_block))?;
            writer.write_event(Event::Empty(bank_block))?;
        }
        PartyLayout::Nested => {
            writer.write_event(Event::Start(BytesStart::new("Sender")))?;
            writer.write_event(Event::Empty(customer_block))?;
            writer.write_event(Event::End(BytesEnd::new("Sender")))?;
            writer.write_event(Event::Start(BytesStart::new("Recipient")))?;
            writer.write_event(Event::Empty(bank_block))?;
            writer.write_event(Event::End(BytesEnd::new("Recipient")))?;
        }
    }
    Ok(())
}

/// Write a simple `<Name>text</Name>` element
pub(crate) fn write_field(
    writer: &mut Writer<Vec<u8>>,
    name: &str,
    value: &str,
) -> std::io::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(value)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Wrap a serialized document into a transport packet
///
/// The packet envelope and the `Document` child each get their own fresh
/// UUID; the document text is carried base64-encoded in `Data`.
///
/// # Example
///
/// ```
/// use directbank_core::{BankIdentity, CustomerIdentity, ExchangeConfig, FormatVersion};
/// use directbank_envelope::transport_packet;
///
/// let config = ExchangeConfig {
///     base_url: "https://dbo.testbank.ru/".to_string(),
///     customer_id: "123456".to_string(),
///     login: "romashka".to_string(),
///     format_version: FormatVersion::current(),
///     bank: BankIdentity {
///         bic: "044525225".to_string(),
///         name: "ПАО ТЕСТБАНК".to_string(),
///     },
///     customer: CustomerIdentity {
///         id: "c-1".to_string(),
///         name: "ООО Ромашка".to_string(),
///         inn: "7701234567".to_string(),
///         kpp: None,
///     },
///     doc_kinds: vec!["14".to_string()],
/// };
///
/// let packet = transport_packet("14", "<StatementRequest/>", &config).unwrap();
/// assert!(packet.contains("<Packet"));
/// assert!(packet.contains("dockind=\"14\""));
/// ```
pub fn transport_packet(
    dockind: &str,
    document: &str,
    config: &ExchangeConfig,
) -> Result<String, EnvelopeError> {
    let document_id = Uuid::new_v4().to_string();
    let format_version = config.format_version.to_string();
    let encoded = BASE64.encode(document.as_bytes());

    build_envelope("Packet", PartyLayout::Nested, config, |writer| {
        let mut doc = BytesStart::new("Document");
        doc.push_attribute(("id", document_id.as_str()));
        doc.push_attribute(("dockind", dockind));
        doc.push_attribute(("formatVersion", format_version.as_str()));
        writer.write_event(Event::Start(doc))?;
        write_field(writer, "Data", &encoded)?;
        writer.write_event(Event::End(BytesEnd::new("Document")))?;
        Ok(())
    })
}
