//! SOAP 1.1 envelope reading and writing
//!
//! Requests are parsed into a small element tree keyed by local name, so namespace prefixes on
//! the envelope and the operation are accepted whatever they are. Responses are written as
//! strings with every text node escaped.

use std::fmt::Display;

use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::Reader;
use streamcat_common::{CatalogError, CatalogResult, ErrorKind};

pub const SOAP_ENV_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";
pub const SERVICE_NS: &str = "urn:streamcat";

/// Element with its local name, text content as sent and element children
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    pub text: String,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    fn named(name: &[u8]) -> Self {
        Self {
            name: String::from_utf8_lossy(name).into_owned(),
            ..Default::default()
        }
    }

    /// First child with the given local name
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }
}

fn malformed(message: impl Into<String>) -> CatalogError {
    CatalogError::validation("envelope", message)
}

/// Parse a whole document into its root element
pub fn parse_document(xml: &str) -> CatalogResult<XmlElement> {
    let mut reader = Reader::from_str(xml);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => stack.push(XmlElement::named(e.local_name().as_ref())),
            Ok(Event::Empty(e)) => {
                attach(&mut stack, &mut root, XmlElement::named(e.local_name().as_ref()))?
            }
            Ok(Event::End(_)) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| malformed("unexpected closing tag"))?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::Text(e)) => {
                let text = e
                    .unescape()
                    .map_err(|e| malformed(format!("XML parse error: {}", e)))?;
                // Indentation between elements; parameter values keep their whitespace
                if text.trim().is_empty() {
                    continue;
                }
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&text);
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(malformed(format!("XML parse error: {}", e))),
        }
    }

    if !stack.is_empty() {
        return Err(malformed("document ended inside an element"));
    }
    root.ok_or_else(|| malformed("document has no root element"))
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> CatalogResult<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => return Err(malformed("more than one root element")),
    }
    Ok(())
}

/// Operation element found in the first child of `Body`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoapRequest {
    pub operation: String,
    pub params: XmlElement,
}

pub fn parse_request(xml: &str) -> CatalogResult<SoapRequest> {
    let envelope = parse_document(xml)?;
    if envelope.name != "Envelope" {
        return Err(malformed("root element must be Envelope"));
    }
    let body = envelope
        .child("Body")
        .ok_or_else(|| malformed("Envelope has no Body"))?;
    let operation = body
        .children
        .first()
        .ok_or_else(|| malformed("Body names no operation"))?;

    Ok(SoapRequest {
        operation: operation.name.clone(),
        params: operation.clone(),
    })
}

/// Incremental writer for response payloads
#[derive(Debug, Default)]
pub struct XmlWriter {
    out: String,
}

impl XmlWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, name: &str) -> &mut Self {
        self.out.push('<');
        self.out.push_str(name);
        self.out.push('>');
        self
    }

    pub fn close(&mut self, name: &str) -> &mut Self {
        self.out.push_str("</");
        self.out.push_str(name);
        self.out.push('>');
        self
    }

    /// `<name>value</name>` with the value escaped
    pub fn leaf(&mut self, name: &str, value: impl Display) -> &mut Self {
        let value = value.to_string();
        self.open(name);
        self.out.push_str(&escape(value.as_str()));
        self.close(name)
    }

    pub fn finish(self) -> String {
        self.out
    }
}

fn wrap(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><soap:Envelope xmlns:soap="{}"><soap:Body>{}</soap:Body></soap:Envelope>"#,
        SOAP_ENV_NS, body
    )
}

/// Envelope holding `<{operation}Response>` around `payload`
pub fn response_envelope(operation: &str, payload: &str) -> String {
    wrap(&format!(
        r#"<{op}Response xmlns="{ns}">{payload}</{op}Response>"#,
        op = operation,
        ns = SERVICE_NS,
        payload = payload
    ))
}

/// `soap:Client` for caller mistakes, `soap:Server` for internal failures
pub fn fault_code(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Internal => "soap:Server",
        ErrorKind::Validation | ErrorKind::NotFound | ErrorKind::Referential => "soap:Client",
    }
}

pub fn fault_envelope(err: &CatalogError) -> String {
    let mut w = XmlWriter::new();
    w.open("soap:Fault")
        .leaf("faultcode", fault_code(err.kind()))
        .leaf("faultstring", err)
        .open("detail")
        .leaf("errorKind", err.kind().as_str());
    if let Some(field) = err.field() {
        w.leaf("field", field);
    }
    w.close("detail").close("soap:Fault");
    wrap(&w.finish())
}
