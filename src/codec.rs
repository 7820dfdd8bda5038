//! Encoding and decoding of mappings, one codec per [`Format`].
//!
//! Dispatch is a closed match on the format variant: the identifier string
//! was parsed into a [`Format`] once at construction, so nothing here compares
//! names at call time. The byte-level work is delegated to the format crates;
//! this module owns only the dispatch contract and the coercion rules.
//!
//! Fidelity per format:
//!
//! - YAML / JSON / MessagePack: nested mappings, sequences, and scalars
//!   round-trip exactly. JSON is written with keys sorted.
//! - XML: the mapping is wrapped under a synthetic `<root>` element; every
//!   scalar comes back as a string, and sequences come back as repeated
//!   elements folded into an array. Exact round-trips only for flat
//!   string-valued mappings.
//! - CSV: one two-column row per entry. A nested value is written as its
//!   string representation (compact JSON text) and will NOT decode back into
//!   the original structure. Exact round-trips only for flat string-valued
//!   mappings.

use crate::error::{Error, Result};
use crate::format::Format;
use crate::Mapping;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use serde_json::Value;
use std::collections::BTreeMap;

/// Encode the whole mapping to the bytes of its on-disk representation.
pub fn encode(format: Format, map: &Mapping) -> Result<Vec<u8>> {
    match format {
        Format::Yaml => encode_yaml(map),
        Format::Json => encode_json(map),
        Format::Binary => encode_binary(map),
        Format::Xml => encode_xml(map),
        Format::Csv => encode_csv(map),
    }
}

/// Decode file bytes back into a mapping.
pub fn decode(format: Format, bytes: &[u8]) -> Result<Mapping> {
    match format {
        Format::Yaml => decode_yaml(bytes),
        Format::Json => decode_json(bytes),
        Format::Binary => decode_binary(bytes),
        Format::Xml => decode_xml(bytes),
        Format::Csv => decode_csv(bytes),
    }
}

/// Text form of a value for the text-only formats. Strings are written as-is,
/// everything else as compact JSON.
fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

// ---- YAML ---------------------------------------------------------------------

fn encode_yaml(map: &Mapping) -> Result<Vec<u8>> {
    let text = serde_yaml::to_string(map).map_err(|e| Error::Encode(e.to_string()))?;
    Ok(text.into_bytes())
}

fn decode_yaml(bytes: &[u8]) -> Result<Mapping> {
    serde_yaml::from_slice(bytes).map_err(|e| Error::Decode(e.to_string()))
}

// ---- JSON ---------------------------------------------------------------------

fn encode_json(map: &Mapping) -> Result<Vec<u8>> {
    // Keys sorted on write; in-memory enumeration order is unaffected.
    let sorted: BTreeMap<&String, &Value> = map.iter().collect();
    Ok(serde_json::to_vec(&sorted)?)
}

fn decode_json(bytes: &[u8]) -> Result<Mapping> {
    Ok(serde_json::from_slice(bytes)?)
}

// ---- MessagePack --------------------------------------------------------------

fn encode_binary(map: &Mapping) -> Result<Vec<u8>> {
    rmp_serde::to_vec(map).map_err(|e| Error::Encode(e.to_string()))
}

fn decode_binary(bytes: &[u8]) -> Result<Mapping> {
    rmp_serde::from_slice(bytes).map_err(|e| Error::Decode(e.to_string()))
}

// ---- XML ----------------------------------------------------------------------

const XML_ROOT: &str = "root";

fn encode_xml(map: &Mapping) -> Result<Vec<u8>> {
    let mut writer = Writer::new(Vec::new());
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(|e| Error::Encode(e.to_string()))?;
    writer
        .write_event(Event::Start(BytesStart::new(XML_ROOT)))
        .map_err(|e| Error::Encode(e.to_string()))?;
    for (key, value) in map {
        write_xml_element(&mut writer, key, value)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(XML_ROOT)))
        .map_err(|e| Error::Encode(e.to_string()))?;
    Ok(writer.into_inner())
}

fn write_xml_element(writer: &mut Writer<Vec<u8>>, name: &str, value: &Value) -> Result<()> {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(|e| Error::Encode(e.to_string()))?;
    match value {
        Value::Object(fields) => {
            for (key, field) in fields {
                write_xml_element(writer, key, field)?;
            }
        }
        Value::Array(items) => {
            for item in items {
                write_xml_element(writer, "item", item)?;
            }
        }
        Value::Null => {}
        scalar => {
            writer
                .write_event(Event::Text(BytesText::new(&value_to_text(scalar))))
                .map_err(|e| Error::Encode(e.to_string()))?;
        }
    }
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(|e| Error::Encode(e.to_string()))?;
    Ok(())
}

/// One element under construction while the document is being read.
struct XmlNode {
    text: String,
    children: Vec<(String, Value)>,
}

fn decode_xml(bytes: &[u8]) -> Result<Mapping> {
    let text = std::str::from_utf8(bytes).map_err(|e| Error::Decode(e.to_string()))?;
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<(String, XmlNode)> = Vec::new();
    let mut root: Option<XmlNode> = None;
    loop {
        match reader.read_event().map_err(|e| Error::Decode(e.to_string()))? {
            Event::Start(start) => {
                let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                stack.push((
                    name,
                    XmlNode {
                        text: String::new(),
                        children: Vec::new(),
                    },
                ));
            }
            Event::Empty(start) => {
                let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                match stack.last_mut() {
                    Some((_, parent)) => fold_child(
                        &mut parent.children,
                        name,
                        Value::String(String::new()),
                    ),
                    None => {
                        // A bare `<root/>`: an empty document.
                        root = Some(XmlNode {
                            text: String::new(),
                            children: Vec::new(),
                        });
                    }
                }
            }
            Event::Text(t) => {
                let unescaped = t.unescape().map_err(|e| Error::Decode(e.to_string()))?;
                match stack.last_mut() {
                    Some((_, node)) => node.text.push_str(&unescaped),
                    None => return Err(Error::Decode("text outside the root element".into())),
                }
            }
            Event::End(_) => {
                let (name, node) = stack
                    .pop()
                    .ok_or_else(|| Error::Decode("unmatched closing tag".into()))?;
                if let Some((_, parent)) = stack.last_mut() {
                    fold_child(&mut parent.children, name, node_value(node));
                } else {
                    root = Some(node);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    match root {
        Some(node) if node.children.is_empty() && !node.text.is_empty() => Err(Error::Decode(
            "root element holds text instead of entries".into(),
        )),
        Some(node) => Ok(node.children.into_iter().collect()),
        None => Err(Error::Decode("missing root element".into())),
    }
}

/// Collapse a finished element into a value: leaves become strings (this is
/// where the format's type erosion happens), inner elements become objects.
fn node_value(node: XmlNode) -> Value {
    if node.children.is_empty() {
        Value::String(node.text)
    } else {
        Value::Object(node.children.into_iter().collect())
    }
}

/// Attach a decoded child, folding repeated sibling names into an array the
/// way the reference XML reader does.
fn fold_child(children: &mut Vec<(String, Value)>, name: String, value: Value) {
    if let Some((_, existing)) = children.iter_mut().find(|(n, _)| *n == name) {
        if let Value::Array(items) = existing {
            items.push(value);
        } else {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
    } else {
        children.push((name, value));
    }
}

// ---- CSV ----------------------------------------------------------------------

fn encode_csv(map: &Mapping) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for (key, value) in map {
        let text = value_to_text(value);
        writer
            .write_record([key.as_str(), text.as_str()])
            .map_err(|e| Error::Encode(e.to_string()))?;
    }
    writer.into_inner().map_err(|e| Error::Encode(e.to_string()))
}

fn decode_csv(bytes: &[u8]) -> Result<Mapping> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(bytes);
    let mut map = Mapping::new();
    for record in reader.records() {
        let record = record.map_err(|e| Error::Decode(e.to_string()))?;
        if record.len() != 2 {
            return Err(Error::Decode(format!(
                "expected a two-column row, found {} columns",
                record.len()
            )));
        }
        map.insert(record[0].to_string(), Value::String(record[1].to_string()));
    }
    Ok(map)
}
