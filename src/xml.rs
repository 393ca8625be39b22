//! XML to JSON folding.
//!
//! Documents are folded the way the common `xml2js` defaults do it: the root
//! element becomes the single key of the result, child elements are grouped
//! by name into arrays, attributes live under `"$"` and character data under
//! `"_"`. An element holding nothing but text collapses to that string.

use crate::error::JpmlError;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use serde_json::{Map, Value};

pub const ATTR_KEY: &str = "$";
pub const TEXT_KEY: &str = "_";

/// An element whose end tag has not been seen yet.
struct Frame {
    name: String,
    attrs: Option<Map<String, Value>>,
    text: String,
    has_cdata: bool,
    children: Vec<(String, Vec<Value>)>,
}

impl Frame {
    fn open(start: &BytesStart<'_>) -> Result<Self, JpmlError> {
        let name = decode_name(start.name().as_ref())?;
        let mut attrs = Map::new();
        for attr in start.attributes() {
            let attr = attr.map_err(JpmlError::xml)?;
            let key = decode_name(attr.key.as_ref())?;
            let value = attr.unescape_value().map_err(JpmlError::xml)?;
            attrs.insert(key, Value::String(value.into_owned()));
        }
        Ok(Self {
            name,
            attrs: (!attrs.is_empty()).then_some(attrs),
            text: String::new(),
            has_cdata: false,
            children: Vec::new(),
        })
    }

    fn push_child(&mut self, name: String, value: Value) {
        match self.children.iter_mut().find(|(n, _)| *n == name) {
            Some((_, group)) => group.push(value),
            None => self.children.push((name, vec![value])),
        }
    }

    fn close(self) -> (String, Value) {
        let keep_text = self.has_cdata || !self.text.trim().is_empty();
        if self.attrs.is_none() && self.children.is_empty() {
            return (self.name, Value::String(self.text));
        }
        let mut obj = Map::new();
        if keep_text {
            obj.insert(TEXT_KEY.to_string(), Value::String(self.text));
        }
        if let Some(attrs) = self.attrs {
            obj.insert(ATTR_KEY.to_string(), Value::Object(attrs));
        }
        obj.extend(
            self.children
                .into_iter()
                .map(|(name, group)| (name, Value::Array(group))),
        );
        (self.name, Value::Object(obj))
    }
}

fn decode_name(raw: &[u8]) -> Result<String, JpmlError> {
    std::str::from_utf8(raw)
        .map(str::to_owned)
        .map_err(JpmlError::xml)
}

/// Parses `text` as an XML document and folds it into a JSON value.
///
/// Whitespace-only input yields `Value::Null`.
///
/// # Errors
///
/// Returns [`JpmlError::Xml`] for malformed documents: mismatched or unclosed
/// tags, more than one root element, text outside the root element, or
/// invalid attributes and entities.
pub fn xml_to_json(text: &str) -> Result<Value, JpmlError> {
    let mut reader = Reader::from_str(text);
    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<(String, Value)> = None;

    loop {
        let event = reader.read_event().map_err(JpmlError::xml)?;
        match event {
            Event::Start(start) => {
                if stack.is_empty() && root.is_some() {
                    return Err(JpmlError::xml("multiple root elements"));
                }
                stack.push(Frame::open(&start)?);
            }
            Event::Empty(start) => {
                if stack.is_empty() && root.is_some() {
                    return Err(JpmlError::xml("multiple root elements"));
                }
                let closed = Frame::open(&start)?.close();
                match stack.last_mut() {
                    Some(parent) => parent.push_child(closed.0, closed.1),
                    None => root = Some(closed),
                }
            }
            Event::End(end) => {
                let frame = stack.pop().ok_or_else(|| {
                    JpmlError::Xml(format!(
                        "unexpected end tag </{}>",
                        String::from_utf8_lossy(end.name().as_ref())
                    ))
                })?;
                let closed = frame.close();
                match stack.last_mut() {
                    Some(parent) => parent.push_child(closed.0, closed.1),
                    None => root = Some(closed),
                }
            }
            Event::Text(t) => {
                let unescaped = t.unescape().map_err(JpmlError::xml)?;
                match stack.last_mut() {
                    Some(frame) => frame.text.push_str(&unescaped),
                    None if unescaped.trim().is_empty() => {}
                    None => return Err(JpmlError::xml("text data outside of root node")),
                }
            }
            Event::CData(c) => {
                let data = c.into_inner();
                match stack.last_mut() {
                    Some(frame) => {
                        frame.text.push_str(&String::from_utf8_lossy(&data));
                        frame.has_cdata = true;
                    }
                    None => return Err(JpmlError::xml("CDATA outside of root node")),
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(JpmlError::Xml(format!("unclosed tag <{}>", open.name)));
    }
    Ok(match root {
        Some((name, value)) => {
            let mut doc = Map::new();
            doc.insert(name, value);
            Value::Object(doc)
        }
        None => Value::Null,
    })
}
