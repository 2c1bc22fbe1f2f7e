//! Owned XML element tree.
//!
//! Chart and properties parts are small, so they are parsed into an owned
//! tree of elements first and then mapped onto typed schema structs. Element
//! and attribute names keep their namespace prefix as written; lookups match
//! on the local part so documents using non-default prefixes still load.

use crate::common::xml::escape::{escape_xml, resolve_entity, unescape_xml};
use crate::ooxml::error::{OoxmlError, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// XML declaration written at the top of every serialized part.
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// A node inside an element's content.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

/// An XML element with its attributes and content in document order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlElement {
    /// Qualified name, e.g. `c:barChart`
    pub name: String,
    /// Attributes as `(qualified name, unescaped value)` pairs
    pub attributes: Vec<(String, String)>,
    /// Child nodes
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    /// Create an empty element.
    #[inline]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder form of [`XmlElement::push_attr`].
    #[inline]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push_attr(name, value);
        self
    }

    /// Builder form of [`XmlElement::push_text`].
    #[inline]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.push_text(text);
        self
    }

    #[inline]
    pub fn push_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.push((name.into(), value.into()));
    }

    #[inline]
    pub fn push_child(&mut self, child: XmlElement) {
        self.children.push(XmlNode::Element(child));
    }

    #[inline]
    pub fn push_text(&mut self, text: impl Into<String>) {
        self.children.push(XmlNode::Text(text.into()));
    }

    /// Local part of the element name.
    #[inline]
    pub fn local_name(&self) -> &str {
        local_part(&self.name)
    }

    /// Look up an attribute by local name. Namespace declarations are skipped.
    pub fn attr(&self, local: &str) -> Option<&str> {
        self.attributes
            .iter()
            .filter(|(name, _)| !is_namespace_declaration(name))
            .find(|(name, _)| local_part(name) == local)
            .map(|(_, value)| value.as_str())
    }

    /// `xmlns` and `xmlns:*` attributes in document order.
    pub fn namespace_declarations(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .filter(|(name, _)| is_namespace_declaration(name))
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Iterate over child elements, skipping text.
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(el) => Some(el),
            XmlNode::Text(_) => None,
        })
    }

    /// First child element with the given local name.
    pub fn child(&self, local: &str) -> Option<&XmlElement> {
        self.elements().find(|el| el.local_name() == local)
    }

    /// All child elements with the given local name, in document order.
    pub fn children_named<'a>(&'a self, local: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.elements().filter(move |el| el.local_name() == local)
    }

    /// Concatenated text content of direct text children.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                XmlNode::Text(t) => Some(t.as_str()),
                XmlNode::Element(_) => None,
            })
            .collect()
    }

    /// Parse a complete document and return its root element.
    pub fn parse(bytes: &[u8]) -> Result<XmlElement> {
        let mut reader = Reader::from_reader(bytes);
        let mut buf = Vec::new();
        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    stack.push(start_element(e)?);
                },
                Ok(Event::Empty(ref e)) => {
                    let el = start_element(e)?;
                    attach(&mut stack, &mut root, el)?;
                },
                Ok(Event::End(_)) => {
                    let mut el = stack
                        .pop()
                        .ok_or_else(|| OoxmlError::Xml("Unbalanced end tag".to_string()))?;
                    drop_formatting_whitespace(&mut el);
                    attach(&mut stack, &mut root, el)?;
                },
                Ok(Event::Text(ref e)) => {
                    if let Some(parent) = stack.last_mut() {
                        let raw = std::str::from_utf8(e.as_ref()).map_err(|err| {
                            OoxmlError::Xml(format!("Invalid UTF-8 in text content: {}", err))
                        })?;
                        append_text(parent, &unescape_xml(raw));
                    }
                },
                Ok(Event::CData(ref e)) => {
                    if let Some(parent) = stack.last_mut() {
                        let raw = std::str::from_utf8(e).map_err(|err| {
                            OoxmlError::Xml(format!("Invalid UTF-8 in CDATA: {}", err))
                        })?;
                        append_text(parent, raw);
                    }
                },
                Ok(Event::GeneralRef(ref e)) => {
                    if let Some(parent) = stack.last_mut() {
                        let name = std::str::from_utf8(e).map_err(|err| {
                            OoxmlError::Xml(format!("Invalid UTF-8 in entity: {}", err))
                        })?;
                        match resolve_entity(name) {
                            Some(ch) => append_text(parent, ch.encode_utf8(&mut [0u8; 4])),
                            None => append_text(parent, &format!("&{};", name)),
                        }
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(OoxmlError::Xml(e.to_string())),
                _ => {},
            }
            buf.clear();
        }

        if !stack.is_empty() {
            return Err(OoxmlError::Xml("Unexpected end of document".to_string()));
        }
        root.ok_or_else(|| OoxmlError::Xml("Document has no root element".to_string()))
    }

    /// Serialize this element (without declaration) into `out`.
    pub fn write_to(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (name, value) in &self.attributes {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape_xml(value));
            out.push('"');
        }
        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for node in &self.children {
            match node {
                XmlNode::Element(el) => el.write_to(out),
                XmlNode::Text(text) => out.push_str(&escape_xml(text)),
            }
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }

    /// Serialize as a standalone document with an XML declaration.
    pub fn to_document(&self) -> Vec<u8> {
        let mut out = String::with_capacity(4096);
        out.push_str(XML_DECLARATION);
        out.push('\n');
        self.write_to(&mut out);
        out.into_bytes()
    }
}

#[inline]
fn local_part(name: &str) -> &str {
    name.rsplit_once(':').map_or(name, |(_, local)| local)
}

#[inline]
fn is_namespace_declaration(name: &str) -> bool {
    name == "xmlns" || name.starts_with("xmlns:")
}

fn start_element(e: &BytesStart<'_>) -> Result<XmlElement> {
    let name = std::str::from_utf8(e.name().as_ref())
        .map_err(|err| OoxmlError::Xml(format!("Invalid UTF-8 in element name: {}", err)))?
        .to_string();
    let mut el = XmlElement::new(name);
    for attr in e.attributes() {
        let attr = attr.map_err(|err| OoxmlError::Xml(err.to_string()))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|err| OoxmlError::Xml(format!("Invalid UTF-8 in attribute name: {}", err)))?;
        let value = std::str::from_utf8(&attr.value)
            .map_err(|err| OoxmlError::Xml(format!("Invalid UTF-8 in attribute value: {}", err)))?;
        el.push_attr(key, unescape_xml(value));
    }
    Ok(el)
}

fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, el: XmlElement) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.push_child(el),
        None => {
            if root.is_some() {
                return Err(OoxmlError::Xml("Multiple root elements".to_string()));
            }
            *root = Some(el);
        },
    }
    Ok(())
}

// Adjacent text pieces (split around entity references) merge into one node.
fn append_text(parent: &mut XmlElement, text: &str) {
    if let Some(XmlNode::Text(last)) = parent.children.last_mut() {
        last.push_str(text);
    } else {
        parent.push_text(text);
    }
}

// Whitespace between child elements is indentation; leaf text is kept verbatim.
fn drop_formatting_whitespace(el: &mut XmlElement) {
    let has_elements = el.children.iter().any(|n| matches!(n, XmlNode::Element(_)));
    if has_elements {
        el.children
            .retain(|n| !matches!(n, XmlNode::Text(t) if t.trim().is_empty()));
    }
}
