use chrono::{DateTime, FixedOffset, NaiveDate};
use quick_xml::events::Event;
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;

use crate::core::{Error, Result};

/// One element of a parsed response document
///
/// Namespace prefixes are resolved during parsing, so queries always work on
/// `(namespace URI, local name)` pairs; formatting, attribute order and
/// insignificant whitespace in the source never affect lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Resolved namespace URI, empty when the element is unqualified
    pub ns: String,
    /// Local tag name
    pub tag: String,
    /// Attributes with resolved local names
    pub attrs: Vec<(String, String)>,
    /// Concatenated, trimmed text content
    pub text: String,
    /// Child elements in document order
    pub children: Vec<Node>,
}

impl Node {
    /// True when the node matches the qualified name
    pub fn is(&self, ns: &str, tag: &str) -> bool {
        self.ns == ns && self.tag == tag
    }

    /// Returns the first descendant along a path of qualified names
    pub fn find(&self, ns: &str, path: &[&str]) -> Option<&Node> {
        let mut current = self;
        for step in path {
            current = current.children.iter().find(|c| c.is(ns, step))?;
        }
        Some(current)
    }

    /// Returns every match of the final path step
    ///
    /// Intermediate steps are resolved to their first match, mirroring how the
    /// response schemas nest repeated elements under a single container.
    pub fn find_all(&self, ns: &str, path: &[&str]) -> Vec<&Node> {
        let Some((last, init)) = path.split_last() else {
            return vec![self];
        };
        let mut current = self;
        for step in init {
            match current.children.iter().find(|c| c.is(ns, step)) {
                Some(node) => current = node,
                None => return Vec::new(),
            }
        }
        current
            .children
            .iter()
            .filter(|c| c.is(ns, last))
            .collect()
    }

    /// Text content of the node located by the path
    pub fn text_of(&self, ns: &str, path: &[&str]) -> Option<&str> {
        self.find(ns, path).map(|n| n.text.as_str())
    }

    /// Text content of every match of the path
    pub fn text_all(&self, ns: &str, path: &[&str]) -> Vec<String> {
        self.find_all(ns, path)
            .into_iter()
            .map(|n| n.text.clone())
            .collect()
    }

    /// Attribute value by local name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Local names of all child elements, in document order
    pub fn child_names(&self) -> Vec<&str> {
        self.children.iter().map(|c| c.tag.as_str()).collect()
    }
}

/// Parses raw bytes into a node tree
///
/// Documents carrying a DOCTYPE are rejected outright; entity resolution is the
/// classic XML attack surface and no registry response legitimately needs one.
pub fn parse(raw: &[u8]) -> Result<Node> {
    let mut reader = NsReader::from_reader(raw);
    let mut stack: Vec<Node> = Vec::new();
    let mut root: Option<Node> = None;

    loop {
        let (resolve, event) = reader
            .read_resolved_event()
            .map_err(|e| Error::parse(format!("malformed XML: {}", e), raw))?;
        match event {
            Event::Start(start) => {
                let node = begin_node(&resolve, &start, raw)?;
                stack.push(node);
            }
            Event::Empty(start) => {
                let node = begin_node(&resolve, &start, raw)?;
                attach(node, &mut stack, &mut root, raw)?;
            }
            Event::End(_) => {
                let node = stack
                    .pop()
                    .ok_or_else(|| Error::parse("unexpected closing tag", raw))?;
                attach(node, &mut stack, &mut root, raw)?;
            }
            Event::Text(text) => {
                let text = text
                    .unescape()
                    .map_err(|e| Error::parse(format!("bad character data: {}", e), raw))?;
                push_text(&mut stack, text.trim());
            }
            Event::CData(data) => {
                let text = String::from_utf8_lossy(&data.into_inner()).into_owned();
                push_text(&mut stack, text.trim());
            }
            Event::DocType(_) => {
                return Err(Error::parse("doctype is not allowed", raw));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(Error::parse("unclosed element at end of document", raw));
    }
    root.ok_or_else(|| Error::parse("document has no root element", raw))
}

fn begin_node(
    resolve: &ResolveResult,
    start: &quick_xml::events::BytesStart,
    raw: &[u8],
) -> Result<Node> {
    let ns = match resolve {
        ResolveResult::Bound(ns) => String::from_utf8_lossy(ns.clone().into_inner()).into_owned(),
        _ => String::new(),
    };
    let tag = String::from_utf8_lossy(start.local_name().into_inner()).into_owned();

    let mut attrs = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| Error::parse(format!("bad attribute: {}", e), raw))?;
        if attr.key.into_inner().starts_with(b"xmlns") {
            continue;
        }
        let name = String::from_utf8_lossy(attr.key.local_name().into_inner()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| Error::parse(format!("bad attribute value: {}", e), raw))?
            .into_owned();
        attrs.push((name, value));
    }

    Ok(Node {
        ns,
        tag,
        attrs,
        text: String::new(),
        children: Vec::new(),
    })
}

fn attach(node: Node, stack: &mut Vec<Node>, root: &mut Option<Node>, raw: &[u8]) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => {
            if root.is_some() {
                return Err(Error::parse("multiple root elements", raw));
            }
            *root = Some(node);
        }
    }
    Ok(())
}

fn push_text(stack: &mut [Node], text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(top) = stack.last_mut() {
        top.text.push_str(text);
    }
}

/// Parses a schema boolean token, accepting both lexical forms
pub fn parse_bool_token(value: &str) -> Result<bool> {
    match value {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        other => Err(Error::parse(
            format!("expected boolean token, found {:?}", other),
            Vec::new(),
        )),
    }
}

/// Canonical encode-side form of a schema boolean
pub fn bool_token(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}

/// Parses an RFC 3339 dateTime value
pub fn parse_datetime(value: &str) -> Result<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value)
        .map_err(|e| Error::parse(format!("bad dateTime {:?}: {}", value, e), Vec::new()))
}

/// Parses a schema date value
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| Error::parse(format!("bad date {:?}: {}", value, e), Vec::new()))
}

/// Formats a date for the wire
pub fn format_date(value: NaiveDate) -> String {
    value.format("%Y-%m-%d").to_string()
}
