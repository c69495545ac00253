use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::core::{Error, NamespaceConfig, Result};

/// A namespaced attribute on an element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    /// Namespace URI of the attribute, None for unqualified attributes
    pub ns: Option<String>,
    /// Local attribute name
    pub name: String,
    /// Attribute value
    pub value: String,
}

/// One node of a declared payload tree
///
/// Commands build their payload as a tree of these values; the order in which
/// children are attached is the order in which they are emitted, which is how the
/// XSD sequence constraints of the target schema are reproduced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Namespace URI of the element
    pub ns: String,
    /// Local tag name
    pub tag: String,
    /// Attributes in declaration order
    pub attrs: Vec<Attr>,
    /// Text content, None for container elements
    pub text: Option<String>,
    /// Child elements in declaration order
    pub children: Vec<Element>,
}

impl Element {
    /// Creates an empty element
    pub fn new(ns: impl Into<String>, tag: impl Into<String>) -> Self {
        Element {
            ns: ns.into(),
            tag: tag.into(),
            attrs: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    /// Creates an element holding only text
    pub fn leaf(ns: impl Into<String>, tag: impl Into<String>, text: impl Into<String>) -> Self {
        Element::new(ns, tag).text(text)
    }

    /// Sets the text content
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Appends an unqualified attribute
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push(Attr {
            ns: None,
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Appends a namespace-qualified attribute
    pub fn attr_ns(
        mut self,
        ns: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.attrs.push(Attr {
            ns: Some(ns.into()),
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Appends a child element
    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Appends a child element when present
    pub fn child_opt(mut self, child: Option<Element>) -> Self {
        if let Some(child) = child {
            self.children.push(child);
        }
        self
    }

    /// Appends a sequence of child elements
    pub fn children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children.extend(children);
        self
    }

    /// Appends repeated children while enforcing the declared maximum
    ///
    /// Exceeding the maximum is a caller-side encoding error, never a silent
    /// truncation.
    pub fn children_capped(
        mut self,
        what: &str,
        children: impl IntoIterator<Item = Element>,
        max: usize,
    ) -> Result<Self> {
        let children: Vec<Element> = children.into_iter().collect();
        if children.len() > max {
            return Err(Error::encode(format!(
                "{} occurs {} times, schema allows at most {}",
                what,
                children.len(),
                max
            )));
        }
        self.children.extend(children);
        Ok(self)
    }

    /// True when the element has neither text nor children
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.children.is_empty()
    }

    fn collect_namespaces<'a>(&'a self, out: &mut Vec<&'a str>) {
        if !out.contains(&self.ns.as_str()) {
            out.push(&self.ns);
        }
        for attr in &self.attrs {
            if let Some(ns) = &attr.ns {
                if !out.contains(&ns.as_str()) {
                    out.push(ns);
                }
            }
        }
        for child in &self.children {
            child.collect_namespaces(out);
        }
    }
}

/// Serializes a document rooted at `root` into UTF-8 XML bytes
///
/// Every namespace used anywhere in the tree is declared on the root element with
/// a stable prefix taken from the namespace table, so nested payloads never carry
/// ad-hoc declarations and the output is deterministic.
pub fn serialize_document(root: &Element, ns: &NamespaceConfig) -> Result<Vec<u8>> {
    let mut namespaces = Vec::new();
    root.collect_namespaces(&mut namespaces);

    let mut prefixes: Vec<(&str, String)> = Vec::new();
    let mut generated = 0usize;
    for uri in namespaces {
        let prefix = match ns.prefix_for(uri) {
            Some(prefix) => prefix.to_string(),
            None => {
                let prefix = format!("ns{}", generated);
                generated += 1;
                prefix
            }
        };
        prefixes.push((uri, prefix));
    }

    let mut writer = Writer::new(Vec::new());
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(|e| Error::encode(e.to_string()))?;
    write_element(&mut writer, root, &prefixes, true)?;

    Ok(writer.into_inner())
}

fn prefix_of<'a>(prefixes: &'a [(&str, String)], uri: &str) -> Result<&'a str> {
    prefixes
        .iter()
        .find(|(u, _)| *u == uri)
        .map(|(_, p)| p.as_str())
        .ok_or_else(|| Error::encode(format!("no prefix bound for namespace {}", uri)))
}

fn write_element(
    writer: &mut Writer<Vec<u8>>,
    element: &Element,
    prefixes: &[(&str, String)],
    is_root: bool,
) -> Result<()> {
    let qname = format!("{}:{}", prefix_of(prefixes, &element.ns)?, element.tag);
    let mut start = BytesStart::new(qname.clone());

    if is_root {
        for (uri, prefix) in prefixes {
            start.push_attribute((format!("xmlns:{}", prefix).as_str(), *uri));
        }
    }
    for attr in &element.attrs {
        match &attr.ns {
            Some(ns) => {
                let name = format!("{}:{}", prefix_of(prefixes, ns)?, attr.name);
                start.push_attribute((name.as_str(), attr.value.as_str()));
            }
            None => start.push_attribute((attr.name.as_str(), attr.value.as_str())),
        }
    }

    if element.is_empty() {
        writer
            .write_event(Event::Empty(start))
            .map_err(|e| Error::encode(e.to_string()))?;
        return Ok(());
    }

    writer
        .write_event(Event::Start(start))
        .map_err(|e| Error::encode(e.to_string()))?;
    if let Some(text) = &element.text {
        writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(|e| Error::encode(e.to_string()))?;
    }
    for child in &element.children {
        write_element(writer, child, prefixes, false)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(qname)))
        .map_err(|e| Error::encode(e.to_string()))?;

    Ok(())
}
