use crate::command::base::{command_wrapper, Request};
use crate::core::{NamespaceConfig, NamespaceSpec, Result, NAMESPACE_EPP, NAMESPACE_XSI};
use crate::response::info::{InfoContactData, InfoDomainData, InfoKeysetData, InfoNssetData};
use crate::xml::Element;

fn info_payload(spec: &NamespaceSpec, tag: &str, item: &str, tr_id: Option<&str>) -> Element {
    let object_info = Element::new(spec.uri.clone(), "info")
        .attr_ns(NAMESPACE_XSI, "schemaLocation", spec.schema_location.clone())
        .child(Element::leaf(spec.uri.clone(), tag, item));
    command_wrapper(
        Element::new(NAMESPACE_EPP, "info").child(object_info),
        None,
        tr_id,
    )
}

/// EPP info domain command
#[derive(Debug, Clone)]
pub struct InfoDomain {
    /// Domain name to query
    pub name: String,
}

impl InfoDomain {
    /// Creates an info query for a domain
    pub fn new(name: impl Into<String>) -> Self {
        InfoDomain { name: name.into() }
    }
}

impl Request for InfoDomain {
    type Data = InfoDomainData;

    fn epp_payload(&self, ns: &NamespaceConfig, tr_id: Option<&str>) -> Result<Element> {
        Ok(info_payload(&ns.domain, "name", &self.name, tr_id))
    }
}

/// EPP info contact command
#[derive(Debug, Clone)]
pub struct InfoContact {
    /// Contact id to query
    pub id: String,
}

impl InfoContact {
    /// Creates an info query for a contact
    pub fn new(id: impl Into<String>) -> Self {
        InfoContact { id: id.into() }
    }
}

impl Request for InfoContact {
    type Data = InfoContactData;

    fn epp_payload(&self, ns: &NamespaceConfig, tr_id: Option<&str>) -> Result<Element> {
        Ok(info_payload(&ns.contact, "id", &self.id, tr_id))
    }
}

/// EPP info nsset command
#[derive(Debug, Clone)]
pub struct InfoNsset {
    /// Nsset id to query
    pub id: String,
}

impl InfoNsset {
    /// Creates an info query for an nsset
    pub fn new(id: impl Into<String>) -> Self {
        InfoNsset { id: id.into() }
    }
}

impl Request for InfoNsset {
    type Data = InfoNssetData;

    fn epp_payload(&self, ns: &NamespaceConfig, tr_id: Option<&str>) -> Result<Element> {
        Ok(info_payload(&ns.nsset, "id", &self.id, tr_id))
    }
}

/// EPP info keyset command
#[derive(Debug, Clone)]
pub struct InfoKeyset {
    /// Keyset id to query
    pub id: String,
}

impl InfoKeyset {
    /// Creates an info query for a keyset
    pub fn new(id: impl Into<String>) -> Self {
        InfoKeyset { id: id.into() }
    }
}

impl Request for InfoKeyset {
    type Data = InfoKeysetData;

    fn epp_payload(&self, ns: &NamespaceConfig, tr_id: Option<&str>) -> Result<Element> {
        Ok(info_payload(&ns.keyset, "id", &self.id, tr_id))
    }
}
