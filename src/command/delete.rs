use crate::command::base::{command_wrapper, Request};
use crate::core::{NamespaceConfig, NamespaceSpec, Result, NAMESPACE_EPP, NAMESPACE_XSI};
use crate::response::NoResData;
use crate::xml::Element;

fn delete_payload(spec: &NamespaceSpec, tag: &str, item: &str, tr_id: Option<&str>) -> Element {
    let object_delete = Element::new(spec.uri.clone(), "delete")
        .attr_ns(NAMESPACE_XSI, "schemaLocation", spec.schema_location.clone())
        .child(Element::leaf(spec.uri.clone(), tag, item));
    command_wrapper(
        Element::new(NAMESPACE_EPP, "delete").child(object_delete),
        None,
        tr_id,
    )
}

/// EPP delete domain command
#[derive(Debug, Clone)]
pub struct DeleteDomain {
    /// Domain name to delete
    pub name: String,
}

impl DeleteDomain {
    /// Creates a delete request for a domain
    pub fn new(name: impl Into<String>) -> Self {
        DeleteDomain { name: name.into() }
    }
}

impl Request for DeleteDomain {
    type Data = NoResData;

    fn epp_payload(&self, ns: &NamespaceConfig, tr_id: Option<&str>) -> Result<Element> {
        Ok(delete_payload(&ns.domain, "name", &self.name, tr_id))
    }
}

/// EPP delete contact command
#[derive(Debug, Clone)]
pub struct DeleteContact {
    /// Contact id to delete
    pub id: String,
}

impl DeleteContact {
    /// Creates a delete request for a contact
    pub fn new(id: impl Into<String>) -> Self {
        DeleteContact { id: id.into() }
    }
}

impl Request for DeleteContact {
    type Data = NoResData;

    fn epp_payload(&self, ns: &NamespaceConfig, tr_id: Option<&str>) -> Result<Element> {
        Ok(delete_payload(&ns.contact, "id", &self.id, tr_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::base::epp_document;
    use crate::xml::serialize_document;

    #[test]
    fn test_delete_domain_shape() {
        let ns = NamespaceConfig::fred();
        let payload = DeleteDomain::new("example.cz").epp_payload(&ns, Some("abc-1")).unwrap();
        let xml =
            String::from_utf8(serialize_document(&epp_document(payload), &ns).unwrap()).unwrap();

        assert!(xml.contains("<epp:delete><domain:delete"));
        assert!(xml.contains("<domain:name>example.cz</domain:name>"));
    }
}
