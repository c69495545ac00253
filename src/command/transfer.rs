use crate::command::base::{command_wrapper, Request};
use crate::core::{NamespaceConfig, NamespaceSpec, Result, NAMESPACE_EPP, NAMESPACE_XSI};
use crate::response::NoResData;
use crate::xml::Element;

fn transfer_payload(
    spec: &NamespaceSpec,
    tag: &str,
    item: &str,
    auth_info: &str,
    tr_id: Option<&str>,
) -> Element {
    let object_transfer = Element::new(spec.uri.clone(), "transfer")
        .attr_ns(NAMESPACE_XSI, "schemaLocation", spec.schema_location.clone())
        .child(Element::leaf(spec.uri.clone(), tag, item))
        .child(Element::leaf(spec.uri.clone(), "authInfo", auth_info));
    command_wrapper(
        Element::new(NAMESPACE_EPP, "transfer")
            .attr("op", "request")
            .child(object_transfer),
        None,
        tr_id,
    )
}

/// EPP transfer domain command, always op="request"
#[derive(Debug, Clone)]
pub struct TransferDomain {
    /// Domain name to transfer
    pub name: String,
    /// Authorization proving the right to transfer
    pub auth_info: String,
}

impl TransferDomain {
    /// Creates a transfer request for a domain
    pub fn new(name: impl Into<String>, auth_info: impl Into<String>) -> Self {
        TransferDomain {
            name: name.into(),
            auth_info: auth_info.into(),
        }
    }
}

impl Request for TransferDomain {
    type Data = NoResData;

    fn epp_payload(&self, ns: &NamespaceConfig, tr_id: Option<&str>) -> Result<Element> {
        Ok(transfer_payload(
            &ns.domain,
            "name",
            &self.name,
            &self.auth_info,
            tr_id,
        ))
    }
}

/// EPP transfer contact command, always op="request"
#[derive(Debug, Clone)]
pub struct TransferContact {
    /// Contact id to transfer
    pub id: String,
    /// Authorization proving the right to transfer
    pub auth_info: String,
}

impl TransferContact {
    /// Creates a transfer request for a contact
    pub fn new(id: impl Into<String>, auth_info: impl Into<String>) -> Self {
        TransferContact {
            id: id.into(),
            auth_info: auth_info.into(),
        }
    }
}

impl Request for TransferContact {
    type Data = NoResData;

    fn epp_payload(&self, ns: &NamespaceConfig, tr_id: Option<&str>) -> Result<Element> {
        Ok(transfer_payload(
            &ns.contact,
            "id",
            &self.id,
            &self.auth_info,
            tr_id,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::base::epp_document;
    use crate::xml::serialize_document;

    #[test]
    fn test_transfer_domain_shape() {
        let ns = NamespaceConfig::fred();
        let payload = TransferDomain::new("example.cz", "secret")
            .epp_payload(&ns, Some("abc-1"))
            .unwrap();
        let xml =
            String::from_utf8(serialize_document(&epp_document(payload), &ns).unwrap()).unwrap();

        assert!(xml.contains("<epp:transfer op=\"request\">"));
        let name = xml.find("<domain:name>example.cz</domain:name>").unwrap();
        let auth = xml.find("<domain:authInfo>secret</domain:authInfo>").unwrap();
        assert!(name < auth);
    }
}
