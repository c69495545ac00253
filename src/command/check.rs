use crate::command::base::{command_wrapper, Request};
use crate::core::{NamespaceConfig, NamespaceSpec, Result, NAMESPACE_EPP, NAMESPACE_XSI};
use crate::response::check::{CheckContactData, CheckDomainData, CheckKeysetData, CheckNssetData};
use crate::xml::Element;

fn check_payload(
    spec: &NamespaceSpec,
    tag: &str,
    items: &[String],
    tr_id: Option<&str>,
) -> Element {
    let object_check = Element::new(spec.uri.clone(), "check")
        .attr_ns(NAMESPACE_XSI, "schemaLocation", spec.schema_location.clone())
        .children(
            items
                .iter()
                .map(|item| Element::leaf(spec.uri.clone(), tag, item.clone())),
        );
    command_wrapper(
        Element::new(NAMESPACE_EPP, "check").child(object_check),
        None,
        tr_id,
    )
}

/// EPP check domain command
#[derive(Debug, Clone)]
pub struct CheckDomain {
    /// Domain names to check
    pub names: Vec<String>,
}

impl CheckDomain {
    /// Creates a check for the given domain names
    pub fn new(names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        CheckDomain {
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl Request for CheckDomain {
    type Data = CheckDomainData;

    fn epp_payload(&self, ns: &NamespaceConfig, tr_id: Option<&str>) -> Result<Element> {
        Ok(check_payload(&ns.domain, "name", &self.names, tr_id))
    }
}

/// EPP check contact command
#[derive(Debug, Clone)]
pub struct CheckContact {
    /// Contact ids to check
    pub ids: Vec<String>,
}

impl CheckContact {
    /// Creates a check for the given contact ids
    pub fn new(ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        CheckContact {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }
}

impl Request for CheckContact {
    type Data = CheckContactData;

    fn epp_payload(&self, ns: &NamespaceConfig, tr_id: Option<&str>) -> Result<Element> {
        Ok(check_payload(&ns.contact, "id", &self.ids, tr_id))
    }
}

/// EPP check nsset command
#[derive(Debug, Clone)]
pub struct CheckNsset {
    /// Nsset ids to check
    pub ids: Vec<String>,
}

impl CheckNsset {
    /// Creates a check for the given nsset ids
    pub fn new(ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        CheckNsset {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }
}

impl Request for CheckNsset {
    type Data = CheckNssetData;

    fn epp_payload(&self, ns: &NamespaceConfig, tr_id: Option<&str>) -> Result<Element> {
        Ok(check_payload(&ns.nsset, "id", &self.ids, tr_id))
    }
}

/// EPP check keyset command
#[derive(Debug, Clone)]
pub struct CheckKeyset {
    /// Keyset ids to check
    pub ids: Vec<String>,
}

impl CheckKeyset {
    /// Creates a check for the given keyset ids
    pub fn new(ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        CheckKeyset {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }
}

impl Request for CheckKeyset {
    type Data = CheckKeysetData;

    fn epp_payload(&self, ns: &NamespaceConfig, tr_id: Option<&str>) -> Result<Element> {
        Ok(check_payload(&ns.keyset, "id", &self.ids, tr_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::base::epp_document;
    use crate::xml::serialize_document;

    #[test]
    fn test_check_domain_lists_names_in_order() {
        let ns = NamespaceConfig::fred();
        let check = CheckDomain::new(["first.cz", "second.cz"]);
        let payload = check.epp_payload(&ns, Some("abc-1")).unwrap();
        let xml =
            String::from_utf8(serialize_document(&epp_document(payload), &ns).unwrap()).unwrap();

        assert!(xml.contains("xsi:schemaLocation=\"http://www.nic.cz/xml/epp/domain-1.4 domain-1.4.2.xsd\""));
        let first = xml.find("<domain:name>first.cz</domain:name>").unwrap();
        let second = xml.find("<domain:name>second.cz</domain:name>").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_check_contact_uses_id_tag() {
        let ns = NamespaceConfig::fred();
        let payload = CheckContact::new(["CID-1"]).epp_payload(&ns, None).unwrap();
        let xml =
            String::from_utf8(serialize_document(&epp_document(payload), &ns).unwrap()).unwrap();

        assert!(xml.contains("<contact:id>CID-1</contact:id>"));
    }
}
