//! Registry extension commands
//!
//! FRED defines a family of commands carried outside `<command>`, wrapped in
//! `<extension><fred:extcommand>` with the transaction id nested inside the
//! extcommand element rather than appended to `<command>`.

use crate::command::base::{extcommand_wrapper, Request};
use crate::core::{NamespaceConfig, Result, NAMESPACE_XSI};
use crate::response::credit::CreditInfoData;
use crate::response::NoResData;
use crate::xml::Element;

/// FRED credit info command, listing the remaining credit per zone
#[derive(Debug, Clone, Copy, Default)]
pub struct CreditInfoRequest;

impl Request for CreditInfoRequest {
    type Data = CreditInfoData;

    fn epp_payload(&self, ns: &NamespaceConfig, tr_id: Option<&str>) -> Result<Element> {
        Ok(extcommand_wrapper(
            Element::new(ns.fred.uri.clone(), "creditInfo"),
            ns,
            tr_id,
        ))
    }
}

/// FRED sendAuthInfo command for a domain
///
/// Asks the registry to mail the transfer authorization to the holder instead
/// of disclosing it to the caller.
#[derive(Debug, Clone)]
pub struct SendAuthInfoDomain {
    /// Domain name whose authorization is requested
    pub name: String,
}

impl SendAuthInfoDomain {
    /// Creates a sendAuthInfo request for a domain
    pub fn new(name: impl Into<String>) -> Self {
        SendAuthInfoDomain { name: name.into() }
    }
}

impl Request for SendAuthInfoDomain {
    type Data = NoResData;

    fn epp_payload(&self, ns: &NamespaceConfig, tr_id: Option<&str>) -> Result<Element> {
        let domain_uri = ns.domain.uri.as_str();
        let payload = Element::new(ns.fred.uri.clone(), "sendAuthInfo").child(
            Element::new(domain_uri, "sendAuthInfo")
                .attr_ns(NAMESPACE_XSI, "schemaLocation", ns.domain.schema_location.clone())
                .child(Element::leaf(domain_uri, "name", self.name.clone())),
        );
        Ok(extcommand_wrapper(payload, ns, tr_id))
    }
}

/// FRED technical test of an nsset
#[derive(Debug, Clone)]
pub struct TestNsset {
    /// Nsset id to test
    pub id: String,
    /// Technical check level
    pub level: Option<i32>,
    /// Domain names to test the delegation against
    pub names: Vec<String>,
}

impl TestNsset {
    /// Creates a test request for an nsset
    pub fn new(id: impl Into<String>) -> Self {
        TestNsset {
            id: id.into(),
            level: None,
            names: Vec::new(),
        }
    }
}

impl Request for TestNsset {
    type Data = NoResData;

    fn epp_payload(&self, ns: &NamespaceConfig, tr_id: Option<&str>) -> Result<Element> {
        let nsset_uri = ns.nsset.uri.as_str();
        let mut test = Element::new(nsset_uri, "test")
            .attr_ns(NAMESPACE_XSI, "schemaLocation", ns.nsset.schema_location.clone())
            .child(Element::leaf(nsset_uri, "id", self.id.clone()));
        if let Some(level) = self.level {
            test = test.child(Element::leaf(nsset_uri, "level", level.to_string()));
        }
        test = test.children(
            self.names
                .iter()
                .map(|name| Element::leaf(nsset_uri, "name", name.clone())),
        );

        let payload = Element::new(ns.fred.uri.clone(), "test").child(test);
        Ok(extcommand_wrapper(payload, ns, tr_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::base::epp_document;
    use crate::xml::serialize_document;

    fn render<R: Request>(request: &R, tr_id: Option<&str>) -> String {
        let ns = NamespaceConfig::fred();
        let payload = request.epp_payload(&ns, tr_id).unwrap();
        String::from_utf8(serialize_document(&epp_document(payload), &ns).unwrap()).unwrap()
    }

    #[test]
    fn test_credit_info_transaction_id_inside_extcommand() {
        let xml = render(&CreditInfoRequest, Some("abc-1"));

        assert!(xml.contains("<epp:extension><fred:extcommand"));
        assert!(xml.contains("<fred:creditInfo/>"));
        // clTRID is the fred-namespaced one inside extcommand, not epp:clTRID.
        assert!(xml.contains("<fred:clTRID>abc-1</fred:clTRID>"));
        assert!(!xml.contains("<epp:clTRID>"));
        let payload = xml.find("<fred:creditInfo/>").unwrap();
        assert!(payload < xml.find("<fred:clTRID>").unwrap());
    }

    #[test]
    fn test_send_auth_info_domain_nests_object_payload() {
        let xml = render(&SendAuthInfoDomain::new("example.cz"), Some("abc-2"));

        assert!(xml.contains("<fred:sendAuthInfo><domain:sendAuthInfo"));
        assert!(xml.contains("<domain:name>example.cz</domain:name>"));
    }

    #[test]
    fn test_test_nsset_optional_fields() {
        let mut test = TestNsset::new("NID-1");
        assert!(!render(&test, None).contains("level"));

        test.level = Some(5);
        test.names = vec!["a.cz".to_string(), "b.cz".to_string()];
        let xml = render(&test, None);
        assert!(xml.contains("<nsset:level>5</nsset:level>"));
        let a = xml.find("<nsset:name>a.cz</nsset:name>").unwrap();
        let b = xml.find("<nsset:name>b.cz</nsset:name>").unwrap();
        assert!(a < b);
    }
}
