use crate::command::base::{command_wrapper, Request};
use crate::core::{NamespaceConfig, Result, NAMESPACE_EPP, NAMESPACE_XSI};
use crate::models::EnumValidation;
use crate::response::NoResData;
use crate::xml::Element;

/// EPP update domain command
///
/// Administrative contacts are added and removed through the add/rem blocks;
/// singular properties change through the chg block, which is emitted only when
/// at least one of them is set.
#[derive(Debug, Clone, Default)]
pub struct UpdateDomain {
    /// Domain name to update
    pub name: String,
    /// Admin contact ids to add
    pub add_admins: Vec<String>,
    /// Admin contact ids to remove
    pub rem_admins: Vec<String>,
    /// New nsset id
    pub nsset: Option<String>,
    /// New keyset id
    pub keyset: Option<String>,
    /// New registrant contact id
    pub registrant: Option<String>,
    /// New transfer authorization
    pub auth_info: Option<String>,
    /// ENUM validation extension
    pub enum_validation: Option<EnumValidation>,
}

impl UpdateDomain {
    /// Creates an empty update for a domain
    pub fn new(name: impl Into<String>) -> Self {
        UpdateDomain {
            name: name.into(),
            ..UpdateDomain::default()
        }
    }
}

impl Request for UpdateDomain {
    type Data = NoResData;

    fn epp_payload(&self, ns: &NamespaceConfig, tr_id: Option<&str>) -> Result<Element> {
        let uri = ns.domain.uri.as_str();
        let mut update = Element::new(uri, "update")
            .attr_ns(NAMESPACE_XSI, "schemaLocation", ns.domain.schema_location.clone())
            .child(Element::leaf(uri, "name", self.name.clone()));

        if !self.add_admins.is_empty() {
            update = update.child(
                Element::new(uri, "add").children(
                    self.add_admins
                        .iter()
                        .map(|admin| Element::leaf(uri, "admin", admin.clone())),
                ),
            );
        }
        if !self.rem_admins.is_empty() {
            update = update.child(
                Element::new(uri, "rem").children(
                    self.rem_admins
                        .iter()
                        .map(|admin| Element::leaf(uri, "admin", admin.clone())),
                ),
            );
        }

        let mut chg = Element::new(uri, "chg");
        if let Some(nsset) = &self.nsset {
            chg = chg.child(Element::leaf(uri, "nsset", nsset.clone()));
        }
        if let Some(keyset) = &self.keyset {
            chg = chg.child(Element::leaf(uri, "keyset", keyset.clone()));
        }
        if let Some(registrant) = &self.registrant {
            chg = chg.child(Element::leaf(uri, "registrant", registrant.clone()));
        }
        if let Some(auth_info) = &self.auth_info {
            chg = chg.child(Element::leaf(uri, "authInfo", auth_info.clone()));
        }
        if !chg.is_empty() {
            update = update.child(chg);
        }

        let extension = self
            .enum_validation
            .filter(|v| !v.is_empty())
            .map(|v| v.to_element(ns, "update"));

        Ok(command_wrapper(
            Element::new(NAMESPACE_EPP, "update").child(update),
            extension,
            tr_id,
        ))
    }
}
