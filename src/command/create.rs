use crate::command::base::{command_wrapper, Request};
use crate::core::{NamespaceConfig, Result, NAMESPACE_EPP, NAMESPACE_XSI};
use crate::models::{Disclose, Dnskey, EnumValidation, Ident, NameServer, Period, PostalInfo};
use crate::response::create::{CreateDomainData, CreateObjectData};
use crate::xml::Element;

/// EPP create domain command
#[derive(Debug, Clone)]
pub struct CreateDomain {
    /// Domain name to register
    pub name: String,
    /// Registrant contact id
    pub registrant: String,
    /// Registration period, server default when absent
    pub period: Option<Period>,
    /// Nsset id to delegate to
    pub nsset: Option<String>,
    /// Keyset id holding DNSSEC material
    pub keyset: Option<String>,
    /// Administrative contact ids
    pub admins: Vec<String>,
    /// Transfer authorization
    pub auth_info: Option<String>,
    /// ENUM validation extension
    pub enum_validation: Option<EnumValidation>,
}

impl CreateDomain {
    /// Creates a registration request with only the required fields set
    pub fn new(name: impl Into<String>, registrant: impl Into<String>) -> Self {
        CreateDomain {
            name: name.into(),
            registrant: registrant.into(),
            period: None,
            nsset: None,
            keyset: None,
            admins: Vec::new(),
            auth_info: None,
            enum_validation: None,
        }
    }
}

impl Request for CreateDomain {
    type Data = CreateDomainData;

    fn epp_payload(&self, ns: &NamespaceConfig, tr_id: Option<&str>) -> Result<Element> {
        let uri = ns.domain.uri.as_str();
        let mut create = Element::new(uri, "create")
            .attr_ns(NAMESPACE_XSI, "schemaLocation", ns.domain.schema_location.clone())
            .child(Element::leaf(uri, "name", self.name.clone()));
        if let Some(period) = self.period {
            create = create.child(period.to_element(ns));
        }
        if let Some(nsset) = &self.nsset {
            create = create.child(Element::leaf(uri, "nsset", nsset.clone()));
        }
        if let Some(keyset) = &self.keyset {
            create = create.child(Element::leaf(uri, "keyset", keyset.clone()));
        }
        create = create
            .child(Element::leaf(uri, "registrant", self.registrant.clone()))
            .children(
                self.admins
                    .iter()
                    .map(|admin| Element::leaf(uri, "admin", admin.clone())),
            );
        if let Some(auth_info) = &self.auth_info {
            create = create.child(Element::leaf(uri, "authInfo", auth_info.clone()));
        }

        let extension = self
            .enum_validation
            .filter(|v| !v.is_empty())
            .map(|v| v.to_element(ns, "create"));

        Ok(command_wrapper(
            Element::new(NAMESPACE_EPP, "create").child(create),
            extension,
            tr_id,
        ))
    }
}

/// EPP create contact command
#[derive(Debug, Clone)]
pub struct CreateContact {
    /// Contact id to create
    pub id: String,
    /// Name, organization and postal address
    pub postal_info: PostalInfo,
    /// Voice number
    pub voice: Option<String>,
    /// Fax number
    pub fax: Option<String>,
    /// Email address
    pub email: String,
    /// Transfer authorization
    pub auth_info: Option<String>,
    /// Disclosure preference
    pub disclose: Option<Disclose>,
    /// VAT number
    pub vat: Option<String>,
    /// Identity document
    pub ident: Option<Ident>,
    /// Notification email address
    pub notify_email: Option<String>,
}

impl CreateContact {
    /// Creates a contact request with only the required fields set
    pub fn new(id: impl Into<String>, postal_info: PostalInfo, email: impl Into<String>) -> Self {
        CreateContact {
            id: id.into(),
            postal_info,
            voice: None,
            fax: None,
            email: email.into(),
            auth_info: None,
            disclose: None,
            vat: None,
            ident: None,
            notify_email: None,
        }
    }
}

impl Request for CreateContact {
    type Data = CreateObjectData;

    fn epp_payload(&self, ns: &NamespaceConfig, tr_id: Option<&str>) -> Result<Element> {
        let uri = ns.contact.uri.as_str();
        let mut create = Element::new(uri, "create")
            .attr_ns(NAMESPACE_XSI, "schemaLocation", ns.contact.schema_location.clone())
            .child(Element::leaf(uri, "id", self.id.clone()))
            .child(self.postal_info.to_element(ns)?);
        if let Some(voice) = &self.voice {
            create = create.child(Element::leaf(uri, "voice", voice.clone()));
        }
        if let Some(fax) = &self.fax {
            create = create.child(Element::leaf(uri, "fax", fax.clone()));
        }
        create = create.child(Element::leaf(uri, "email", self.email.clone()));
        if let Some(auth_info) = &self.auth_info {
            create = create.child(Element::leaf(uri, "authInfo", auth_info.clone()));
        }
        if let Some(disclose) = &self.disclose {
            create = create.child(disclose.to_element(ns));
        }
        if let Some(vat) = &self.vat {
            create = create.child(Element::leaf(uri, "vat", vat.clone()));
        }
        if let Some(ident) = &self.ident {
            create = create.child(ident.to_element(ns));
        }
        if let Some(notify_email) = &self.notify_email {
            create = create.child(Element::leaf(uri, "notifyEmail", notify_email.clone()));
        }

        Ok(command_wrapper(
            Element::new(NAMESPACE_EPP, "create").child(create),
            None,
            tr_id,
        ))
    }
}

/// EPP create nsset command
#[derive(Debug, Clone)]
pub struct CreateNsset {
    /// Nsset id to create
    pub id: String,
    /// Transfer authorization
    pub auth_info: Option<String>,
    /// Name servers of the set
    pub name_servers: Vec<NameServer>,
    /// Technical contact ids
    pub techs: Vec<String>,
    /// Technical check level requested for the set
    pub reportlevel: Option<i32>,
}

impl CreateNsset {
    /// Creates an nsset request with only the required fields set
    pub fn new(id: impl Into<String>) -> Self {
        CreateNsset {
            id: id.into(),
            auth_info: None,
            name_servers: Vec::new(),
            techs: Vec::new(),
            reportlevel: None,
        }
    }
}

impl Request for CreateNsset {
    type Data = CreateObjectData;

    fn epp_payload(&self, ns: &NamespaceConfig, tr_id: Option<&str>) -> Result<Element> {
        let uri = ns.nsset.uri.as_str();
        let mut create = Element::new(uri, "create")
            .attr_ns(NAMESPACE_XSI, "schemaLocation", ns.nsset.schema_location.clone())
            .child(Element::leaf(uri, "id", self.id.clone()));
        if let Some(auth_info) = &self.auth_info {
            create = create.child(Element::leaf(uri, "authInfo", auth_info.clone()));
        }
        create = create
            .children(self.name_servers.iter().map(|server| server.to_element(ns)))
            .children(
                self.techs
                    .iter()
                    .map(|tech| Element::leaf(uri, "tech", tech.clone())),
            );
        if let Some(reportlevel) = self.reportlevel {
            create = create.child(Element::leaf(uri, "reportlevel", reportlevel.to_string()));
        }

        Ok(command_wrapper(
            Element::new(NAMESPACE_EPP, "create").child(create),
            None,
            tr_id,
        ))
    }
}

/// EPP create keyset command
#[derive(Debug, Clone)]
pub struct CreateKeyset {
    /// Keyset id to create
    pub id: String,
    /// Transfer authorization
    pub auth_info: Option<String>,
    /// DNSKEY records of the set
    pub dnskeys: Vec<Dnskey>,
    /// Technical contact ids
    pub techs: Vec<String>,
}

impl CreateKeyset {
    /// Creates a keyset request with only the required fields set
    pub fn new(id: impl Into<String>) -> Self {
        CreateKeyset {
            id: id.into(),
            auth_info: None,
            dnskeys: Vec::new(),
            techs: Vec::new(),
        }
    }
}

impl Request for CreateKeyset {
    type Data = CreateObjectData;

    fn epp_payload(&self, ns: &NamespaceConfig, tr_id: Option<&str>) -> Result<Element> {
        let uri = ns.keyset.uri.as_str();
        let mut create = Element::new(uri, "create")
            .attr_ns(NAMESPACE_XSI, "schemaLocation", ns.keyset.schema_location.clone())
            .child(Element::leaf(uri, "id", self.id.clone()));
        if let Some(auth_info) = &self.auth_info {
            create = create.child(Element::leaf(uri, "authInfo", auth_info.clone()));
        }
        create = create
            .children(self.dnskeys.iter().map(|key| key.to_element(ns)))
            .children(
                self.techs
                    .iter()
                    .map(|tech| Element::leaf(uri, "tech", tech.clone())),
            );

        Ok(command_wrapper(
            Element::new(NAMESPACE_EPP, "create").child(create),
            None,
            tr_id,
        ))
    }
}
