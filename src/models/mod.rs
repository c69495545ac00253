//! Shared payload models
//!
//! Building blocks reused by several commands and responses: registration
//! periods, postal data, disclosure preferences, delegation and key material,
//! and the ENUM validation extension payload. Each model declares its XML shape
//! through [`to_element`](Period::to_element)-style constructors consumed by the
//! generic codec, and models that appear in responses also know how to extract
//! themselves from a parsed node.

use chrono::NaiveDate;

use crate::core::{Error, NamespaceConfig, Result};
use crate::xml::parse::{bool_token, format_date, parse_bool_token};
use crate::xml::{Element, Node};

/// Unit of a registration period
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    /// Months
    Month,
    /// Years
    Year,
}

impl Unit {
    /// Schema token of the unit attribute
    pub fn token(self) -> &'static str {
        match self {
            Unit::Month => "m",
            Unit::Year => "y",
        }
    }
}

/// Registration validity period
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    /// Period length
    pub length: u16,
    /// Period unit
    pub unit: Unit,
}

impl Period {
    /// Creates a period expressed in years
    pub fn years(length: u16) -> Self {
        Period {
            length,
            unit: Unit::Year,
        }
    }

    /// Creates a period expressed in months
    pub fn months(length: u16) -> Self {
        Period {
            length,
            unit: Unit::Month,
        }
    }

    /// Declares the domain period element
    pub fn to_element(self, ns: &NamespaceConfig) -> Element {
        Element::leaf(ns.domain.uri.clone(), "period", self.length.to_string())
            .attr("unit", self.unit.token())
    }
}

/// Object status flag with its human-readable description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    /// Value of the s attribute
    pub value: String,
    /// Element text
    pub description: String,
}

impl Status {
    /// Extracts a status from its element
    pub fn extract(node: &Node) -> Self {
        Status {
            value: node.attr("s").unwrap_or_default().to_string(),
            description: node.text.clone(),
        }
    }
}

/// Postal address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Addr {
    /// Street lines, at most three
    pub street: Vec<String>,
    /// City
    pub city: String,
    /// State or province
    pub sp: Option<String>,
    /// Postal code
    pub pc: String,
    /// Country code
    pub cc: String,
}

impl Addr {
    /// Declares the addr element in the given object namespace
    pub fn to_element(&self, ns_uri: &str) -> Result<Element> {
        let streets = self
            .street
            .iter()
            .map(|line| Element::leaf(ns_uri, "street", line.clone()));
        let mut addr = Element::new(ns_uri, "addr").children_capped("street", streets, 3)?;
        addr = addr.child(Element::leaf(ns_uri, "city", self.city.clone()));
        if let Some(sp) = &self.sp {
            addr = addr.child(Element::leaf(ns_uri, "sp", sp.clone()));
        }
        addr = addr.child(Element::leaf(ns_uri, "pc", self.pc.clone()));
        addr = addr.child(Element::leaf(ns_uri, "cc", self.cc.clone()));
        Ok(addr)
    }

    /// Extracts an address from its element
    pub fn extract(node: &Node, ns_uri: &str) -> Self {
        Addr {
            street: node.text_all(ns_uri, &["street"]),
            city: node.text_of(ns_uri, &["city"]).unwrap_or_default().to_string(),
            sp: node.text_of(ns_uri, &["sp"]).map(str::to_string),
            pc: node.text_of(ns_uri, &["pc"]).unwrap_or_default().to_string(),
            cc: node.text_of(ns_uri, &["cc"]).unwrap_or_default().to_string(),
        }
    }
}

/// Contact postal information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostalInfo {
    /// Contact name
    pub name: Option<String>,
    /// Organization
    pub org: Option<String>,
    /// Postal address
    pub addr: Option<Addr>,
}

impl PostalInfo {
    /// Declares the postalInfo element
    pub fn to_element(&self, ns: &NamespaceConfig) -> Result<Element> {
        let uri = ns.contact.uri.as_str();
        let mut info = Element::new(uri, "postalInfo");
        if let Some(name) = &self.name {
            info = info.child(Element::leaf(uri, "name", name.clone()));
        }
        if let Some(org) = &self.org {
            info = info.child(Element::leaf(uri, "org", org.clone()));
        }
        if let Some(addr) = &self.addr {
            info = info.child(addr.to_element(uri)?);
        }
        Ok(info)
    }

    /// Extracts postal information from its element
    pub fn extract(node: &Node, ns: &NamespaceConfig) -> Self {
        let uri = ns.contact.uri.as_str();
        PostalInfo {
            name: node.text_of(uri, &["name"]).map(str::to_string),
            org: node.text_of(uri, &["org"]).map(str::to_string),
            addr: node.find(uri, &["addr"]).map(|n| Addr::extract(n, uri)),
        }
    }
}

/// Contact field eligible for disclosure control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscloseField {
    Addr,
    Voice,
    Fax,
    Email,
    Vat,
    Ident,
    NotifyEmail,
}

impl DiscloseField {
    /// Element name of the field
    pub fn tag(self) -> &'static str {
        match self {
            DiscloseField::Addr => "addr",
            DiscloseField::Voice => "voice",
            DiscloseField::Fax => "fax",
            DiscloseField::Email => "email",
            DiscloseField::Vat => "vat",
            DiscloseField::Ident => "ident",
            DiscloseField::NotifyEmail => "notifyEmail",
        }
    }
}

/// Contact disclosure preference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disclose {
    /// Value of the flag attribute
    pub flag: bool,
    /// Fields the flag applies to
    pub fields: Vec<DiscloseField>,
}

impl Disclose {
    /// Declares the disclose element
    pub fn to_element(&self, ns: &NamespaceConfig) -> Element {
        let uri = ns.contact.uri.as_str();
        Element::new(uri, "disclose")
            .attr("flag", bool_token(self.flag))
            .children(self.fields.iter().map(|f| Element::new(uri, f.tag())))
    }

    /// Extracts a disclosure preference from its element
    pub fn extract(node: &Node) -> Result<Self> {
        let flag = match node.attr("flag") {
            Some(token) => parse_bool_token(token)?,
            None => true,
        };
        let mut fields = Vec::new();
        for child in &node.children {
            let field = match child.tag.as_str() {
                "addr" => DiscloseField::Addr,
                "voice" => DiscloseField::Voice,
                "fax" => DiscloseField::Fax,
                "email" => DiscloseField::Email,
                "vat" => DiscloseField::Vat,
                "ident" => DiscloseField::Ident,
                "notifyEmail" => DiscloseField::NotifyEmail,
                other => {
                    return Err(Error::parse(
                        format!("unknown disclose field {:?}", other),
                        Vec::new(),
                    ))
                }
            };
            fields.push(field);
        }
        Ok(Disclose { flag, fields })
    }
}

/// Kind of a contact identity document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentType {
    Op,
    Passport,
    Mpsv,
    Ico,
    Birthday,
}

impl IdentType {
    /// Schema token of the type attribute
    pub fn token(self) -> &'static str {
        match self {
            IdentType::Op => "op",
            IdentType::Passport => "passport",
            IdentType::Mpsv => "mpsv",
            IdentType::Ico => "ico",
            IdentType::Birthday => "birthday",
        }
    }

    fn from_token(token: &str) -> Result<Self> {
        match token {
            "op" => Ok(IdentType::Op),
            "passport" => Ok(IdentType::Passport),
            "mpsv" => Ok(IdentType::Mpsv),
            "ico" => Ok(IdentType::Ico),
            "birthday" => Ok(IdentType::Birthday),
            other => Err(Error::parse(
                format!("unknown ident type {:?}", other),
                Vec::new(),
            )),
        }
    }
}

/// Contact identity document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    /// Document kind
    pub kind: IdentType,
    /// Document number or date
    pub value: String,
}

impl Ident {
    /// Declares the ident element
    pub fn to_element(&self, ns: &NamespaceConfig) -> Element {
        Element::leaf(ns.contact.uri.clone(), "ident", self.value.clone())
            .attr("type", self.kind.token())
    }

    /// Extracts an identity document from its element
    pub fn extract(node: &Node) -> Result<Self> {
        let token = node
            .attr("type")
            .ok_or_else(|| Error::parse("ident element has no type attribute", Vec::new()))?;
        Ok(Ident {
            kind: IdentType::from_token(token)?,
            value: node.text.clone(),
        })
    }
}

/// One name server of an nsset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameServer {
    /// Host name
    pub name: String,
    /// Glue addresses
    pub addrs: Vec<String>,
}

impl NameServer {
    /// Declares the ns element
    pub fn to_element(&self, ns: &NamespaceConfig) -> Element {
        let uri = ns.nsset.uri.as_str();
        Element::new(uri, "ns")
            .child(Element::leaf(uri, "name", self.name.clone()))
            .children(
                self.addrs
                    .iter()
                    .map(|addr| Element::leaf(uri, "addr", addr.clone())),
            )
    }

    /// Extracts a name server from its element
    pub fn extract(node: &Node, ns: &NamespaceConfig) -> Self {
        let uri = ns.nsset.uri.as_str();
        NameServer {
            name: node.text_of(uri, &["name"]).unwrap_or_default().to_string(),
            addrs: node.text_all(uri, &["addr"]),
        }
    }
}

/// DNSKEY record of a keyset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dnskey {
    pub flags: u16,
    pub protocol: u8,
    pub alg: u8,
    pub pub_key: String,
}

impl Dnskey {
    /// Declares the dnskey element
    pub fn to_element(&self, ns: &NamespaceConfig) -> Element {
        let uri = ns.keyset.uri.as_str();
        Element::new(uri, "dnskey")
            .child(Element::leaf(uri, "flags", self.flags.to_string()))
            .child(Element::leaf(uri, "protocol", self.protocol.to_string()))
            .child(Element::leaf(uri, "alg", self.alg.to_string()))
            .child(Element::leaf(uri, "pubKey", self.pub_key.clone()))
    }

    /// Extracts a DNSKEY record from its element
    pub fn extract(node: &Node, ns: &NamespaceConfig) -> Result<Self> {
        let uri = ns.keyset.uri.as_str();
        let number = |tag: &str| -> Result<u32> {
            node.text_of(uri, &[tag])
                .ok_or_else(|| Error::parse(format!("dnskey has no {} element", tag), Vec::new()))?
                .parse()
                .map_err(|e| Error::parse(format!("bad dnskey {}: {}", tag, e), Vec::new()))
        };
        Ok(Dnskey {
            flags: number("flags")? as u16,
            protocol: number("protocol")? as u8,
            alg: number("alg")? as u8,
            pub_key: node
                .text_of(uri, &["pubKey"])
                .unwrap_or_default()
                .to_string(),
        })
    }
}

/// ENUM validation payload carried in the enumval command extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EnumValidation {
    /// Validation expiration date
    pub val_ex_date: Option<NaiveDate>,
    /// Whether the number is published in the public directory
    pub publish: Option<bool>,
}

impl EnumValidation {
    /// Declares the enumval payload under the given verb tag
    ///
    /// The update form nests the fields inside a chg element; create and renew
    /// carry them directly.
    pub fn to_element(&self, ns: &NamespaceConfig, verb: &str) -> Element {
        let uri = ns.enumval.uri.as_str();
        let mut fields = Vec::new();
        if let Some(date) = self.val_ex_date {
            fields.push(Element::leaf(uri, "valExDate", format_date(date)));
        }
        if let Some(publish) = self.publish {
            fields.push(Element::leaf(uri, "publish", bool_token(publish)));
        }

        let root = Element::new(uri, verb).attr_ns(
            crate::core::NAMESPACE_XSI,
            "schemaLocation",
            ns.enumval.schema_location.clone(),
        );
        if verb == "update" {
            root.child(Element::new(uri, "chg").children(fields))
        } else {
            root.children(fields)
        }
    }

    /// True when no field is set and the extension can be omitted
    pub fn is_empty(&self) -> bool {
        self.val_ex_date.is_none() && self.publish.is_none()
    }
}
