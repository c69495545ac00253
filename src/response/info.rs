use chrono::{DateTime, FixedOffset, NaiveDate};

use crate::core::{Error, NamespaceConfig, Result};
use crate::models::{Disclose, Dnskey, Ident, NameServer, PostalInfo, Status};
use crate::response::base::ResData;
use crate::xml::parse::{parse_date, parse_datetime};
use crate::xml::Node;

fn required_text(node: &Node, uri: &str, tag: &str) -> Result<String> {
    node.text_of(uri, &[tag])
        .map(str::to_string)
        .ok_or_else(|| Error::parse(format!("infData has no {} element", tag), Vec::new()))
}

fn optional_datetime(node: &Node, uri: &str, tag: &str) -> Result<Option<DateTime<FixedOffset>>> {
    node.text_of(uri, &[tag]).map(parse_datetime).transpose()
}

/// State of one domain from an info domain response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoDomainData {
    /// Domain name
    pub name: String,
    /// Repository object id
    pub roid: String,
    /// Current statuses
    pub statuses: Vec<Status>,
    /// Registrant contact id
    pub registrant: Option<String>,
    /// Administrative contact ids
    pub admins: Vec<String>,
    /// Delegated nsset id
    pub nsset: Option<String>,
    /// Associated keyset id
    pub keyset: Option<String>,
    /// Sponsoring registrar
    pub cl_id: String,
    /// Creating registrar
    pub cr_id: Option<String>,
    /// Creation time
    pub cr_date: Option<DateTime<FixedOffset>>,
    /// Registrar of the last update
    pub up_id: Option<String>,
    /// Time of the last update
    pub up_date: Option<DateTime<FixedOffset>>,
    /// Time of the last transfer
    pub tr_date: Option<DateTime<FixedOffset>>,
    /// Expiration date
    pub ex_date: Option<NaiveDate>,
    /// Transfer authorization, present when the caller is the sponsor
    pub auth_info: Option<String>,
}

impl ResData for InfoDomainData {
    fn extract(res_data: &Node, ns: &NamespaceConfig) -> Result<Vec<Self>> {
        let uri = ns.domain.uri.as_str();
        res_data
            .find_all(uri, &["infData"])
            .into_iter()
            .map(|inf| {
                Ok(InfoDomainData {
                    name: required_text(inf, uri, "name")?,
                    roid: required_text(inf, uri, "roid")?,
                    statuses: inf
                        .find_all(uri, &["status"])
                        .into_iter()
                        .map(Status::extract)
                        .collect(),
                    registrant: inf.text_of(uri, &["registrant"]).map(str::to_string),
                    admins: inf.text_all(uri, &["admin"]),
                    nsset: inf.text_of(uri, &["nsset"]).map(str::to_string),
                    keyset: inf.text_of(uri, &["keyset"]).map(str::to_string),
                    cl_id: required_text(inf, uri, "clID")?,
                    cr_id: inf.text_of(uri, &["crID"]).map(str::to_string),
                    cr_date: optional_datetime(inf, uri, "crDate")?,
                    up_id: inf.text_of(uri, &["upID"]).map(str::to_string),
                    up_date: optional_datetime(inf, uri, "upDate")?,
                    tr_date: optional_datetime(inf, uri, "trDate")?,
                    ex_date: inf.text_of(uri, &["exDate"]).map(parse_date).transpose()?,
                    auth_info: inf.text_of(uri, &["authInfo"]).map(str::to_string),
                })
            })
            .collect()
    }
}

/// State of one contact from an info contact response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoContactData {
    /// Contact id
    pub id: String,
    /// Repository object id
    pub roid: String,
    /// Current statuses
    pub statuses: Vec<Status>,
    /// Name, organization and postal address
    pub postal_info: Option<PostalInfo>,
    /// Voice number
    pub voice: Option<String>,
    /// Fax number
    pub fax: Option<String>,
    /// Email address
    pub email: Option<String>,
    /// Notification email address
    pub notify_email: Option<String>,
    /// VAT number
    pub vat: Option<String>,
    /// Identity document
    pub ident: Option<Ident>,
    /// Disclosure preference
    pub disclose: Option<Disclose>,
    /// Sponsoring registrar
    pub cl_id: String,
    /// Creating registrar
    pub cr_id: Option<String>,
    /// Creation time
    pub cr_date: Option<DateTime<FixedOffset>>,
    /// Registrar of the last update
    pub up_id: Option<String>,
    /// Time of the last update
    pub up_date: Option<DateTime<FixedOffset>>,
    /// Time of the last transfer
    pub tr_date: Option<DateTime<FixedOffset>>,
    /// Transfer authorization, present when the caller is the sponsor
    pub auth_info: Option<String>,
}

impl ResData for InfoContactData {
    fn extract(res_data: &Node, ns: &NamespaceConfig) -> Result<Vec<Self>> {
        let uri = ns.contact.uri.as_str();
        res_data
            .find_all(uri, &["infData"])
            .into_iter()
            .map(|inf| {
                Ok(InfoContactData {
                    id: required_text(inf, uri, "id")?,
                    roid: required_text(inf, uri, "roid")?,
                    statuses: inf
                        .find_all(uri, &["status"])
                        .into_iter()
                        .map(Status::extract)
                        .collect(),
                    postal_info: inf
                        .find(uri, &["postalInfo"])
                        .map(|n| PostalInfo::extract(n, ns)),
                    voice: inf.text_of(uri, &["voice"]).map(str::to_string),
                    fax: inf.text_of(uri, &["fax"]).map(str::to_string),
                    email: inf.text_of(uri, &["email"]).map(str::to_string),
                    notify_email: inf.text_of(uri, &["notifyEmail"]).map(str::to_string),
                    vat: inf.text_of(uri, &["vat"]).map(str::to_string),
                    ident: inf.find(uri, &["ident"]).map(Ident::extract).transpose()?,
                    disclose: inf
                        .find(uri, &["disclose"])
                        .map(Disclose::extract)
                        .transpose()?,
                    cl_id: required_text(inf, uri, "clID")?,
                    cr_id: inf.text_of(uri, &["crID"]).map(str::to_string),
                    cr_date: optional_datetime(inf, uri, "crDate")?,
                    up_id: inf.text_of(uri, &["upID"]).map(str::to_string),
                    up_date: optional_datetime(inf, uri, "upDate")?,
                    tr_date: optional_datetime(inf, uri, "trDate")?,
                    auth_info: inf.text_of(uri, &["authInfo"]).map(str::to_string),
                })
            })
            .collect()
    }
}

/// State of one nsset from an info nsset response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoNssetData {
    /// Nsset id
    pub id: String,
    /// Repository object id
    pub roid: String,
    /// Current statuses
    pub statuses: Vec<Status>,
    /// Sponsoring registrar
    pub cl_id: String,
    /// Creating registrar
    pub cr_id: Option<String>,
    /// Creation time
    pub cr_date: Option<DateTime<FixedOffset>>,
    /// Registrar of the last update
    pub up_id: Option<String>,
    /// Time of the last update
    pub up_date: Option<DateTime<FixedOffset>>,
    /// Time of the last transfer
    pub tr_date: Option<DateTime<FixedOffset>>,
    /// Transfer authorization, present when the caller is the sponsor
    pub auth_info: Option<String>,
    /// Name servers of the set
    pub name_servers: Vec<NameServer>,
    /// Technical contact ids
    pub techs: Vec<String>,
    /// Technical check level
    pub reportlevel: Option<i32>,
}

impl ResData for InfoNssetData {
    fn extract(res_data: &Node, ns: &NamespaceConfig) -> Result<Vec<Self>> {
        let uri = ns.nsset.uri.as_str();
        res_data
            .find_all(uri, &["infData"])
            .into_iter()
            .map(|inf| {
                Ok(InfoNssetData {
                    id: required_text(inf, uri, "id")?,
                    roid: required_text(inf, uri, "roid")?,
                    statuses: inf
                        .find_all(uri, &["status"])
                        .into_iter()
                        .map(Status::extract)
                        .collect(),
                    cl_id: required_text(inf, uri, "clID")?,
                    cr_id: inf.text_of(uri, &["crID"]).map(str::to_string),
                    cr_date: optional_datetime(inf, uri, "crDate")?,
                    up_id: inf.text_of(uri, &["upID"]).map(str::to_string),
                    up_date: optional_datetime(inf, uri, "upDate")?,
                    tr_date: optional_datetime(inf, uri, "trDate")?,
                    auth_info: inf.text_of(uri, &["authInfo"]).map(str::to_string),
                    name_servers: inf
                        .find_all(uri, &["ns"])
                        .into_iter()
                        .map(|n| NameServer::extract(n, ns))
                        .collect(),
                    techs: inf.text_all(uri, &["tech"]),
                    reportlevel: inf
                        .text_of(uri, &["reportlevel"])
                        .map(|level| {
                            level.parse().map_err(|e| {
                                Error::parse(format!("bad reportlevel: {}", e), Vec::new())
                            })
                        })
                        .transpose()?,
                })
            })
            .collect()
    }
}

/// State of one keyset from an info keyset response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoKeysetData {
    /// Keyset id
    pub id: String,
    /// Repository object id
    pub roid: String,
    /// Current statuses
    pub statuses: Vec<Status>,
    /// Sponsoring registrar
    pub cl_id: String,
    /// Creating registrar
    pub cr_id: Option<String>,
    /// Creation time
    pub cr_date: Option<DateTime<FixedOffset>>,
    /// Registrar of the last update
    pub up_id: Option<String>,
    /// Time of the last update
    pub up_date: Option<DateTime<FixedOffset>>,
    /// Time of the last transfer
    pub tr_date: Option<DateTime<FixedOffset>>,
    /// Transfer authorization, present when the caller is the sponsor
    pub auth_info: Option<String>,
    /// DNSKEY records of the set
    pub dnskeys: Vec<Dnskey>,
    /// Technical contact ids
    pub techs: Vec<String>,
}

impl ResData for InfoKeysetData {
    fn extract(res_data: &Node, ns: &NamespaceConfig) -> Result<Vec<Self>> {
        let uri = ns.keyset.uri.as_str();
        res_data
            .find_all(uri, &["infData"])
            .into_iter()
            .map(|inf| {
                Ok(InfoKeysetData {
                    id: required_text(inf, uri, "id")?,
                    roid: required_text(inf, uri, "roid")?,
                    statuses: inf
                        .find_all(uri, &["status"])
                        .into_iter()
                        .map(Status::extract)
                        .collect(),
                    cl_id: required_text(inf, uri, "clID")?,
                    cr_id: inf.text_of(uri, &["crID"]).map(str::to_string),
                    cr_date: optional_datetime(inf, uri, "crDate")?,
                    up_id: inf.text_of(uri, &["upID"]).map(str::to_string),
                    up_date: optional_datetime(inf, uri, "upDate")?,
                    tr_date: optional_datetime(inf, uri, "trDate")?,
                    auth_info: inf.text_of(uri, &["authInfo"]).map(str::to_string),
                    dnskeys: inf
                        .find_all(uri, &["dnskey"])
                        .into_iter()
                        .map(|key| Dnskey::extract(key, ns))
                        .collect::<Result<Vec<_>>>()?,
                    techs: inf.text_all(uri, &["tech"]),
                })
            })
            .collect()
    }
}
