use crate::core::{Error, NamespaceConfig, Result};
use crate::response::base::ResData;
use crate::xml::parse::parse_bool_token;
use crate::xml::Node;

/// Availability of one checked object
fn availability_entries(
    res_data: &Node,
    uri: &str,
    tag: &str,
) -> Result<Vec<(String, bool, Option<String>)>> {
    res_data
        .find_all(uri, &["chkData", "cd"])
        .into_iter()
        .map(|cd| {
            let subject = cd.find(uri, &[tag]).ok_or_else(|| {
                Error::parse(format!("check entry has no {} element", tag), Vec::new())
            })?;
            let avail = parse_bool_token(subject.attr("avail").ok_or_else(|| {
                Error::parse("check entry has no avail attribute", Vec::new())
            })?)?;
            let reason = cd.text_of(uri, &["reason"]).map(str::to_string);
            Ok((subject.text.clone(), avail, reason))
        })
        .collect()
}

/// Availability of one domain from a check domain response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckDomainData {
    /// Checked domain name
    pub name: String,
    /// True when the name is available for registration
    pub avail: bool,
    /// Server-side reason when unavailable
    pub reason: Option<String>,
}

impl ResData for CheckDomainData {
    fn extract(res_data: &Node, ns: &NamespaceConfig) -> Result<Vec<Self>> {
        Ok(availability_entries(res_data, &ns.domain.uri, "name")?
            .into_iter()
            .map(|(name, avail, reason)| CheckDomainData {
                name,
                avail,
                reason,
            })
            .collect())
    }
}

/// Availability of one contact from a check contact response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckContactData {
    /// Checked contact id
    pub id: String,
    /// True when the id is available
    pub avail: bool,
    /// Server-side reason when unavailable
    pub reason: Option<String>,
}

impl ResData for CheckContactData {
    fn extract(res_data: &Node, ns: &NamespaceConfig) -> Result<Vec<Self>> {
        Ok(availability_entries(res_data, &ns.contact.uri, "id")?
            .into_iter()
            .map(|(id, avail, reason)| CheckContactData { id, avail, reason })
            .collect())
    }
}

/// Availability of one nsset from a check nsset response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckNssetData {
    /// Checked nsset id
    pub id: String,
    /// True when the id is available
    pub avail: bool,
    /// Server-side reason when unavailable
    pub reason: Option<String>,
}

impl ResData for CheckNssetData {
    fn extract(res_data: &Node, ns: &NamespaceConfig) -> Result<Vec<Self>> {
        Ok(availability_entries(res_data, &ns.nsset.uri, "id")?
            .into_iter()
            .map(|(id, avail, reason)| CheckNssetData { id, avail, reason })
            .collect())
    }
}

/// Availability of one keyset from a check keyset response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckKeysetData {
    /// Checked keyset id
    pub id: String,
    /// True when the id is available
    pub avail: bool,
    /// Server-side reason when unavailable
    pub reason: Option<String>,
}

impl ResData for CheckKeysetData {
    fn extract(res_data: &Node, ns: &NamespaceConfig) -> Result<Vec<Self>> {
        Ok(availability_entries(res_data, &ns.keyset.uri, "id")?
            .into_iter()
            .map(|(id, avail, reason)| CheckKeysetData { id, avail, reason })
            .collect())
    }
}
