use chrono::{DateTime, FixedOffset, NaiveDate};

use crate::core::{Error, NamespaceConfig, Result};
use crate::response::base::ResData;
use crate::xml::parse::{parse_date, parse_datetime};
use crate::xml::Node;

/// Outcome of a domain registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateDomainData {
    /// Registered domain name
    pub name: String,
    /// Creation time
    pub cr_date: DateTime<FixedOffset>,
    /// Expiration date
    pub ex_date: Option<NaiveDate>,
}

impl ResData for CreateDomainData {
    fn extract(res_data: &Node, ns: &NamespaceConfig) -> Result<Vec<Self>> {
        let uri = ns.domain.uri.as_str();
        res_data
            .find_all(uri, &["creData"])
            .into_iter()
            .map(|cre| {
                Ok(CreateDomainData {
                    name: cre
                        .text_of(uri, &["name"])
                        .map(str::to_string)
                        .ok_or_else(|| {
                            Error::parse("creData has no name element", Vec::new())
                        })?,
                    cr_date: parse_datetime(cre.text_of(uri, &["crDate"]).ok_or_else(|| {
                        Error::parse("creData has no crDate element", Vec::new())
                    })?)?,
                    ex_date: cre.text_of(uri, &["exDate"]).map(parse_date).transpose()?,
                })
            })
            .collect()
    }
}

/// Outcome of creating a non-domain object (contact, nsset or keyset)
///
/// The creData shape is shared across the id-keyed families; extraction scans
/// every family of the active table so one type serves all three.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateObjectData {
    /// Created object id
    pub id: String,
    /// Creation time
    pub cr_date: DateTime<FixedOffset>,
}

impl ResData for CreateObjectData {
    fn extract(res_data: &Node, ns: &NamespaceConfig) -> Result<Vec<Self>> {
        let mut data = Vec::new();
        for uri in [&ns.contact.uri, &ns.nsset.uri, &ns.keyset.uri] {
            for cre in res_data.find_all(uri, &["creData"]) {
                data.push(CreateObjectData {
                    id: cre.text_of(uri, &["id"]).map(str::to_string).ok_or_else(
                        || Error::parse("creData has no id element", Vec::new()),
                    )?,
                    cr_date: parse_datetime(cre.text_of(uri, &["crDate"]).ok_or_else(|| {
                        Error::parse("creData has no crDate element", Vec::new())
                    })?)?,
                });
            }
        }
        Ok(data)
    }
}
