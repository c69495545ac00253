use chrono::NaiveDate;

use crate::core::{Error, NamespaceConfig, Result};
use crate::response::base::ResData;
use crate::xml::parse::parse_date;
use crate::xml::Node;

/// Outcome of a domain renewal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenewDomainData {
    /// Renewed domain name
    pub name: String,
    /// New expiration date
    pub ex_date: Option<NaiveDate>,
}

impl ResData for RenewDomainData {
    fn extract(res_data: &Node, ns: &NamespaceConfig) -> Result<Vec<Self>> {
        let uri = ns.domain.uri.as_str();
        res_data
            .find_all(uri, &["renData"])
            .into_iter()
            .map(|ren| {
                Ok(RenewDomainData {
                    name: ren
                        .text_of(uri, &["name"])
                        .map(str::to_string)
                        .ok_or_else(|| {
                            Error::parse("renData has no name element", Vec::new())
                        })?,
                    ex_date: ren.text_of(uri, &["exDate"]).map(parse_date).transpose()?,
                })
            })
            .collect()
    }
}
