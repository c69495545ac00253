use crate::core::{Error, NamespaceConfig, Result};
use crate::response::base::ResData;
use crate::xml::Node;

/// Remaining credit for one zone, from the fred creditInfo response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreditInfoData {
    /// Zone the credit applies to
    pub zone: String,
    /// Remaining credit, kept as the registry's decimal string
    pub credit: String,
}

impl ResData for CreditInfoData {
    fn extract(res_data: &Node, ns: &NamespaceConfig) -> Result<Vec<Self>> {
        let uri = ns.fred.uri.as_str();
        res_data
            .find_all(uri, &["resCreditInfo", "zoneCredit"])
            .into_iter()
            .map(|entry| {
                Ok(CreditInfoData {
                    zone: entry
                        .text_of(uri, &["zone"])
                        .map(str::to_string)
                        .ok_or_else(|| {
                            Error::parse("zoneCredit has no zone element", Vec::new())
                        })?,
                    credit: entry
                        .text_of(uri, &["credit"])
                        .map(str::to_string)
                        .ok_or_else(|| {
                            Error::parse("zoneCredit has no credit element", Vec::new())
                        })?,
                })
            })
            .collect()
    }
}
