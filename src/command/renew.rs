use chrono::NaiveDate;

use crate::command::base::{command_wrapper, Request};
use crate::core::{NamespaceConfig, Result, NAMESPACE_EPP, NAMESPACE_XSI};
use crate::models::{EnumValidation, Period};
use crate::response::renew::RenewDomainData;
use crate::xml::parse::format_date;
use crate::xml::Element;

/// EPP renew domain command
#[derive(Debug, Clone)]
pub struct RenewDomain {
    /// Domain name to renew
    pub name: String,
    /// Current expiration date, echoed to guard against double renewal
    pub cur_exp_date: NaiveDate,
    /// Renewal period, server default when absent
    pub period: Option<Period>,
    /// ENUM validation extension
    pub enum_validation: Option<EnumValidation>,
}

impl RenewDomain {
    /// Creates a renewal request
    pub fn new(name: impl Into<String>, cur_exp_date: NaiveDate) -> Self {
        RenewDomain {
            name: name.into(),
            cur_exp_date,
            period: None,
            enum_validation: None,
        }
    }
}

impl Request for RenewDomain {
    type Data = RenewDomainData;

    fn epp_payload(&self, ns: &NamespaceConfig, tr_id: Option<&str>) -> Result<Element> {
        let uri = ns.domain.uri.as_str();
        let mut renew = Element::new(uri, "renew")
            .attr_ns(NAMESPACE_XSI, "schemaLocation", ns.domain.schema_location.clone())
            .child(Element::leaf(uri, "name", self.name.clone()))
            .child(Element::leaf(uri, "curExpDate", format_date(self.cur_exp_date)));
        if let Some(period) = self.period {
            renew = renew.child(period.to_element(ns));
        }

        let extension = self
            .enum_validation
            .filter(|v| !v.is_empty())
            .map(|v| v.to_element(ns, "renew"));

        Ok(command_wrapper(
            Element::new(NAMESPACE_EPP, "renew").child(renew),
            extension,
            tr_id,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::base::epp_document;
    use crate::xml::serialize_document;

    fn render(renew: &RenewDomain) -> String {
        let ns = NamespaceConfig::fred();
        let payload = renew.epp_payload(&ns, Some("abc-1")).unwrap();
        String::from_utf8(serialize_document(&epp_document(payload), &ns).unwrap()).unwrap()
    }

    #[test]
    fn test_renew_domain_dates_and_order() {
        let mut renew = RenewDomain::new(
            "example.cz",
            NaiveDate::from_ymd_opt(2023, 11, 30).unwrap(),
        );
        renew.period = Some(Period::months(18));
        let xml = render(&renew);

        let name = xml.find("<domain:name>").unwrap();
        let exp = xml.find("<domain:curExpDate>2023-11-30</domain:curExpDate>").unwrap();
        let period = xml.find("<domain:period unit=\"m\">18</domain:period>").unwrap();
        assert!(name < exp && exp < period);
    }

    #[test]
    fn test_renew_domain_period_optional() {
        let renew = RenewDomain::new("example.cz", NaiveDate::from_ymd_opt(2023, 11, 30).unwrap());

        assert!(!render(&renew).contains("period"));
    }
}
