use chrono::{DateTime, FixedOffset, NaiveDate};
use tracing::warn;

use crate::core::{Error, NamespaceConfig, Result};
use crate::xml::parse::{parse_date, parse_datetime};
use crate::xml::Node;

/// Service message delivered through the poll queue
///
/// The wire carries one namespaced payload element inside `<msgQ><msg>`; the
/// variants cover the message kinds this client understands, and anything else
/// is logged and dropped so an unknown message never aborts a poll.
#[derive(Debug, Clone, PartialEq)]
pub enum PollMessage {
    /// Zone credit dropped below the configured limit (fred lowCreditData)
    LowCredit {
        zone: String,
        credit_zone: String,
        /// Remaining credit, as the registry's decimal string
        credit: String,
        limit_zone: String,
        /// Limit that was crossed, as the registry's decimal string
        limit: String,
    },
    /// Periodical request fee report (fred requestFeeInfoData)
    RequestUsage {
        period_from: DateTime<FixedOffset>,
        period_to: DateTime<FixedOffset>,
        total_free_count: u64,
        used_count: u64,
        /// Fee charged, as the registry's decimal string
        price: String,
    },
    /// Domain is about to expire (domain impendingExpData)
    ImpendingExpiration { name: String, ex_date: NaiveDate },
    /// Domain expired (domain expData)
    Expiration { name: String, ex_date: NaiveDate },
}

impl PollMessage {
    /// Extracts a typed message from the payload element inside `<msg>`
    ///
    /// Returns None for message kinds this client does not model.
    pub fn extract(payload: &Node, ns: &NamespaceConfig) -> Result<Option<PollMessage>> {
        let fred = ns.fred.uri.as_str();
        let domain = ns.domain.uri.as_str();

        let message = if payload.is(fred, "lowCreditData") {
            Some(PollMessage::LowCredit {
                zone: required(payload, fred, &["zone"])?,
                credit_zone: required(payload, fred, &["credit", "zone"])?,
                credit: required(payload, fred, &["credit", "credit"])?,
                limit_zone: required(payload, fred, &["limit", "zone"])?,
                limit: required(payload, fred, &["limit", "credit"])?,
            })
        } else if payload.is(fred, "requestFeeInfoData") {
            Some(PollMessage::RequestUsage {
                period_from: parse_datetime(&required(payload, fred, &["periodFrom"])?)?,
                period_to: parse_datetime(&required(payload, fred, &["periodTo"])?)?,
                total_free_count: count(payload, fred, "totalFreeCount")?,
                used_count: count(payload, fred, "usedCount")?,
                price: required(payload, fred, &["price"])?,
            })
        } else if payload.is(domain, "impendingExpData") {
            Some(PollMessage::ImpendingExpiration {
                name: required(payload, domain, &["name"])?,
                ex_date: parse_date(&required(payload, domain, &["exDate"])?)?,
            })
        } else if payload.is(domain, "expData") {
            Some(PollMessage::Expiration {
                name: required(payload, domain, &["name"])?,
                ex_date: parse_date(&required(payload, domain, &["exDate"])?)?,
            })
        } else {
            warn!(ns = %payload.ns, tag = %payload.tag, "ignoring unknown poll message");
            None
        };
        Ok(message)
    }
}

fn required(node: &Node, uri: &str, path: &[&str]) -> Result<String> {
    node.text_of(uri, path).map(str::to_string).ok_or_else(|| {
        Error::parse(
            format!("poll message has no {} element", path.join("/")),
            Vec::new(),
        )
    })
}

fn count(node: &Node, uri: &str, tag: &str) -> Result<u64> {
    required(node, uri, &[tag])?
        .parse()
        .map_err(|e| Error::parse(format!("bad {}: {}", tag, e), Vec::new()))
}
