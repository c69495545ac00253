use chrono::{DateTime, FixedOffset, NaiveDate};
use tracing::warn;

use crate::core::{Error, NamespaceConfig, Result, NAMESPACE_EPP};
use crate::response::poll::PollMessage;
use crate::xml::parse::{self, parse_bool_token, parse_date, parse_datetime};
use crate::xml::Node;

/// Typed payload extracted from the `<resData>` block of a response
pub trait ResData: Sized + std::fmt::Debug {
    /// Locates and extracts every payload item under `<resData>`
    fn extract(res_data: &Node, ns: &NamespaceConfig) -> Result<Vec<Self>>;
}

/// Payload of commands whose responses never carry `<resData>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoResData {}

impl ResData for NoResData {
    fn extract(_res_data: &Node, _ns: &NamespaceConfig) -> Result<Vec<Self>> {
        Ok(Vec::new())
    }
}

/// One entry of the `<extValue>` diagnostic list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtValue {
    /// Offending value as reported by the server
    pub value: String,
    /// Human-readable reason
    pub reason: String,
}

/// One `<result>` entry of a response
///
/// A single reply may carry several entries, e.g. when a command touches
/// multiple objects and only some of them fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultEntry {
    /// Four-digit result code
    pub code: u16,
    /// Message accompanying the code
    pub msg: String,
    /// Offending values, when the server reports any
    pub values: Vec<String>,
    /// Extended diagnostics, when the server reports any
    pub ext_values: Vec<ExtValue>,
}

impl ResultEntry {
    /// True for codes in the 1000-1999 success range
    pub fn is_success(&self) -> bool {
        (1000..2000).contains(&self.code)
    }

    fn extract(node: &Node) -> Result<ResultEntry> {
        let code = node
            .attr("code")
            .ok_or_else(|| Error::parse("result element has no code attribute", Vec::new()))?
            .parse::<u16>()
            .map_err(|e| Error::parse(format!("bad result code: {}", e), Vec::new()))?;
        let msg = node
            .text_of(NAMESPACE_EPP, &["msg"])
            .ok_or_else(|| Error::parse("result element has no msg element", Vec::new()))?
            .to_string();

        let values = node
            .find_all(NAMESPACE_EPP, &["value"])
            .into_iter()
            .map(flatten_value)
            .collect();
        let ext_values = node
            .find_all(NAMESPACE_EPP, &["extValue"])
            .into_iter()
            .map(|ext| ExtValue {
                value: ext
                    .find(NAMESPACE_EPP, &["value"])
                    .map(flatten_value)
                    .unwrap_or_default(),
                reason: ext
                    .text_of(NAMESPACE_EPP, &["reason"])
                    .unwrap_or_default()
                    .to_string(),
            })
            .collect();

        Ok(ResultEntry {
            code,
            msg,
            values,
            ext_values,
        })
    }
}

/// A value element wraps one namespaced child naming the offending element.
fn flatten_value(value: &Node) -> String {
    match value.children.first() {
        Some(child) if !child.text.is_empty() => format!("{}: {}", child.tag, child.text),
        Some(child) => child.tag.clone(),
        None => value.text.clone(),
    }
}

/// Extension blocks understood on responses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseExtension {
    /// ENUM validation state on domain responses (enumval)
    EnumValidation {
        /// Validation expiration date
        val_ex_date: Option<NaiveDate>,
        /// Whether the number is published in the public directory
        publish: Option<bool>,
    },
}

impl ResponseExtension {
    fn extract_all(extension: &Node, ns: &NamespaceConfig) -> Result<Vec<ResponseExtension>> {
        let mut extensions = Vec::new();
        for child in &extension.children {
            if child.ns == ns.enumval.uri {
                let val_ex_date = child
                    .text_of(&ns.enumval.uri, &["valExDate"])
                    .map(parse_date)
                    .transpose()?;
                let publish = child
                    .text_of(&ns.enumval.uri, &["publish"])
                    .map(parse_bool_token)
                    .transpose()?;
                extensions.push(ResponseExtension::EnumValidation {
                    val_ex_date,
                    publish,
                });
            } else {
                warn!(ns = %child.ns, tag = %child.tag, "ignoring unknown response extension");
            }
        }
        Ok(extensions)
    }
}

/// The `<msgQ>` block announcing queued service messages
#[derive(Debug, Clone, PartialEq)]
pub struct MsgQ {
    /// Number of queued messages
    pub count: Option<u64>,
    /// Identifier of the message at the head of the queue
    pub id: Option<String>,
    /// Time the head message was enqueued
    pub q_date: Option<DateTime<FixedOffset>>,
    /// Typed head message, when delivered and recognized
    pub message: Option<PollMessage>,
}

impl MsgQ {
    fn extract(node: &Node, ns: &NamespaceConfig) -> Result<MsgQ> {
        let count = node
            .attr("count")
            .map(|c| {
                c.parse::<u64>()
                    .map_err(|e| Error::parse(format!("bad msgQ count: {}", e), Vec::new()))
            })
            .transpose()?;
        let id = node.attr("id").map(str::to_string);
        let q_date = node
            .text_of(NAMESPACE_EPP, &["qDate"])
            .map(parse_datetime)
            .transpose()?;
        let message = match node.find(NAMESPACE_EPP, &["msg"]) {
            Some(msg) => match msg.children.first() {
                Some(payload) => PollMessage::extract(payload, ns)?,
                None => None,
            },
            None => None,
        };
        Ok(MsgQ {
            count,
            id,
            q_date,
            message,
        })
    }
}

/// Decoded reply to one EPP command
#[derive(Debug, Clone)]
pub struct Response<T> {
    /// Result entries; never empty on a successfully decoded response
    pub results: Vec<ResultEntry>,
    /// Echo of the client transaction id
    pub cl_tr_id: Option<String>,
    /// Server transaction id
    pub sv_tr_id: Option<String>,
    /// Typed payload items from `<resData>`
    pub res_data: Vec<T>,
    /// Recognized extension blocks
    pub extensions: Vec<ResponseExtension>,
    /// Queued-message announcement
    pub msg_q: Option<MsgQ>,
}

impl<T: ResData> Response<T> {
    /// Parses a raw reply frame
    ///
    /// Protocol-level failure codes (2xxx) decode into ordinary responses;
    /// only structural defects raise errors, with the raw payload attached.
    pub fn parse(raw: &[u8], ns: &NamespaceConfig) -> Result<Response<T>> {
        let root = parse::parse(raw)?;
        Self::from_node(&root, ns).map_err(|e| e.with_raw(raw))
    }

    fn from_node(root: &Node, ns: &NamespaceConfig) -> Result<Response<T>> {
        if !root.is(NAMESPACE_EPP, "epp") {
            return Err(Error::parse(
                format!("root element has to be epp, found {}", root.tag),
                Vec::new(),
            ));
        }
        let response = root.find(NAMESPACE_EPP, &["response"]).ok_or_else(|| {
            let found = root
                .children
                .first()
                .map(|c| c.tag.clone())
                .unwrap_or_else(|| "nothing".to_string());
            Error::parse(
                format!("expected response element, found {}", found),
                Vec::new(),
            )
        })?;

        let result_nodes = response.find_all(NAMESPACE_EPP, &["result"]);
        if result_nodes.is_empty() {
            return Err(Error::empty_response(Vec::new()));
        }
        let results = result_nodes
            .into_iter()
            .map(ResultEntry::extract)
            .collect::<Result<Vec<_>>>()?;

        let cl_tr_id = response
            .text_of(NAMESPACE_EPP, &["trID", "clTRID"])
            .map(str::to_string);
        let sv_tr_id = response
            .text_of(NAMESPACE_EPP, &["trID", "svTRID"])
            .map(str::to_string);

        let res_data = match response.find(NAMESPACE_EPP, &["resData"]) {
            Some(res_data) => T::extract(res_data, ns)?,
            None => Vec::new(),
        };
        let extensions = match response.find(NAMESPACE_EPP, &["extension"]) {
            Some(extension) => ResponseExtension::extract_all(extension, ns)?,
            None => Vec::new(),
        };
        let msg_q = response
            .find(NAMESPACE_EPP, &["msgQ"])
            .map(|node| MsgQ::extract(node, ns))
            .transpose()?;

        Ok(Response {
            results,
            cl_tr_id,
            sv_tr_id,
            res_data,
            extensions,
            msg_q,
        })
    }

    /// Code of the first result entry
    pub fn code(&self) -> u16 {
        self.results.first().map(|r| r.code).unwrap_or_default()
    }

    /// Message of the first result entry
    pub fn msg(&self) -> &str {
        self.results.first().map(|r| r.msg.as_str()).unwrap_or("")
    }

    /// True when the first result code is in the success range
    pub fn is_success(&self) -> bool {
        self.results.first().is_some_and(ResultEntry::is_success)
    }

    /// First payload item, the common case for single-object queries
    pub fn first(&self) -> Option<&T> {
        self.res_data.first()
    }
}

/// Data collection statement from the greeting's dcp block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// Purposes the data is collected for
    pub purpose: Vec<String>,
    /// Recipient classes the data may be shared with
    pub recipient: Vec<String>,
    /// Retention policy
    pub retention: Option<String>,
}

/// Expiry of the greeting's data collection policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GreetingExpiry {
    /// Fixed point in time
    Absolute(DateTime<FixedOffset>),
    /// Schema duration, kept verbatim since calendar-relative durations have
    /// no fixed length
    Relative(String),
}

/// The unsolicited server greeting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Greeting {
    /// Server id
    pub sv_id: String,
    /// Server time
    pub sv_date: DateTime<FixedOffset>,
    /// Protocol versions the server speaks
    pub versions: Vec<String>,
    /// Response languages on offer
    pub langs: Vec<String>,
    /// Advertised object namespace URIs
    pub obj_uris: Vec<String>,
    /// Advertised extension namespace URIs
    pub ext_uris: Vec<String>,
    /// Data collection access policy
    pub access: Option<String>,
    /// Data collection statements
    pub statements: Vec<Statement>,
    /// Data collection policy expiry
    pub expiry: Option<GreetingExpiry>,
}

impl Greeting {
    /// Parses a raw greeting frame
    pub fn parse(raw: &[u8]) -> Result<Greeting> {
        let root = parse::parse(raw)?;
        Self::from_node(&root).map_err(|e| e.with_raw(raw))
    }

    fn from_node(root: &Node) -> Result<Greeting> {
        if !root.is(NAMESPACE_EPP, "epp") {
            return Err(Error::parse(
                format!("root element has to be epp, found {}", root.tag),
                Vec::new(),
            ));
        }
        let greeting = root
            .find(NAMESPACE_EPP, &["greeting"])
            .ok_or_else(|| Error::parse("expected greeting element", Vec::new()))?;

        let sv_id = greeting
            .text_of(NAMESPACE_EPP, &["svID"])
            .ok_or_else(|| Error::parse("greeting has no svID element", Vec::new()))?
            .to_string();
        let sv_date = parse_datetime(
            greeting
                .text_of(NAMESPACE_EPP, &["svDate"])
                .ok_or_else(|| Error::parse("greeting has no svDate element", Vec::new()))?,
        )?;

        let statements = greeting
            .find_all(NAMESPACE_EPP, &["dcp", "statement"])
            .into_iter()
            .map(|statement| Statement {
                purpose: statement
                    .find(NAMESPACE_EPP, &["purpose"])
                    .map(|n| n.child_names().iter().map(|s| s.to_string()).collect())
                    .unwrap_or_default(),
                recipient: statement
                    .find(NAMESPACE_EPP, &["recipient"])
                    .map(|n| n.child_names().iter().map(|s| s.to_string()).collect())
                    .unwrap_or_default(),
                retention: statement
                    .find(NAMESPACE_EPP, &["retention"])
                    .and_then(|n| n.children.first())
                    .map(|n| n.tag.clone()),
            })
            .collect();

        Ok(Greeting {
            sv_id,
            sv_date,
            versions: greeting.text_all(NAMESPACE_EPP, &["svcMenu", "version"]),
            langs: greeting.text_all(NAMESPACE_EPP, &["svcMenu", "lang"]),
            obj_uris: greeting.text_all(NAMESPACE_EPP, &["svcMenu", "objURI"]),
            ext_uris: greeting.text_all(NAMESPACE_EPP, &["svcMenu", "svcExtension", "extURI"]),
            access: greeting
                .find(NAMESPACE_EPP, &["dcp", "access"])
                .and_then(|n| n.children.first())
                .map(|n| n.tag.clone()),
            statements,
            expiry: Self::extract_expiry(greeting)?,
        })
    }

    fn extract_expiry(greeting: &Node) -> Result<Option<GreetingExpiry>> {
        let Some(expiry) = greeting.find(NAMESPACE_EPP, &["dcp", "expiry"]) else {
            return Ok(None);
        };
        let inner = expiry
            .children
            .first()
            .ok_or_else(|| Error::parse("expiry element is empty", Vec::new()))?;
        match inner.tag.as_str() {
            "absolute" => Ok(Some(GreetingExpiry::Absolute(parse_datetime(&inner.text)?))),
            "relative" => Ok(Some(GreetingExpiry::Relative(inner.text.clone()))),
            other => Err(Error::parse(
                format!("expected expiry specification, found {}", other),
                Vec::new(),
            )),
        }
    }

    /// True when the server advertises the object namespace
    pub fn supports_object(&self, uri: &str) -> bool {
        self.obj_uris.iter().any(|u| u == uri)
    }

    /// True when the server advertises the extension namespace
    pub fn supports_extension(&self, uri: &str) -> bool {
        self.ext_uris.iter().any(|u| u == uri)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Greeting fixture shared with the client tests
    pub(crate) const GREETING: &[u8] = br#"<?xml version="1.0" encoding="UTF-8"?>
        <epp xmlns="urn:ietf:params:xml:ns:epp-1.0">
          <greeting>
            <svID>EPP server (DSDng)</svID>
            <svDate>2018-05-15T21:05:57+02:00</svDate>
            <svcMenu>
              <version>1.0</version>
              <lang>en</lang>
              <lang>cs</lang>
              <objURI>http://www.nic.cz/xml/epp/contact-1.6</objURI>
              <objURI>http://www.nic.cz/xml/epp/domain-1.4</objURI>
              <objURI>http://www.nic.cz/xml/epp/nsset-1.2</objURI>
              <objURI>http://www.nic.cz/xml/epp/keyset-1.3</objURI>
              <svcExtension>
                <extURI>http://www.nic.cz/xml/epp/enumval-1.2</extURI>
              </svcExtension>
            </svcMenu>
            <dcp>
              <access><all/></access>
              <statement>
                <purpose><admin/><prov/></purpose>
                <recipient><public/></recipient>
                <retention><stated/></retention>
              </statement>
            </dcp>
          </greeting>
        </epp>"#;

    fn ns() -> NamespaceConfig {
        NamespaceConfig::fred()
    }

    fn response_frame(body: &str) -> Vec<u8> {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
            <epp xmlns="urn:ietf:params:xml:ns:epp-1.0">
              <response>{}</response>
            </epp>"#,
            body
        )
        .into_bytes()
    }

    #[test]
    fn test_parse_plain_result() {
        let raw = response_frame(
            r#"<result code="1000"><msg>Command completed successfully</msg></result>
               <trID><clTRID>abc-1</clTRID><svTRID>S-1</svTRID></trID>"#,
        );
        let response: Response<NoResData> = Response::parse(&raw, &ns()).unwrap();

        assert_eq!(response.code(), 1000);
        assert!(response.is_success());
        assert_eq!(response.msg(), "Command completed successfully");
        assert_eq!(response.cl_tr_id.as_deref(), Some("abc-1"));
        assert_eq!(response.sv_tr_id.as_deref(), Some("S-1"));
        assert!(response.res_data.is_empty());
        assert!(response.msg_q.is_none());
    }

    #[test]
    fn test_failure_code_is_a_valid_response() {
        let raw = response_frame(r#"<result code="2303"><msg>Object does not exist</msg></result>"#);
        let response: Response<NoResData> = Response::parse(&raw, &ns()).unwrap();

        assert!(!response.is_success());
        assert_eq!(response.code(), 2303);
    }

    #[test]
    fn test_multiple_result_entries() {
        let raw = response_frame(
            r#"<result code="2306"><msg>Parameter policy error</msg></result>
               <result code="2308"><msg>Data management violation</msg></result>"#,
        );
        let response: Response<NoResData> = Response::parse(&raw, &ns()).unwrap();

        assert_eq!(response.results.len(), 2);
        assert_eq!(response.results[1].code, 2308);
    }

    #[test]
    fn test_empty_response_is_distinct_error() {
        let raw = response_frame("");
        let err = Response::<NoResData>::parse(&raw, &ns()).unwrap_err();

        assert!(matches!(err, Error::EmptyResponse { .. }));
        assert_eq!(err.raw_response(), Some(raw.as_slice()));
    }

    #[test]
    fn test_missing_response_element_is_parse_error() {
        let err = Response::<NoResData>::parse(GREETING, &ns()).unwrap_err();

        match err {
            Error::Parse { message, .. } => assert!(message.contains("greeting")),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_result_without_code_is_parse_error() {
        let raw = response_frame(r#"<result><msg>missing code</msg></result>"#);

        assert!(matches!(
            Response::<NoResData>::parse(&raw, &ns()),
            Err(Error::Parse { .. })
        ));
    }

    #[test]
    fn test_ext_values_extracted() {
        let raw = response_frame(
            r#"<result code="2004">
                 <msg>Parameter value range error</msg>
                 <extValue>
                   <value><domain:period xmlns:domain="http://www.nic.cz/xml/epp/domain-1.4">99</domain:period></value>
                   <reason>period out of range</reason>
                 </extValue>
               </result>"#,
        );
        let response: Response<NoResData> = Response::parse(&raw, &ns()).unwrap();

        let entry = &response.results[0];
        assert_eq!(entry.ext_values.len(), 1);
        assert_eq!(entry.ext_values[0].reason, "period out of range");
        assert_eq!(entry.ext_values[0].value, "period: 99");
    }

    #[test]
    fn test_msg_q_without_payload() {
        let raw = response_frame(
            r#"<result code="1301"><msg>Command completed successfully; ack to dequeue</msg></result>
               <msgQ count="5" id="12345"><qDate>2017-07-15T14:51:47+02:00</qDate></msgQ>"#,
        );
        let response: Response<NoResData> = Response::parse(&raw, &ns()).unwrap();

        let msg_q = response.msg_q.unwrap();
        assert_eq!(msg_q.count, Some(5));
        assert_eq!(msg_q.id.as_deref(), Some("12345"));
        assert!(msg_q.q_date.is_some());
        assert!(msg_q.message.is_none());
    }

    #[test]
    fn test_enumval_response_extension() {
        let raw = response_frame(
            r#"<result code="1000"><msg>ok</msg></result>
               <extension>
                 <enumval:infData xmlns:enumval="http://www.nic.cz/xml/epp/enumval-1.2">
                   <enumval:valExDate>2022-05-01</enumval:valExDate>
                   <enumval:publish>1</enumval:publish>
                 </enumval:infData>
               </extension>"#,
        );
        let response: Response<NoResData> = Response::parse(&raw, &ns()).unwrap();

        assert_eq!(
            response.extensions,
            vec![ResponseExtension::EnumValidation {
                val_ex_date: NaiveDate::from_ymd_opt(2022, 5, 1),
                publish: Some(true),
            }]
        );
    }

    #[test]
    fn test_unknown_response_extension_is_skipped() {
        let raw = response_frame(
            r#"<result code="1000"><msg>ok</msg></result>
               <extension>
                 <mystery:data xmlns:mystery="urn:example:mystery-1.0"/>
               </extension>"#,
        );
        let response: Response<NoResData> = Response::parse(&raw, &ns()).unwrap();

        assert!(response.extensions.is_empty());
    }

    #[test]
    fn test_greeting_parse() {
        let greeting = Greeting::parse(GREETING).unwrap();

        assert_eq!(greeting.sv_id, "EPP server (DSDng)");
        assert_eq!(greeting.versions, vec!["1.0"]);
        assert_eq!(greeting.langs, vec!["en", "cs"]);
        assert_eq!(greeting.obj_uris.len(), 4);
        assert!(greeting.supports_object("http://www.nic.cz/xml/epp/domain-1.4"));
        assert!(greeting.supports_extension("http://www.nic.cz/xml/epp/enumval-1.2"));
        assert!(!greeting.supports_object("urn:example:unknown"));
        assert_eq!(greeting.access.as_deref(), Some("all"));

        let statement = &greeting.statements[0];
        assert_eq!(statement.purpose, vec!["admin", "prov"]);
        assert_eq!(statement.recipient, vec!["public"]);
        assert_eq!(statement.retention.as_deref(), Some("stated"));
        assert!(greeting.expiry.is_none());
    }

    #[test]
    fn test_greeting_expiry_forms() {
        let absolute = GREETING.to_vec();
        let absolute = String::from_utf8(absolute).unwrap().replace(
            "</dcp>",
            "<expiry><absolute>2021-05-04T03:14:15+00:00</absolute></expiry></dcp>",
        );
        let greeting = Greeting::parse(absolute.as_bytes()).unwrap();
        assert!(matches!(greeting.expiry, Some(GreetingExpiry::Absolute(_))));

        let relative = String::from_utf8(GREETING.to_vec())
            .unwrap()
            .replace("</dcp>", "<expiry><relative>P1Y</relative></expiry></dcp>");
        let greeting = Greeting::parse(relative.as_bytes()).unwrap();
        assert_eq!(
            greeting.expiry,
            Some(GreetingExpiry::Relative("P1Y".to_string()))
        );
    }

    #[test]
    fn test_greeting_requires_server_id() {
        let broken = String::from_utf8(GREETING.to_vec())
            .unwrap()
            .replace("<svID>EPP server (DSDng)</svID>", "");
        let err = Greeting::parse(broken.as_bytes()).unwrap_err();

        assert!(matches!(err, Error::Parse { .. }));
    }
}
