use crate::core::{
    NamespaceConfig, Result, NAMESPACE_EPP, NAMESPACE_XSI, PROTOCOL_VERSION, SCHEMA_LOCATION_EPP,
};
use crate::response::{NoResData, ResData};
use crate::xml::Element;

/// A typed EPP request
///
/// Implementations declare the child of the `<epp>` root; the associated type
/// names the payload parsed out of the reply's `<resData>`.
pub trait Request {
    /// Typed payload of the reply
    type Data: ResData;

    /// Declares the request payload under the `<epp>` root
    fn epp_payload(&self, ns: &NamespaceConfig, tr_id: Option<&str>) -> Result<Element>;

    /// True for the login command, the only one accepted before authentication
    fn is_login(&self) -> bool {
        false
    }

    /// True for commands that end the session whatever the outcome
    fn ends_session(&self) -> bool {
        false
    }
}

/// Wraps a payload in the `<epp>` root with its schema location
pub fn epp_document(payload: Element) -> Element {
    Element::new(NAMESPACE_EPP, "epp")
        .attr_ns(NAMESPACE_XSI, "schemaLocation", SCHEMA_LOCATION_EPP)
        .child(payload)
}

/// Wraps a command payload in `<command>`, appending extension and clTRID
pub(crate) fn command_wrapper(
    payload: Element,
    extension: Option<Element>,
    tr_id: Option<&str>,
) -> Element {
    let mut command = Element::new(NAMESPACE_EPP, "command").child(payload);
    if let Some(extension) = extension {
        command = command.child(Element::new(NAMESPACE_EPP, "extension").child(extension));
    }
    if let Some(tr_id) = tr_id {
        command = command.child(Element::leaf(NAMESPACE_EPP, "clTRID", tr_id));
    }
    command
}

/// Wraps a registry extension command in `<extension><fred:extcommand>`
///
/// Unlike core commands the transaction id lives inside `fred:extcommand`.
pub(crate) fn extcommand_wrapper(
    payload: Element,
    ns: &NamespaceConfig,
    tr_id: Option<&str>,
) -> Element {
    let uri = ns.fred.uri.clone();
    let mut extcommand = Element::new(uri.clone(), "extcommand")
        .attr_ns(NAMESPACE_XSI, "schemaLocation", ns.fred.schema_location.clone())
        .child(payload);
    if let Some(tr_id) = tr_id {
        extcommand = extcommand.child(Element::leaf(uri, "clTRID", tr_id));
    }
    Element::new(NAMESPACE_EPP, "extension").child(extcommand)
}

/// EPP hello, answered by a fresh greeting
///
/// Hello is the one request that never carries a transaction id; it is issued by
/// the session client directly and bypasses the [`Request`] machinery because its
/// reply is a greeting, not a result.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hello;

impl Hello {
    /// Declares the hello payload
    pub fn epp_payload(&self) -> Element {
        Element::new(NAMESPACE_EPP, "hello")
    }
}

/// EPP login command
#[derive(Debug, Clone)]
pub struct Login {
    /// Registrar id (clID)
    pub cl_id: String,
    /// Password (pw)
    pub password: String,
    /// New password to set during login (newPW)
    pub new_password: Option<String>,
    /// Protocol version announced in options
    pub version: String,
    /// Response language announced in options
    pub lang: String,
    /// Object namespace URIs the session will use (svcs/objURI)
    pub obj_uris: Vec<String>,
    /// Extension namespace URIs the session will use (svcs/svcExtension/extURI)
    pub ext_uris: Vec<String>,
}

impl Login {
    /// Creates a login announcing every namespace of the active table
    pub fn new(cl_id: impl Into<String>, password: impl Into<String>, ns: &NamespaceConfig) -> Self {
        Login {
            cl_id: cl_id.into(),
            password: password.into(),
            new_password: None,
            version: PROTOCOL_VERSION.to_string(),
            lang: "en".to_string(),
            obj_uris: ns.obj_uris(),
            ext_uris: ns.ext_uris(),
        }
    }
}

impl Request for Login {
    type Data = NoResData;

    fn epp_payload(&self, _ns: &NamespaceConfig, tr_id: Option<&str>) -> Result<Element> {
        let mut login = Element::new(NAMESPACE_EPP, "login")
            .child(Element::leaf(NAMESPACE_EPP, "clID", self.cl_id.clone()))
            .child(Element::leaf(NAMESPACE_EPP, "pw", self.password.clone()));
        if let Some(new_password) = &self.new_password {
            login = login.child(Element::leaf(NAMESPACE_EPP, "newPW", new_password.clone()));
        }
        login = login.child(
            Element::new(NAMESPACE_EPP, "options")
                .child(Element::leaf(NAMESPACE_EPP, "version", self.version.clone()))
                .child(Element::leaf(NAMESPACE_EPP, "lang", self.lang.clone())),
        );

        let mut svcs = Element::new(NAMESPACE_EPP, "svcs").children(
            self.obj_uris
                .iter()
                .map(|uri| Element::leaf(NAMESPACE_EPP, "objURI", uri.clone())),
        );
        if !self.ext_uris.is_empty() {
            svcs = svcs.child(
                Element::new(NAMESPACE_EPP, "svcExtension").children(
                    self.ext_uris
                        .iter()
                        .map(|uri| Element::leaf(NAMESPACE_EPP, "extURI", uri.clone())),
                ),
            );
        }
        login = login.child(svcs);

        Ok(command_wrapper(login, None, tr_id))
    }

    fn is_login(&self) -> bool {
        true
    }
}

/// EPP logout command
#[derive(Debug, Clone, Copy, Default)]
pub struct Logout;

impl Request for Logout {
    type Data = NoResData;

    fn epp_payload(&self, _ns: &NamespaceConfig, tr_id: Option<&str>) -> Result<Element> {
        Ok(command_wrapper(
            Element::new(NAMESPACE_EPP, "logout"),
            None,
            tr_id,
        ))
    }

    fn ends_session(&self) -> bool {
        true
    }
}

/// EPP poll request, fetching the head of the message queue
#[derive(Debug, Clone, Copy, Default)]
pub struct PollRequest;

impl Request for PollRequest {
    type Data = NoResData;

    fn epp_payload(&self, _ns: &NamespaceConfig, tr_id: Option<&str>) -> Result<Element> {
        Ok(command_wrapper(
            Element::new(NAMESPACE_EPP, "poll").attr("op", "req"),
            None,
            tr_id,
        ))
    }
}

/// EPP poll acknowledgement, dequeuing one message
#[derive(Debug, Clone)]
pub struct PollAck {
    /// Identifier of the message being acknowledged
    pub msg_id: String,
}

impl PollAck {
    /// Creates an acknowledgement for a message id
    pub fn new(msg_id: impl Into<String>) -> Self {
        PollAck {
            msg_id: msg_id.into(),
        }
    }
}

impl Request for PollAck {
    type Data = NoResData;

    fn epp_payload(&self, _ns: &NamespaceConfig, tr_id: Option<&str>) -> Result<Element> {
        Ok(command_wrapper(
            Element::new(NAMESPACE_EPP, "poll")
                .attr("op", "ack")
                .attr("msgID", self.msg_id.clone()),
            None,
            tr_id,
        ))
    }
}
