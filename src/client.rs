//! EPP session client
//!
//! Orchestrates one EPP conversation over an owned transport: connect and read
//! the unsolicited greeting, log in, exchange strictly one command per
//! round-trip, and tear the connection down on logout or close no matter how the
//! round-trip went.

use rand::Rng;
use tracing::{debug, warn};

use crate::command::base::{epp_document, Hello, Request};
use crate::core::{Error, NamespaceConfig, Result};
use crate::protocol::state::{SessionOp, SessionState};
use crate::protocol::transport::Transport;
use crate::response::{Greeting, Response};
use crate::xml::serialize_document;

/// One raw frame crossing the wire, passed to the diagnostic hook
#[derive(Debug)]
pub enum WireEvent<'a> {
    /// Frame sent to the server
    Sent(&'a [u8]),
    /// Frame received from the server
    Received(&'a [u8]),
}

/// Diagnostic hook receiving every raw frame, e.g. for audit logging
pub type WireHook = Box<dyn FnMut(WireEvent<'_>) + Send>;

/// A client to send EPP commands and receive responses
///
/// The client exclusively owns the transport and the session state; the
/// protocol is strictly half-duplex, so one client must not be driven from
/// several threads without external serialization.
pub struct EppClient<T: Transport> {
    transport: T,
    namespaces: NamespaceConfig,
    state: SessionState,
    greeting: Option<Greeting>,
    tr_id_prefix: String,
    tr_id_counter: u64,
    wire_hook: Option<WireHook>,
}

impl<T: Transport> EppClient<T> {
    /// Creates a client over a transport and a namespace table
    pub fn new(transport: T, namespaces: NamespaceConfig) -> Self {
        const CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
        let mut rng = rand::thread_rng();
        let tr_id_prefix: String = (0..6)
            .map(|_| CHARS[rng.gen_range(0..CHARS.len())] as char)
            .collect();

        EppClient {
            transport,
            namespaces,
            state: SessionState::Disconnected,
            greeting: None,
            tr_id_prefix,
            tr_id_counter: 0,
            wire_hook: None,
        }
    }

    /// Installs a hook observing every raw frame
    pub fn set_wire_hook(&mut self, hook: WireHook) {
        self.wire_hook = Some(hook);
    }

    /// Current session state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The last greeting received from the server
    pub fn greeting(&self) -> Option<&Greeting> {
        self.greeting.as_ref()
    }

    /// Opens the connection and reads the server's unsolicited greeting
    ///
    /// On any failure the transport is closed again and the session stays
    /// disconnected; a partially-open session is never exposed.
    pub fn connect(&mut self) -> Result<()> {
        self.state.check(SessionOp::Connect)?;
        self.transport.connect()?;

        match self.receive_greeting() {
            Ok(greeting) => {
                self.warn_on_namespace_disagreement(&greeting);
                self.greeting = Some(greeting);
                self.state = SessionState::Connected;
                debug!("session connected");
                Ok(())
            }
            Err(error) => {
                self.transport.close();
                Err(error)
            }
        }
    }

    /// Re-fetches the greeting with an EPP hello
    pub fn hello(&mut self) -> Result<Greeting> {
        self.state.check(SessionOp::Hello)?;
        let frame = serialize_document(&epp_document(Hello.epp_payload()), &self.namespaces)?;
        self.roundtrip_frame(&frame)?;

        let raw = match self.transport.read_frame() {
            Ok(raw) => raw,
            Err(error) => {
                self.teardown();
                return Err(error);
            }
        };
        self.observe(WireEvent::Received(&raw));
        let greeting = Greeting::parse(&raw)?;
        self.greeting = Some(greeting.clone());
        Ok(greeting)
    }

    /// Sends one command and blocks for its response
    ///
    /// A fresh client transaction id is attached and its echo verified; an
    /// out-of-order reply is a protocol-integrity error. A successful login
    /// authenticates the session; a session-ending command tears the
    /// connection down whatever the outcome.
    pub fn send<R: Request>(&mut self, request: &R) -> Result<Response<R::Data>> {
        let op = if request.is_login() {
            SessionOp::Login
        } else if request.ends_session() {
            SessionOp::Logout
        } else {
            SessionOp::Command
        };
        self.state.check(op)?;

        let tr_id = self.next_tr_id();
        let payload = request.epp_payload(&self.namespaces, Some(&tr_id))?;
        let frame = serialize_document(&epp_document(payload), &self.namespaces)?;

        let outcome = self.exchange(request, &frame, &tr_id);
        if request.ends_session() {
            self.teardown();
        }
        outcome
    }

    /// Closes the session unconditionally; safe to call repeatedly
    pub fn close(&mut self) {
        self.teardown();
    }

    fn exchange<R: Request>(
        &mut self,
        request: &R,
        frame: &[u8],
        tr_id: &str,
    ) -> Result<Response<R::Data>> {
        self.roundtrip_frame(frame)?;
        let raw = match self.transport.read_frame() {
            Ok(raw) => raw,
            Err(error) => {
                self.teardown();
                return Err(error);
            }
        };
        self.observe(WireEvent::Received(&raw));

        let response = Response::parse(&raw, &self.namespaces)?;
        if response.cl_tr_id.as_deref() != Some(tr_id) {
            return Err(Error::sequence(format!(
                "clTRID mismatch: sent {:?}, response echoes {:?}",
                tr_id, response.cl_tr_id
            )));
        }

        if request.is_login() && response.is_success() {
            self.state = SessionState::Authenticated;
            debug!("session authenticated");
        }
        Ok(response)
    }

    /// Writes one frame; a transport failure is fatal to the session
    fn roundtrip_frame(&mut self, frame: &[u8]) -> Result<()> {
        self.observe(WireEvent::Sent(frame));
        debug!(bytes = frame.len(), "sending frame");
        if let Err(error) = self.transport.write_frame(frame) {
            self.teardown();
            return Err(error);
        }
        Ok(())
    }

    fn receive_greeting(&mut self) -> Result<Greeting> {
        let raw = self.transport.read_frame()?;
        self.observe(WireEvent::Received(&raw));
        Greeting::parse(&raw)
    }

    fn teardown(&mut self) {
        self.transport.close();
        self.state = SessionState::Disconnected;
    }

    fn next_tr_id(&mut self) -> String {
        self.tr_id_counter += 1;
        format!("{}-{}", self.tr_id_prefix, self.tr_id_counter)
    }

    fn warn_on_namespace_disagreement(&self, greeting: &Greeting) {
        for uri in self.namespaces.obj_uris() {
            if !greeting.supports_object(&uri) {
                warn!(%uri, "configured object namespace not advertised by server");
            }
        }
        for uri in self.namespaces.ext_uris() {
            if !greeting.supports_extension(&uri) {
                warn!(%uri, "configured extension namespace not advertised by server");
            }
        }
    }

    fn observe(&mut self, event: WireEvent<'_>) {
        if let Some(hook) = &mut self.wire_hook {
            hook(event);
        }
    }
}

impl<T: Transport> Drop for EppClient<T> {
    fn drop(&mut self) {
        self.transport.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{CheckDomain, Login, Logout};
    use crate::response::base::tests::GREETING;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    const LOGIN_OK: &str = r#"<?xml version="1.0"?>
        <epp xmlns="urn:ietf:params:xml:ns:epp-1.0">
          <response>
            <result code="1000"><msg>Command completed successfully</msg></result>
            <trID><clTRID>{clTRID}</clTRID><svTRID>S-1</svTRID></trID>
          </response>
        </epp>"#;

    const LOGIN_FAILED: &str = r#"<?xml version="1.0"?>
        <epp xmlns="urn:ietf:params:xml:ns:epp-1.0">
          <response>
            <result code="2200"><msg>Authentication error</msg></result>
            <trID><clTRID>{clTRID}</clTRID><svTRID>S-1</svTRID></trID>
          </response>
        </epp>"#;

    const CHECK_OK: &str = r#"<?xml version="1.0"?>
        <epp xmlns="urn:ietf:params:xml:ns:epp-1.0">
          <response>
            <result code="1000"><msg>ok</msg></result>
            <resData>
              <domain:chkData xmlns:domain="http://www.nic.cz/xml/epp/domain-1.4">
                <domain:cd><domain:name avail="1">free.cz</domain:name></domain:cd>
              </domain:chkData>
            </resData>
            <trID><clTRID>{clTRID}</clTRID><svTRID>S-2</svTRID></trID>
          </response>
        </epp>"#;

    const EMPTY_RESPONSE: &str = r#"<?xml version="1.0"?>
        <epp xmlns="urn:ietf:params:xml:ns:epp-1.0">
          <response>
            <trID><clTRID>{clTRID}</clTRID><svTRID>S-3</svTRID></trID>
          </response>
        </epp>"#;

    enum Reply {
        Frame(&'static str),
        Fail,
    }

    #[derive(Default)]
    struct WireLog {
        sent: Vec<Vec<u8>>,
        closed: usize,
    }

    /// Scripted transport standing in for the TLS connection
    struct MockTransport {
        replies: VecDeque<Reply>,
        log: Rc<RefCell<WireLog>>,
    }

    impl MockTransport {
        fn new(replies: Vec<Reply>) -> (Self, Rc<RefCell<WireLog>>) {
            let log = Rc::new(RefCell::new(WireLog::default()));
            (
                MockTransport {
                    replies: replies.into(),
                    log: Rc::clone(&log),
                },
                log,
            )
        }

        fn last_sent_tr_id(&self) -> Option<String> {
            let log = self.log.borrow();
            let frame = String::from_utf8(log.sent.last()?.clone()).ok()?;
            let start = frame.find("<epp:clTRID>")? + "<epp:clTRID>".len();
            let end = frame[start..].find("</epp:clTRID>")? + start;
            Some(frame[start..end].to_string())
        }
    }

    impl Transport for MockTransport {
        fn connect(&mut self) -> Result<()> {
            Ok(())
        }

        fn read_frame(&mut self) -> Result<Vec<u8>> {
            match self.replies.pop_front() {
                Some(Reply::Frame(template)) => {
                    let tr_id = self.last_sent_tr_id().unwrap_or_default();
                    Ok(template.replace("{clTRID}", &tr_id).into_bytes())
                }
                Some(Reply::Fail) => Err(Error::transport("injected failure")),
                None => Err(Error::transport("reply script exhausted")),
            }
        }

        fn write_frame(&mut self, payload: &[u8]) -> Result<()> {
            self.log.borrow_mut().sent.push(payload.to_vec());
            Ok(())
        }

        fn close(&mut self) {
            self.log.borrow_mut().closed += 1;
        }
    }

    fn client_with(replies: Vec<Reply>) -> (EppClient<MockTransport>, Rc<RefCell<WireLog>>) {
        let (transport, log) = MockTransport::new(replies);
        (EppClient::new(transport, NamespaceConfig::fred()), log)
    }

    fn greeting_reply() -> Reply {
        // The greeting frame is verbatim; it carries no clTRID placeholder.
        Reply::Frame(std::str::from_utf8(GREETING).unwrap())
    }

    #[test]
    fn test_send_before_connect_is_sequence_error() {
        let (mut client, _) = client_with(vec![]);
        let login = Login::new("id", "pw", &NamespaceConfig::fred());

        assert!(matches!(
            client.send(&login),
            Err(Error::ProtocolSequence(_))
        ));
    }

    #[test]
    fn test_connect_reads_greeting() {
        let (mut client, _) = client_with(vec![greeting_reply()]);
        client.connect().unwrap();

        assert_eq!(client.state(), SessionState::Connected);
        assert_eq!(client.greeting().unwrap().sv_id, "EPP server (DSDng)");

        // Connecting twice without a disconnect is a sequence error.
        assert!(matches!(
            client.connect(),
            Err(Error::ProtocolSequence(_))
        ));
    }

    #[test]
    fn test_connect_failure_closes_transport() {
        let (mut client, log) = client_with(vec![Reply::Frame("not xml at all")]);

        assert!(matches!(client.connect(), Err(Error::Parse { .. })));
        assert_eq!(client.state(), SessionState::Disconnected);
        assert_eq!(log.borrow().closed, 1);
    }

    #[test]
    fn test_login_scenario() {
        let (mut client, log) = client_with(vec![greeting_reply(), Reply::Frame(LOGIN_OK)]);
        client.connect().unwrap();

        let login = Login::new("id", "pw", &NamespaceConfig::fred());
        let response = client.send(&login).unwrap();

        assert!(response.is_success());
        assert_eq!(client.state(), SessionState::Authenticated);

        // Exactly one frame was sent, with clID before pw.
        let log = log.borrow();
        assert_eq!(log.sent.len(), 1);
        let frame = String::from_utf8(log.sent[0].clone()).unwrap();
        assert!(frame.contains("<epp:login>"));
        let cl_id = frame.find("<epp:clID>id</epp:clID>").unwrap();
        let pw = frame.find("<epp:pw>pw</epp:pw>").unwrap();
        assert!(cl_id < pw);
    }

    #[test]
    fn test_failed_login_leaves_state_unchanged() {
        let (mut client, _) = client_with(vec![
            greeting_reply(),
            Reply::Frame(LOGIN_FAILED),
            Reply::Frame(LOGIN_OK),
        ]);
        client.connect().unwrap();

        let login = Login::new("id", "wrong", &NamespaceConfig::fred());
        let response = client.send(&login).unwrap();
        assert_eq!(response.code(), 2200);
        assert_eq!(client.state(), SessionState::Connected);

        // The caller may retry.
        client.send(&login).unwrap();
        assert_eq!(client.state(), SessionState::Authenticated);
    }

    #[test]
    fn test_command_requires_authentication() {
        let (mut client, _) = client_with(vec![greeting_reply()]);
        client.connect().unwrap();

        assert!(matches!(
            client.send(&CheckDomain::new(["example.cz"])),
            Err(Error::ProtocolSequence(_))
        ));
    }

    #[test]
    fn test_command_round_trip_and_unique_tr_ids() {
        let (mut client, log) = client_with(vec![
            greeting_reply(),
            Reply::Frame(LOGIN_OK),
            Reply::Frame(CHECK_OK),
            Reply::Frame(CHECK_OK),
        ]);
        client.connect().unwrap();
        client
            .send(&Login::new("id", "pw", &NamespaceConfig::fred()))
            .unwrap();

        let response = client.send(&CheckDomain::new(["free.cz"])).unwrap();
        assert!(response.first().unwrap().avail);
        client.send(&CheckDomain::new(["free.cz"])).unwrap();

        let log = log.borrow();
        let ids: Vec<String> = log
            .sent
            .iter()
            .map(|frame| {
                let frame = String::from_utf8(frame.clone()).unwrap();
                let start = frame.find("<epp:clTRID>").unwrap() + "<epp:clTRID>".len();
                let end = frame[start..].find("</epp:clTRID>").unwrap() + start;
                frame[start..end].to_string()
            })
            .collect();

        assert_eq!(ids.len(), 3);
        // Monotonic counter under a shared session prefix.
        let prefix = ids[0].rsplit_once('-').unwrap().0.to_string();
        for (index, id) in ids.iter().enumerate() {
            assert_eq!(*id, format!("{}-{}", prefix, index + 1));
        }
    }

    #[test]
    fn test_tr_id_mismatch_is_sequence_error() {
        const MISMATCHED: &str = r#"<?xml version="1.0"?>
            <epp xmlns="urn:ietf:params:xml:ns:epp-1.0">
              <response>
                <result code="1000"><msg>ok</msg></result>
                <trID><clTRID>someone-elses-id</clTRID><svTRID>S-1</svTRID></trID>
              </response>
            </epp>"#;
        let (mut client, _) = client_with(vec![greeting_reply(), Reply::Frame(MISMATCHED)]);
        client.connect().unwrap();

        let login = Login::new("id", "pw", &NamespaceConfig::fred());
        assert!(matches!(
            client.send(&login),
            Err(Error::ProtocolSequence(_))
        ));
    }

    #[test]
    fn test_logout_ends_session() {
        let (mut client, log) = client_with(vec![
            greeting_reply(),
            Reply::Frame(LOGIN_OK),
            Reply::Frame(LOGIN_OK),
        ]);
        client.connect().unwrap();
        client
            .send(&Login::new("id", "pw", &NamespaceConfig::fred()))
            .unwrap();

        client.send(&Logout).unwrap();
        assert_eq!(client.state(), SessionState::Disconnected);
        assert_eq!(log.borrow().closed, 1);

        // No further commands on a closed session.
        assert!(matches!(
            client.send(&CheckDomain::new(["example.cz"])),
            Err(Error::ProtocolSequence(_))
        ));
    }

    #[test]
    fn test_logout_closes_transport_even_on_failure() {
        let (mut client, log) = client_with(vec![
            greeting_reply(),
            Reply::Frame(LOGIN_OK),
            Reply::Fail,
        ]);
        client.connect().unwrap();
        client
            .send(&Login::new("id", "pw", &NamespaceConfig::fred()))
            .unwrap();

        assert!(client.send(&Logout).is_err());
        assert_eq!(client.state(), SessionState::Disconnected);
        assert!(log.borrow().closed >= 1);
    }

    #[test]
    fn test_transport_failure_tears_session_down() {
        let (mut client, log) = client_with(vec![greeting_reply(), Reply::Fail]);
        client.connect().unwrap();

        let login = Login::new("id", "pw", &NamespaceConfig::fred());
        assert!(matches!(client.send(&login), Err(Error::Transport(_))));
        assert_eq!(client.state(), SessionState::Disconnected);
        assert_eq!(log.borrow().closed, 1);
    }

    #[test]
    fn test_parse_failure_keeps_session_open() {
        let (mut client, log) = client_with(vec![
            greeting_reply(),
            Reply::Frame("<epp>broken"),
            Reply::Frame(LOGIN_OK),
        ]);
        client.connect().unwrap();

        let login = Login::new("id", "pw", &NamespaceConfig::fred());
        assert!(matches!(client.send(&login), Err(Error::Parse { .. })));
        // The caller decides; the session is still connected and usable.
        assert_eq!(client.state(), SessionState::Connected);
        assert_eq!(log.borrow().closed, 0);

        client.send(&login).unwrap();
        assert_eq!(client.state(), SessionState::Authenticated);
    }

    #[test]
    fn test_empty_response_surfaces_as_distinct_error() {
        let (mut client, _) = client_with(vec![greeting_reply(), Reply::Frame(EMPTY_RESPONSE)]);
        client.connect().unwrap();

        let login = Login::new("id", "pw", &NamespaceConfig::fred());
        assert!(matches!(
            client.send(&login),
            Err(Error::EmptyResponse { .. })
        ));
    }

    #[test]
    fn test_hello_refreshes_greeting() {
        let (mut client, _) = client_with(vec![greeting_reply(), greeting_reply()]);
        client.connect().unwrap();

        let greeting = client.hello().unwrap();
        assert_eq!(greeting.sv_id, "EPP server (DSDng)");
        assert_eq!(client.state(), SessionState::Connected);
    }

    #[test]
    fn test_wire_hook_sees_both_directions() {
        let (mut client, _) = client_with(vec![greeting_reply(), Reply::Frame(LOGIN_OK)]);
        let events = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = std::sync::Arc::clone(&events);
        client.set_wire_hook(Box::new(move |event| {
            let label = match event {
                WireEvent::Sent(_) => "sent",
                WireEvent::Received(_) => "received",
            };
            sink.lock().unwrap().push(label);
        }));

        client.connect().unwrap();
        client
            .send(&Login::new("id", "pw", &NamespaceConfig::fred()))
            .unwrap();

        assert_eq!(
            *events.lock().unwrap(),
            vec!["received", "sent", "received"]
        );
    }

    #[test]
    fn test_close_is_idempotent() {
        let (mut client, log) = client_with(vec![greeting_reply()]);
        client.connect().unwrap();

        client.close();
        client.close();
        assert_eq!(client.state(), SessionState::Disconnected);
        assert!(log.borrow().closed >= 2);
    }
}
