use crate::core::{Error, Result};

/// Phase of an EPP conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No open connection
    Disconnected,
    /// Connected, greeting received, not yet logged in
    Connected,
    /// Logged in, transform and query commands accepted
    Authenticated,
}

/// Operation a caller is about to perform on the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOp {
    /// Open the transport and read the greeting
    Connect,
    /// Re-fetch the greeting
    Hello,
    /// Establish credentials
    Login,
    /// Any non-session command
    Command,
    /// End the session
    Logout,
}

impl SessionState {
    /// Checks one entry of the transition table
    ///
    /// The protocol is strictly half-duplex and login-gated; every client
    /// operation consults this table before touching the transport.
    pub fn check(self, op: SessionOp) -> Result<()> {
        use SessionOp::*;
        use SessionState::*;

        let allowed = matches!(
            (self, op),
            (Disconnected, Connect)
                | (Connected, Hello)
                | (Authenticated, Hello)
                | (Connected, Login)
                | (Connected, Logout)
                | (Authenticated, Command)
                | (Authenticated, Logout)
        );

        if allowed {
            Ok(())
        } else {
            Err(Error::sequence(format!(
                "{:?} is not allowed in state {:?}",
                op, self
            )))
        }
    }
}
