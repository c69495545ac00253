//! Wire protocol building blocks
//!
//! This module implements the RFC 5734 transport mapping: length-prefixed message
//! framing, the blocking mutually-authenticated TLS transport, and the session
//! state machine that gates which operations may run at which point of an EPP
//! conversation.

pub mod framing;
pub mod state;
pub mod transport;

pub use self::framing::{read_frame, write_frame, HEADER_LEN};
pub use self::state::{SessionOp, SessionState};
pub use self::transport::{TlsTransport, Transport};
