//! fred-epp: a synchronous EPP registry client
//!
//! This library implements the Extensible Provisioning Protocol (RFC 5730) over the
//! TLS transport mapping (RFC 5734): length-prefixed framing, a strict half-duplex
//! session state machine, and a declaration-driven XML codec covering the core
//! object mappings together with the FRED registry extensions.
pub mod core;

pub mod client;
pub mod command;
pub mod models;
pub mod protocol;
pub mod response;
pub mod xml;

// Re-export commonly used items
pub use crate::client::EppClient;
pub use crate::core::{ClientConfig, Error, NamespaceConfig, Result, TlsOptions};
pub use crate::protocol::transport::{TlsTransport, Transport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
