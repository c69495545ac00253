//! Core types shared across the EPP client
//!
//! This module contains the error taxonomy, configuration objects and protocol
//! constants used throughout the library.

pub mod config;
pub mod error;
pub mod serde;

pub use self::config::{ClientConfig, NamespaceConfig, NamespaceSpec, TlsOptions};
pub use self::error::{Error, Result};

/// Namespace of the EPP core schema
pub const NAMESPACE_EPP: &str = "urn:ietf:params:xml:ns:epp-1.0";

/// Namespace of XML Schema instance attributes
pub const NAMESPACE_XSI: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Schema location advertised on every request
pub const SCHEMA_LOCATION_EPP: &str = "urn:ietf:params:xml:ns:epp-1.0 epp-1.0.xsd";

/// EPP protocol version sent in login options
pub const PROTOCOL_VERSION: &str = "1.0";

/// Registered EPP-over-TLS port (RFC 5734)
pub const DEFAULT_PORT: u16 = 700;

/// Hard cap on a single frame, header included
pub const MAX_FRAME_LEN: u32 = 8 * 1024 * 1024;
