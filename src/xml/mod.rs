//! Generic XML codec
//!
//! This module implements the declaration-driven (de)serialization layer shared by
//! every command and response: commands declare their payload as an ordered element
//! tree which one serializer turns into schema-conformant XML, and responses are
//! read back through a namespace-resolving node tree queried by qualified paths.

pub mod parse;
pub mod tree;

pub use self::parse::Node;
pub use self::tree::{serialize_document, Element};
