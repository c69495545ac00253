//! Typed EPP requests
//!
//! Every request is a declaration: a typed value that lays out its payload as an
//! ordered element tree consumed by the generic codec in [`crate::xml`]. Adding a
//! new object mapping means supplying a new declaration against the existing
//! machinery, never touching the codec or the session client.

pub mod base;
pub mod check;
pub mod create;
pub mod delete;
pub mod extension;
pub mod info;
pub mod renew;
pub mod transfer;
pub mod update;

pub use self::base::{Hello, Login, Logout, PollAck, PollRequest, Request};
pub use self::check::{CheckContact, CheckDomain, CheckKeyset, CheckNsset};
pub use self::create::{CreateContact, CreateDomain, CreateKeyset, CreateNsset};
pub use self::delete::{DeleteContact, DeleteDomain};
pub use self::extension::{CreditInfoRequest, SendAuthInfoDomain, TestNsset};
pub use self::info::{InfoContact, InfoDomain, InfoKeyset, InfoNsset};
pub use self::renew::RenewDomain;
pub use self::transfer::{TransferContact, TransferDomain};
pub use self::update::UpdateDomain;
