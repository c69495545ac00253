//! Typed EPP responses
//!
//! Replies are decoded in two steps: the generic pipeline in [`base`] extracts
//! the result entries, transaction ids, extension blocks and message queue that
//! every response shares, and a per-command [`ResData`] declaration turns the
//! `<resData>` block into typed payloads.

pub mod base;
pub mod check;
pub mod create;
pub mod credit;
pub mod info;
pub mod poll;
pub mod renew;

pub use self::base::{
    ExtValue, Greeting, GreetingExpiry, MsgQ, NoResData, ResData, Response, ResponseExtension,
    ResultEntry, Statement,
};
pub use self::poll::PollMessage;
