//! The boundary between a chat session and a chat-completion service.
//!
//! The session never talks to a concrete service. Instead it sends a
//! [`ChatRequest`] through a [`ChatBackend`] and gets back either a
//! [`ChatReply`] or an error that can be classified by [`ErrorKind`].
//! The service itself is opaque: it may be a remote HTTP endpoint, a
//! scripted fake in tests, or anything else that honors the contract.
//!
//! Types in this crate don't define any behavior, they are the
//! constraints that the implementors should adhere to.

#![deny(missing_docs)]

mod backend;
mod error;
mod reply;
mod request;

pub use backend::*;
pub use error::*;
pub use reply::*;
pub use request::*;
