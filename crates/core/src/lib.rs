//! Core logic of the mini app chat client: the chat session and its
//! transcript, the ad cadence, and the host and advertising
//! collaborators around them.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

pub mod ads;
mod backend_client;
mod cadence;
mod capability;
pub mod config;
pub mod host;
mod session;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod transcript;

pub use cadence::{AdDecision, AdPick, CadencePolicy};
pub use capability::Capability;
pub use miniapp_chat_actor::ActorDeadError;
pub use session::{
    ChatSession, ChatSessionBuilder, ERROR_TEXT, PENDING_TEXT, REWARD_TEXT,
    SessionCounters,
};
