//! A chat client for messaging-host mini apps, with ads in between.
//!
//! The crate wires a [`core::ChatSession`] into the host surface the way
//! the mini app page does at start-up: it signals readiness, turns the
//! host's primary button into a close button, shows the embedded banner,
//! and reports the session back to the bot when the surface closes. It
//! also ships a terminal front-end that simulates the host.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod app;

pub use app::{CLOSE_LABEL, MiniApp, MiniAppBuilder, TeardownReport};

/// Re-exports of [`miniapp_chat_core`] crate.
pub mod core {
    pub use miniapp_chat_core::*;
}

/// Re-exports of [`miniapp_chat_http_backend`] crate.
pub mod http {
    pub use miniapp_chat_http_backend::*;
}
