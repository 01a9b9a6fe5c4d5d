mod builder;
mod state;

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use miniapp_chat_actor::{Actor, ActorDeadError};
use rand::RngCore;

use crate::ads::AdPresenter;
use crate::backend_client::BackendClient;
use crate::cadence::CadencePolicy;
use crate::config::ChatConfig;
use crate::host::HostBridge;
use crate::session::state::{InFlightRequest, Submit};
use crate::transcript::{MessageEntry, TranscriptView};
pub use builder::ChatSessionBuilder;

/// The placeholder shown while waiting for a reply.
pub const PENDING_TEXT: &str = "Thinking...";

/// The entry shown when a reply couldn't be obtained.
pub const ERROR_TEXT: &str =
    "Sorry, there was an error processing your request.";

/// The alert shown after the user watched a video ad to the end.
pub const REWARD_TEXT: &str =
    "Thanks for watching! You support our free service.";

/// Counters of a session.
///
/// Only the session increments them. Clones are read-only views that can
/// be consulted from anywhere, including synchronous teardown handlers.
#[derive(Clone, Debug, Default)]
pub struct SessionCounters {
    messages_sent: Arc<AtomicU64>,
}

impl SessionCounters {
    /// Returns how many messages the user has sent.
    #[inline]
    pub fn messages_sent(&self) -> u64 {
        self.messages_sent.load(Ordering::Acquire)
    }

    #[inline]
    fn record_send(&self) -> u64 {
        self.messages_sent.fetch_add(1, Ordering::AcqRel) + 1
    }
}

pub(crate) struct SessionState {
    backend: BackendClient,
    host: HostBridge,
    ads: AdPresenter,
    config: Arc<ChatConfig>,
    cadence: CadencePolicy,
    transcript: TranscriptView,
    counters: SessionCounters,
    in_flight: HashMap<u64, InFlightRequest>,
    next_request_id: u64,
    rng: Box<dyn RngCore + Send>,

    on_idle: Option<Box<dyn Fn() + Send + Sync>>,
}

/// A chat session: a transcript, an input, and the ads around them.
///
/// The session is an actor. Every change to the transcript and the
/// counters happens on its own task, one message at a time, while
/// network requests and ads run in the background and report back.
/// Cloning the session gives another handle to the same actor.
#[derive(Clone)]
pub struct ChatSession {
    handle: Actor<SessionState>,
    counters: SessionCounters,
}

impl ChatSession {
    /// Submits the user's input.
    ///
    /// Input that is empty after trimming is ignored. This never waits for
    /// the reply, which shows up in the transcript once it arrives.
    pub fn submit<S: Into<String>>(&self, text: S) {
        if self.handle.send(Submit(text.into())).is_err() {
            error!("session has been closed, dropping the input");
        }
    }

    /// Returns how many messages the user has sent.
    #[inline]
    pub fn messages_sent(&self) -> u64 {
        self.counters.messages_sent()
    }

    /// Returns a read-only view of the session counters.
    #[inline]
    pub fn counters(&self) -> SessionCounters {
        self.counters.clone()
    }

    /// Returns a snapshot of the transcript, after every input submitted
    /// before this call has been taken in.
    pub async fn transcript(&self) -> Result<Vec<MessageEntry>, ActorDeadError> {
        self.handle
            .ask(|state| state.transcript.entries().cloned().collect())
            .await
    }

    /// Returns how many requests are waiting for a reply.
    pub async fn in_flight(&self) -> Result<usize, ActorDeadError> {
        self.handle.ask(|state| state.in_flight.len()).await
    }

    /// Closes the session. Requests still in flight are abandoned.
    #[inline]
    pub fn close(&self) {
        self.handle.stop();
    }
}

impl ChatSession {
    fn spawn_from_builder(builder: ChatSessionBuilder) -> Self {
        let ChatSessionBuilder {
            backend,
            config,
            host,
            ads,
            renderer,
            rng,
            on_idle,
        } = builder;

        let counters = SessionCounters::default();
        let state = SessionState {
            backend: backend.with_timeout(config.request_timeout()),
            host,
            ads,
            cadence: config.cadence(),
            config: Arc::new(config),
            transcript: TranscriptView::new(renderer),
            counters: counters.clone(),
            in_flight: Default::default(),
            next_request_id: 1,
            rng,
            on_idle,
        };
        Self {
            handle: Actor::spawn(state, "chat session"),
            counters,
        }
    }
}
