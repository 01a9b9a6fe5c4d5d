use std::sync::Arc;

use miniapp_chat_backend::ChatBackend;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use super::ChatSession;
use crate::ads::AdPresenter;
use crate::backend_client::BackendClient;
use crate::config::ChatConfig;
use crate::host::HostBridge;
use crate::transcript::{NullRenderer, TranscriptRenderer};

/// [`ChatSession`] builder.
///
/// Collaborators that are not set are treated as absent: no host, no
/// advertising SDK, and a transcript that draws nothing.
pub struct ChatSessionBuilder {
    pub(crate) backend: BackendClient,
    pub(crate) config: ChatConfig,
    pub(crate) host: HostBridge,
    pub(crate) ads: AdPresenter,
    pub(crate) renderer: Arc<dyn TranscriptRenderer>,
    pub(crate) rng: Box<dyn RngCore + Send>,
    pub(crate) on_idle: Option<Box<dyn Fn() + Send + Sync>>,
}

impl ChatSessionBuilder {
    /// Creates a new builder with the specified chat backend.
    #[inline]
    pub fn with_backend<B: ChatBackend + 'static>(backend: B) -> Self {
        Self {
            backend: BackendClient::new(backend),
            config: ChatConfig::default(),
            host: HostBridge::unavailable(),
            ads: AdPresenter::default(),
            renderer: Arc::new(NullRenderer),
            rng: Box::new(StdRng::from_entropy()),
            on_idle: None,
        }
    }

    /// Sets the configuration.
    #[inline]
    pub fn with_config(mut self, config: ChatConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the host bridge.
    #[inline]
    pub fn with_host(mut self, host: HostBridge) -> Self {
        self.host = host;
        self
    }

    /// Sets the ad presenter.
    #[inline]
    pub fn with_ads(mut self, ads: AdPresenter) -> Self {
        self.ads = ads;
        self
    }

    /// Sets the renderer the transcript draws to.
    #[inline]
    pub fn with_renderer<R: TranscriptRenderer>(mut self, renderer: R) -> Self {
        self.renderer = Arc::new(renderer);
        self
    }

    /// Sets the random source used to pick ad formats.
    #[inline]
    pub fn with_rng<R: RngCore + Send + 'static>(mut self, rng: R) -> Self {
        self.rng = Box::new(rng);
        self
    }

    /// Attaches a callback to be invoked when no request is left in
    /// flight after a reply (or failure) has been rendered.
    #[inline]
    pub fn on_idle(
        mut self,
        on_idle: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        self.on_idle = Some(Box::new(on_idle));
        self
    }

    /// Builds the session and starts it on the current tokio runtime.
    #[inline]
    pub fn build(self) -> ChatSession {
        ChatSession::spawn_from_builder(self)
    }
}
