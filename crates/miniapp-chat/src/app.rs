use miniapp_chat_backend::ChatBackend;
use miniapp_chat_core::ads::{AdPresenter, AdSdkSlot};
use miniapp_chat_core::config::ChatConfig;
use miniapp_chat_core::host::{HostBridge, HostEvent, WeakHostBridge};
use miniapp_chat_core::transcript::TranscriptRenderer;
use miniapp_chat_core::{ChatSession, ChatSessionBuilder, SessionCounters};
use serde::{Deserialize, Serialize};

/// The label of the host's primary button.
pub const CLOSE_LABEL: &str = "Close";

/// What the mini app reports to the bot when its surface closes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeardownReport {
    /// Always `"close"`.
    pub action: String,
    /// How many messages the user sent in this session.
    pub messages_sent: u64,
}

impl TeardownReport {
    /// Creates a close report.
    #[inline]
    pub fn close(messages_sent: u64) -> Self {
        Self {
            action: "close".to_owned(),
            messages_sent,
        }
    }
}

/// [`MiniApp`] builder.
///
/// See [`ChatSessionBuilder`] for what happens to collaborators that are
/// not set.
pub struct MiniAppBuilder {
    session_builder: ChatSessionBuilder,
    config: ChatConfig,
    host: HostBridge,
    ad_slot: AdSdkSlot,
}

impl MiniAppBuilder {
    /// Creates a builder with the specified chat backend.
    pub fn with_backend<B: ChatBackend + 'static>(backend: B) -> Self {
        Self {
            session_builder: ChatSessionBuilder::with_backend(backend),
            config: ChatConfig::default(),
            host: HostBridge::unavailable(),
            ad_slot: AdSdkSlot::empty(),
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

    /// Sets the slot the advertising SDK gets installed into.
    ///
    /// The SDK may be installed into the slot at any time, ads requested
    /// before that are skipped.
    #[inline]
    pub fn with_ad_sdk_slot(mut self, ad_slot: AdSdkSlot) -> Self {
        self.ad_slot = ad_slot;
        self
    }

    /// Sets the renderer the transcript draws to.
    #[inline]
    pub fn with_renderer<R: TranscriptRenderer>(mut self, renderer: R) -> Self {
        self.session_builder = self.session_builder.with_renderer(renderer);
        self
    }

    /// Attaches a callback to be invoked when the session is idle.
    #[inline]
    pub fn on_idle(
        mut self,
        on_idle: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        self.session_builder = self.session_builder.on_idle(on_idle);
        self
    }

    /// Builds the mini app and runs its start-up sequence.
    ///
    /// Must be called within a tokio runtime.
    pub fn build(self) -> MiniApp {
        let Self {
            session_builder,
            config,
            host,
            ad_slot,
        } = self;

        let ads = AdPresenter::new(ad_slot);
        let session = session_builder
            .with_config(config.clone())
            .with_host(host.clone())
            .with_ads(ads.clone())
            .build();

        let app = MiniApp { session, host, ads };
        app.start(&config);
        app
    }
}

/// A chat session embedded in a host surface.
///
/// On start the host is told the app is ready, the primary button
/// becomes a close button, and the embedded banner is requested. When
/// the surface closes, a [`TeardownReport`] is sent back to the bot.
pub struct MiniApp {
    session: ChatSession,
    host: HostBridge,
    ads: AdPresenter,
}

impl MiniApp {
    fn start(&self, config: &ChatConfig) {
        self.host.initialize();

        let weak_host = self.host.downgrade();
        self.host
            .configure_primary_action(CLOSE_LABEL, move || {
                terminate(&weak_host)
            });
        let weak_host = self.host.downgrade();
        self.host.on_event(HostEvent::BackButtonClicked, move || {
            terminate(&weak_host)
        });

        if config.ads_enabled() {
            let slots = config.ad_slots();
            self.ads
                .show_banner(&slots.embedded_banner, &slots.banner_container);
            self.ads.request_push_opt_in(&slots.push_style);
        } else {
            debug!("ads disabled, skipping embedded banner");
        }

        let weak_host = self.host.downgrade();
        let counters = self.session.counters();
        self.host
            .on_teardown(move || send_report(&weak_host, &counters));
        info!("mini app started");
    }

    /// Submits the user's input to the session.
    #[inline]
    pub fn submit<S: Into<String>>(&self, text: S) {
        self.session.submit(text);
    }

    /// Returns the chat session.
    #[inline]
    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    /// Returns the host bridge.
    #[inline]
    pub fn host(&self) -> &HostBridge {
        &self.host
    }

    /// Returns the ad presenter.
    #[inline]
    pub fn ads(&self) -> &AdPresenter {
        &self.ads
    }

    /// Closes the surface, as if the user pressed the close button, and
    /// stops the session.
    pub fn close(&self) {
        self.host.terminate();
        self.session.close();
    }
}

fn terminate(weak_host: &WeakHostBridge) {
    if let Some(host) = weak_host.upgrade() {
        host.terminate();
    }
}

fn send_report(weak_host: &WeakHostBridge, counters: &SessionCounters) {
    let Some(host) = weak_host.upgrade() else {
        return;
    };
    let report = TeardownReport::close(counters.messages_sent());
    match serde_json::to_string(&report) {
        Ok(data) => host.send_data(&data),
        Err(err) => error!("failed to encode teardown report: {}", err),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use miniapp_chat_core::ads::AdFormat;
    use miniapp_chat_core::config::{AdSlots, ChatConfigBuilder};
    use miniapp_chat_core::testing::{
        HostCall, RecordingAdSdk, RecordingHost, SdkCall,
    };
    use miniapp_chat_test_backend::TestChatBackend;
    use tokio::sync::watch;
    use tokio::time::timeout;

    use super::*;

    fn test_config() -> ChatConfig {
        ChatConfigBuilder::new()
            .with_ad_slots(AdSlots {
                embedded_banner: "banner-1".to_owned(),
                interstitial_banner: "int-1".to_owned(),
                interstitial_video: "vid-1".to_owned(),
                push_style: "push-1".to_owned(),
                banner_container: "embedded-banner".to_owned(),
            })
            .build()
    }

    fn sent_data(recorder: &RecordingHost) -> Vec<TeardownReport> {
        recorder
            .calls()
            .into_iter()
            .filter_map(|call| match call {
                HostCall::SendData(data) => {
                    Some(serde_json::from_str(&data).unwrap())
                }
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_start_up_sequence() {
        let recorder = RecordingHost::default();
        let sdk = RecordingAdSdk::default();
        let _app = MiniAppBuilder::with_backend(TestChatBackend::default())
            .with_config(test_config())
            .with_host(HostBridge::available(recorder.clone()))
            .with_ad_sdk_slot(AdSdkSlot::loaded(sdk.clone()))
            .build();

        assert_eq!(
            recorder.calls(),
            vec![
                HostCall::Ready,
                HostCall::Expand,
                HostCall::MainButtonText(CLOSE_LABEL.to_owned()),
                HostCall::ShowMainButton,
            ]
        );
        assert_eq!(recorder.subscriptions(HostEvent::MainButtonClicked), 1);
        assert_eq!(recorder.subscriptions(HostEvent::BackButtonClicked), 1);
        assert_eq!(
            sdk.calls(),
            vec![
                SdkCall::Present(
                    AdFormat::Banner {
                        container_id: "embedded-banner".to_owned()
                    },
                    "banner-1".to_owned()
                ),
                SdkCall::PushOptIn("push-1".to_owned()),
            ]
        );
    }

    #[tokio::test]
    async fn test_ads_disabled_skips_banner() {
        let sdk = RecordingAdSdk::default();
        let config = ChatConfigBuilder::new().with_ads_enabled(false).build();
        let _app = MiniAppBuilder::with_backend(TestChatBackend::default())
            .with_config(config)
            .with_ad_sdk_slot(AdSdkSlot::loaded(sdk.clone()))
            .build();

        assert!(sdk.calls().is_empty());
    }

    #[tokio::test]
    async fn test_close_button_reports_messages() {
        let backend = TestChatBackend::default();
        backend.add_text_reply("one");
        backend.add_text_reply("two");
        let recorder = RecordingHost::default();

        let (idle_tx, mut idle_rx) = watch::channel(0usize);
        let app = MiniAppBuilder::with_backend(backend)
            .with_config(test_config())
            .with_host(HostBridge::available(recorder.clone()))
            .on_idle(move || idle_tx.send_modify(|count| *count += 1))
            .build();

        app.submit("hi");
        app.submit("again");
        timeout(Duration::from_secs(5), idle_rx.wait_for(|count| *count >= 1))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(app.session().in_flight().await.unwrap(), 0);

        recorder.fire(HostEvent::MainButtonClicked);
        recorder.fire(HostEvent::BackButtonClicked);

        assert_eq!(sent_data(&recorder), vec![TeardownReport::close(2)]);
        assert_eq!(
            recorder
                .calls()
                .iter()
                .filter(|call| **call == HostCall::Close)
                .count(),
            2
        );
    }

    #[tokio::test]
    async fn test_ad_sdk_installed_later() {
        let slot = AdSdkSlot::empty();
        let app = MiniAppBuilder::with_backend(TestChatBackend::default())
            .with_config(test_config())
            .with_ad_sdk_slot(slot.clone())
            .build();
        assert!(app.ads().show_video("vid-1").is_none());

        let sdk = RecordingAdSdk::default();
        slot.install(sdk.clone());
        let ticket = app.ads().show_video("vid-1").unwrap();
        assert_eq!(ticket.format(), &AdFormat::Video);
        assert_eq!(sdk.presented(), vec![AdFormat::Video]);
    }

    #[tokio::test]
    async fn test_close_without_host() {
        let app =
            MiniAppBuilder::with_backend(TestChatBackend::default()).build();
        assert!(!app.host().is_available());
        app.close();
        app.submit("ignored");
        assert!(app.session().transcript().await.is_err());
    }
}
