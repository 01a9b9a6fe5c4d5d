//! Messaging-host integration.
//!
//! The host is the messaging platform that embeds the mini app. It
//! exposes a small, fixed set of primitives described by
//! [`HostCapabilities`]. [`HostBridge`] wraps them with the semantics the
//! chat client relies on, and turns every call into a no-op when the
//! host is absent.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use crate::Capability;

/// The user id reported when the host doesn't supply one.
pub const DEFAULT_USER_ID: &str = "web_user";

/// Named events the host can deliver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HostEvent {
    /// The host-rendered primary button was pressed.
    MainButtonClicked,
    /// The host's back button was pressed.
    BackButtonClicked,
}

impl HostEvent {
    /// Returns the event name used by the host SDK.
    #[inline]
    pub fn name(self) -> &'static str {
        match self {
            HostEvent::MainButtonClicked => "mainButtonClicked",
            HostEvent::BackButtonClicked => "backButtonClicked",
        }
    }
}

/// A callback subscribed to a [`HostEvent`].
pub type HostEventHandler = Arc<dyn Fn() + Send + Sync>;

/// The primitives provided by the host runtime.
///
/// Implementations wrap the host SDK. All methods are fire-and-forget,
/// the host gives no acknowledgment for any of them.
pub trait HostCapabilities: Send + Sync + 'static {
    /// Signals that the mini app is ready to be displayed.
    fn ready(&self);

    /// Expands the mini app to the full viewport.
    fn expand(&self);

    /// Sets the label of the primary button.
    fn set_main_button_text(&self, text: &str);

    /// Makes the primary button visible.
    fn show_main_button(&self);

    /// Subscribes to a named event.
    fn subscribe(&self, event: HostEvent, handler: HostEventHandler);

    /// Shows a native alert.
    fn show_alert(&self, message: &str);

    /// Closes the mini app surface.
    fn close(&self);

    /// Sends data back to the bot that opened the mini app.
    fn send_data(&self, data: &str);

    /// Returns the id of the current user, if the host knows it.
    fn user_id(&self) -> Option<String>;
}

type TeardownHandler = Box<dyn FnOnce() + Send>;

struct Inner {
    caps: Capability<Arc<dyn HostCapabilities>>,
    initialized: AtomicBool,
    primary_subscribed: AtomicBool,
    primary_action: Mutex<Option<HostEventHandler>>,
    teardown: Mutex<Option<TeardownHandler>>,
}

/// A cheap-to-clone wrapper around the host's capabilities.
///
/// When the host is [`Capability::Unavailable`], every method is a safe
/// no-op and [`HostBridge::current_user_id`] returns the fallback id.
#[derive(Clone)]
pub struct HostBridge {
    inner: Arc<Inner>,
    fallback_user_id: Arc<str>,
}

impl HostBridge {
    /// Creates a bridge over the given host capabilities.
    pub fn new(caps: Capability<Arc<dyn HostCapabilities>>) -> Self {
        Self {
            inner: Arc::new(Inner {
                caps,
                initialized: AtomicBool::new(false),
                primary_subscribed: AtomicBool::new(false),
                primary_action: Mutex::new(None),
                teardown: Mutex::new(None),
            }),
            fallback_user_id: Arc::from(DEFAULT_USER_ID),
        }
    }

    /// Creates a bridge over a present host.
    #[inline]
    pub fn available<H: HostCapabilities>(host: H) -> Self {
        Self::new(Capability::Available(Arc::new(host)))
    }

    /// Creates a bridge for running outside of any host.
    #[inline]
    pub fn unavailable() -> Self {
        Self::new(Capability::Unavailable)
    }

    /// Sets the id reported when the host doesn't supply one.
    #[inline]
    pub fn with_fallback_user_id<S: AsRef<str>>(mut self, user_id: S) -> Self {
        self.fallback_user_id = Arc::from(user_id.as_ref());
        self
    }

    /// Creates a weak handle, for callbacks that the bridge itself keeps
    /// alive (primary action, event handlers, teardown handler).
    #[inline]
    pub fn downgrade(&self) -> WeakHostBridge {
        WeakHostBridge {
            inner: Arc::downgrade(&self.inner),
            fallback_user_id: Arc::clone(&self.fallback_user_id),
        }
    }

    /// Returns `true` if the host is present.
    #[inline]
    pub fn is_available(&self) -> bool {
        self.inner.caps.is_available()
    }

    /// Signals readiness and requests full-viewport expansion.
    ///
    /// Only the first call reaches the host.
    pub fn initialize(&self) {
        let Some(caps) = self.caps() else {
            return;
        };
        if self.inner.initialized.swap(true, Ordering::AcqRel) {
            trace!("host already initialized");
            return;
        }
        caps.ready();
        caps.expand();
        debug!("host initialized");
    }

    /// Sets the primary button's label and activation callback, and shows
    /// the button.
    ///
    /// Only one primary action exists at a time: calling this again
    /// replaces both the label and the callback.
    pub fn configure_primary_action(
        &self,
        label: &str,
        on_activate: impl Fn() + Send + Sync + 'static,
    ) {
        let Some(caps) = self.caps() else {
            return;
        };
        *lock(&self.inner.primary_action) = Some(Arc::new(on_activate));
        caps.set_main_button_text(label);
        caps.show_main_button();

        // The host keeps every subscription forever, so subscribe once and
        // dispatch to whatever action is current.
        if !self.inner.primary_subscribed.swap(true, Ordering::AcqRel) {
            let inner = Arc::downgrade(&self.inner);
            caps.subscribe(
                HostEvent::MainButtonClicked,
                Arc::new(move || {
                    let Some(inner) = inner.upgrade() else {
                        return;
                    };
                    let action = lock(&inner.primary_action).clone();
                    if let Some(action) = action {
                        action();
                    }
                }),
            );
        }
    }

    /// Subscribes to a named host event.
    pub fn on_event(
        &self,
        event: HostEvent,
        handler: impl Fn() + Send + Sync + 'static,
    ) {
        if let Some(caps) = self.caps() {
            caps.subscribe(event, Arc::new(handler));
        }
    }

    /// Returns the host-supplied user id, or the fallback id.
    pub fn current_user_id(&self) -> String {
        self.caps()
            .and_then(|caps| caps.user_id())
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| self.fallback_user_id.to_string())
    }

    /// Shows an alert, best-effort.
    #[inline]
    pub fn notify_alert(&self, message: &str) {
        if let Some(caps) = self.caps() {
            caps.show_alert(message);
        }
    }

    /// Sends data back to the bot, best-effort.
    #[inline]
    pub fn send_data(&self, data: &str) {
        if let Some(caps) = self.caps() {
            caps.send_data(data);
        }
    }

    /// Registers the handler to run when the surface is about to close.
    ///
    /// The handler runs synchronously and at most once. It must not rely
    /// on any asynchronous work finishing after it returns. Registering
    /// again replaces a handler that hasn't run yet.
    pub fn on_teardown(&self, handler: impl FnOnce() + Send + 'static) {
        if !self.is_available() {
            return;
        }
        *lock(&self.inner.teardown) = Some(Box::new(handler));
    }

    /// Runs the teardown handler if it hasn't run yet.
    ///
    /// Embedding runtimes call this when they observe the surface closing
    /// by other means than [`HostBridge::terminate`].
    pub fn teardown(&self) {
        let handler = lock(&self.inner.teardown).take();
        if let Some(handler) = handler {
            debug!("running teardown handler");
            handler();
        }
    }

    /// Requests the host to close the mini app surface.
    pub fn terminate(&self) {
        let Some(caps) = self.caps() else {
            return;
        };
        self.teardown();
        caps.close();
    }

    #[inline]
    fn caps(&self) -> Option<&Arc<dyn HostCapabilities>> {
        self.inner.caps.as_available()
    }
}

/// A weak handle to a [`HostBridge`].
#[derive(Clone)]
pub struct WeakHostBridge {
    inner: Weak<Inner>,
    fallback_user_id: Arc<str>,
}

impl WeakHostBridge {
    /// Returns the bridge if it's still alive.
    #[inline]
    pub fn upgrade(&self) -> Option<HostBridge> {
        Some(HostBridge {
            inner: self.inner.upgrade()?,
            fallback_user_id: Arc::clone(&self.fallback_user_id),
        })
    }
}

#[inline]
fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;
    use crate::testing::{HostCall, RecordingHost};

    #[test]
    fn test_unavailable_host_is_noop() {
        let host = HostBridge::unavailable();
        host.initialize();
        host.configure_primary_action("Close", || unreachable!());
        host.on_event(HostEvent::BackButtonClicked, || unreachable!());
        host.notify_alert("hello");
        host.send_data("{}");
        host.on_teardown(|| unreachable!());
        host.teardown();
        host.terminate();
        assert!(!host.is_available());
        assert_eq!(host.current_user_id(), DEFAULT_USER_ID);
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let recorder = RecordingHost::default();
        let host = HostBridge::available(recorder.clone());
        host.initialize();
        host.initialize();
        assert_eq!(recorder.calls(), vec![HostCall::Ready, HostCall::Expand]);
    }

    #[test]
    fn test_primary_action_is_replaced() {
        let recorder = RecordingHost::default();
        let host = HostBridge::available(recorder.clone());
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        host.configure_primary_action("Close", {
            let first = Arc::clone(&first);
            move || {
                first.fetch_add(1, Ordering::Relaxed);
            }
        });
        host.configure_primary_action("Done", {
            let second = Arc::clone(&second);
            move || {
                second.fetch_add(1, Ordering::Relaxed);
            }
        });
        recorder.fire(HostEvent::MainButtonClicked);

        assert_eq!(first.load(Ordering::Relaxed), 0);
        assert_eq!(second.load(Ordering::Relaxed), 1);
        assert_eq!(recorder.subscriptions(HostEvent::MainButtonClicked), 1);
        assert_eq!(
            recorder.calls(),
            vec![
                HostCall::MainButtonText("Close".to_owned()),
                HostCall::ShowMainButton,
                HostCall::MainButtonText("Done".to_owned()),
                HostCall::ShowMainButton,
            ]
        );
    }

    #[test]
    fn test_user_id() {
        let host = HostBridge::available(RecordingHost::with_user_id("1234"));
        assert_eq!(host.current_user_id(), "1234");

        let host = HostBridge::available(RecordingHost::default())
            .with_fallback_user_id("guest");
        assert_eq!(host.current_user_id(), "guest");

        let host = HostBridge::available(RecordingHost::with_user_id(""));
        assert_eq!(host.current_user_id(), DEFAULT_USER_ID);
    }

    #[test]
    fn test_teardown_runs_once() {
        let recorder = RecordingHost::default();
        let host = HostBridge::available(recorder.clone());
        let runs = Arc::new(AtomicUsize::new(0));
        host.on_teardown({
            let runs = Arc::clone(&runs);
            let host = host.clone();
            move || {
                runs.fetch_add(1, Ordering::Relaxed);
                host.send_data("bye");
            }
        });

        host.terminate();
        host.teardown();
        host.terminate();

        assert_eq!(runs.load(Ordering::Relaxed), 1);
        let weak = host.downgrade();
        assert!(weak.upgrade().is_some());
        assert_eq!(
            recorder.calls(),
            vec![
                HostCall::SendData("bye".to_owned()),
                HostCall::Close,
                HostCall::Close,
            ]
        );
    }
}
