//! Recording fakes of the host, the advertising SDK and the transcript
//! renderer, for tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};

use crate::ads::{AdFormat, AdRequest, AdSdk};
use crate::host::{HostCapabilities, HostEvent, HostEventHandler};
use crate::transcript::{EntryHandle, MessageEntry, TranscriptRenderer};

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A call received by [`RecordingHost`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum HostCall {
    /// `ready`
    Ready,
    /// `expand`
    Expand,
    /// `set_main_button_text`
    MainButtonText(String),
    /// `show_main_button`
    ShowMainButton,
    /// `show_alert`
    Alert(String),
    /// `close`
    Close,
    /// `send_data`
    SendData(String),
}

#[derive(Default)]
struct HostRecord {
    calls: Vec<HostCall>,
    handlers: HashMap<HostEvent, Vec<HostEventHandler>>,
}

/// A host that records every call and lets tests fire events.
#[derive(Clone, Default)]
pub struct RecordingHost {
    record: Arc<Mutex<HostRecord>>,
    user_id: Option<String>,
}

impl RecordingHost {
    /// Creates a host that reports the given user id.
    pub fn with_user_id<S: Into<String>>(user_id: S) -> Self {
        Self {
            record: Default::default(),
            user_id: Some(user_id.into()),
        }
    }

    /// Returns the calls received so far, subscriptions excluded.
    pub fn calls(&self) -> Vec<HostCall> {
        lock(&self.record).calls.clone()
    }

    /// Returns the alerts shown so far.
    pub fn alerts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                HostCall::Alert(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    /// Returns how many handlers are subscribed to `event`.
    pub fn subscriptions(&self, event: HostEvent) -> usize {
        lock(&self.record).handlers.get(&event).map_or(0, Vec::len)
    }

    /// Delivers `event` to every subscribed handler.
    pub fn fire(&self, event: HostEvent) {
        let handlers = lock(&self.record)
            .handlers
            .get(&event)
            .cloned()
            .unwrap_or_default();
        for handler in handlers {
            handler();
        }
    }

    fn push(&self, call: HostCall) {
        lock(&self.record).calls.push(call);
    }
}

impl HostCapabilities for RecordingHost {
    fn ready(&self) {
        self.push(HostCall::Ready);
    }

    fn expand(&self) {
        self.push(HostCall::Expand);
    }

    fn set_main_button_text(&self, text: &str) {
        self.push(HostCall::MainButtonText(text.to_owned()));
    }

    fn show_main_button(&self) {
        self.push(HostCall::ShowMainButton);
    }

    fn subscribe(&self, event: HostEvent, handler: HostEventHandler) {
        lock(&self.record)
            .handlers
            .entry(event)
            .or_default()
            .push(handler);
    }

    fn show_alert(&self, message: &str) {
        self.push(HostCall::Alert(message.to_owned()));
    }

    fn close(&self) {
        self.push(HostCall::Close);
    }

    fn send_data(&self, data: &str) {
        self.push(HostCall::SendData(data.to_owned()));
    }

    fn user_id(&self) -> Option<String> {
        self.user_id.clone()
    }
}

/// A call received by [`RecordingAdSdk`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SdkCall {
    /// `present` with the format and slot id.
    Present(AdFormat, String),
    /// `push_opt_in` with the style id.
    PushOptIn(String),
}

enum Scripted {
    Fail(String),
    Drop,
}

#[derive(Default)]
struct SdkRecord {
    calls: Vec<SdkCall>,
    script: VecDeque<Scripted>,
}

/// An advertising SDK that records every call.
///
/// Unless scripted otherwise, interstitials are closed and videos are
/// watched to the end right away.
#[derive(Clone, Default)]
pub struct RecordingAdSdk {
    record: Arc<Mutex<SdkRecord>>,
}

impl RecordingAdSdk {
    /// Returns the calls received so far.
    pub fn calls(&self) -> Vec<SdkCall> {
        lock(&self.record).calls.clone()
    }

    /// Returns the formats presented so far, banners excluded.
    pub fn presented(&self) -> Vec<AdFormat> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SdkCall::Present(AdFormat::Banner { .. }, _) => None,
                SdkCall::Present(format, _) => Some(format),
                SdkCall::PushOptIn(_) => None,
            })
            .collect()
    }

    /// Makes the next presented ad fail with `detail`.
    pub fn fail_next<S: Into<String>>(&self, detail: S) {
        lock(&self.record)
            .script
            .push_back(Scripted::Fail(detail.into()));
    }

    /// Makes the next presented ad end without reporting anything.
    pub fn drop_next(&self) {
        lock(&self.record).script.push_back(Scripted::Drop);
    }
}

impl AdSdk for RecordingAdSdk {
    fn present(&self, request: AdRequest) {
        let AdRequest {
            format,
            slot_id,
            completion,
        } = request;
        let scripted = {
            let mut record = lock(&self.record);
            record.calls.push(SdkCall::Present(format.clone(), slot_id));
            match completion {
                Some(_) => record.script.pop_front(),
                None => None,
            }
        };

        let Some(completion) = completion else {
            return;
        };
        match (scripted, format) {
            (Some(Scripted::Fail(detail)), _) => completion.failed(detail),
            (Some(Scripted::Drop), _) => drop(completion),
            (None, AdFormat::Video) => completion.completed(),
            (None, _) => completion.closed(),
        }
    }

    fn push_opt_in(&self, style_id: &str) {
        lock(&self.record)
            .calls
            .push(SdkCall::PushOptIn(style_id.to_owned()));
    }
}

/// Something that happened to a [`RecordingRenderer`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum RenderEvent {
    /// An entry was appended.
    Appended(MessageEntry),
    /// An entry was removed.
    Removed(EntryHandle),
    /// The view scrolled to the end.
    Scrolled,
}

/// A transcript renderer that records what it was asked to draw.
#[derive(Clone, Default)]
pub struct RecordingRenderer {
    events: Arc<Mutex<Vec<RenderEvent>>>,
}

impl RecordingRenderer {
    /// Returns the events so far.
    pub fn events(&self) -> Vec<RenderEvent> {
        lock(&self.events).clone()
    }
}

impl TranscriptRenderer for RecordingRenderer {
    fn entry_appended(&self, _handle: EntryHandle, entry: &MessageEntry) {
        lock(&self.events).push(RenderEvent::Appended(entry.clone()));
    }

    fn entry_removed(&self, handle: EntryHandle) {
        lock(&self.events).push(RenderEvent::Removed(handle));
    }

    fn scroll_to_end(&self) {
        lock(&self.events).push(RenderEvent::Scrolled);
    }
}
