//! A host, an advertising SDK and a transcript renderer that live in the
//! terminal.

use std::collections::HashMap;
use std::io::Write as _;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use miniapp_chat::core::ads::{AdFormat, AdRequest, AdSdk};
use miniapp_chat::core::host::{HostCapabilities, HostEvent, HostEventHandler};
use miniapp_chat::core::transcript::{
    EntryHandle, EntryStyle, MessageEntry, TranscriptRenderer,
};
use owo_colors::OwoColorize;
use tokio::sync::mpsc;
use tokio::time::sleep;

const BAR_CHAR: &str = "▎";

/// How long a simulated full-screen ad stays on screen.
const AD_DURATION: Duration = Duration::from_millis(1500);

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Events the terminal host reports to the input loop.
pub enum CliEvent {
    /// No request is in flight anymore.
    Idle,
    /// The host was asked to close the surface.
    Closed,
}

#[derive(Clone)]
pub struct TerminalHost {
    user_id: Option<String>,
    event_tx: mpsc::UnboundedSender<CliEvent>,
    handlers: Arc<Mutex<HashMap<HostEvent, Vec<HostEventHandler>>>>,
}

impl TerminalHost {
    pub fn new(
        user_id: Option<String>,
        event_tx: mpsc::UnboundedSender<CliEvent>,
    ) -> Self {
        Self {
            user_id,
            event_tx,
            handlers: Default::default(),
        }
    }

    /// Delivers `event` as if the user pressed the matching button.
    pub fn fire(&self, event: HostEvent) {
        let handlers = lock(&self.handlers)
            .get(&event)
            .cloned()
            .unwrap_or_default();
        if handlers.is_empty() {
            debug!("nobody listens to {}", event.name());
        }
        for handler in handlers {
            handler();
        }
    }

    fn note(&self, what: impl std::fmt::Display) {
        println!("{}{}", BAR_CHAR.bright_black(), what.bright_black());
    }
}

impl HostCapabilities for TerminalHost {
    fn ready(&self) {
        self.note("host: ready");
    }

    fn expand(&self) {
        self.note("host: expanded");
    }

    fn set_main_button_text(&self, text: &str) {
        self.note(format!("host: main button is now \"{text}\" (/close)"));
    }

    fn show_main_button(&self) {
        trace!("main button shown");
    }

    fn subscribe(&self, event: HostEvent, handler: HostEventHandler) {
        lock(&self.handlers).entry(event).or_default().push(handler);
    }

    fn show_alert(&self, message: &str) {
        println!("{}🔔 {}", BAR_CHAR.bright_yellow(), message.bold());
    }

    fn close(&self) {
        self.note("host: closing");
        self.event_tx.send(CliEvent::Closed).ok();
    }

    fn send_data(&self, data: &str) {
        self.note(format!("host: data sent to bot: {data}"));
    }

    fn user_id(&self) -> Option<String> {
        self.user_id.clone()
    }
}

/// An advertising SDK that prints ads instead of displaying them.
///
/// Full-screen ads end on their own after a short while: interstitials
/// are closed and videos are watched to the end.
pub struct TerminalAdSdk;

impl AdSdk for TerminalAdSdk {
    fn present(&self, request: AdRequest) {
        let AdRequest {
            format,
            slot_id,
            completion,
        } = request;
        match &format {
            AdFormat::Banner { container_id } => println!(
                "{}📢 banner {} in #{}",
                BAR_CHAR.bright_magenta(),
                slot_id.bold(),
                container_id
            ),
            format => println!(
                "{}📺 {} ad {}",
                BAR_CHAR.bright_magenta(),
                format.name(),
                slot_id.bold()
            ),
        }

        let Some(completion) = completion else {
            return;
        };
        tokio::spawn(async move {
            sleep(AD_DURATION).await;
            match format {
                AdFormat::Video => completion.completed(),
                _ => completion.closed(),
            }
        });
    }

    fn push_opt_in(&self, style_id: &str) {
        println!(
            "{}🔕 push opt-in requested ({})",
            BAR_CHAR.bright_magenta(),
            style_id
        );
    }
}

/// Draws the transcript to stdout, with a spinner standing in for the
/// pending placeholder.
pub struct TerminalRenderer {
    spinner_style: ProgressStyle,
    spinners: Mutex<HashMap<EntryHandle, ProgressBar>>,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        let spinner_style = ProgressStyle::with_template("{spinner} {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
        Self {
            spinner_style,
            spinners: Default::default(),
        }
    }
}

impl TranscriptRenderer for TerminalRenderer {
    fn entry_appended(&self, handle: EntryHandle, entry: &MessageEntry) {
        match entry.style() {
            // Already on screen, the user typed it.
            EntryStyle::User => {}
            EntryStyle::Assistant => {
                println!(
                    "{}🤖 {}",
                    BAR_CHAR.bright_cyan(),
                    entry.text.bright_white()
                );
            }
            EntryStyle::Pending => {
                let spinner = ProgressBar::new_spinner();
                spinner.set_style(self.spinner_style.clone());
                spinner.set_message(format!("🤔 {}", entry.text));
                spinner.enable_steady_tick(Duration::from_millis(100));
                lock(&self.spinners).insert(handle, spinner);
            }
        }
    }

    fn entry_removed(&self, handle: EntryHandle) {
        if let Some(spinner) = lock(&self.spinners).remove(&handle) {
            spinner.finish_and_clear();
        }
    }

    fn scroll_to_end(&self) {
        std::io::stdout().flush().ok();
    }
}
