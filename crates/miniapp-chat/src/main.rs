//! Runs the chat mini app in the terminal, with the terminal standing in
//! for the messaging host and the advertising SDK.
//!
//! Type a message to chat, `/close` to press the close button, or `/back`
//! to press the host's back button.

#[macro_use]
extern crate tracing;

mod settings;
mod terminal;

use std::io::Write as _;

use miniapp_chat::MiniAppBuilder;
use miniapp_chat::core::ads::AdSdkSlot;
use miniapp_chat::core::host::{HostBridge, HostEvent};
use miniapp_chat::http::{HttpBackend, HttpBackendConfigBuilder};
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;

use crate::settings::Settings;
use crate::terminal::{CliEvent, TerminalAdSdk, TerminalHost, TerminalRenderer};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("{err}");
            return;
        }
    };

    let config = HttpBackendConfigBuilder::with_base_url(&settings.chat_url)
        .build();
    let backend = HttpBackend::new(config);
    match backend.health().await {
        Ok(health) if health.is_healthy() => {
            info!("chat service at {} is healthy", settings.chat_url);
        }
        Ok(health) => {
            warn!("chat service reports status {:?}", health.status);
        }
        Err(err) => {
            warn!("chat service health check failed: {}", err);
        }
    }

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let terminal_host = TerminalHost::new(settings.user_id, event_tx.clone());

    let app = MiniAppBuilder::with_backend(backend)
        .with_config(settings.config)
        .with_host(HostBridge::available(terminal_host.clone()))
        .with_ad_sdk_slot(AdSdkSlot::loaded(TerminalAdSdk))
        .with_renderer(TerminalRenderer::new())
        .on_idle(move || {
            event_tx.send(CliEvent::Idle).ok();
        })
        .build();

    let mut stdin = io::BufReader::new(io::stdin());
    loop {
        print!("> ");
        std::io::stdout().flush().ok();

        let Some(line) = read_line(&mut stdin).await else {
            app.close();
            break;
        };
        match line.trim() {
            "" => continue,
            "/close" => terminal_host.fire(HostEvent::MainButtonClicked),
            "/back" => terminal_host.fire(HostEvent::BackButtonClicked),
            text => app.submit(text),
        }

        match event_rx.recv().await {
            Some(CliEvent::Idle) => {}
            Some(CliEvent::Closed) | None => {
                app.session().close();
                break;
            }
        }
    }

    info!("{} message(s) sent", app.session().messages_sent());
}

/// Reads one line. The reader is kept across calls, so lines it has
/// buffered ahead are not lost.
async fn read_line<R: AsyncBufRead + Unpin>(reader: &mut R) -> Option<String> {
    let mut line = String::new();

    match reader.read_line(&mut line).await {
        Ok(count) => {
            if count == 0 {
                return None;
            }
            Some(line)
        }
        Err(err) => {
            error!("error reading input: {}", err);
            None
        }
    }
}
