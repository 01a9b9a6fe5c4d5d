use std::fmt::{self, Debug};

use miniapp_chat_actor::{Actor, Message};
use miniapp_chat_backend::{ChatReply, ChatRequest};
use tokio::task::JoinHandle;

use super::{ERROR_TEXT, PENDING_TEXT, REWARD_TEXT, SessionState};
use crate::ads::AdOutcome;
use crate::backend_client::BackendFailure;
use crate::cadence::{AdDecision, AdPick};
use crate::config::InFlightPolicy;
use crate::transcript::{EntryHandle, MessageEntry};

/// A request waiting for its reply, with the placeholder shown for it.
pub struct InFlightRequest {
    pending: EntryHandle,
    /// The message count this send produced.
    messages_sent: u64,
    task: JoinHandle<()>,
}

impl SessionState {
    fn submit(&mut self, text: &str, handle: &Actor<Self>) {
        let text = text.trim();
        if text.is_empty() {
            trace!("ignoring empty input");
            return;
        }
        if self.config.in_flight_policy() == InFlightPolicy::Single
            && !self.in_flight.is_empty()
        {
            debug!("a request is already in flight, ignoring input");
            return;
        }

        self.transcript.append_entry(MessageEntry::user(text));
        let messages_sent = self.counters.record_send();
        let pending =
            self.transcript.append_entry(MessageEntry::pending(PENDING_TEXT));

        let request_id = self.next_request_id;
        self.next_request_id += 1;
        debug!(request_id, messages_sent, "sending a message");

        let request = ChatRequest::new(text, self.host.current_user_id());
        let fut = self.backend.send_request(request);
        let handle = handle.clone();
        let task = tokio::spawn(async move {
            let result = fut.await;
            handle.send(ReplyArrived { request_id, result }).ok();
        });
        self.in_flight.insert(
            request_id,
            InFlightRequest {
                pending,
                messages_sent,
                task,
            },
        );
    }

    fn finish_request(
        &mut self,
        request_id: u64,
        result: Result<ChatReply, BackendFailure>,
    ) {
        let Some(request) = self.in_flight.remove(&request_id) else {
            warn!(request_id, "reply for an unknown request");
            return;
        };
        self.transcript.remove_entry(request.pending);

        match result {
            Ok(reply) => {
                self.transcript
                    .append_entry(MessageEntry::assistant(reply.response));
                self.run_ad_cadence(request.messages_sent);
            }
            Err(err) => {
                // The user only ever sees the fixed message.
                warn!(request_id, "chat request failed: {err}");
                self.transcript.append_entry(MessageEntry::assistant(ERROR_TEXT));
            }
        }

        if self.in_flight.is_empty() {
            if let Some(on_idle) = &self.on_idle {
                on_idle();
            }
        }
    }

    fn run_ad_cadence(&mut self, messages_sent: u64) {
        let AdDecision::Show(pick) =
            self.cadence.evaluate(messages_sent, &mut self.rng)
        else {
            return;
        };
        debug!(messages_sent, "ad cadence fired: {pick:?}");

        let slots = self.config.ad_slots();
        match pick {
            AdPick::Interstitial => {
                let Some(ticket) =
                    self.ads.show_interstitial(&slots.interstitial_banner)
                else {
                    return;
                };
                tokio::spawn(async move {
                    match ticket.outcome().await {
                        Some(AdOutcome::Failed(detail)) => {
                            warn!("interstitial ad error: {detail}");
                        }
                        Some(outcome) => {
                            debug!("interstitial ad ended: {outcome:?}");
                        }
                        None => trace!("interstitial ad reported nothing"),
                    }
                });
            }
            AdPick::Video => {
                let Some(ticket) =
                    self.ads.show_video(&slots.interstitial_video)
                else {
                    return;
                };
                let host = self.host.clone();
                tokio::spawn(async move {
                    match ticket.outcome().await {
                        Some(AdOutcome::Completed) => {
                            debug!("video ad completed");
                            host.notify_alert(REWARD_TEXT);
                        }
                        Some(AdOutcome::Failed(detail)) => {
                            warn!("video ad error: {detail}");
                        }
                        Some(outcome) => {
                            debug!("video ad ended: {outcome:?}");
                        }
                        None => trace!("video ad reported nothing"),
                    }
                });
            }
        }
    }
}

impl Drop for SessionState {
    fn drop(&mut self) {
        for (_, request) in self.in_flight.drain() {
            request.task.abort();
        }
    }
}

#[derive(Debug)]
pub struct Submit(pub String);

impl Message<SessionState> for Submit {
    #[inline]
    fn handle(self, state: &mut SessionState, handle: &Actor<SessionState>) {
        state.submit(&self.0, handle);
    }
}

struct ReplyArrived {
    request_id: u64,
    result: Result<ChatReply, BackendFailure>,
}

impl Debug for ReplyArrived {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReplyArrived")
            .field("request_id", &self.request_id)
            .field("ok", &self.result.is_ok())
            .finish()
    }
}

impl Message<SessionState> for ReplyArrived {
    #[inline]
    fn handle(self, state: &mut SessionState, _handle: &Actor<SessionState>) {
        state.finish_request(self.request_id, self.result);
    }
}
