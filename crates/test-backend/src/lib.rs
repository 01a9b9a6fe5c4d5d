//! A local scripted chat backend for testing purpose.

mod preset;

use std::collections::VecDeque;
use std::error::Error as StdError;
use std::fmt::{self, Debug, Display, Formatter};
use std::future::pending;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use miniapp_chat_backend::{
    ChatBackend, ChatBackendError, ChatReply, ChatRequest, ErrorKind,
};
use tokio::time::sleep;

pub use preset::*;

#[derive(Debug)]
pub struct Error {
    #[allow(dead_code)]
    message: &'static str,
    kind: ErrorKind,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(self, f)
    }
}

impl StdError for Error {}

impl ChatBackendError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

#[derive(Default)]
struct Script {
    replies: VecDeque<PresetReply>,
    requests: Vec<ChatRequest>,
    delay: Option<Duration>,
}

/// A local fake chat backend for testing purpose.
///
/// Before sending requests, you need to setup the script, which is how
/// the backend should answer. Each request consumes the next preset
/// reply in order. If the script runs out, an error will be returned.
///
/// Clones share the same script, so a test can keep a clone around to
/// inspect the received requests after handing the backend over.
#[derive(Clone, Default)]
pub struct TestChatBackend {
    script: Arc<Mutex<Script>>,
}

impl TestChatBackend {
    #[inline]
    pub fn add_reply(&self, preset: PresetReply) {
        self.with_script(|script| script.replies.push_back(preset));
    }

    #[inline]
    pub fn add_text_reply<S: Into<String>>(&self, text: S) {
        self.add_reply(PresetReply::text(text));
    }

    /// Sets the default delay of every reply.
    #[inline]
    pub fn set_delay(&self, duration: Duration) {
        self.with_script(|script| script.delay = Some(duration));
    }

    /// Returns the requests received so far.
    #[inline]
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.with_script(|script| script.requests.clone())
    }

    fn with_script<R>(&self, f: impl FnOnce(&mut Script) -> R) -> R {
        let mut script =
            self.script.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut script)
    }
}

impl ChatBackend for TestChatBackend {
    type Error = crate::Error;

    fn send_request(
        &self,
        req: &ChatRequest,
    ) -> impl Future<Output = Result<ChatReply, Self::Error>> + Send + 'static
    {
        let (preset, delay) = self.with_script(|script| {
            script.requests.push(req.clone());
            (script.replies.pop_front(), script.delay)
        });

        async move {
            let Some(preset) = preset else {
                return Err(Error {
                    message: "no enough replies",
                    kind: ErrorKind::Other,
                });
            };

            let delay = preset.delay.or(delay).unwrap_or(Duration::from_millis(1));
            sleep(delay).await;

            match preset.outcome {
                PresetOutcome::Reply(text) => Ok(ChatReply::new(text)),
                PresetOutcome::Failure(failure) => Err(Error {
                    message: "scripted failure",
                    kind: failure.kind(),
                }),
                PresetOutcome::Hang => pending().await,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::time::timeout;

    use super::*;

    #[tokio::test]
    async fn test_send_request() {
        let backend = TestChatBackend::default();
        backend.add_text_reply("Hello, world!");
        backend.add_reply(PresetReply::failure(PresetFailure::Status));

        let req = ChatRequest::new("Hi", "web_user");
        let reply = backend.send_request(&req).await.unwrap();
        assert_eq!(reply.response, "Hello, world!");

        let err = backend.send_request(&req).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Status);

        // The script is exhausted now.
        let err = backend.send_request(&req).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Other);

        assert_eq!(backend.requests().len(), 3);
        assert_eq!(backend.requests()[0], req);
    }

    #[tokio::test]
    async fn test_clones_share_script() {
        let backend = TestChatBackend::default();
        let observer = backend.clone();
        backend.add_text_reply("ok");

        observer
            .send_request(&ChatRequest::new("ping", "42"))
            .await
            .unwrap();
        assert_eq!(backend.requests()[0].user_id, "42");
    }

    #[tokio::test(start_paused = true)]
    async fn test_hang() {
        let backend = TestChatBackend::default();
        backend.add_reply(PresetReply::hang());

        let fut = backend.send_request(&ChatRequest::new("Hi", "web_user"));
        let result = timeout(Duration::from_secs(3600), fut).await;
        assert!(result.is_err());
    }
}
