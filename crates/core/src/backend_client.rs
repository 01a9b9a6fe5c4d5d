use std::error::Error;
use std::fmt::{self, Display};
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use miniapp_chat_backend::{
    ChatBackend, ChatBackendError, ChatReply, ChatRequest, ErrorKind,
};
use tokio::time::timeout;
use tracing::Instrument;

type SendRequestResult = Result<ChatReply, BackendFailure>;
type BoxedSendRequestFuture =
    Pin<Box<dyn Future<Output = SendRequestResult> + Send>>;
type HandlerFn =
    Arc<dyn Fn(ChatRequest) -> BoxedSendRequestFuture + Send + Sync>;

/// A wrapper around a chat backend that provides a type-erased interface
/// for the session, and bounds how long a request may take.
#[derive(Clone)]
pub struct BackendClient {
    handler_fn: HandlerFn,
    timeout: Option<Duration>,
}

impl BackendClient {
    #[inline]
    pub fn new<B: ChatBackend + 'static>(backend: B) -> Self {
        // Erase `B`, the session doesn't want a generic parameter.
        let handler_fn: HandlerFn = Arc::new(
            move |req: ChatRequest| -> BoxedSendRequestFuture {
                let fut = backend.send_request(&req);
                Box::pin(async move {
                    trace!("got a request: {req:?}");
                    fut.await.map_err(BackendFailure::from_backend::<B>)
                })
            },
        );
        Self {
            handler_fn,
            timeout: None,
        }
    }

    #[inline]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sends a request and returns a future of its result.
    ///
    /// The future doesn't borrow the client, so it can be spawned.
    pub fn send_request(&self, req: ChatRequest) -> BoxedSendRequestFuture {
        let fut = (self.handler_fn)(req);
        let limit = self.timeout;
        Box::pin(
            async move {
                let result = match limit {
                    Some(limit) => match timeout(limit, fut).await {
                        Ok(result) => result,
                        Err(_) => Err(BackendFailure {
                            kind: ErrorKind::Timeout,
                            detail: format!("no reply within {limit:?}"),
                        }),
                    },
                    None => fut.await,
                };
                match &result {
                    Ok(_) => trace!("finished a request"),
                    Err(err) => debug!("got an error: {err}"),
                }
                result
            }
            .instrument(trace_span!("backend client req")),
        )
    }
}

/// A type-erased backend error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackendFailure {
    pub kind: ErrorKind,
    pub detail: String,
}

impl BackendFailure {
    fn from_backend<B: ChatBackend>(err: B::Error) -> Self {
        Self {
            kind: err.kind(),
            detail: err.to_string(),
        }
    }
}

impl Display for BackendFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.detail)
    }
}

impl Error for BackendFailure {}
