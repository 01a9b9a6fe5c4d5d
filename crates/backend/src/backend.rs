use std::error::Error;

use crate::error::ErrorKind;
use crate::reply::ChatReply;
use crate::request::ChatRequest;

/// The error type for a chat backend.
pub trait ChatBackendError: Error + Send + Sync + 'static {
    /// Returns the kind of this error.
    fn kind(&self) -> ErrorKind;
}

/// A type that represents a chat-completion service.
///
/// Once the backend is created, it should behave like a stateless object.
/// It can still have internal state, but callers should not rely on it,
/// and the backend should be prepared for being dropped anytime. Several
/// requests may be in flight at the same time.
pub trait ChatBackend: Send + Sync {
    /// The error type that may be returned by the backend.
    type Error: ChatBackendError;

    /// Sends a request to the service.
    ///
    /// The returned future must be fully independent of `self`, so that
    /// the caller can move it into another task.
    fn send_request(
        &self,
        req: &ChatRequest,
    ) -> impl Future<Output = Result<ChatReply, Self::Error>> + Send + 'static;
}
