use serde::{Deserialize, Serialize};

/// A request to be sent to the chat backend.
///
/// This is also the JSON body on the wire: `{"message": .., "user_id": ..}`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The user's message, already trimmed.
    pub message: String,
    /// An opaque identifier of the user, passed through as is.
    pub user_id: String,
}

impl ChatRequest {
    /// Creates a new `ChatRequest`.
    #[inline]
    pub fn new<M: Into<String>, U: Into<String>>(message: M, user_id: U) -> Self {
        Self {
            message: message.into(),
            user_id: user_id.into(),
        }
    }
}
