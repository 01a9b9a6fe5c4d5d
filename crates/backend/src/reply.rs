use serde::{Deserialize, Serialize};

/// A successful reply from the chat backend.
///
/// On the wire this is `{"response": ..}`. Services may add more fields
/// (some echo the `user_id` back), which are ignored.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatReply {
    /// The assistant's text.
    pub response: String,
}

impl ChatReply {
    /// Creates a new `ChatReply`.
    #[inline]
    pub fn new<S: Into<String>>(response: S) -> Self {
        Self {
            response: response.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extra_fields_are_ignored() {
        let reply: ChatReply = serde_json::from_str(
            r#"{"response": "Hi there", "user_id": "42"}"#,
        )
        .unwrap();
        assert_eq!(reply, ChatReply::new("Hi there"));
    }

    #[test]
    fn test_missing_response_is_rejected() {
        let reply = serde_json::from_str::<ChatReply>(r#"{"error": "boom"}"#);
        assert!(reply.is_err());
    }
}
