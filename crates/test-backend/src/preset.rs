use std::time::Duration;

use miniapp_chat_backend::ErrorKind;
use serde::{Deserialize, Serialize};

/// How a scripted request should fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresetFailure {
    /// The request is rejected before any answer arrives.
    Network,
    /// The service answers with a non-success status.
    Status,
    /// The service answers with a body that is not a reply.
    MalformedBody,
}

impl PresetFailure {
    #[inline]
    pub(crate) fn kind(self) -> ErrorKind {
        match self {
            PresetFailure::Network => ErrorKind::Network,
            PresetFailure::Status => ErrorKind::Status,
            PresetFailure::MalformedBody => ErrorKind::MalformedResponse,
        }
    }
}

/// What a scripted request resolves to.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PresetOutcome {
    /// A successful reply with the given text.
    #[serde(rename = "reply")]
    Reply(String),
    /// A failed request.
    #[serde(rename = "failure")]
    Failure(PresetFailure),
    /// The request never resolves.
    #[serde(rename = "hang")]
    Hang,
}

/// The preset answer for one request.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PresetReply {
    /// The outcome of the request.
    pub outcome: PresetOutcome,
    /// If set, overrides the backend's delay for this request.
    pub delay: Option<Duration>,
}

impl PresetReply {
    /// Creates a `PresetReply` that succeeds with the given text.
    #[inline]
    pub fn text<S: Into<String>>(text: S) -> Self {
        Self {
            outcome: PresetOutcome::Reply(text.into()),
            delay: None,
        }
    }

    /// Creates a `PresetReply` that fails.
    #[inline]
    pub fn failure(failure: PresetFailure) -> Self {
        Self {
            outcome: PresetOutcome::Failure(failure),
            delay: None,
        }
    }

    /// Creates a `PresetReply` that never resolves.
    #[inline]
    pub fn hang() -> Self {
        Self {
            outcome: PresetOutcome::Hang,
            delay: None,
        }
    }

    /// Sets the delay before this reply is delivered.
    #[inline]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_deserialize() {
        let replies = vec![
            PresetReply::text("Hello!"),
            PresetReply::failure(PresetFailure::MalformedBody)
                .with_delay(Duration::from_millis(20)),
            PresetReply::hang(),
        ];

        let serialized = serde_json::to_string(&replies).unwrap();
        let deserialized: Vec<PresetReply> =
            serde_json::from_str(&serialized).unwrap();

        assert_eq!(replies, deserialized);
    }

    #[test]
    fn test_failure_kinds() {
        assert_eq!(PresetFailure::Network.kind(), ErrorKind::Network);
        assert_eq!(
            PresetFailure::MalformedBody.kind(),
            ErrorKind::MalformedResponse
        );
    }
}
