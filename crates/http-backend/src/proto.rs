use miniapp_chat_backend::{ChatReply, ErrorKind};
use serde::Deserialize;

use crate::Error;

// ------------------------------
// Types received from the server
// ------------------------------

/// The body the service sends along with a failure status.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// The body of the health endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct HealthBody {
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
}

// -----------
// Conversions
// -----------

pub fn parse_reply(body: &[u8]) -> Result<ChatReply, Error> {
    serde_json::from_slice(body).map_err(|err| {
        Error::new(
            format!("invalid reply body: {err}"),
            ErrorKind::MalformedResponse,
        )
    })
}

/// Builds the error for a non-success status, keeping the server's own
/// message when it sent one.
pub fn status_error(status: u16, body: &[u8]) -> Error {
    let detail = serde_json::from_slice::<ErrorBody>(body)
        .map(|body| body.error)
        .unwrap_or_else(|_| String::from_utf8_lossy(body).into_owned());
    Error::new(format!("status {status}: {detail}"), ErrorKind::Status)
}
