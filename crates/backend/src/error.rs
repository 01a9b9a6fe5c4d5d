use std::fmt::{self, Display};

/// The kind of error that occurred.
///
/// Callers of a chat backend treat every kind the same way when it comes
/// to the user, the distinction only exists for logs and tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The request never reached the service, or the connection broke.
    Network,
    /// The service answered with a non-success status.
    Status,
    /// The service answered, but the body is not a valid reply.
    MalformedResponse,
    /// The service didn't answer in time.
    Timeout,
    /// Any other errors.
    Other,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Network => write!(f, "Network error"),
            ErrorKind::Status => write!(f, "Unexpected status"),
            ErrorKind::MalformedResponse => write!(f, "Malformed response"),
            ErrorKind::Timeout => write!(f, "Timed out"),
            ErrorKind::Other => write!(f, "Other error"),
        }
    }
}
