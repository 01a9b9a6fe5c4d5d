//! A chat backend that talks to the mini app's HTTP service.
//!
//! The service exposes `POST /api/chat` taking `{"message", "user_id"}`
//! and answering `{"response"}`, plus a `GET /health` probe.

#[macro_use]
extern crate tracing;

mod config;
mod proto;

use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::sync::Arc;

use miniapp_chat_backend::{
    ChatBackend, ChatBackendError, ChatReply, ChatRequest, ErrorKind,
};
use reqwest::{Client, header};

pub use config::{HttpBackendConfig, HttpBackendConfigBuilder};

/// Error type for [`HttpBackend`].
#[derive(Debug)]
pub struct Error {
    message: String,
    kind: ErrorKind,
}

impl Error {
    fn new(message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    /// Returns the error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for Error {}

impl ChatBackendError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// The state reported by the health endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HealthStatus {
    /// The raw status string, `"healthy"` when all is well.
    pub status: String,
    /// The service name, if reported.
    pub service: Option<String>,
}

impl HealthStatus {
    /// Returns `true` if the service reports itself healthy.
    #[inline]
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// HTTP chat backend.
#[derive(Clone, Debug)]
pub struct HttpBackend {
    client: Client,
    config: Arc<HttpBackendConfig>,
}

impl HttpBackend {
    /// Creates a new `HttpBackend` with the given configuration.
    #[inline]
    pub fn new(config: HttpBackendConfig) -> Self {
        Self::with_client(config, Client::new())
    }

    /// Creates a new `HttpBackend` that sends requests through a
    /// preconfigured client (proxies, TLS roots, user agent, etc.).
    #[inline]
    pub fn with_client(config: HttpBackendConfig, client: Client) -> Self {
        Self {
            client,
            config: Arc::new(config),
        }
    }

    /// Probes the health endpoint of the service.
    pub async fn health(&self) -> Result<HealthStatus, Error> {
        let resp = self
            .client
            .get(self.config.health_url())
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| Error::new(format!("{err}"), ErrorKind::Network))?;

        let status = resp.status();
        let body = resp
            .bytes()
            .await
            .map_err(|err| Error::new(format!("{err}"), ErrorKind::Network))?;
        if !status.is_success() {
            return Err(proto::status_error(status.as_u16(), &body));
        }

        let body: proto::HealthBody =
            serde_json::from_slice(&body).map_err(|err| {
                Error::new(
                    format!("invalid health body: {err}"),
                    ErrorKind::MalformedResponse,
                )
            })?;
        Ok(HealthStatus {
            status: body.status,
            service: body.service,
        })
    }
}

impl ChatBackend for HttpBackend {
    type Error = Error;

    fn send_request(
        &self,
        req: &ChatRequest,
    ) -> impl Future<Output = Result<ChatReply, Self::Error>> + Send + 'static
    {
        let url = self.config.chat_url();
        trace!("posting a chat request to {url}");
        let resp_fut = self
            .client
            .post(url)
            .header(header::ACCEPT, "application/json")
            .json(req)
            .send();

        async move {
            let resp = match resp_fut.await {
                Ok(resp) => resp,
                Err(err) => {
                    return Err(Error::new(format!("{err}"), ErrorKind::Network));
                }
            };

            let status = resp.status();
            let body = match resp.bytes().await {
                Ok(body) => body,
                Err(err) => {
                    return Err(Error::new(format!("{err}"), ErrorKind::Network));
                }
            };
            if !status.is_success() {
                return Err(proto::status_error(status.as_u16(), &body));
            }

            // Here we got a successful response.
            proto::parse_reply(&body)
        }
    }
}
