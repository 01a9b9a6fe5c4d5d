use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::future::ready;
use std::time::Duration;

use miniapp_chat_backend::{
    ChatBackend, ChatBackendError, ChatReply, ChatRequest, ErrorKind,
};
use tokio::time::sleep;

#[derive(Debug)]
struct FakeBackendError(ErrorKind);

impl Display for FakeBackendError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl Error for FakeBackendError {}

impl ChatBackendError for FakeBackendError {
    fn kind(&self) -> ErrorKind {
        self.0
    }
}

struct EchoBackend;

impl ChatBackend for EchoBackend {
    type Error = FakeBackendError;

    fn send_request(
        &self,
        req: &ChatRequest,
    ) -> impl Future<Output = Result<ChatReply, Self::Error>> + Send + 'static
    {
        let result = if req.message.is_empty() {
            Err(FakeBackendError(ErrorKind::MalformedResponse))
        } else {
            Ok(ChatReply::new(format!(
                "{} said {}",
                req.user_id, req.message
            )))
        };
        async move {
            sleep(Duration::from_millis(1)).await;
            result
        }
    }
}

struct BrokenBackend;

impl ChatBackend for BrokenBackend {
    type Error = FakeBackendError;

    fn send_request(
        &self,
        _req: &ChatRequest,
    ) -> impl Future<Output = Result<ChatReply, Self::Error>> + Send + 'static
    {
        ready(Err(FakeBackendError(ErrorKind::Network)))
    }
}

#[tokio::test]
async fn test_reply() {
    let backend = EchoBackend;
    let req = ChatRequest::new("Good morning", "web_user");
    let fut = backend.send_request(&req);
    // The future must not borrow the backend.
    drop(backend);
    let reply = fut.await.unwrap();
    assert_eq!(reply.response, "web_user said Good morning");
}

#[tokio::test]
async fn test_error() {
    let result = BrokenBackend
        .send_request(&ChatRequest::new("Hi", "web_user"))
        .await;
    let err = result.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);

    let err = EchoBackend
        .send_request(&ChatRequest::new("", "web_user"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedResponse);
}

#[test]
fn test_wire_format() {
    let req = ChatRequest::new("Hello", "1234");
    let value = serde_json::to_value(&req).unwrap();
    assert_eq!(
        value,
        serde_json::json!({ "message": "Hello", "user_id": "1234" })
    );
}
