use std::time::Duration;

use miniapp_chat_backend::{ChatBackend, ChatBackendError, ChatRequest, ErrorKind};
use miniapp_chat_http_backend::{HttpBackend, HttpBackendConfigBuilder};
use reqwest::Client;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio::time::timeout;

/// Serves exactly one HTTP exchange with a canned response, and returns
/// the raw request (head and body) that was received.
async fn serve_once(
    status_line: &'static str,
    body: &'static str,
) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let task = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            if is_complete(&buf) {
                break;
            }
        }

        let response = format!(
            "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).await.unwrap();
        stream.shutdown().await.ok();
        String::from_utf8(buf).unwrap()
    });

    (base_url, task)
}

fn local_backend(base_url: String) -> HttpBackend {
    let client = Client::builder().no_proxy().build().unwrap();
    HttpBackend::with_client(
        HttpBackendConfigBuilder::with_base_url(base_url).build(),
        client,
    )
}

fn is_complete(buf: &[u8]) -> bool {
    let text = String::from_utf8_lossy(buf);
    let Some(head_end) = text.find("\r\n\r\n") else {
        return false;
    };
    let content_length = text[..head_end]
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);
    buf.len() >= head_end + 4 + content_length
}

#[tokio::test]
async fn test_successful_reply() {
    let (base_url, server) =
        serve_once("HTTP/1.1 200 OK", r#"{"response":"hello","user_id":"42"}"#)
            .await;
    let backend = local_backend(base_url);

    let reply = timeout(
        Duration::from_secs(5),
        backend.send_request(&ChatRequest::new("Hi", "42")),
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(reply.response, "hello");

    let raw_request = server.await.unwrap();
    assert!(raw_request.starts_with("POST /api/chat HTTP/1.1"));
    assert!(raw_request.ends_with(r#"{"message":"Hi","user_id":"42"}"#));
}

#[tokio::test]
async fn test_failure_status() {
    let (base_url, server) = serve_once(
        "HTTP/1.1 500 Internal Server Error",
        r#"{"error":"model unavailable"}"#,
    )
    .await;
    let backend = local_backend(base_url);

    let err = backend
        .send_request(&ChatRequest::new("Hi", "web_user"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Status);
    assert!(err.message().contains("model unavailable"));
    server.await.unwrap();
}

#[tokio::test]
async fn test_malformed_body() {
    let (base_url, server) = serve_once("HTTP/1.1 200 OK", "not json").await;
    let backend = local_backend(base_url);

    let err = backend
        .send_request(&ChatRequest::new("Hi", "web_user"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    server.await.unwrap();
}

#[tokio::test]
async fn test_unreachable_service() {
    // Bind and drop a listener so the port is very likely closed.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let backend = local_backend(base_url);
    let err = backend
        .send_request(&ChatRequest::new("Hi", "web_user"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);
}

#[tokio::test]
async fn test_health() {
    let (base_url, server) = serve_once(
        "HTTP/1.1 200 OK",
        r#"{"status":"healthy","service":"Gemini AI Web App"}"#,
    )
    .await;
    let backend = local_backend(base_url);

    let health = backend.health().await.unwrap();
    assert!(health.is_healthy());
    assert_eq!(health.service.as_deref(), Some("Gemini AI Web App"));

    let raw_request = server.await.unwrap();
    assert!(raw_request.starts_with("GET /health HTTP/1.1"));
}
