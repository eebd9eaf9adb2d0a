use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::body::Bytes;
use std::time::Duration;

use super::{AttemptFailure, EndpointCandidate};

/// Performs a single GET against an upstream candidate.
#[async_trait]
pub trait Upstream: Send + Sync {
    async fn fetch(&self, endpoint: &EndpointCandidate) -> Result<Bytes, AttemptFailure>;
}

/// `reqwest`-backed upstream with a per-request timeout.
pub struct HttpUpstream {
    client: reqwest::Client,
}

impl HttpUpstream {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build upstream HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Upstream for HttpUpstream {
    async fn fetch(&self, endpoint: &EndpointCandidate) -> Result<Bytes, AttemptFailure> {
        let headers = endpoint.header_map()?;

        let response = self
            .client
            .get(&endpoint.url)
            .headers(headers)
            .send()
            .await
            .map_err(AttemptFailure::from_transport)?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(AttemptFailure::from_transport)?;

        if !status.is_success() {
            return Err(AttemptFailure::Status {
                code: status.as_u16(),
                message: upstream_message(&body)
                    .or_else(|| status.canonical_reason().map(str::to_string)),
            });
        }

        Ok(body)
    }
}

/// The `message` (or `error`) string of a JSON error body, if any.
pub fn upstream_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    ["message", "error"]
        .iter()
        .find_map(|key| value.get(key).and_then(|v| v.as_str()))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::sync::oneshot;

    async fn local_listener() -> (TcpListener, String) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/api/v1/events", listener.local_addr().unwrap());
        (listener, url)
    }

    /// Read one request head off the socket.
    async fn read_head(stream: &mut TcpStream) -> String {
        let mut received = Vec::new();
        let mut buf = [0u8; 1024];
        while !received.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            received.extend_from_slice(&buf[..n]);
        }
        String::from_utf8_lossy(&received).into_owned()
    }

    async fn respond(stream: &mut TcpStream, status_line: &str, body: &str) {
        let response = format!(
            "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        stream.write_all(response.as_bytes()).await.unwrap();
    }

    #[test]
    fn test_upstream_message() {
        assert_eq!(
            upstream_message(br#"{"message":"Your account could not be authenticated."}"#)
                .as_deref(),
            Some("Your account could not be authenticated.")
        );
        assert_eq!(
            upstream_message(br#"{"error":"Not Found"}"#).as_deref(),
            Some("Not Found")
        );
        assert_eq!(upstream_message(b"<html>502</html>"), None);
        assert_eq!(upstream_message(br#"{"status":401}"#), None);
    }

    #[test]
    fn test_client_builds_with_timeout() {
        assert!(HttpUpstream::new(Duration::from_secs(5)).is_ok());
    }

    #[tokio::test]
    async fn test_silent_upstream_times_out_within_bound() {
        let (listener, url) = local_listener().await;
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            read_head(&mut stream).await;
            tokio::time::sleep(Duration::from_secs(30)).await;
            drop(stream);
        });

        let upstream = HttpUpstream::new(Duration::from_millis(300)).unwrap();
        let started = tokio::time::Instant::now();
        let result = upstream.fetch(&EndpointCandidate::new("silent", url)).await;

        assert_eq!(result, Err(AttemptFailure::Timeout));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_error_status_carries_upstream_message() {
        let (listener, url) = local_listener().await;
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            read_head(&mut stream).await;
            respond(&mut stream, "404 Not Found", r#"{"message":"Event feed not found"}"#).await;
        });

        let upstream = HttpUpstream::new(Duration::from_secs(5)).unwrap();
        let result = upstream.fetch(&EndpointCandidate::new("missing", url)).await;

        assert_eq!(
            result,
            Err(AttemptFailure::Status {
                code: 404,
                message: Some("Event feed not found".to_string()),
            })
        );
    }

    #[tokio::test]
    async fn test_host_override_reaches_the_wire() {
        let (listener, url) = local_listener().await;
        let (head_tx, head_rx) = oneshot::channel();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let head = read_head(&mut stream).await;
            respond(&mut stream, "200 OK", "[]").await;
            let _ = head_tx.send(head);
        });

        let endpoint = EndpointCandidate::new("headless", url)
            .with_header("Host", "community.example.org");
        let upstream = HttpUpstream::new(Duration::from_secs(5)).unwrap();
        let body = upstream.fetch(&endpoint).await.unwrap();
        assert_eq!(&body[..], b"[]");

        let head = head_rx.await.unwrap().to_ascii_lowercase();
        assert!(
            head.contains("\r\nhost: community.example.org\r\n"),
            "request head: {}",
            head
        );
    }
}
