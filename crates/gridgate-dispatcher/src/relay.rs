//! Outbound HTTP relay toward compute backends.
//!
//! Each call opens a fresh TCP connection (no pooling or reuse), writes a
//! synthesized `GET <path>?powmin=..&powmax=..` request, reads the full
//! response up to a fixed bound, and returns the body after the
//! header/body separator as an opaque string. The request text comes from
//! the wire codec in gridgate-common so the bytes on the wire match the
//! backend contract exactly.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

use crate::config::BackendEndpoint;
use gridgate_common::transport::wire;
use gridgate_common::{GridgateError, Result};

/// Connect bound for a backend.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
/// Bound on reading the complete backend response.
const READ_TIMEOUT: Duration = Duration::from_secs(30);
/// Responses are read to EOF but never past this size.
const MAX_RESPONSE_SIZE: usize = 64 * 1024;

/// Relays one request to a backend and returns the response body.
///
/// # Errors
///
/// - [`GridgateError::ConnectFailed`] if the connection cannot be
///   established within the connect bound.
/// - [`GridgateError::Timeout`] if the backend stalls mid-response.
/// - [`GridgateError::NoResponse`] if the backend closes without sending
///   any bytes.
/// - [`GridgateError::MalformedResponse`] if no header/body separator is
///   found.
///
/// Error text is short and fixed; received bytes never appear in it.
pub async fn call(
    backend: &BackendEndpoint,
    path: &str,
    powmin: i32,
    powmax: i32,
) -> Result<String> {
    let addr = backend.addr();

    let mut stream = tokio::time::timeout(CONNECT_TIMEOUT, TcpStream::connect(&addr))
        .await
        .map_err(|_| GridgateError::ConnectFailed(addr.clone()))?
        .map_err(|_| GridgateError::ConnectFailed(addr.clone()))?;

    let request = wire::encode_get(
        path,
        &[
            ("powmin", powmin.to_string()),
            ("powmax", powmax.to_string()),
        ],
        &addr,
    );

    stream
        .write_all(request.as_bytes())
        .await
        .map_err(|e| GridgateError::Connection(format!("failed to send request: {}", e)))?;

    let raw = tokio::time::timeout(READ_TIMEOUT, read_to_end_bounded(&mut stream))
        .await
        .map_err(|_| GridgateError::Timeout(READ_TIMEOUT.as_millis() as u64))??;

    debug!(backend = %backend.name, bytes = raw.len(), "backend response received");

    wire::extract_body(&raw)
}

/// Reads until EOF or the size bound, whichever comes first.
async fn read_to_end_bounded(stream: &mut TcpStream) -> Result<Vec<u8>> {
    let mut raw = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let n = stream
            .read(&mut chunk)
            .await
            .map_err(|e| GridgateError::Connection(format!("failed to read response: {}", e)))?;
        if n == 0 {
            break;
        }
        let take = n.min(MAX_RESPONSE_SIZE - raw.len());
        raw.extend_from_slice(&chunk[..take]);
        if raw.len() >= MAX_RESPONSE_SIZE {
            break;
        }
    }

    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    /// Spawns a one-shot stub backend returning `response` verbatim.
    async fn stub_backend(response: &'static [u8]) -> std::net::SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = stream.read(&mut buf).await;
            stream.write_all(response).await.unwrap();
        });
        addr
    }

    fn backend_at(addr: std::net::SocketAddr) -> BackendEndpoint {
        BackendEndpoint::new("openmp", addr.ip().to_string(), addr.port())
    }

    #[tokio::test]
    async fn test_call_extracts_json_body() {
        let addr = stub_backend(b"HTTP/1.1 200 OK\r\n\r\n{\"success\":true}").await;
        let body = call(&backend_at(addr), "/process", 3, 6).await.unwrap();
        assert_eq!(body, r#"{"success":true}"#);
    }

    #[tokio::test]
    async fn test_call_sends_query_parameters() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 1024];
            let n = stream.read(&mut buf).await.unwrap();
            stream.write_all(b"HTTP/1.1 200 OK\r\n\r\nok").await.unwrap();
            String::from_utf8_lossy(&buf[..n]).into_owned()
        });

        call(&backend_at(addr), "/process", 4, 9).await.unwrap();
        let request = server.await.unwrap();
        assert!(request.starts_with("GET /process?powmin=4&powmax=9 HTTP/1.1\r\n"));
        assert!(request.contains("Connection: close\r\n"));
    }

    #[tokio::test]
    async fn test_call_rejects_empty_response() {
        let addr = stub_backend(b"").await;
        let err = call(&backend_at(addr), "/process", 3, 6).await.unwrap_err();
        assert!(matches!(err, GridgateError::NoResponse));
    }

    #[tokio::test]
    async fn test_call_rejects_missing_separator() {
        let addr = stub_backend(b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\n").await;
        let err = call(&backend_at(addr), "/process", 3, 6).await.unwrap_err();
        assert!(matches!(err, GridgateError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_call_fails_on_unreachable_backend() {
        // Bind then drop to get a port with no listener.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = call(&backend_at(addr), "/process", 3, 6).await.unwrap_err();
        assert!(matches!(err, GridgateError::ConnectFailed(_)));
    }
}
