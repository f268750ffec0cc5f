//! Minimal HTTP/1.1 text codec.
//!
//! # Wire format
//!
//! Requests are synthesized as a request line, headers, and a blank line:
//!
//! ```text
//! GET /process?powmin=3&powmax=6 HTTP/1.1\r\n
//! Host: 127.0.0.1:8081\r\n
//! Connection: close\r\n
//! \r\n
//! ```
//!
//! Responses are treated as opaque bytes up to the `\r\n\r\n` header/body
//! separator; only the body is of interest and it is never interpreted.

use crate::error::{GridgateError, Result};

/// Header/body separator in an HTTP/1.1 message.
const SEPARATOR: &[u8] = b"\r\n\r\n";

/// Builds the on-wire text of a GET request with query parameters.
///
/// `Connection: close` is always sent; backends signal end-of-response by
/// closing the connection, which keeps response reading bounded and free of
/// chunked-encoding concerns.
pub fn encode_get(path: &str, query: &[(&str, String)], host: &str) -> String {
    let mut target = String::from(path);
    for (i, (key, value)) in query.iter().enumerate() {
        target.push(if i == 0 { '?' } else { '&' });
        target.push_str(key);
        target.push('=');
        target.push_str(value);
    }

    format!("GET {target} HTTP/1.1\r\nHost: {host}\r\nConnection: close\r\n\r\n")
}

/// Extracts the body of a raw HTTP response.
///
/// Returns the text after the first header/body separator. The body is
/// decoded lossily so an error path can never leak partially received
/// binary data into client-visible strings.
///
/// # Errors
///
/// - [`GridgateError::NoResponse`] if `raw` is empty.
/// - [`GridgateError::MalformedResponse`] if no separator is present.
pub fn extract_body(raw: &[u8]) -> Result<String> {
    if raw.is_empty() {
        return Err(GridgateError::NoResponse);
    }

    let offset = raw
        .windows(SEPARATOR.len())
        .position(|window| window == SEPARATOR)
        .ok_or_else(|| {
            GridgateError::MalformedResponse("missing header/body separator".to_string())
        })?;

    let body = &raw[offset + SEPARATOR.len()..];
    Ok(String::from_utf8_lossy(body).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_get_with_query() {
        let request = encode_get(
            "/process",
            &[("powmin", "3".to_string()), ("powmax", "6".to_string())],
            "127.0.0.1:8081",
        );
        assert_eq!(
            request,
            "GET /process?powmin=3&powmax=6 HTTP/1.1\r\n\
             Host: 127.0.0.1:8081\r\n\
             Connection: close\r\n\r\n"
        );
    }

    #[test]
    fn test_encode_get_without_query() {
        let request = encode_get("/health", &[], "backend:80");
        assert!(request.starts_with("GET /health HTTP/1.1\r\n"));
        assert!(request.ends_with("\r\n\r\n"));
    }

    #[test]
    fn test_extract_body_after_separator() {
        let raw = b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\n\r\n{\"ok\":true}";
        assert_eq!(extract_body(raw).unwrap(), r#"{"ok":true}"#);
    }

    #[test]
    fn test_extract_body_is_idempotent() {
        let raw = b"HTTP/1.1 200 OK\r\n\r\n{\"success\":true}";
        let first = extract_body(raw).unwrap();
        let second = extract_body(raw).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, r#"{"success":true}"#);
    }

    #[test]
    fn test_extract_body_empty_body_is_ok() {
        let raw = b"HTTP/1.1 204 No Content\r\n\r\n";
        assert_eq!(extract_body(raw).unwrap(), "");
    }

    #[test]
    fn test_extract_body_rejects_empty_response() {
        assert!(matches!(extract_body(b""), Err(GridgateError::NoResponse)));
    }

    #[test]
    fn test_extract_body_rejects_missing_separator() {
        let raw = b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\n";
        assert!(matches!(
            extract_body(raw),
            Err(GridgateError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_extract_body_error_does_not_leak_payload() {
        let raw = b"\x00\x01\x02 garbage without separator";
        let err = extract_body(raw).unwrap_err().to_string();
        assert!(!err.contains('\x00'));
        assert!(err.contains("separator"));
    }
}
