//! Rendering of client replies.
//!
//! Every session gets exactly one outbound message: a framed result block
//! for requests that made it past parsing, or a plain usage-error string
//! for input that could not be parsed at all.

/// Renders the reply for a successfully relayed request. The backend
/// payload is included verbatim.
pub fn render_success(
    engine: &str,
    powmin: i32,
    powmax: i32,
    request_id: u64,
    payload: &str,
) -> String {
    format!(
        "=== GridGate - Processing Result ===\n\
         Engine: {engine}\n\
         POWMIN: {powmin}, POWMAX: {powmax}\n\
         Request ID: {request_id}\n\
         Status: SUCCESS\n\
         \n\
         Details:\n\
         {payload}\n\
         ===================================="
    )
}

/// Renders the reply for a request whose dispatch failed.
pub fn render_failure(
    engine: &str,
    powmin: i32,
    powmax: i32,
    request_id: u64,
    error: &str,
) -> String {
    format!(
        "=== GridGate - Processing Error ===\n\
         Engine: {engine}\n\
         POWMIN: {powmin}, POWMAX: {powmax}\n\
         Request ID: {request_id}\n\
         Status: FAILURE\n\
         \n\
         Error: {error}\n\
         ==================================="
    )
}

/// Plain usage error for input that failed to parse. Sent without the
/// result framing.
pub fn render_usage_error() -> String {
    format!(
        "ERROR: invalid input format. Use: <POWMIN> <POWMAX> [engine]\n\
         Example: 3 6 spark\n\
         Available engines: openmp, spark, auto\n\
         POWMIN must be within {}-{} and POWMIN <= POWMAX",
        super::POWMIN_FLOOR,
        super::POWMAX_CEIL
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_reply_contains_status_and_payload() {
        let reply = render_success("openmp", 3, 6, 7, r#"{"success":true}"#);
        assert!(reply.contains("Status: SUCCESS"));
        assert!(reply.contains("Engine: openmp"));
        assert!(reply.contains("POWMIN: 3, POWMAX: 6"));
        assert!(reply.contains("Request ID: 7"));
        assert!(reply.contains(r#"{"success":true}"#));
    }

    #[test]
    fn test_failure_reply_contains_status_and_error() {
        let reply = render_failure("spark", 3, 6, 9, "failed to connect to 10.0.0.1:8082");
        assert!(reply.contains("Status: FAILURE"));
        assert!(reply.contains("Engine: spark"));
        assert!(reply.contains("Error: failed to connect to 10.0.0.1:8082"));
        assert!(!reply.contains("SUCCESS"));
    }

    #[test]
    fn test_usage_error_names_the_format() {
        let text = render_usage_error();
        assert!(text.contains("<POWMIN> <POWMAX> [engine]"));
        assert!(text.contains("3-15"));
    }
}
