use serde::Serialize;
use time::macros::format_description;
use time::OffsetDateTime;

/// One telemetry document, produced per completed or failed session.
///
/// The field set is the stable ingestion schema of the metrics sink; key
/// names and types must not change. `error` is present only on failure.
/// Records are never persisted locally; losing one is tolerated.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsRecord {
    /// ISO-8601 UTC timestamp, second resolution.
    pub timestamp: String,
    pub engine: String,
    pub powmin: i32,
    pub powmax: i32,
    pub request_id: u64,
    pub success: bool,
    /// Wall-clock processing time in fractional seconds.
    pub processing_time: f64,
    pub client_ip: String,
    pub active_clients: u64,
    pub total_requests: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MetricsRecord {
    /// Current time as `YYYY-MM-DDTHH:MM:SSZ`.
    pub fn iso_timestamp() -> String {
        let format = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]Z");
        OffsetDateTime::now_utc()
            .format(&format)
            .unwrap_or_else(|_| String::from("1970-01-01T00:00:00Z"))
    }
}
