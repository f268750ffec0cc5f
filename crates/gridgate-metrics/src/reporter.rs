use std::time::Duration;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::record::MetricsRecord;
use gridgate_common::{GridgateError, Result};

/// Bound on the whole POST exchange, connect included.
const REPORT_TIMEOUT: Duration = Duration::from_secs(5);

/// Location of the telemetry sink's ingestion endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TelemetryEndpoint {
    pub host: String,
    pub port: u16,
    /// Ingestion path, e.g. `/gridgate-metrics/_doc`.
    pub index_path: String,
}

impl TelemetryEndpoint {
    fn url(&self) -> String {
        format!("http://{}:{}{}", self.host, self.port, self.index_path)
    }
}

/// Best-effort telemetry delivery.
///
/// Each record is POSTed as JSON on a fresh connection. Every failure at
/// any stage is caught here and logged at `warn`; [`TelemetryReporter::report`]
/// never returns an error, never alters an already-computed relay result,
/// and delays the caller only by the attempt's own bounded I/O time.
#[derive(Debug, Clone)]
pub struct TelemetryReporter {
    endpoint: TelemetryEndpoint,
}

impl TelemetryReporter {
    pub fn new(endpoint: TelemetryEndpoint) -> Self {
        Self { endpoint }
    }

    /// Delivers one record to the sink, swallowing all failures.
    pub async fn report(&self, record: &MetricsRecord) {
        match self.try_report(record).await {
            Ok(status) => {
                debug!(
                    request_id = record.request_id,
                    %status,
                    "telemetry record delivered"
                );
            }
            Err(e) => {
                warn!(
                    request_id = record.request_id,
                    error = %e,
                    "failed to deliver telemetry record"
                );
            }
        }
    }

    async fn try_report(&self, record: &MetricsRecord) -> Result<hyper::StatusCode> {
        let body = serde_json::to_vec(record)?;

        let request = hyper::Request::builder()
            .method("POST")
            .uri(self.endpoint.url())
            .header("Content-Type", "application/json")
            .header("Connection", "close")
            .body(Full::new(Bytes::from(body)))
            .map_err(|e| GridgateError::Connection(format!("failed to build request: {}", e)))?;

        let client = Client::builder(TokioExecutor::new()).build_http();

        let response = tokio::time::timeout(REPORT_TIMEOUT, client.request(request))
            .await
            .map_err(|_| GridgateError::Timeout(REPORT_TIMEOUT.as_millis() as u64))?
            .map_err(|e| GridgateError::Connection(format!("telemetry POST failed: {}", e)))?;

        // Status is read for logging only; the body is discarded.
        Ok(response.status())
    }
}
