use gridgate_metrics::TelemetryEndpoint;
use serde::{Deserialize, Serialize};

/// One compute backend in the static pool.
///
/// The pool is fixed at startup; entries are never added, removed, or
/// reloaded while the server runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BackendEndpoint {
    /// Engine name clients can request, e.g. `"openmp"` or `"spark"`.
    pub name: String,
    pub host: String,
    pub port: u16,
}

impl BackendEndpoint {
    pub fn new(name: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            port,
        }
    }

    /// `host:port` form used for connecting and logging.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Startup-fixed configuration for the dispatch server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatcherConfig {
    /// Address the client-facing listener binds to.
    pub bind: String,
    /// Static backend pool; selection alternates over it for `"auto"`.
    pub backends: Vec<BackendEndpoint>,
    /// Path requested on compute backends.
    pub backend_path: String,
    /// Where telemetry records are POSTed.
    pub telemetry: TelemetryEndpoint,
    /// Optional admission ceiling on concurrent sessions. `None` preserves
    /// the reference behavior: one task per connection, unbounded.
    pub max_connections: Option<usize>,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
            backends: vec![
                BackendEndpoint::new("openmp", "127.0.0.1", 8081),
                BackendEndpoint::new("spark", "127.0.0.1", 8082),
            ],
            backend_path: "/process".to_string(),
            telemetry: TelemetryEndpoint {
                host: "127.0.0.1".to_string(),
                port: 9200,
                index_path: "/gridgate-metrics/_doc".to_string(),
            },
            max_connections: None,
        }
    }
}
