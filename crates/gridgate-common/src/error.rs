use thiserror::Error;

/// Error taxonomy for the dispatch server.
///
/// Client protocol errors (`MalformedInput`, `InvalidRange`) are answered to
/// the client and never crash a worker. Relay errors (`ConnectFailed`,
/// `NoResponse`, `MalformedResponse`, `Timeout`) are surfaced to the client
/// as a FAILURE reply. Everything is recovered at the connection-handler
/// boundary; no variant may terminate the listening process.
#[derive(Error, Debug)]
pub enum GridgateError {
    #[error("invalid input format")]
    MalformedInput(String),

    #[error("invalid parameters: {0}")]
    InvalidRange(String),

    #[error("failed to connect to {0}")]
    ConnectFailed(String),

    #[error("no response from backend")]
    NoResponse,

    #[error("malformed backend response: {0}")]
    MalformedResponse(String),

    #[error("timed out after {0}ms")]
    Timeout(u64),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),
}

impl GridgateError {
    /// Short, fixed error text suitable for the client reply and the
    /// telemetry record. Never contains received bytes.
    pub fn client_text(&self) -> String {
        self.to_string()
    }
}

pub type Result<T> = std::result::Result<T, GridgateError>;
