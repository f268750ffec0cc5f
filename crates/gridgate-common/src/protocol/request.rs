use crate::error::{GridgateError, Result};

/// Smallest accepted `powmin`.
pub const POWMIN_FLOOR: i32 = 3;
/// Largest accepted `powmax`.
pub const POWMAX_CEIL: i32 = 15;

/// Engine name used when round-robin selection should pick the backend.
pub const ENGINE_AUTO: &str = "auto";

/// A parsed client request.
///
/// Parsing and validation are pure and synchronous; neither touches any
/// shared state. A `WorkRequest` that has passed [`WorkRequest::validate`]
/// is safe to hand to the backend selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkRequest {
    pub powmin: i32,
    pub powmax: i32,
    /// Requested engine name, `"auto"` if omitted. Unrecognized names are
    /// accepted here; selection decides what they mean.
    pub engine: String,
}

impl WorkRequest {
    /// Parses a request line of the form `<powmin> <powmax> [engine]`.
    ///
    /// The first two whitespace-separated tokens must be integers; the
    /// third, if present, names an engine. Tokens past the third are
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns [`GridgateError::MalformedInput`] if fewer than two integer
    /// tokens are present.
    pub fn parse(line: &str) -> Result<Self> {
        let mut tokens = line.split_whitespace();

        let powmin = tokens
            .next()
            .and_then(|t| t.parse::<i32>().ok())
            .ok_or_else(|| GridgateError::MalformedInput(line.trim_end().to_string()))?;
        let powmax = tokens
            .next()
            .and_then(|t| t.parse::<i32>().ok())
            .ok_or_else(|| GridgateError::MalformedInput(line.trim_end().to_string()))?;

        let engine = tokens.next().unwrap_or(ENGINE_AUTO).to_string();

        Ok(Self {
            powmin,
            powmax,
            engine,
        })
    }

    /// Enforces the range invariant `3 <= powmin <= powmax <= 15`.
    ///
    /// A request that fails validation must never reach the backend
    /// selector.
    pub fn validate(&self) -> Result<()> {
        if self.powmin < POWMIN_FLOOR || self.powmax > POWMAX_CEIL || self.powmin > self.powmax {
            return Err(GridgateError::InvalidRange(format!(
                "POWMIN must be within {}-{} and POWMIN <= POWMAX (got {} {})",
                POWMIN_FLOOR, POWMAX_CEIL, self.powmin, self.powmax
            )));
        }
        Ok(())
    }
}
