//! Shared types for the GridGate dispatch server.
//!
//! This crate holds everything both the dispatcher and its support crates
//! need: the error taxonomy, the client-facing line protocol (parsing,
//! validation, reply rendering), and the raw HTTP/1.1 wire codec used when
//! talking to compute backends.

pub mod error;
pub mod protocol;
pub mod transport;

pub use error::{GridgateError, Result};
