//! GridGate dispatch server.
//!
//! The dispatcher accepts line-oriented client requests over TCP, validates
//! them, relays each one over HTTP to a compute backend chosen by name or
//! round-robin, replies to the client, and reports per-request telemetry.
//!
//! # Architecture
//!
//! - [`DispatchServer`]: binds the listener and spawns one task per
//!   accepted connection (unbounded by default, optional ceiling).
//! - [`handler`]: runs a single client session end to end.
//! - [`BackendSelector`]: maps an engine name or `"auto"` to a backend.
//! - [`relay`]: the fresh-connection HTTP GET toward a compute backend.
//! - [`DispatcherConfig`]: the startup-fixed configuration surface.

pub mod config;
pub mod handler;
pub mod relay;
pub mod selector;
pub mod server;

pub use config::{BackendEndpoint, DispatcherConfig};
pub use selector::BackendSelector;
pub use server::DispatchServer;
