use std::sync::atomic::{AtomicUsize, Ordering};

use crate::config::BackendEndpoint;
use gridgate_common::protocol::request::ENGINE_AUTO;

/// Maps an engine preference to a backend from the static pool.
///
/// An exact name match returns that backend. `"auto"` and unrecognized
/// names alternate strictly over the pool via an owned atomic sequence
/// counter, so concurrent selections never skip or repeat a turn; the
/// counter lives for the process lifetime. The resolved name is always the
/// chosen backend's real name, never `"auto"`, so telemetry and the client
/// reply are labeled with what actually ran.
#[derive(Debug)]
pub struct BackendSelector {
    pool: Vec<BackendEndpoint>,
    next: AtomicUsize,
}

impl BackendSelector {
    /// Creates a selector over a static pool. The pool is immutable for
    /// the selector's lifetime.
    pub fn new(pool: Vec<BackendEndpoint>) -> Self {
        Self {
            pool,
            next: AtomicUsize::new(0),
        }
    }

    /// Selects the backend for an engine preference.
    ///
    /// Returns `None` only if the pool is empty.
    pub fn select(&self, engine: &str) -> Option<&BackendEndpoint> {
        if self.pool.is_empty() {
            return None;
        }

        if engine != ENGINE_AUTO {
            if let Some(backend) = self.pool.iter().find(|b| b.name == engine) {
                return Some(backend);
            }
        }

        // "auto" and unknown names share the round-robin sequence.
        let turn = self.next.fetch_add(1, Ordering::Relaxed);
        Some(&self.pool[turn % self.pool.len()])
    }

    pub fn pool(&self) -> &[BackendEndpoint] {
        &self.pool
    }
}
