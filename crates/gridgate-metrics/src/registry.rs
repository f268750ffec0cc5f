use std::sync::Mutex;

/// Consistent view of both counters at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub active_connections: u64,
    pub total_requests: u64,
}

#[derive(Debug, Default)]
struct Counters {
    active_connections: u64,
    total_requests: u64,
}

/// Process-wide session accounting.
///
/// Tracks `active_connections` and `total_requests` across all concurrent
/// sessions and hands out request ids. Both counters move together under
/// one lock: `begin_session` publishes the increment of both and the id
/// assignment as a single event, and no reader can ever observe the pair
/// half-updated. Request ids are the post-increment value of
/// `total_requests`, so they are dense, strictly increasing, and unique for
/// the process lifetime, starting at 1.
///
/// The lock is held for a few arithmetic operations only and never across
/// an await point. State is not persisted; everything resets on restart.
#[derive(Debug, Default)]
pub struct StatsRegistry {
    inner: Mutex<Counters>,
}

impl StatsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a session: increments both counters and returns the new
    /// `total_requests` as the session's request id.
    pub fn begin_session(&self) -> u64 {
        let mut counters = self.inner.lock().expect("stats lock poisoned");
        counters.active_connections += 1;
        counters.total_requests += 1;
        counters.total_requests
    }

    /// Closes a session: decrements `active_connections`.
    ///
    /// Must be called exactly once per `begin_session`, on every exit path.
    pub fn end_session(&self) {
        let mut counters = self.inner.lock().expect("stats lock poisoned");
        counters.active_connections = counters.active_connections.saturating_sub(1);
    }

    /// Returns both counters as observed at a single instant.
    pub fn snapshot(&self) -> StatsSnapshot {
        let counters = self.inner.lock().expect("stats lock poisoned");
        StatsSnapshot {
            active_connections: counters.active_connections,
            total_requests: counters.total_requests,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_request_ids_start_at_one_and_are_dense() {
        let registry = StatsRegistry::new();
        assert_eq!(registry.begin_session(), 1);
        assert_eq!(registry.begin_session(), 2);
        assert_eq!(registry.begin_session(), 3);
    }

    #[test]
    fn test_begin_session_moves_both_counters() {
        let registry = StatsRegistry::new();
        registry.begin_session();
        let snapshot = registry.snapshot();
        assert_eq!(snapshot.active_connections, 1);
        assert_eq!(snapshot.total_requests, 1);
    }

    #[test]
    fn test_end_session_releases_active_only() {
        let registry = StatsRegistry::new();
        registry.begin_session();
        registry.end_session();
        let snapshot = registry.snapshot();
        assert_eq!(snapshot.active_connections, 0);
        assert_eq!(snapshot.total_requests, 1);
    }

    #[test]
    fn test_end_session_saturates_at_zero() {
        let registry = StatsRegistry::new();
        registry.end_session();
        assert_eq!(registry.snapshot().active_connections, 0);
    }

    #[test]
    fn test_concurrent_sessions_settle_exactly() {
        let registry = Arc::new(StatsRegistry::new());
        let mut handles = vec![];

        for _ in 0..16 {
            let registry = registry.clone();
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    let _id = registry.begin_session();
                    registry.end_session();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.active_connections, 0);
        assert_eq!(snapshot.total_requests, 1600);
    }

    #[test]
    fn test_concurrent_ids_are_unique() {
        let registry = Arc::new(StatsRegistry::new());
        let mut handles = vec![];

        for _ in 0..8 {
            let registry = registry.clone();
            handles.push(thread::spawn(move || {
                (0..50).map(|_| registry.begin_session()).collect::<Vec<_>>()
            }));
        }

        let mut ids: Vec<u64> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 400);
        assert_eq!(*ids.first().unwrap(), 1);
        assert_eq!(*ids.last().unwrap(), 400);
    }
}
