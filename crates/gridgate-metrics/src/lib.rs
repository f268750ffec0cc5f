//! Session accounting and telemetry for GridGate.
//!
//! Three pieces live here:
//!
//! - [`StatsRegistry`]: process-wide connection/request counters and the
//!   request-id sequence, shared by every concurrent session.
//! - [`MetricsRecord`]: the JSON document describing one completed (or
//!   failed) request.
//! - [`TelemetryReporter`]: best-effort delivery of records to the external
//!   metrics sink. Loss of a record never affects the client-visible result.

mod record;
mod registry;
mod reporter;

pub use record::MetricsRecord;
pub use registry::{StatsRegistry, StatsSnapshot};
pub use reporter::{TelemetryEndpoint, TelemetryReporter};
