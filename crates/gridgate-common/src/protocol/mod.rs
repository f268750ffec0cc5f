//! Client-facing line protocol.
//!
//! A request is one newline-terminated text line, `<powmin> <powmax>
//! [engine]`. The reply is a formatted text block (see [`response`]) or a
//! plain usage-error string for input that cannot be parsed at all.

pub mod request;
pub mod response;

pub use request::{WorkRequest, POWMAX_CEIL, POWMIN_FLOOR};
