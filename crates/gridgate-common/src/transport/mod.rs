//! Wire-level transport helpers.
//!
//! GridGate talks plain HTTP/1.1 over fresh TCP connections to its compute
//! backends. The [`wire`] module builds the request text and splits raw
//! responses, independent of any HTTP library, so the bytes on the wire are
//! exactly what the backend contract describes.

pub mod wire;
