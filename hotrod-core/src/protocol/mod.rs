//! Hot Rod binary protocol implementation.
//!
//! This module provides the framing layers of the protocol: primitive
//! encodings, media-type descriptors, request/response headers, and the
//! topology frames piggybacked on responses.

pub mod constants;
mod header;
mod media_type;
mod topology;
pub mod wire;

pub use constants::{ClientIntelligence, OpCode, Status, TimeUnit};
pub use header::{RequestHeader, ResponseHeader};
pub use media_type::MediaType;
pub use topology::{ServerAddress, TopologyInfo};
