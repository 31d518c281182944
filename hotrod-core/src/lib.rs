//! Core types and wire protocol for Infinispan Hot Rod clients.

#![warn(missing_docs)]

pub mod error;
pub mod hash;
pub mod io;
pub mod protocol;

pub use error::{HotRodError, Result};
pub use io::{BufSink, ByteSink, ByteSource, ReadSource, SliceSource, WriteSink};
pub use protocol::{
    ClientIntelligence, MediaType, OpCode, RequestHeader, ResponseHeader, ServerAddress, Status,
    TimeUnit, TopologyInfo,
};
