//! Synchronous, topology-aware client layer for the Hot Rod protocol.
//!
//! This crate drives the wire codec in `hotrod-core` over caller-provided
//! byte-stream capabilities. It owns no sockets: a [`RemoteCache`] assembles
//! requests, emits them through a `ByteSink`, and consumes responses from a
//! `ByteSource`, absorbing piggybacked topology updates along the way.

#![warn(missing_docs)]

pub mod cache;
pub mod config;
pub mod routing;
pub mod session;

pub use cache::{Expiration, GetOutcome, PingResult, RemoteCache};
pub use config::{ClientConfig, ClientConfigBuilder};
pub use session::Session;
