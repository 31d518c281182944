//! Remote cache operation dispatchers.

use std::sync::Arc;

use tracing::trace;

use hotrod_core::io::{BufSink, ByteSink, ByteSource};
use hotrod_core::protocol::constants::PROTOCOL_VERSION_30;
use hotrod_core::protocol::wire;
use hotrod_core::{
    HotRodError, MediaType, OpCode, RequestHeader, ResponseHeader, Result, ServerAddress, Status,
    TimeUnit, TopologyInfo,
};

use crate::config::ClientConfig;
use crate::session::Session;

/// Expiration settings transmitted with PUT.
///
/// Lifespan and max-idle are each a [`TimeUnit`] nibble packed into one
/// descriptor byte; units that carry a duration are followed by a VLong
/// value on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expiration {
    lifespan: TimeUnit,
    lifespan_value: u64,
    max_idle: TimeUnit,
    max_idle_value: u64,
}

impl Expiration {
    /// Entries never expire and never idle out (descriptor `0x88`).
    ///
    /// This is what a plain PUT sends.
    pub fn immortal() -> Self {
        Self {
            lifespan: TimeUnit::Infinitum,
            lifespan_value: 0,
            max_idle: TimeUnit::Infinitum,
            max_idle_value: 0,
        }
    }

    /// Entries use the server-configured defaults (descriptor `0x77`).
    pub fn server_default() -> Self {
        Self {
            lifespan: TimeUnit::Default,
            lifespan_value: 0,
            max_idle: TimeUnit::Default,
            max_idle_value: 0,
        }
    }

    /// Explicit lifespan and max-idle settings.
    ///
    /// The values are ignored for units that do not carry one
    /// ([`TimeUnit::Default`] and [`TimeUnit::Infinitum`]).
    pub fn new(
        lifespan: TimeUnit,
        lifespan_value: u64,
        max_idle: TimeUnit,
        max_idle_value: u64,
    ) -> Self {
        Self {
            lifespan,
            lifespan_value,
            max_idle,
            max_idle_value,
        }
    }

    /// Returns the packed descriptor byte (lifespan high nibble, max-idle
    /// low nibble).
    pub fn descriptor(&self) -> u8 {
        (self.lifespan.to_u8() << 4) | self.max_idle.to_u8()
    }

    fn write_to<S: ByteSink>(&self, sink: &mut S) -> Result<()> {
        wire::write_u8(sink, self.descriptor())?;
        if self.lifespan.carries_value() {
            wire::write_vlong(sink, self.lifespan_value)?;
        }
        if self.max_idle.carries_value() {
            wire::write_vlong(sink, self.max_idle_value)?;
        }
        Ok(())
    }
}

impl Default for Expiration {
    fn default() -> Self {
        Self::immortal()
    }
}

/// Outcome of a GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GetOutcome {
    /// The key exists; its value is returned.
    Found(Vec<u8>),
    /// The key does not exist. Not an error.
    NotFound,
}

impl GetOutcome {
    /// Returns `true` if a value was found.
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Converts into an `Option`, discarding the distinction from an empty
    /// value.
    pub fn into_option(self) -> Option<Vec<u8>> {
        match self {
            Self::Found(value) => Some(value),
            Self::NotFound => None,
        }
    }
}

/// What a PING response reports about the server.
///
/// The capability fields are only transmitted on protocol 3.0; on 2.8 a
/// PING response is a bare header and every field here stays empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PingResult {
    /// Key media type the cache is configured with.
    pub key_media_type: Option<MediaType>,
    /// Value media type the cache is configured with.
    pub value_media_type: Option<MediaType>,
    /// Newest protocol version the server speaks.
    pub server_version: Option<u8>,
    /// Request opcodes the server supports.
    pub supported_ops: Vec<u16>,
}

/// A synchronous view of one named cache over one logical connection.
///
/// Each operation assembles its request into an owned buffer, emits it
/// through the caller's [`ByteSink`], then consumes the response from the
/// caller's [`ByteSource`]. Topology updates piggybacked on any response are
/// absorbed into the session before the operation result is produced.
#[derive(Debug)]
pub struct RemoteCache {
    session: Session,
}

impl RemoteCache {
    /// Creates a cache view from the given configuration.
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            session: Session::new(config),
        }
    }

    /// Returns the session state backing this cache.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Returns the current topology snapshot, if one has been received.
    pub fn topology(&self) -> Option<Arc<TopologyInfo>> {
        self.session.topology()
    }

    /// Returns the server that owns the given key, per the current
    /// topology.
    ///
    /// `None` until a hash-distribution-aware topology has been received.
    pub fn primary_owner(&self, key: &[u8]) -> Option<ServerAddress> {
        let topology = self.session.topology()?;
        topology.primary_for_key(key).cloned()
    }

    /// Probes the server and bootstraps the topology.
    ///
    /// A fresh session advertises topology id 0, so the PING response
    /// carries the initial cluster topology.
    pub fn ping<R, W>(&mut self, source: &mut R, sink: &mut W) -> Result<PingResult>
    where
        R: ByteSource,
        W: ByteSink,
    {
        let request = self.send(sink, OpCode::Ping, |_| Ok(()))?;
        let response = self.receive(source, &request, OpCode::Ping)?;
        response.check()?;

        if request.version < PROTOCOL_VERSION_30 {
            return Ok(PingResult::default());
        }

        let key_media_type = MediaType::read_from(source)?;
        let value_media_type = MediaType::read_from(source)?;
        let server_version = wire::read_u8(source)?;
        let ops_num = wire::read_vint(source)?;
        let mut supported_ops = Vec::with_capacity(ops_num as usize);
        for _ in 0..ops_num {
            supported_ops.push(wire::read_u16_be(source)?);
        }

        Ok(PingResult {
            key_media_type: Some(key_media_type),
            value_media_type: Some(value_media_type),
            server_version: Some(server_version),
            supported_ops,
        })
    }

    /// Fetches the value stored under `key`.
    pub fn get<R, W>(&mut self, source: &mut R, sink: &mut W, key: &[u8]) -> Result<GetOutcome>
    where
        R: ByteSource,
        W: ByteSink,
    {
        let request = self.send(sink, OpCode::Get, |buf| wire::write_byte_array(buf, key))?;
        let response = self.receive(source, &request, OpCode::Get)?;
        response.check()?;

        match response.status {
            Status::Ok => Ok(GetOutcome::Found(wire::read_byte_array(source)?)),
            Status::KeyNotFound => Ok(GetOutcome::NotFound),
            other => Err(HotRodError::Protocol(format!(
                "unexpected GET status {other}"
            ))),
        }
    }

    /// Stores `value` under `key` with default (immortal) expiration.
    pub fn put<R, W>(
        &mut self,
        source: &mut R,
        sink: &mut W,
        key: &[u8],
        value: &[u8],
    ) -> Result<()>
    where
        R: ByteSource,
        W: ByteSink,
    {
        self.put_with_expiration(source, sink, key, value, Expiration::default())
    }

    /// Stores `value` under `key` with explicit expiration settings.
    pub fn put_with_expiration<R, W>(
        &mut self,
        source: &mut R,
        sink: &mut W,
        key: &[u8],
        value: &[u8],
        expiration: Expiration,
    ) -> Result<()>
    where
        R: ByteSource,
        W: ByteSink,
    {
        let request = self.send(sink, OpCode::Put, |buf| {
            wire::write_byte_array(buf, key)?;
            expiration.write_to(buf)?;
            wire::write_byte_array(buf, value)
        })?;
        let response = self.receive(source, &request, OpCode::Put)?;
        response.check()?;

        match response.status {
            Status::Ok => Ok(()),
            other => Err(HotRodError::Protocol(format!(
                "unexpected PUT status {other}"
            ))),
        }
    }

    /// Assembles a request (header plus operation payload) and emits it in
    /// one piece.
    fn send<W, F>(&mut self, sink: &mut W, op: OpCode, payload: F) -> Result<RequestHeader>
    where
        W: ByteSink,
        F: FnOnce(&mut BufSink) -> Result<()>,
    {
        let request = self.session.next_header();
        trace!(
            message_id = request.message_id,
            op = ?op,
            "dispatching request"
        );
        let mut buf = BufSink::new();
        request.write_to(&mut buf, op)?;
        payload(&mut buf)?;
        sink.emit(buf.as_bytes())?;
        Ok(request)
    }

    /// Reads the response header and absorbs any piggybacked topology.
    fn receive<R>(
        &mut self,
        source: &mut R,
        request: &RequestHeader,
        op: OpCode,
    ) -> Result<ResponseHeader>
    where
        R: ByteSource,
    {
        let mut response = ResponseHeader::read_from(source, request, op)?;
        self.session.absorb(&mut response);
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_immortal_expiration_is_0x88() {
        assert_eq!(Expiration::immortal().descriptor(), 0x88);
        assert_eq!(Expiration::default().descriptor(), 0x88);
    }

    #[test]
    fn test_server_default_expiration_is_0x77() {
        assert_eq!(Expiration::server_default().descriptor(), 0x77);
    }

    #[test]
    fn test_expiration_nibble_packing() {
        let exp = Expiration::new(TimeUnit::Seconds, 5, TimeUnit::Infinitum, 0);
        assert_eq!(exp.descriptor(), 0x08);

        let exp = Expiration::new(TimeUnit::Minutes, 1, TimeUnit::Hours, 2);
        assert_eq!(exp.descriptor(), 0x45);
    }

    #[test]
    fn test_expiration_values_follow_descriptor() {
        let exp = Expiration::new(TimeUnit::Seconds, 5, TimeUnit::Infinitum, 0);
        let mut sink = BufSink::new();
        exp.write_to(&mut sink).unwrap();
        // descriptor, then only the lifespan value
        assert_eq!(sink.as_bytes(), &[0x08, 0x05]);
    }

    #[test]
    fn test_immortal_expiration_is_one_byte() {
        let mut sink = BufSink::new();
        Expiration::immortal().write_to(&mut sink).unwrap();
        assert_eq!(sink.as_bytes(), &[0x88]);
    }

    #[test]
    fn test_both_expiration_values_written_in_order() {
        let exp = Expiration::new(TimeUnit::Seconds, 300, TimeUnit::Minutes, 2);
        let mut sink = BufSink::new();
        exp.write_to(&mut sink).unwrap();
        // 0x04 = minutes nibble; 300 = 0xAC 0x02 as a VLong
        assert_eq!(sink.as_bytes(), &[0x04, 0xAC, 0x02, 0x02]);
    }

    #[test]
    fn test_get_outcome_helpers() {
        let found = GetOutcome::Found(b"v".to_vec());
        assert!(found.is_found());
        assert_eq!(found.into_option(), Some(b"v".to_vec()));

        let missing = GetOutcome::NotFound;
        assert!(!missing.is_found());
        assert_eq!(missing.into_option(), None);
    }

    #[test]
    fn test_found_empty_value_differs_from_not_found() {
        let empty = GetOutcome::Found(Vec::new());
        assert!(empty.is_found());
        assert_ne!(empty, GetOutcome::NotFound);
    }

    #[test]
    fn test_ping_result_default_is_empty() {
        let result = PingResult::default();
        assert!(result.key_media_type.is_none());
        assert!(result.server_version.is_none());
        assert!(result.supported_ops.is_empty());
    }
}
