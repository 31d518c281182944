//! Request and response header framing.

use crate::error::{HotRodError, Result};
use crate::io::{ByteSink, ByteSource};
use crate::protocol::constants::{
    ClientIntelligence, OpCode, Status, ERROR_RESPONSE, PROTOCOL_VERSION_30, REQUEST_MAGIC,
    RESPONSE_MAGIC,
};
use crate::protocol::media_type::MediaType;
use crate::protocol::topology::TopologyInfo;
use crate::protocol::wire;

/// The fields transmitted before every operation.
///
/// The opcode is not part of the template; each operation dispatcher passes
/// its own to [`RequestHeader::write_to`]. Callers must not share one header
/// between concurrent operations: the message id pairs a response with its
/// request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestHeader {
    /// Caller-assigned id echoed by the matching response.
    pub message_id: u64,
    /// Protocol version byte (28 or 30).
    pub version: u8,
    /// Target cache name; empty selects the server default cache.
    pub cache_name: Vec<u8>,
    /// Operation flags.
    pub flags: u32,
    /// Declared client intelligence level.
    pub intelligence: ClientIntelligence,
    /// Last topology id this client has seen (0 before bootstrap).
    pub topology_id: u32,
    /// Key serialization format (written for protocol >= 3.0 only).
    pub key_media_type: MediaType,
    /// Value serialization format (written for protocol >= 3.0 only).
    pub value_media_type: MediaType,
}

impl RequestHeader {
    /// Writes the header for the given operation.
    pub fn write_to<S: ByteSink>(&self, sink: &mut S, op: OpCode) -> Result<()> {
        wire::write_u8(sink, REQUEST_MAGIC)?;
        wire::write_vlong(sink, self.message_id)?;
        wire::write_u8(sink, self.version)?;
        wire::write_u8(sink, op.request_code())?;
        wire::write_byte_array(sink, &self.cache_name)?;
        wire::write_vint(sink, self.flags)?;
        wire::write_u8(sink, self.intelligence.to_u8())?;
        wire::write_vint(sink, self.topology_id)?;
        if self.version >= PROTOCOL_VERSION_30 {
            self.key_media_type.write_to(sink)?;
            self.value_media_type.write_to(sink)?;
        }
        Ok(())
    }
}

/// A decoded response header.
///
/// The topology, when present, is decoded before any error payload so that
/// updates reach the session even on error responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHeader {
    /// Message id echoed from the request.
    pub message_id: u64,
    /// Raw response opcode byte.
    pub op_code: u8,
    /// Response status.
    pub status: Status,
    /// New topology, present when the topology-changed flag was set.
    pub topology: Option<TopologyInfo>,
    /// Error-message payload, present for error statuses.
    pub error: Option<Vec<u8>>,
}

impl ResponseHeader {
    /// Reads and validates a response header.
    ///
    /// `request` is the header of the outstanding request: its message id
    /// must be echoed, its intelligence level decides the topology frame
    /// shape, and `op` must be answered by its paired response opcode (or
    /// by [`ERROR_RESPONSE`]).
    pub fn read_from<S: ByteSource>(
        source: &mut S,
        request: &RequestHeader,
        op: OpCode,
    ) -> Result<Self> {
        let magic = wire::read_u8(source)?;
        if magic != RESPONSE_MAGIC {
            return Err(HotRodError::Protocol(format!(
                "invalid response magic {magic:#04X}"
            )));
        }

        let message_id = wire::read_vlong(source)?;
        if message_id != request.message_id {
            return Err(HotRodError::Protocol(format!(
                "message id mismatch: sent {}, received {}",
                request.message_id, message_id
            )));
        }

        let op_code = wire::read_u8(source)?;
        if op_code != op.response_code() && op_code != ERROR_RESPONSE {
            return Err(HotRodError::Protocol(format!(
                "unexpected response opcode {:#04X} for request {:#04X}",
                op_code,
                op.request_code()
            )));
        }

        let status_byte = wire::read_u8(source)?;
        let status = Status::from_u8(status_byte).ok_or_else(|| {
            HotRodError::Protocol(format!("unknown status byte {status_byte:#04X}"))
        })?;

        let topology_changed = wire::read_u8(source)?;
        let topology = if topology_changed != 0 {
            Some(TopologyInfo::read_from(source, request.intelligence)?)
        } else {
            None
        };

        let error = if status.is_error() {
            Some(wire::read_byte_array(source)?)
        } else {
            None
        };

        Ok(Self {
            message_id,
            op_code,
            status,
            topology,
            error,
        })
    }

    /// Converts an error-carrying header into a server error.
    ///
    /// Any response with the reserved [`ERROR_RESPONSE`] opcode is a server
    /// error even when its status byte claims otherwise. Call this after the
    /// topology has been taken out of the header.
    pub fn check(&self) -> Result<()> {
        if self.status.is_error() || self.op_code == ERROR_RESPONSE {
            let message = self
                .error
                .as_deref()
                .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
                .unwrap_or_default();
            return Err(HotRodError::Server {
                status: self.status,
                message,
            });
        }
        Ok(())
    }
}
