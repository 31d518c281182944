//! Cluster topology descriptors piggybacked on responses.
//!
//! Whenever a response header has its topology-changed flag set, a new
//! topology frame follows inline. Its shape depends on the intelligence the
//! originating request declared: the segment/owner section is only present
//! for hash-distribution-aware clients and must not be read otherwise.

use std::fmt;

use crate::error::{HotRodError, Result};
use crate::hash;
use crate::io::{ByteSink, ByteSource};
use crate::protocol::constants::ClientIntelligence;
use crate::protocol::wire;

/// One cluster member as advertised in a topology frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerAddress {
    /// Host name or address, as sent by the server.
    pub host: String,
    /// Hot Rod port.
    pub port: u16,
}

impl fmt::Display for ServerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// A decoded cluster topology.
///
/// The segment/owner map is empty for clients below
/// [`ClientIntelligence::HashDistributionAware`]; routing is only possible
/// when it is populated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopologyInfo {
    /// Monotonically increasing topology generation.
    pub topology_id: u32,
    /// The cluster members.
    pub servers: Vec<ServerAddress>,
    /// Hash function identifier, when the hash section was present.
    pub hash_function: Option<u8>,
    /// Owner indices into `servers`, one list per segment. The first owner
    /// is the primary.
    pub owners_per_segment: Vec<Vec<u32>>,
}

impl TopologyInfo {
    /// Returns the number of segments, zero when no hash section was sent.
    pub fn num_segments(&self) -> usize {
        self.owners_per_segment.len()
    }

    /// Returns the owner list for a segment, primary first.
    pub fn owners(&self, segment: u32) -> Option<&[u32]> {
        self.owners_per_segment
            .get(segment as usize)
            .map(Vec::as_slice)
    }

    /// Returns the owner list for a key, primary first.
    pub fn owners_for_key(&self, key: &[u8]) -> Option<&[u32]> {
        if self.owners_per_segment.is_empty() {
            return None;
        }
        let segment = hash::segment_of(key, self.owners_per_segment.len() as u32);
        self.owners(segment)
    }

    /// Returns the primary owner of a key's segment.
    pub fn primary_for_key(&self, key: &[u8]) -> Option<&ServerAddress> {
        let owners = self.owners_for_key(key)?;
        self.servers.get(owners[0] as usize)
    }

    /// Reads a topology frame.
    ///
    /// `intelligence` is the level the originating request declared; it
    /// decides whether the hash/segment section exists on the wire.
    pub fn read_from<S: ByteSource>(
        source: &mut S,
        intelligence: ClientIntelligence,
    ) -> Result<Self> {
        let topology_id = wire::read_vint(source)?;
        let servers_num = wire::read_vint(source)?;
        let mut servers = Vec::with_capacity(servers_num as usize);
        for _ in 0..servers_num {
            let host_bytes = wire::read_byte_array(source)?;
            let host = String::from_utf8(host_bytes).map_err(|e| {
                HotRodError::Protocol(format!("server address is not valid UTF-8: {e}"))
            })?;
            let port = wire::read_u16_be(source)?;
            servers.push(ServerAddress { host, port });
        }

        if !intelligence.includes_hash_info() {
            return Ok(Self {
                topology_id,
                servers,
                hash_function: None,
                owners_per_segment: Vec::new(),
            });
        }

        let hash_function = wire::read_u8(source)?;
        let mut owners_per_segment = Vec::new();
        if hash_function != 0 {
            let segments_num = wire::read_vint(source)?;
            owners_per_segment.reserve(segments_num as usize);
            for segment in 0..segments_num {
                let owners_num = wire::read_u8(source)?;
                if owners_num == 0 {
                    return Err(HotRodError::Protocol(format!(
                        "segment {segment} has no owners"
                    )));
                }
                let mut owners = Vec::with_capacity(owners_num as usize);
                for _ in 0..owners_num {
                    let owner = wire::read_vint(source)?;
                    if owner >= servers_num {
                        return Err(HotRodError::Protocol(format!(
                            "segment {segment} owner index {owner} out of range \
                             (servers: {servers_num})"
                        )));
                    }
                    owners.push(owner);
                }
                owners_per_segment.push(owners);
            }
        }

        Ok(Self {
            topology_id,
            servers,
            hash_function: Some(hash_function),
            owners_per_segment,
        })
    }

    /// Writes a topology frame, mirroring [`TopologyInfo::read_from`].
    ///
    /// Mock servers and loopback tests use this; a client never sends
    /// topology.
    pub fn write_to<S: ByteSink>(
        &self,
        sink: &mut S,
        intelligence: ClientIntelligence,
    ) -> Result<()> {
        wire::write_vint(sink, self.topology_id)?;
        wire::write_vint(sink, self.servers.len() as u32)?;
        for server in &self.servers {
            wire::write_byte_array(sink, server.host.as_bytes())?;
            wire::write_u16_be(sink, server.port)?;
        }

        if !intelligence.includes_hash_info() {
            return Ok(());
        }

        let hash_function = self.hash_function.unwrap_or(0);
        wire::write_u8(sink, hash_function)?;
        if hash_function != 0 {
            wire::write_vint(sink, self.owners_per_segment.len() as u32)?;
            for owners in &self.owners_per_segment {
                wire::write_u8(sink, owners.len() as u8)?;
                for owner in owners {
                    wire::write_vint(sink, *owner)?;
                }
            }
        }
        Ok(())
    }
}
