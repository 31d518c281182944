//! Key-to-server routing over a topology snapshot.
//!
//! Routing is a pure function of a key and an immutable [`TopologyInfo`]
//! snapshot, so callers can route without holding any lock across a network
//! call. Writes go to the segment's primary owner; reads may fall back to
//! the replicas in precedence order.

use hotrod_core::{ServerAddress, TopologyInfo};

/// Returns the server a write for `key` should be sent to.
///
/// `None` when the topology has no segment/owner map (client intelligence
/// below hash-distribution-aware).
pub fn write_target<'a>(topology: &'a TopologyInfo, key: &[u8]) -> Option<&'a ServerAddress> {
    topology.primary_for_key(key)
}

/// Returns the servers a read for `key` may be served from, primary first.
///
/// Empty when the topology has no segment/owner map.
pub fn read_targets<'a>(topology: &'a TopologyInfo, key: &[u8]) -> Vec<&'a ServerAddress> {
    let Some(owners) = topology.owners_for_key(key) else {
        return Vec::new();
    };
    owners
        .iter()
        .filter_map(|&owner| topology.servers.get(owner as usize))
        .collect()
}
