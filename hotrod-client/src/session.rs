//! Per-connection session state.

use std::sync::Arc;

use tracing::debug;

use hotrod_core::{RequestHeader, ResponseHeader, TopologyInfo};

use crate::config::ClientConfig;

/// State threaded through every operation on one logical connection.
///
/// A session owns the request-header template (cache name, intelligence,
/// flags, last seen topology id), the monotonically increasing message-id
/// counter, and the published topology snapshot. Operations are strictly
/// sequential: each one bumps the counter, sends, and fully consumes its
/// response before the next starts.
#[derive(Debug)]
pub struct Session {
    template: RequestHeader,
    topology: Option<Arc<TopologyInfo>>,
}

impl Session {
    /// Creates a session from the given configuration.
    ///
    /// The session starts with topology id 0, so the first response from the
    /// server piggybacks the initial cluster topology.
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            template: RequestHeader {
                message_id: 0,
                version: config.protocol_version(),
                cache_name: config.cache_name().to_vec(),
                flags: config.flags(),
                intelligence: config.intelligence(),
                topology_id: 0,
                key_media_type: config.key_media_type().clone(),
                value_media_type: config.value_media_type().clone(),
            },
            topology: None,
        }
    }

    /// Produces the header for the next outbound request.
    ///
    /// Bumps the message id and advertises the latest topology id.
    pub(crate) fn next_header(&mut self) -> RequestHeader {
        self.template.message_id += 1;
        self.template.clone()
    }

    /// Returns the id assigned to the most recent request.
    pub fn last_message_id(&self) -> u64 {
        self.template.message_id
    }

    /// Returns the topology id this session advertises.
    pub fn topology_id(&self) -> u32 {
        self.template.topology_id
    }

    /// Returns the current topology snapshot, if one has been received.
    ///
    /// The snapshot is immutable; a topology update swaps in a fresh one, so
    /// clones taken for routing stay internally consistent.
    pub fn topology(&self) -> Option<Arc<TopologyInfo>> {
        self.topology.clone()
    }

    /// Takes the topology out of a response, if any, and publishes it.
    ///
    /// Runs on every response, including error responses: a server may
    /// reject a request precisely because the client's topology is stale,
    /// and piggyback the fix.
    pub(crate) fn absorb(&mut self, response: &mut ResponseHeader) {
        if let Some(topology) = response.topology.take() {
            debug!(
                topology_id = topology.topology_id,
                servers = topology.servers.len(),
                segments = topology.num_segments(),
                "installing new cluster topology"
            );
            self.template.topology_id = topology.topology_id;
            self.topology = Some(Arc::new(topology));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hotrod_core::protocol::constants::PROTOCOL_VERSION_28;
    use hotrod_core::{ClientIntelligence, OpCode, ServerAddress, Status};

    fn basic_session() -> Session {
        let config = ClientConfig::builder()
            .protocol_version(PROTOCOL_VERSION_28)
            .intelligence(ClientIntelligence::Basic)
            .build()
            .unwrap();
        Session::new(&config)
    }

    fn response_with_topology(message_id: u64, topology_id: u32) -> ResponseHeader {
        ResponseHeader {
            message_id,
            op_code: OpCode::Ping.response_code(),
            status: Status::Ok,
            topology: Some(TopologyInfo {
                topology_id,
                servers: vec![ServerAddress {
                    host: "node-a".to_string(),
                    port: 11222,
                }],
                hash_function: None,
                owners_per_segment: Vec::new(),
            }),
            error: None,
        }
    }

    #[test]
    fn test_message_ids_strictly_increase() {
        let mut session = basic_session();
        let first = session.next_header().message_id;
        let second = session.next_header().message_id;
        let third = session.next_header().message_id;

        assert_eq!(first, 1);
        assert_eq!(second, 2);
        assert_eq!(third, 3);
        assert_eq!(session.last_message_id(), 3);
    }

    #[test]
    fn test_new_session_advertises_topology_zero() {
        let mut session = basic_session();
        assert_eq!(session.topology_id(), 0);
        assert!(session.topology().is_none());
        assert_eq!(session.next_header().topology_id, 0);
    }

    #[test]
    fn test_absorb_publishes_snapshot_and_updates_template() {
        let mut session = basic_session();
        let mut response = response_with_topology(1, 17);

        session.absorb(&mut response);

        assert!(response.topology.is_none());
        assert_eq!(session.topology_id(), 17);
        let snapshot = session.topology().unwrap();
        assert_eq!(snapshot.topology_id, 17);

        // The next outbound header advertises the new id.
        assert_eq!(session.next_header().topology_id, 17);
    }

    #[test]
    fn test_newer_topology_replaces_older() {
        let mut session = basic_session();

        session.absorb(&mut response_with_topology(1, 5));
        let old = session.topology().unwrap();

        session.absorb(&mut response_with_topology(2, 6));
        let new = session.topology().unwrap();

        assert_eq!(old.topology_id, 5);
        assert_eq!(new.topology_id, 6);
        assert_eq!(session.topology_id(), 6);
    }

    #[test]
    fn test_absorb_without_topology_is_a_no_op() {
        let mut session = basic_session();
        let mut response = ResponseHeader {
            message_id: 1,
            op_code: OpCode::Get.response_code(),
            status: Status::Ok,
            topology: None,
            error: None,
        };

        session.absorb(&mut response);
        assert_eq!(session.topology_id(), 0);
        assert!(session.topology().is_none());
    }

    #[test]
    fn test_header_template_carries_config() {
        let config = ClientConfig::builder()
            .cache_name("accounts")
            .protocol_version(PROTOCOL_VERSION_28)
            .intelligence(ClientIntelligence::TopologyAware)
            .flags(0x01)
            .build()
            .unwrap();
        let mut session = Session::new(&config);
        let header = session.next_header();

        assert_eq!(header.cache_name, b"accounts");
        assert_eq!(header.version, PROTOCOL_VERSION_28);
        assert_eq!(header.intelligence, ClientIntelligence::TopologyAware);
        assert_eq!(header.flags, 0x01);
    }
}
