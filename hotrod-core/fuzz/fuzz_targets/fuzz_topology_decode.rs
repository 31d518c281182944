#![no_main]

use libfuzzer_sys::fuzz_target;

use hotrod_core::io::SliceSource;
use hotrod_core::{ClientIntelligence, TopologyInfo};

fuzz_target!(|data: &[u8]| {
    for intelligence in [
        ClientIntelligence::Basic,
        ClientIntelligence::TopologyAware,
        ClientIntelligence::HashDistributionAware,
    ] {
        let mut source = SliceSource::new(data);
        if let Ok(topology) = TopologyInfo::read_from(&mut source, intelligence) {
            // Decoded owner indices must be in range.
            for owners in &topology.owners_per_segment {
                assert!(!owners.is_empty());
                for owner in owners {
                    assert!((*owner as usize) < topology.servers.len());
                }
            }
        }
    }
});
