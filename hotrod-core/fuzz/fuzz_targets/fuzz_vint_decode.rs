#![no_main]

use libfuzzer_sys::fuzz_target;

use hotrod_core::io::SliceSource;
use hotrod_core::protocol::wire;

fuzz_target!(|data: &[u8]| {
    let mut source = SliceSource::new(data);
    while let Ok(value) = wire::read_vint(&mut source) {
        let _ = value;
        if source.is_exhausted() {
            break;
        }
    }

    let mut source = SliceSource::new(data);
    while let Ok(value) = wire::read_vlong(&mut source) {
        let _ = value;
        if source.is_exhausted() {
            break;
        }
    }
});
