#![no_main]

use libfuzzer_sys::fuzz_target;

use hotrod_core::io::{BufSink, SliceSource};
use hotrod_core::MediaType;

fuzz_target!(|data: &[u8]| {
    let mut source = SliceSource::new(data);
    if let Ok(media_type) = MediaType::read_from(&mut source) {
        // Whatever decodes must re-encode.
        let mut sink = BufSink::new();
        media_type.write_to(&mut sink).unwrap();
    }
});
