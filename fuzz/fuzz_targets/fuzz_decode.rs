#![no_main]

use gotalk_protocol::{decode_message, encode_message, frame_length, ProtocolVersion};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    for version in ProtocolVersion::all() {
        // Whatever decodes must re-encode to a frame of the same length
        if let Ok(message) = decode_message(data, version) {
            let wire = encode_message(&message, version).expect("decoded message re-encodes");
            assert_eq!(wire.len(), data.len());
        }
        let _ = frame_length(data, version);
    }
});
