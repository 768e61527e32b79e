#![no_main]

use bytes::BytesMut;
use gotalk_protocol::{FrameCodec, VersionTokenCodec};
use libfuzzer_sys::fuzz_target;
use tokio_util::codec::Decoder;

fuzz_target!(|data: &[u8]| {
    // Version exchange followed by frames, delivered in small chunks
    let mut buf = BytesMut::new();
    let mut frames: Option<FrameCodec> = None;

    for chunk in data.chunks(7) {
        buf.extend_from_slice(chunk);
        loop {
            let result = match frames.as_mut() {
                Some(codec) => codec.decode(&mut buf).map(|m| m.is_some()),
                None => match VersionTokenCodec.decode(&mut buf) {
                    Ok(Some(version)) => {
                        frames = Some(FrameCodec::new(version).with_max_decoded_payload(1 << 16));
                        Ok(true)
                    }
                    Ok(None) => Ok(false),
                    Err(e) => Err(e),
                },
            };
            match result {
                Ok(true) => continue,
                Ok(false) | Err(_) => break,
            }
        }
    }
});
