#![allow(clippy::unwrap_used)]

use bytes::{Bytes, BytesMut};
use gotalk_protocol::utils::global_metrics;
use gotalk_protocol::{decode_message, encode_message, FrameCodec, Message, ProtocolVersion};
use tokio_util::codec::{Decoder, Encoder};

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_encode_decode_heavy() {
    use tokio::task::JoinSet;

    let iterations = 5_000usize;
    let payload_sizes = [0usize, 64, 512, 4096, 65536];

    let mut tasks = JoinSet::new();
    for &size in &payload_sizes {
        for version in ProtocolVersion::all() {
            tasks.spawn(async move {
                let width = version.layout().request_id_width;
                for i in 0..iterations {
                    let msg = Message::StreamRequestPart {
                        request_id: format!("{:0width$}", i % 1000).into(),
                        payload: Bytes::from(vec![((i + size) & 0xFF) as u8; size]),
                    };
                    let wire = encode_message(&msg, version).unwrap();
                    assert_eq!(decode_message(&wire, version).unwrap(), msg);
                }
            });
        }
    }

    while let Some(res) = tasks.join_next().await {
        res.unwrap();
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_stream_codecs_are_independent() {
    use tokio::task::JoinSet;

    let mut tasks = JoinSet::new();
    for worker in 0..16u32 {
        tasks.spawn(async move {
            let version = if worker % 2 == 0 {
                ProtocolVersion::V00
            } else {
                ProtocolVersion::V01
            };
            let mut codec = FrameCodec::new(version);
            let mut buf = BytesMut::new();

            for i in 0..500u32 {
                let msg = Message::Notification {
                    name: format!("worker.{worker}"),
                    payload: Bytes::from(i.to_string()),
                };
                codec.encode(&msg, &mut buf).unwrap();
            }

            let mut count = 0u32;
            while let Some(msg) = codec.decode(&mut buf).unwrap() {
                assert_eq!(msg.name(), Some(format!("worker.{worker}").as_str()));
                assert_eq!(msg.payload().as_ref(), count.to_string().as_bytes());
                count += 1;
            }
            assert_eq!(count, 500);
            assert!(buf.is_empty());
        });
    }

    while let Some(res) = tasks.join_next().await {
        res.unwrap();
    }

    let snapshot = global_metrics().snapshot();
    assert!(snapshot.frames_encoded >= 16 * 500);
    assert!(snapshot.frames_decoded >= 16 * 500);
}
