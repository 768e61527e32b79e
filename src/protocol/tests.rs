// test-only module included via protocol/mod.rs
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use crate::error::{Field, ProtocolError};
use crate::protocol::message::{Message, MessageKind};
use crate::protocol::version::{read_version_token, write_version_token, ProtocolVersion};
use crate::protocol::{decode_message, encode_message, frame_length};
use bytes::Bytes;

const V00: ProtocolVersion = ProtocolVersion::V00;
const V01: ProtocolVersion = ProtocolVersion::V01;

fn payload(s: &'static str) -> Bytes {
    Bytes::from_static(s.as_bytes())
}

// =================== Version exchange ===================

#[test]
fn test_version_exchange() {
    assert_eq!(read_version_token(b"00").unwrap(), V00);
    assert_eq!(&write_version_token(V00), b"00");
    assert_eq!(&write_version_token(V01), b"01");
}

// =================== Version 00 ===================

#[test]
fn test_v00_single_request_write() {
    let msg = Message::SingleRequest {
        request_id: "001".into(),
        operation: "echo".into(),
        payload: payload(r#"{"message":"Hello World"}"#),
    };
    let bytes = encode_message(&msg, V00).unwrap();
    assert_eq!(bytes, br#"r001004echo00000019{"message":"Hello World"}"#);

    let msg = Message::SingleRequest {
        request_id: "001".into(),
        operation: "echo".into(),
        payload: payload("Hello World"),
    };
    assert_eq!(
        encode_message(&msg, V00).unwrap(),
        b"r001004echo0000000bHello World"
    );
}

#[test]
fn test_v00_single_request_read() {
    let msg = decode_message(br#"r001004echo00000019{"message":"Hello World"}"#, V00).unwrap();
    assert_eq!(
        msg,
        Message::SingleRequest {
            request_id: "001".into(),
            operation: "echo".into(),
            payload: payload(r#"{"message":"Hello World"}"#),
        }
    );
}

#[test]
fn test_v00_single_result() {
    let msg = decode_message(br#"R00100000019{"message":"Hello World"}"#, V00).unwrap();
    assert_eq!(
        msg,
        Message::SingleResult {
            request_id: "001".into(),
            payload: payload(r#"{"message":"Hello World"}"#),
        }
    );

    let msg = Message::SingleResult {
        request_id: "001".into(),
        payload: payload("Hello World"),
    };
    assert_eq!(encode_message(&msg, V00).unwrap(), b"R0010000000bHello World");
}

#[test]
fn test_v00_stream_request() {
    let msg = decode_message(br#"s001004echo0000000b{"message":"#, V00).unwrap();
    assert_eq!(
        msg,
        Message::StreamRequest {
            request_id: "001".into(),
            operation: "echo".into(),
            payload: payload(r#"{"message":"#),
        }
    );

    let msg = Message::StreamRequest {
        request_id: "001".into(),
        operation: "echo".into(),
        payload: payload("Hello World"),
    };
    assert_eq!(
        encode_message(&msg, V00).unwrap(),
        b"s001004echo0000000bHello World"
    );
}

#[test]
fn test_v00_stream_request_part() {
    let msg = decode_message(br#"p0010000000e"Hello World"}"#, V00).unwrap();
    assert_eq!(
        msg,
        Message::StreamRequestPart {
            request_id: "001".into(),
            payload: payload(r#""Hello World"}"#),
        }
    );

    let msg = Message::StreamRequestPart {
        request_id: "001".into(),
        payload: payload("Hello World"),
    };
    assert_eq!(encode_message(&msg, V00).unwrap(), b"p0010000000bHello World");
}

#[test]
fn test_v00_stream_result() {
    let msg = decode_message(br#"S0010000000b{"message":"#, V00).unwrap();
    assert_eq!(msg.kind(), MessageKind::StreamResult);
    assert_eq!(msg.payload().as_ref(), br#"{"message":"#);

    let msg = Message::StreamResult {
        request_id: "001".into(),
        payload: payload("Hello World"),
    };
    assert_eq!(encode_message(&msg, V00).unwrap(), b"S0010000000bHello World");
}

#[test]
fn test_v00_error_result() {
    let wire = br#"E00100000026{"error":"Unknown operation \"echo\""}"#;
    let msg = decode_message(wire, V00).unwrap();
    assert_eq!(
        msg,
        Message::ErrorResult {
            request_id: "001".into(),
            payload: payload(r#"{"error":"Unknown operation \"echo\""}"#),
        }
    );
    assert_eq!(encode_message(&msg, V00).unwrap(), wire);
}

#[test]
fn test_v00_notification() {
    let msg = Message::Notification {
        name: "chat message".into(),
        payload: payload(r#"{"message":"Hi","from":"nthn","chat_room":"gonuts"}"#),
    };
    let wire = br#"n00cchat message00000033{"message":"Hi","from":"nthn","chat_room":"gonuts"}"#;
    assert_eq!(encode_message(&msg, V00).unwrap(), wire);
    assert_eq!(decode_message(wire, V00).unwrap(), msg);
}

#[test]
fn test_v00_has_no_retry() {
    let err = decode_message(b"e00100000000000000000", V00).unwrap_err();
    assert!(matches!(err, ProtocolError::InvalidMessageType { tag: 'e', .. }));

    let msg = Message::RetryResult {
        request_id: "001".into(),
        wait: 0,
        payload: Bytes::new(),
    };
    assert!(matches!(
        encode_message(&msg, V00),
        Err(ProtocolError::InvalidMessageType { tag: 'e', .. })
    ));
}

#[test]
fn test_v00_pads_short_request_id() {
    let msg = Message::SingleResult {
        request_id: "7".into(),
        payload: Bytes::new(),
    };
    assert_eq!(encode_message(&msg, V00).unwrap(), b"R00700000000");
    assert_eq!(encode_message(&msg, V01).unwrap(), b"R000700000000");
}

// =================== Version 01 ===================

#[test]
fn test_v01_single_request() {
    let msg = Message::SingleRequest {
        request_id: "0001".into(),
        operation: "echo".into(),
        payload: payload("Hello World"),
    };
    let wire = b"r0001004echo0000000bHello World";
    assert_eq!(encode_message(&msg, V01).unwrap(), wire);
    assert_eq!(decode_message(wire, V01).unwrap(), msg);
}

#[test]
fn test_v01_single_result() {
    let wire = br#"R000100000019{"message":"Hello World"}"#;
    let msg = decode_message(wire, V01).unwrap();
    assert_eq!(msg.request_id().unwrap().as_str(), "0001");
    assert_eq!(encode_message(&msg, V01).unwrap(), wire);
}

#[test]
fn test_v01_stream_frames() {
    let open = decode_message(br#"s0001004echo0000000b{"message":"#, V01).unwrap();
    let part = decode_message(br#"p00010000000e"Hello World"}"#, V01).unwrap();
    let result = decode_message(br#"S00010000000b{"message":"#, V01).unwrap();

    assert_eq!(open.kind(), MessageKind::StreamRequest);
    assert_eq!(part.kind(), MessageKind::StreamRequestPart);
    assert_eq!(result.kind(), MessageKind::StreamResult);
    assert_eq!(open.request_id(), part.request_id());
    assert_eq!(part.request_id(), result.request_id());
}

#[test]
fn test_v01_retry_result() {
    let msg = Message::RetryResult {
        request_id: "0001".into(),
        wait: 0,
        payload: payload(r#""service restarting""#),
    };
    let wire = br#"e00010000000000000014"service restarting""#;
    assert_eq!(encode_message(&msg, V01).unwrap(), wire);
    assert_eq!(decode_message(wire, V01).unwrap(), msg);

    let msg = decode_message(b"e00420000003c00000000", V01).unwrap();
    assert_eq!(msg.wait(), Some(60));
}

#[test]
fn test_v01_error_result() {
    let wire = br#"E000100000026{"error":"Unknown operation \"echo\""}"#;
    let msg = decode_message(wire, V01).unwrap();
    assert_eq!(msg.kind(), MessageKind::ErrorResult);
    assert_eq!(encode_message(&msg, V01).unwrap(), wire);
}

#[test]
fn test_request_id_width_follows_version() {
    // A 4-character id is valid in 01 but overflows the 3-character field of 00
    let msg = Message::SingleResult {
        request_id: "0001".into(),
        payload: Bytes::new(),
    };
    assert!(encode_message(&msg, V01).is_ok());
    assert!(matches!(
        encode_message(&msg, V00),
        Err(ProtocolError::FieldOverflow { field: Field::RequestId, width: 3, .. })
    ));

    // The same bytes read with the wrong width are inconsistent
    assert!(decode_message(b"R000100000000", V00).is_err());
}

// =================== Limits ===================

#[test]
fn test_operation_limit() {
    for version in ProtocolVersion::all() {
        let id = "1";
        let ok = Message::SingleRequest {
            request_id: id.into(),
            operation: "o".repeat(4095),
            payload: Bytes::new(),
        };
        let bytes = encode_message(&ok, version).unwrap();
        assert_eq!(&bytes[1 + version.layout().request_id_width..][..3], b"fff");

        let too_long = Message::StreamRequest {
            request_id: id.into(),
            operation: "o".repeat(4096),
            payload: Bytes::new(),
        };
        assert!(matches!(
            encode_message(&too_long, version),
            Err(ProtocolError::OperationTooLong { length: 4096, max: 4095, .. })
        ));
    }
}

#[test]
fn test_operation_limit_counts_bytes() {
    // 1365 three-byte characters = 4095 bytes; one more pushes it over
    let ok = Message::Notification {
        name: "€".repeat(1365),
        payload: Bytes::new(),
    };
    assert!(encode_message(&ok, V01).is_ok());

    let over = Message::Notification {
        name: "€".repeat(1366),
        payload: Bytes::new(),
    };
    assert!(matches!(
        encode_message(&over, V01),
        Err(ProtocolError::OperationTooLong { field: Field::Name, .. })
    ));
}

// =================== Malformed input ===================

#[test]
fn test_truncated_payload() {
    let err = decode_message(b"R0010000000bHello", V00).unwrap_err();
    assert!(matches!(
        err,
        ProtocolError::MalformedFrame { field: Field::Payload, .. }
    ));
}

#[test]
fn test_empty_frame() {
    assert!(matches!(
        decode_message(b"", V01),
        Err(ProtocolError::MalformedFrame { field: Field::Tag, .. })
    ));
}

#[test]
fn test_unknown_tag() {
    assert!(matches!(
        decode_message(b"x0010000000b", V00),
        Err(ProtocolError::InvalidMessageType { tag: 'x', .. })
    ));
}

#[test]
fn test_frame_length() {
    let wire = b"r0001004echo0000000bHello World";
    assert_eq!(frame_length(wire, V01).unwrap(), Some(wire.len()));
    assert_eq!(frame_length(&wire[..10], V01).unwrap(), None);
    assert_eq!(frame_length(b"", V01).unwrap(), None);
    assert!(frame_length(b"z", V01).is_err());
}
