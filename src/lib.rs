//! # gotalk-protocol
//!
//! Versioned wire codec for the Gotalk text-framed request/response protocol.
//!
//! Turns byte buffers into strongly-typed [`Message`] values and back, for
//! every message kind of every supported protocol version, failing with a
//! typed [`ProtocolError`] on malformed or oversized input. No I/O happens
//! here; transports feed buffers in (or wrap a stream in
//! [`core::codec::FrameCodec`]) and own the session lifecycle.
//!
//! ## Quick Start
//! ```rust
//! use gotalk_protocol::{decode_message, encode_message, read_version_token, Message};
//! use bytes::Bytes;
//!
//! let version = read_version_token(b"01")?;
//! let request = Message::SingleRequest {
//!     request_id: "0001".into(),
//!     operation: "echo".into(),
//!     payload: Bytes::from_static(b"Hello World"),
//! };
//!
//! let wire = encode_message(&request, version)?;
//! assert_eq!(wire, b"r0001004echo0000000bHello World");
//! assert_eq!(decode_message(&wire, version)?, request);
//! # Ok::<(), gotalk_protocol::ProtocolError>(())
//! ```
//!
//! ## Modules
//! - [`crate::core`]: framing primitives, layouts, stream codecs, payload bodies
//! - [`protocol`]: messages, version resolver, dispatcher, variant codecs
//! - [`config`]: wire constants and runtime configuration
//! - [`utils`]: logging setup and metrics

pub mod config;
pub mod core;
pub mod error;
pub mod protocol;
pub mod utils;

pub use crate::core::codec::{FrameCodec, VersionTokenCodec};
pub use crate::error::{Field, ProtocolError, Result};
pub use crate::protocol::message::{Message, MessageKind, RequestId};
pub use crate::protocol::version::{
    read_version_token, resolve_version, write_version_token, ProtocolVersion,
};
pub use crate::protocol::{decode_message, encode_message, frame_length};
