//! # Error Types
//!
//! Error handling for the wire codec.
//!
//! Every failure is terminal for the single frame being processed: the codec
//! never retries, truncates or partially recovers a frame. Variants carry the
//! offending [`Field`] and the sizes involved so callers can decide whether to
//! drop the connection or ask for retransmission.
//!
//! ## Error Categories
//! - **Negotiation**: unknown version tokens, type tags not defined for a version
//! - **Framing**: bad, missing or inconsistent counters, truncated content
//! - **Limits**: operation names, payloads and fixed-width fields that do not fit
//! - **Ambient**: I/O (codec traits), payload body serialization, configuration
//!
//! ## Example Usage
//! ```rust
//! use gotalk_protocol::error::ProtocolError;
//! use gotalk_protocol::{decode_message, ProtocolVersion};
//! use tracing::error;
//!
//! match decode_message(b"R001000000ff", ProtocolVersion::V00) {
//!     Err(ProtocolError::MalformedFrame { field, .. }) => error!(%field, "Dropping frame"),
//!     other => panic!("unexpected: {other:?}"),
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use thiserror::Error;

/// Error message constants to reduce allocations in error paths.
pub mod constants {
    /// Framing errors
    pub const ERR_MISSING_TAG: &str = "frame is empty, missing type tag";
    pub const ERR_TRUNCATED: &str = "fewer bytes remain than the field requires";
    pub const ERR_INVALID_DIGIT: &str = "counter contains a character outside its base";
    pub const ERR_TRAILING_BYTES: &str = "bytes remain after the declared payload";
    pub const ERR_INVALID_UTF8: &str = "text field is not valid UTF-8";

    /// Negotiation errors
    pub const ERR_VERSION_LENGTH: &str = "version token must be exactly 2 bytes";
    pub const ERR_KIND_UNAVAILABLE: &str = "message kind is not defined for this version";

    /// Logging errors
    pub const ERR_SUBSCRIBER_SET: &str = "a global tracing subscriber is already installed";
}

/// Names the wire field an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Field {
    /// The 1-byte type tag
    Tag,
    /// The fixed-width request id
    RequestId,
    /// The 3-character operation / name length counter
    NameLength,
    /// Operation of a request frame
    Operation,
    /// Name of a notification frame
    Name,
    /// The retry wait hint
    Wait,
    /// The 8-character payload length counter
    PayloadLength,
    /// Payload bytes
    Payload,
}

impl Field {
    /// Wire name used in logs and error messages
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Tag => "tag",
            Field::RequestId => "request_id",
            Field::NameLength => "name_length",
            Field::Operation => "operation",
            Field::Name => "name",
            Field::Wait => "wait",
            Field::PayloadLength => "payload_length",
            Field::Payload => "payload",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ProtocolError is the primary error type for all codec operations
#[derive(Error, Debug, Serialize, Deserialize)]
pub enum ProtocolError {
    #[error("Unsupported protocol version: {token:?}")]
    UnsupportedVersion { token: String },

    #[error("Invalid message type {tag:?} for protocol version {version}")]
    InvalidMessageType { tag: char, version: String },

    #[error("Malformed frame at {field}: {reason}")]
    MalformedFrame { field: Field, reason: String },

    #[error("{field} too long: {length} bytes (max {max})")]
    OperationTooLong { field: Field, length: usize, max: usize },

    #[error("Payload too long: {length} bytes (max {max})")]
    PayloadTooLong { length: u64, max: u64 },

    #[error("{field} value {value} does not fit a {width}-character field")]
    FieldOverflow {
        field: Field,
        value: String,
        width: usize,
    },

    #[error("I/O error: {0}")]
    #[serde(skip_serializing, skip_deserializing)]
    Io(#[from] io::Error),

    #[error("Serialize error: {0}")]
    SerializeError(String),

    #[error("Deserialize error: {0}")]
    DeserializeError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl ProtocolError {
    /// Shorthand for a [`ProtocolError::MalformedFrame`] with a static reason
    pub(crate) fn malformed(field: Field, reason: &str) -> Self {
        ProtocolError::MalformedFrame {
            field,
            reason: reason.to_string(),
        }
    }
}

/// Type alias for Results using ProtocolError
pub type Result<T> = std::result::Result<T, ProtocolError>;
