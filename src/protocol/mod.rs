//! # Protocol Layer
//!
//! Versioned message encoding and decoding.
//!
//! ```text
//! bytes → version resolver → layout → dispatcher(tag) → variant codec → Message
//! ```
//!
//! ## Components
//! - **Version**: the 2-byte token that opens a session and selects a layout
//! - **Dispatcher**: `(version, tag) → codec` table built once at startup
//! - **Frame**: per-kind encode/decode built on the framing primitives
//! - **Validation**: size and width limits enforced before encoding
//!
//! All entry points are pure, synchronous transforms over caller-owned
//! buffers and may be called concurrently without coordination.

pub mod dispatcher;
pub mod frame;
pub mod message;
pub mod validation;
pub mod version;

#[cfg(test)]
mod tests;

use crate::error::{constants, Field, ProtocolError, Result};
use crate::utils::metrics::global_metrics;
use dispatcher::Dispatcher;
use message::Message;
use tracing::{debug, instrument, trace};
use version::ProtocolVersion;

/// Decodes exactly one frame.
///
/// The buffer must start at the type tag and end at the last payload byte.
#[instrument(skip(bytes), fields(len = bytes.len()), level = "trace")]
pub fn decode_message(bytes: &[u8], version: ProtocolVersion) -> Result<Message> {
    let result = decode_inner(bytes, version);
    match &result {
        Ok(message) => {
            trace!(kind = %message.kind(), "Decoded frame");
            global_metrics().frame_decoded(bytes.len() as u64);
        }
        Err(e) => {
            debug!(error = %e, "Rejected frame");
            global_metrics().decode_error();
        }
    }
    result
}

fn decode_inner(bytes: &[u8], version: ProtocolVersion) -> Result<Message> {
    let (&tag, body) = bytes
        .split_first()
        .ok_or_else(|| ProtocolError::malformed(Field::Tag, constants::ERR_MISSING_TAG))?;
    let codec = Dispatcher::global().dispatch(version, tag)?;
    (codec.decode)(body, version.layout())
}

/// Encodes `message` for `version`.
///
/// All-or-nothing: a validation failure yields no bytes.
#[instrument(skip(message), fields(kind = %message.kind()), level = "trace")]
pub fn encode_message(message: &Message, version: ProtocolVersion) -> Result<Vec<u8>> {
    let result = Dispatcher::global()
        .dispatch(version, message.tag())
        .and_then(|_| frame::encode_frame(message, version.layout()));
    match &result {
        Ok(bytes) => {
            trace!(len = bytes.len(), "Encoded frame");
            global_metrics().frame_encoded(bytes.len() as u64);
        }
        Err(e) => {
            debug!(error = %e, "Refused to encode frame");
            global_metrics().encode_error();
        }
    }
    result
}

/// Length of the first frame in `buf`.
///
/// Returns `Ok(None)` while the header bytes needed to compute it are still
/// missing. The frame itself may extend past the end of `buf`.
pub fn frame_length(buf: &[u8], version: ProtocolVersion) -> Result<Option<usize>> {
    Ok(probe(buf, version)?.map(|(len, _)| len))
}

/// Frame length plus the declared payload length.
pub(crate) fn probe(buf: &[u8], version: ProtocolVersion) -> Result<Option<(usize, u64)>> {
    let Some(&tag) = buf.first() else {
        return Ok(None);
    };
    let codec = Dispatcher::global().dispatch(version, tag)?;
    frame::probe_frame_len(buf, codec.kind, version.layout())
}
