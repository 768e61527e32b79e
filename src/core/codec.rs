//! # Stream Codecs
//!
//! `tokio_util::codec` adapters so a transport can wrap any byte stream in
//! `Framed` and exchange [`Message`] values.
//!
//! - [`VersionTokenCodec`] handles the 2-byte exchange that opens a session.
//! - [`FrameCodec`] is bound to the negotiated version and splits complete
//!   frames off the read buffer. Partial frames are left untouched until the
//!   rest arrives; declared payloads above `max_decoded_payload` (16 MB unless
//!   configured) are rejected before they are buffered, and buffer growth
//!   for a partial frame is capped per call.

use crate::config::{FrameConfig, DEFAULT_MAX_DECODED_PAYLOAD, MAX_PAYLOAD_LENGTH};
use crate::error::{ProtocolError, Result};
use crate::protocol::message::Message;
use crate::protocol::version::{
    read_version_token, write_version_token, ProtocolVersion, VERSION_TOKEN_LEN,
};
use crate::protocol::{decode_message, encode_message, probe};
use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};
use tracing::debug;

/// Most the decoder reserves ahead of a partial frame
const RESERVE_CHUNK: usize = 64 * 1024;

/// Frame codec for one negotiated protocol version
#[derive(Debug, Clone, Copy)]
pub struct FrameCodec {
    version: ProtocolVersion,
    max_decoded_payload: u64,
}

impl FrameCodec {
    /// Codec for `version` with the default 16 MB decode limit
    pub fn new(version: ProtocolVersion) -> Self {
        Self {
            version,
            max_decoded_payload: DEFAULT_MAX_DECODED_PAYLOAD,
        }
    }

    /// Caps the payload size accepted on decode
    pub fn with_max_decoded_payload(mut self, max: u64) -> Self {
        self.max_decoded_payload = max.min(MAX_PAYLOAD_LENGTH);
        self
    }

    pub fn from_config(config: &FrameConfig) -> Result<Self> {
        let version = config.version.parse::<ProtocolVersion>()?;
        Ok(Self::new(version).with_max_decoded_payload(config.max_decoded_payload))
    }

    pub fn version(&self) -> ProtocolVersion {
        self.version
    }

    pub fn max_decoded_payload(&self) -> u64 {
        self.max_decoded_payload
    }
}

impl Decoder for FrameCodec {
    type Item = Message;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>> {
        let Some((frame_len, payload_len)) = probe(&src[..], self.version)? else {
            return Ok(None);
        };

        if payload_len > self.max_decoded_payload {
            debug!(
                payload_len,
                max = self.max_decoded_payload,
                "Declared payload exceeds decode limit"
            );
            return Err(ProtocolError::PayloadTooLong {
                length: payload_len,
                max: self.max_decoded_payload,
            });
        }

        if src.len() < frame_len {
            src.reserve((frame_len - src.len()).min(RESERVE_CHUNK));
            return Ok(None);
        }

        let frame = src.split_to(frame_len);
        decode_message(&frame, self.version).map(Some)
    }
}

impl Encoder<Message> for FrameCodec {
    type Error = ProtocolError;

    fn encode(&mut self, item: Message, dst: &mut BytesMut) -> Result<()> {
        <Self as Encoder<&Message>>::encode(self, &item, dst)
    }
}

impl Encoder<&Message> for FrameCodec {
    type Error = ProtocolError;

    fn encode(&mut self, item: &Message, dst: &mut BytesMut) -> Result<()> {
        let bytes = encode_message(item, self.version)?;
        dst.extend_from_slice(&bytes);
        Ok(())
    }
}

/// Codec for the opening version token
#[derive(Debug, Clone, Copy, Default)]
pub struct VersionTokenCodec;

impl Decoder for VersionTokenCodec {
    type Item = ProtocolVersion;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>> {
        if src.len() < VERSION_TOKEN_LEN {
            return Ok(None);
        }
        let token = src.split_to(VERSION_TOKEN_LEN);
        read_version_token(&token).map(Some)
    }
}

impl Encoder<ProtocolVersion> for VersionTokenCodec {
    type Error = ProtocolError;

    fn encode(&mut self, item: ProtocolVersion, dst: &mut BytesMut) -> Result<()> {
        dst.extend_from_slice(&write_version_token(item));
        Ok(())
    }
}
