//! Message envelope: one variant per frame kind.
//!
//! Values are immutable snapshots produced by a single encode or decode call.
//! Correlating stream parts by request id belongs to the session layer.

use bytes::Bytes;
use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Fixed-width, zero-padded decimal correlation token.
///
/// Never parsed as a number. On encode a shorter id is left-padded with
/// `'0'` to the version's width, so ids compare equal when their padded
/// forms match: `"1"`, `"001"` and `"0001"` are the same id.
#[derive(Debug, Clone)]
pub struct RequestId(String);

impl RequestId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether every character is an ASCII decimal digit
    pub fn is_decimal(&self) -> bool {
        self.0.bytes().all(|b| b.is_ascii_digit())
    }

    /// The id zero-filled to `width` bytes. Ids already at or above
    /// `width` are returned unchanged.
    pub fn padded(&self, width: usize) -> Cow<'_, str> {
        if self.0.len() >= width {
            Cow::Borrowed(&self.0)
        } else {
            let mut padded = "0".repeat(width - self.0.len());
            padded.push_str(&self.0);
            Cow::Owned(padded)
        }
    }

    /// The id without its zero padding
    fn significant(&self) -> &str {
        self.0.trim_start_matches('0')
    }
}

impl PartialEq for RequestId {
    fn eq(&self, other: &Self) -> bool {
        self.significant() == other.significant()
    }
}

impl Eq for RequestId {}

impl Hash for RequestId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.significant().hash(state);
    }
}

impl From<&str> for RequestId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for RequestId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u32> for RequestId {
    fn from(id: u32) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Message kinds, keyed by their 1-byte type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    SingleRequest,
    SingleResult,
    StreamRequest,
    StreamRequestPart,
    StreamResult,
    ErrorResult,
    RetryResult,
    Notification,
}

/// Fields present after the tag, in wire order: request id, name, wait, payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FrameShape {
    pub request_id: bool,
    pub name: bool,
    pub wait: bool,
}

impl MessageKind {
    pub const ALL: [MessageKind; 8] = [
        MessageKind::SingleRequest,
        MessageKind::SingleResult,
        MessageKind::StreamRequest,
        MessageKind::StreamRequestPart,
        MessageKind::StreamResult,
        MessageKind::ErrorResult,
        MessageKind::RetryResult,
        MessageKind::Notification,
    ];

    pub fn tag(self) -> u8 {
        match self {
            MessageKind::SingleRequest => b'r',
            MessageKind::SingleResult => b'R',
            MessageKind::StreamRequest => b's',
            MessageKind::StreamRequestPart => b'p',
            MessageKind::StreamResult => b'S',
            MessageKind::ErrorResult => b'E',
            MessageKind::RetryResult => b'e',
            MessageKind::Notification => b'n',
        }
    }

    /// Kind for a tag byte, regardless of version
    pub fn from_tag(tag: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }

    pub fn name(self) -> &'static str {
        match self {
            MessageKind::SingleRequest => "single_request",
            MessageKind::SingleResult => "single_result",
            MessageKind::StreamRequest => "stream_request",
            MessageKind::StreamRequestPart => "stream_request_part",
            MessageKind::StreamResult => "stream_result",
            MessageKind::ErrorResult => "error_result",
            MessageKind::RetryResult => "retry_result",
            MessageKind::Notification => "notification",
        }
    }

    pub(crate) fn shape(self) -> FrameShape {
        match self {
            MessageKind::SingleRequest | MessageKind::StreamRequest => FrameShape {
                request_id: true,
                name: true,
                wait: false,
            },
            MessageKind::SingleResult
            | MessageKind::StreamRequestPart
            | MessageKind::StreamResult
            | MessageKind::ErrorResult => FrameShape {
                request_id: true,
                name: false,
                wait: false,
            },
            MessageKind::RetryResult => FrameShape {
                request_id: true,
                name: false,
                wait: true,
            },
            MessageKind::Notification => FrameShape {
                request_id: false,
                name: true,
                wait: false,
            },
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A decoded frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    SingleRequest {
        request_id: RequestId,
        operation: String,
        payload: Bytes,
    },
    SingleResult {
        request_id: RequestId,
        payload: Bytes,
    },
    /// Opens a request stream; continued by `StreamRequestPart` frames
    StreamRequest {
        request_id: RequestId,
        operation: String,
        payload: Bytes,
    },
    StreamRequestPart {
        request_id: RequestId,
        payload: Bytes,
    },
    StreamResult {
        request_id: RequestId,
        payload: Bytes,
    },
    ErrorResult {
        request_id: RequestId,
        payload: Bytes,
    },
    /// Asks the peer to retry its request after roughly `wait` units
    RetryResult {
        request_id: RequestId,
        wait: u64,
        payload: Bytes,
    },
    /// Uncorrelated event identified by name
    Notification { name: String, payload: Bytes },
}

impl Message {
    pub fn kind(&self) -> MessageKind {
        match self {
            Message::SingleRequest { .. } => MessageKind::SingleRequest,
            Message::SingleResult { .. } => MessageKind::SingleResult,
            Message::StreamRequest { .. } => MessageKind::StreamRequest,
            Message::StreamRequestPart { .. } => MessageKind::StreamRequestPart,
            Message::StreamResult { .. } => MessageKind::StreamResult,
            Message::ErrorResult { .. } => MessageKind::ErrorResult,
            Message::RetryResult { .. } => MessageKind::RetryResult,
            Message::Notification { .. } => MessageKind::Notification,
        }
    }

    #[inline]
    pub fn tag(&self) -> u8 {
        self.kind().tag()
    }

    /// Request id, absent for notifications
    pub fn request_id(&self) -> Option<&RequestId> {
        match self {
            Message::SingleRequest { request_id, .. }
            | Message::SingleResult { request_id, .. }
            | Message::StreamRequest { request_id, .. }
            | Message::StreamRequestPart { request_id, .. }
            | Message::StreamResult { request_id, .. }
            | Message::ErrorResult { request_id, .. }
            | Message::RetryResult { request_id, .. } => Some(request_id),
            Message::Notification { .. } => None,
        }
    }

    /// Operation of a request, or name of a notification
    pub fn name(&self) -> Option<&str> {
        match self {
            Message::SingleRequest { operation, .. } | Message::StreamRequest { operation, .. } => {
                Some(operation)
            }
            Message::Notification { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn wait(&self) -> Option<u64> {
        match self {
            Message::RetryResult { wait, .. } => Some(*wait),
            _ => None,
        }
    }

    pub fn payload(&self) -> &Bytes {
        match self {
            Message::SingleRequest { payload, .. }
            | Message::SingleResult { payload, .. }
            | Message::StreamRequest { payload, .. }
            | Message::StreamRequestPart { payload, .. }
            | Message::StreamResult { payload, .. }
            | Message::ErrorResult { payload, .. }
            | Message::RetryResult { payload, .. }
            | Message::Notification { payload, .. } => payload,
        }
    }
}
