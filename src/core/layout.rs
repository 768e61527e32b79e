//! # Per-Version Field Layout
//!
//! Describes, for one protocol version, the widths and bases of every
//! fixed-width field and which message kinds exist. The variant codecs are
//! parameterized by a layout; a new version is a new constant here plus a
//! registry entry, never a branch inside the codecs.

use crate::core::counter::Radix;

/// Width of the operation / notification name counter
pub const NAME_COUNT_WIDTH: usize = 3;

/// Width of the payload length counter
pub const PAYLOAD_COUNT_WIDTH: usize = 8;

/// Width of the retry wait counter
pub const WAIT_COUNT_WIDTH: usize = 8;

/// Wire layout of one protocol version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldLayout {
    /// Characters in a request id
    pub request_id_width: usize,
    /// Whether the retry result kind (`e`) is defined
    pub has_retry_kind: bool,
    pub name_count_width: usize,
    pub name_count_radix: Radix,
    pub payload_count_width: usize,
    pub payload_count_radix: Radix,
    pub wait_count_width: usize,
    pub wait_count_radix: Radix,
}

impl FieldLayout {
    const fn base(request_id_width: usize, has_retry_kind: bool) -> Self {
        Self {
            request_id_width,
            has_retry_kind,
            name_count_width: NAME_COUNT_WIDTH,
            name_count_radix: Radix::Hex,
            payload_count_width: PAYLOAD_COUNT_WIDTH,
            payload_count_radix: Radix::Hex,
            wait_count_width: WAIT_COUNT_WIDTH,
            wait_count_radix: Radix::Hex,
        }
    }

    /// Largest byte length the name counter can announce
    pub fn max_name_length(&self) -> u64 {
        self.name_count_radix.max_value(self.name_count_width)
    }

    /// Largest byte length the payload counter can announce
    pub fn max_payload_length(&self) -> u64 {
        self.payload_count_radix.max_value(self.payload_count_width)
    }
}

/// Version `00`: 3-character request ids, no retry kind
pub const LAYOUT_V00: FieldLayout = FieldLayout::base(3, false);

/// Version `01`: 4-character request ids, retry results with a wait hint
pub const LAYOUT_V01: FieldLayout = FieldLayout::base(4, true);
