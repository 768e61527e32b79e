//! # Framing Primitives
//!
//! Fixed-width textual counters and the byte slices they announce.
//!
//! Every variable-length field on the wire is preceded by a zero-padded
//! counter of an exact character width, rendered in decimal or hexadecimal.
//! These functions are the only place where frame bytes are parsed; variant
//! codecs go through them and never index buffers themselves.
//!
//! ```text
//! 00c chat message 00000033 {"message":"Hi",...}
//! └┬┘ └────┬─────┘ └──┬───┘ └────────┬─────────┘
//! Count3   text    Count8Hex       payload
//! ```

use crate::error::{constants, Field, ProtocolError, Result};

/// Base a counter is rendered in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Radix {
    Decimal,
    Hex,
}

impl Radix {
    /// Numeric base
    #[inline]
    pub fn base(self) -> u32 {
        match self {
            Radix::Decimal => 10,
            Radix::Hex => 16,
        }
    }

    /// Largest value a counter of `width` characters can hold in this base,
    /// saturating at `u64::MAX`.
    pub fn max_value(self, width: usize) -> u64 {
        let base = u64::from(self.base());
        let mut max: u64 = 1;
        for _ in 0..width {
            max = match max.checked_mul(base) {
                Some(v) => v,
                None => return u64::MAX,
            };
        }
        max - 1
    }
}

/// Reads a `width`-character counter at `offset`.
///
/// Returns the parsed value and the offset just past the counter.
pub fn read_count(
    buf: &[u8],
    offset: usize,
    width: usize,
    radix: Radix,
    field: Field,
) -> Result<(u64, usize)> {
    let end = offset
        .checked_add(width)
        .filter(|end| *end <= buf.len())
        .ok_or_else(|| ProtocolError::malformed(field, constants::ERR_TRUNCATED))?;

    let mut value: u64 = 0;
    for &byte in &buf[offset..end] {
        let digit = char::from(byte)
            .to_digit(radix.base())
            .ok_or_else(|| ProtocolError::malformed(field, constants::ERR_INVALID_DIGIT))?;
        value = value
            .checked_mul(u64::from(radix.base()))
            .and_then(|v| v.checked_add(u64::from(digit)))
            .ok_or_else(|| ProtocolError::malformed(field, constants::ERR_INVALID_DIGIT))?;
    }

    Ok((value, end))
}

/// Returns exactly `length` bytes starting at `offset`, and the offset past them.
pub fn read_slice(buf: &[u8], offset: usize, length: usize, field: Field) -> Result<(&[u8], usize)> {
    let end = offset
        .checked_add(length)
        .filter(|end| *end <= buf.len())
        .ok_or_else(|| ProtocolError::malformed(field, constants::ERR_TRUNCATED))?;
    Ok((&buf[offset..end], end))
}

/// Renders `value` zero-padded to exactly `width` characters.
pub fn write_count(value: u64, width: usize, radix: Radix, field: Field) -> Result<String> {
    if value > radix.max_value(width) {
        return Err(ProtocolError::FieldOverflow {
            field,
            value: value.to_string(),
            width,
        });
    }

    Ok(match radix {
        Radix::Decimal => format!("{value:0width$}"),
        Radix::Hex => format!("{value:0width$x}"),
    })
}

/// Appends a counter followed by the bytes it counts.
pub fn write_slice(
    dst: &mut Vec<u8>,
    bytes: &[u8],
    width: usize,
    radix: Radix,
    field: Field,
) -> Result<()> {
    let count = write_count(bytes.len() as u64, width, radix, field)?;
    dst.extend_from_slice(count.as_bytes());
    dst.extend_from_slice(bytes);
    Ok(())
}
