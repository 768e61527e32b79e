//! # Variant Codecs
//!
//! Encode/decode for each message kind, parameterized by the version's
//! [`FieldLayout`]. Field order after the 1-byte tag:
//!
//! ```text
//! r, s        RequestId  Count3 Operation  Count8Hex Payload
//! R, p, S, E  RequestId                    Count8Hex Payload
//! e           RequestId  Count8Hex Wait    Count8Hex Payload
//! n                      Count3 Name       Count8Hex Payload
//! ```
//!
//! A frame must contain exactly the declared bytes; short or trailing
//! content is `MalformedFrame`.

use crate::core::counter::{read_count, read_slice, write_count, write_slice};
use crate::core::layout::FieldLayout;
use crate::error::{constants, Field, ProtocolError, Result};
use crate::protocol::message::{Message, MessageKind, RequestId};
use crate::protocol::validation::validate_message;
use bytes::Bytes;

/// Decodes the bytes following the tag into a message
pub(crate) type DecodeFn = fn(&[u8], &FieldLayout) -> Result<Message>;

/// Raw fields of one frame body, borrowed from the input buffer
struct FrameFields<'a> {
    request_id: Option<&'a str>,
    name: Option<&'a str>,
    wait: Option<u64>,
    payload: &'a [u8],
}

impl FrameFields<'_> {
    fn request_id(&self) -> Result<RequestId> {
        self.request_id
            .map(RequestId::from)
            .ok_or_else(|| ProtocolError::malformed(Field::RequestId, constants::ERR_TRUNCATED))
    }

    fn name(&self, field: Field) -> Result<String> {
        self.name
            .map(str::to_owned)
            .ok_or_else(|| ProtocolError::malformed(field, constants::ERR_TRUNCATED))
    }

    fn payload(&self) -> Bytes {
        Bytes::copy_from_slice(self.payload)
    }
}

fn read_text(body: &[u8], offset: usize, length: usize, field: Field) -> Result<(&str, usize)> {
    let (bytes, next) = read_slice(body, offset, length, field)?;
    let text = std::str::from_utf8(bytes)
        .map_err(|_| ProtocolError::malformed(field, constants::ERR_INVALID_UTF8))?;
    Ok((text, next))
}

/// Walks the body of a `kind` frame, tag excluded.
fn read_fields<'a>(
    body: &'a [u8],
    kind: MessageKind,
    name_field: Field,
    layout: &FieldLayout,
) -> Result<FrameFields<'a>> {
    let shape = kind.shape();
    let mut offset = 0;

    let request_id = if shape.request_id {
        let (id, next) = read_text(body, offset, layout.request_id_width, Field::RequestId)?;
        if !id.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ProtocolError::malformed(
                Field::RequestId,
                constants::ERR_INVALID_DIGIT,
            ));
        }
        offset = next;
        Some(id)
    } else {
        None
    };

    let name = if shape.name {
        let (length, next) = read_count(
            body,
            offset,
            layout.name_count_width,
            layout.name_count_radix,
            Field::NameLength,
        )?;
        let (name, next) = read_text(body, next, to_usize(length, name_field)?, name_field)?;
        offset = next;
        Some(name)
    } else {
        None
    };

    let wait = if shape.wait {
        let (wait, next) = read_count(
            body,
            offset,
            layout.wait_count_width,
            layout.wait_count_radix,
            Field::Wait,
        )?;
        offset = next;
        Some(wait)
    } else {
        None
    };

    let (length, next) = read_count(
        body,
        offset,
        layout.payload_count_width,
        layout.payload_count_radix,
        Field::PayloadLength,
    )?;
    let (payload, end) = read_slice(body, next, to_usize(length, Field::Payload)?, Field::Payload)?;

    if end != body.len() {
        return Err(ProtocolError::malformed(
            Field::Payload,
            constants::ERR_TRAILING_BYTES,
        ));
    }

    Ok(FrameFields {
        request_id,
        name,
        wait,
        payload,
    })
}

fn to_usize(value: u64, field: Field) -> Result<usize> {
    usize::try_from(value).map_err(|_| ProtocolError::malformed(field, constants::ERR_TRUNCATED))
}

fn decode_single_request(body: &[u8], layout: &FieldLayout) -> Result<Message> {
    let f = read_fields(body, MessageKind::SingleRequest, Field::Operation, layout)?;
    Ok(Message::SingleRequest {
        request_id: f.request_id()?,
        operation: f.name(Field::Operation)?,
        payload: f.payload(),
    })
}

fn decode_single_result(body: &[u8], layout: &FieldLayout) -> Result<Message> {
    let f = read_fields(body, MessageKind::SingleResult, Field::Operation, layout)?;
    Ok(Message::SingleResult {
        request_id: f.request_id()?,
        payload: f.payload(),
    })
}

fn decode_stream_request(body: &[u8], layout: &FieldLayout) -> Result<Message> {
    let f = read_fields(body, MessageKind::StreamRequest, Field::Operation, layout)?;
    Ok(Message::StreamRequest {
        request_id: f.request_id()?,
        operation: f.name(Field::Operation)?,
        payload: f.payload(),
    })
}

fn decode_stream_request_part(body: &[u8], layout: &FieldLayout) -> Result<Message> {
    let f = read_fields(body, MessageKind::StreamRequestPart, Field::Operation, layout)?;
    Ok(Message::StreamRequestPart {
        request_id: f.request_id()?,
        payload: f.payload(),
    })
}

fn decode_stream_result(body: &[u8], layout: &FieldLayout) -> Result<Message> {
    let f = read_fields(body, MessageKind::StreamResult, Field::Operation, layout)?;
    Ok(Message::StreamResult {
        request_id: f.request_id()?,
        payload: f.payload(),
    })
}

fn decode_error_result(body: &[u8], layout: &FieldLayout) -> Result<Message> {
    let f = read_fields(body, MessageKind::ErrorResult, Field::Operation, layout)?;
    Ok(Message::ErrorResult {
        request_id: f.request_id()?,
        payload: f.payload(),
    })
}

fn decode_retry_result(body: &[u8], layout: &FieldLayout) -> Result<Message> {
    let f = read_fields(body, MessageKind::RetryResult, Field::Operation, layout)?;
    Ok(Message::RetryResult {
        request_id: f.request_id()?,
        wait: f
            .wait
            .ok_or_else(|| ProtocolError::malformed(Field::Wait, constants::ERR_TRUNCATED))?,
        payload: f.payload(),
    })
}

fn decode_notification(body: &[u8], layout: &FieldLayout) -> Result<Message> {
    let f = read_fields(body, MessageKind::Notification, Field::Name, layout)?;
    Ok(Message::Notification {
        name: f.name(Field::Name)?,
        payload: f.payload(),
    })
}

/// Decoder registered in the dispatch table for `kind`
pub(crate) fn decoder_for(kind: MessageKind) -> DecodeFn {
    match kind {
        MessageKind::SingleRequest => decode_single_request,
        MessageKind::SingleResult => decode_single_result,
        MessageKind::StreamRequest => decode_stream_request,
        MessageKind::StreamRequestPart => decode_stream_request_part,
        MessageKind::StreamResult => decode_stream_result,
        MessageKind::ErrorResult => decode_error_result,
        MessageKind::RetryResult => decode_retry_result,
        MessageKind::Notification => decode_notification,
    }
}

/// Exact encoded size of `message`, used to size the output buffer.
pub(crate) fn encoded_len(message: &Message, layout: &FieldLayout) -> usize {
    let mut len = 1 + layout.payload_count_width + message.payload().len();
    if message.request_id().is_some() {
        len += layout.request_id_width;
    }
    if let Some(name) = message.name() {
        len += layout.name_count_width + name.len();
    }
    if message.wait().is_some() {
        len += layout.wait_count_width;
    }
    len
}

/// Writes the full frame (tag included) for `message`.
///
/// Validation runs first; on failure nothing is returned.
pub(crate) fn encode_frame(message: &Message, layout: &FieldLayout) -> Result<Vec<u8>> {
    validate_message(message, layout)?;

    let mut out = Vec::with_capacity(encoded_len(message, layout));
    out.push(message.tag());

    if let Some(id) = message.request_id() {
        out.extend_from_slice(id.padded(layout.request_id_width).as_bytes());
    }

    if let Some(name) = message.name() {
        let field = match message {
            Message::Notification { .. } => Field::Name,
            _ => Field::Operation,
        };
        write_slice(
            &mut out,
            name.as_bytes(),
            layout.name_count_width,
            layout.name_count_radix,
            field,
        )?;
    }

    if let Some(wait) = message.wait() {
        let wait = write_count(wait, layout.wait_count_width, layout.wait_count_radix, Field::Wait)?;
        out.extend_from_slice(wait.as_bytes());
    }

    write_slice(
        &mut out,
        message.payload(),
        layout.payload_count_width,
        layout.payload_count_radix,
        Field::PayloadLength,
    )?;

    Ok(out)
}

/// Total length of the first frame in `buf`, once enough header bytes are
/// present to compute it. `Ok(None)` means more bytes are needed.
pub(crate) fn probe_frame_len(
    buf: &[u8],
    kind: MessageKind,
    layout: &FieldLayout,
) -> Result<Option<(usize, u64)>> {
    let shape = kind.shape();
    let mut offset = 1;

    if shape.request_id {
        offset += layout.request_id_width;
    }

    if shape.name {
        if buf.len() < offset + layout.name_count_width {
            return Ok(None);
        }
        let (length, next) = read_count(
            buf,
            offset,
            layout.name_count_width,
            layout.name_count_radix,
            Field::NameLength,
        )?;
        offset = next + to_usize(length, Field::NameLength)?;
    }

    if shape.wait {
        offset += layout.wait_count_width;
    }

    if buf.len() < offset + layout.payload_count_width {
        return Ok(None);
    }
    let (payload_len, next) = read_count(
        buf,
        offset,
        layout.payload_count_width,
        layout.payload_count_radix,
        Field::PayloadLength,
    )?;
    let total = next
        .checked_add(to_usize(payload_len, Field::Payload)?)
        .ok_or_else(|| ProtocolError::malformed(Field::Payload, constants::ERR_TRUNCATED))?;

    Ok(Some((total, payload_len)))
}
