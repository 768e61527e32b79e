//! Encode-side limits.
//!
//! Checked before a single byte is emitted so that encoding is all-or-nothing.

use crate::config::{MAX_OPERATION_LENGTH, MAX_PAYLOAD_LENGTH};
use crate::core::counter::Radix;
use crate::core::layout::FieldLayout;
use crate::error::{Field, ProtocolError, Result};
use crate::protocol::message::{Message, RequestId};

/// Rejects operation / notification names longer than 4095 bytes.
pub fn check_name_length(field: Field, length: usize) -> Result<()> {
    if length > MAX_OPERATION_LENGTH {
        return Err(ProtocolError::OperationTooLong {
            field,
            length,
            max: MAX_OPERATION_LENGTH,
        });
    }
    Ok(())
}

/// Rejects payloads longer than 4 GiB - 1.
pub fn check_payload_length(length: u64) -> Result<()> {
    if length > MAX_PAYLOAD_LENGTH {
        return Err(ProtocolError::PayloadTooLong {
            length,
            max: MAX_PAYLOAD_LENGTH,
        });
    }
    Ok(())
}

/// Rejects values that need more characters than a counter provides.
pub fn check_fits(field: Field, value: u64, width: usize, radix: Radix) -> Result<()> {
    if value > radix.max_value(width) {
        return Err(ProtocolError::FieldOverflow {
            field,
            value: value.to_string(),
            width,
        });
    }
    Ok(())
}

/// Rejects request ids that are not decimal or are wider than the layout
/// allows. Either way the id cannot be rendered in the decimal field.
pub fn check_request_id(id: &RequestId, layout: &FieldLayout) -> Result<()> {
    if !id.is_decimal() || id.as_str().len() > layout.request_id_width {
        return Err(ProtocolError::FieldOverflow {
            field: Field::RequestId,
            value: id.to_string(),
            width: layout.request_id_width,
        });
    }
    Ok(())
}

/// Runs every encode-side check for `message` under `layout`.
pub fn validate_message(message: &Message, layout: &FieldLayout) -> Result<()> {
    if let Some(id) = message.request_id() {
        check_request_id(id, layout)?;
    }

    if let Some(name) = message.name() {
        let field = match message {
            Message::Notification { .. } => Field::Name,
            _ => Field::Operation,
        };
        check_name_length(field, name.len())?;
        check_fits(
            field,
            name.len() as u64,
            layout.name_count_width,
            layout.name_count_radix,
        )?;
    }

    if let Some(wait) = message.wait() {
        check_fits(
            Field::Wait,
            wait,
            layout.wait_count_width,
            layout.wait_count_radix,
        )?;
    }

    let payload_len = message.payload().len() as u64;
    check_payload_length(payload_len)?;
    check_fits(
        Field::Payload,
        payload_len,
        layout.payload_count_width,
        layout.payload_count_radix,
    )
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::core::layout::{LAYOUT_V00, LAYOUT_V01};
    use bytes::Bytes;

    #[test]
    fn test_name_limit_boundary() {
        assert!(check_name_length(Field::Operation, 4095).is_ok());
        assert!(matches!(
            check_name_length(Field::Operation, 4096),
            Err(ProtocolError::OperationTooLong { length: 4096, max: 4095, .. })
        ));
    }

    #[test]
    fn test_payload_limit_boundary() {
        assert!(check_payload_length(4_294_967_295).is_ok());
        assert!(matches!(
            check_payload_length(4_294_967_296),
            Err(ProtocolError::PayloadTooLong { length: 4_294_967_296, .. })
        ));
    }

    #[test]
    fn test_request_id_width_per_layout() {
        assert!(check_request_id(&"001".into(), &LAYOUT_V00).is_ok());
        assert!(check_request_id(&"1".into(), &LAYOUT_V00).is_ok());
        assert!(matches!(
            check_request_id(&"0001".into(), &LAYOUT_V00),
            Err(ProtocolError::FieldOverflow { field: Field::RequestId, width: 3, .. })
        ));
        assert!(check_request_id(&"0001".into(), &LAYOUT_V01).is_ok());
    }

    #[test]
    fn test_request_id_must_be_decimal() {
        for id in ["a b", "x", "00a1", "-1", "１"] {
            assert!(
                matches!(
                    check_request_id(&id.into(), &LAYOUT_V01),
                    Err(ProtocolError::FieldOverflow { field: Field::RequestId, .. })
                ),
                "{id:?}"
            );
        }
    }

    #[test]
    fn test_wait_overflow() {
        let msg = Message::RetryResult {
            request_id: "0001".into(),
            wait: u64::from(u32::MAX) + 1,
            payload: Bytes::new(),
        };
        assert!(matches!(
            validate_message(&msg, &LAYOUT_V01),
            Err(ProtocolError::FieldOverflow { field: Field::Wait, width: 8, .. })
        ));
    }

    #[test]
    fn test_notification_name_field() {
        let msg = Message::Notification {
            name: "n".repeat(4096),
            payload: Bytes::new(),
        };
        assert!(matches!(
            validate_message(&msg, &LAYOUT_V00),
            Err(ProtocolError::OperationTooLong { field: Field::Name, .. })
        ));
    }
}
