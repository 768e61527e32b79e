//! # Payload Bodies
//!
//! The codec treats payloads as opaque bytes. Peers conventionally carry JSON
//! in them, so this module offers a thin layer for turning serde values into
//! payload bytes and back.
//!
//! ## Usage
//! ```rust
//! use gotalk_protocol::core::serialization::{PayloadBody, PayloadFormat};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Echo {
//!     message: String,
//! }
//!
//! let body = Echo { message: "Hello World".into() };
//! let payload = body.to_payload(PayloadFormat::Json).unwrap();
//! assert_eq!(payload.as_ref(), br#"{"message":"Hello World"}"#);
//! assert_eq!(Echo::from_payload(&payload, PayloadFormat::Json).unwrap(), body);
//! ```

use crate::error::{ProtocolError, Result};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Supported payload encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PayloadFormat {
    /// Compact JSON text (interoperable default)
    #[default]
    Json,
    /// Binary bincode, for peers that agree on it out of band
    Bincode,
}

impl PayloadFormat {
    /// Get human-readable name
    pub fn name(self) -> &'static str {
        match self {
            PayloadFormat::Json => "JSON",
            PayloadFormat::Bincode => "Bincode",
        }
    }
}

/// Serde values that can travel as a frame payload
pub trait PayloadBody: Serialize + for<'de> Deserialize<'de> + Sized {
    /// Serialize into payload bytes
    fn to_payload(&self, format: PayloadFormat) -> Result<Bytes> {
        let bytes = match format {
            PayloadFormat::Json => serde_json::to_vec(self)
                .map_err(|e| ProtocolError::SerializeError(e.to_string()))?,
            PayloadFormat::Bincode => bincode::serialize(self)
                .map_err(|e| ProtocolError::SerializeError(e.to_string()))?,
        };
        Ok(Bytes::from(bytes))
    }

    /// Deserialize from payload bytes
    fn from_payload(payload: &[u8], format: PayloadFormat) -> Result<Self> {
        match format {
            PayloadFormat::Json => serde_json::from_slice(payload)
                .map_err(|e| ProtocolError::DeserializeError(e.to_string())),
            PayloadFormat::Bincode => bincode::deserialize(payload)
                .map_err(|e| ProtocolError::DeserializeError(e.to_string())),
        }
    }
}

impl<T> PayloadBody for T where T: Serialize + for<'de> Deserialize<'de> {}
