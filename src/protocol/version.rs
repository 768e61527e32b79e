//! # Version Resolver
//!
//! Every connection opens with a 2-byte version token. The token is treated
//! as an opaque string and matched literally against the registry below:
//! `"00"` and `"01"` are known, anything else (including `"0"`, `"001"` or
//! non-numeric tokens) fails closed with `UnsupportedVersion`. There is no
//! fallback to a nearest known version.

use crate::core::layout::{FieldLayout, LAYOUT_V00, LAYOUT_V01};
use crate::error::{constants, ProtocolError, Result};
use crate::utils::metrics::global_metrics;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Length of the version token in bytes
pub const VERSION_TOKEN_LEN: usize = 2;

/// A supported protocol revision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtocolVersion {
    V00,
    V01,
}

/// Token → version registry. Read-only for the life of the process.
const REGISTRY: [(&[u8; VERSION_TOKEN_LEN], ProtocolVersion); 2] =
    [(b"00", ProtocolVersion::V00), (b"01", ProtocolVersion::V01)];

impl ProtocolVersion {
    /// Newest revision, used when nothing else is negotiated
    pub const LATEST: ProtocolVersion = ProtocolVersion::V01;

    /// All supported revisions, oldest first
    pub fn all() -> impl Iterator<Item = ProtocolVersion> {
        REGISTRY.iter().map(|(_, version)| *version)
    }

    /// The on-wire token
    pub fn token(self) -> &'static str {
        match self {
            ProtocolVersion::V00 => "00",
            ProtocolVersion::V01 => "01",
        }
    }

    /// Field layout used by this revision
    pub fn layout(self) -> &'static FieldLayout {
        match self {
            ProtocolVersion::V00 => &LAYOUT_V00,
            ProtocolVersion::V01 => &LAYOUT_V01,
        }
    }
}

impl Default for ProtocolVersion {
    fn default() -> Self {
        Self::LATEST
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for ProtocolVersion {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self> {
        resolve_version(s.as_bytes())
    }
}

/// Looks a token up in the registry.
pub fn resolve_version(token: &[u8]) -> Result<ProtocolVersion> {
    REGISTRY
        .iter()
        .find(|(known, _)| known.as_slice() == token)
        .map(|(_, version)| *version)
        .ok_or_else(|| unsupported(token))
}

/// Parses the version exchange that opens a session.
///
/// The buffer must hold exactly the 2-byte token.
pub fn read_version_token(bytes: &[u8]) -> Result<ProtocolVersion> {
    if bytes.len() != VERSION_TOKEN_LEN {
        warn!(
            len = bytes.len(),
            reason = constants::ERR_VERSION_LENGTH,
            "Rejected version token"
        );
        global_metrics().version_rejected();
        return Err(unsupported(bytes));
    }

    resolve_version(bytes).inspect_err(|_| {
        warn!(token = %String::from_utf8_lossy(bytes), "Unknown protocol version");
        global_metrics().version_rejected();
    })
}

/// Renders the version exchange for `version`.
pub fn write_version_token(version: ProtocolVersion) -> [u8; VERSION_TOKEN_LEN] {
    let mut out = [0u8; VERSION_TOKEN_LEN];
    out.copy_from_slice(version.token().as_bytes());
    out
}

fn unsupported(token: &[u8]) -> ProtocolError {
    ProtocolError::UnsupportedVersion {
        token: String::from_utf8_lossy(token).into_owned(),
    }
}
