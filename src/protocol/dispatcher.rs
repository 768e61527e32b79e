//! Type tag dispatch.
//!
//! Maps each `(version, tag)` pair to the variant codec that decodes it. Tags a
//! version does not define are absent from the table.

use crate::core::layout::FieldLayout;
use crate::error::{ProtocolError, Result};
use crate::protocol::frame::{self, DecodeFn};
use crate::protocol::message::MessageKind;
use crate::protocol::version::ProtocolVersion;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Decoder selected for one (version, tag) pair
#[derive(Clone, Copy)]
pub struct VariantCodec {
    pub kind: MessageKind,
    pub(crate) decode: DecodeFn,
}

impl std::fmt::Debug for VariantCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VariantCodec")
            .field("kind", &self.kind)
            .finish()
    }
}

/// `(version, tag) → codec` table.
///
/// Built once from the version registry and read-only afterwards, so lookups
/// need no locking and may run from any number of threads.
pub struct Dispatcher {
    codecs: HashMap<(ProtocolVersion, u8), VariantCodec>,
}

static DISPATCHER: Lazy<Dispatcher> = Lazy::new(Dispatcher::new);

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    pub fn new() -> Self {
        let mut codecs = HashMap::new();
        for version in ProtocolVersion::all() {
            let layout = version.layout();
            for kind in MessageKind::ALL {
                if kind_available(layout, kind) {
                    codecs.insert(
                        (version, kind.tag()),
                        VariantCodec {
                            kind,
                            decode: frame::decoder_for(kind),
                        },
                    );
                }
            }
        }
        Self { codecs }
    }

    /// Process-wide table
    pub fn global() -> &'static Dispatcher {
        &DISPATCHER
    }

    /// Selects the codec for `tag` under `version`.
    ///
    /// A tag that names a real kind the version does not define (`e` under
    /// `00`) is rejected the same way as an unknown byte.
    pub fn dispatch(&self, version: ProtocolVersion, tag: u8) -> Result<&VariantCodec> {
        self.codecs
            .get(&(version, tag))
            .ok_or_else(|| ProtocolError::InvalidMessageType {
                tag: char::from(tag),
                version: version.token().to_string(),
            })
    }

    /// Number of registered (version, tag) pairs
    pub fn len(&self) -> usize {
        self.codecs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }
}

/// Whether `kind` exists under `layout`
#[inline]
pub fn kind_available(layout: &FieldLayout, kind: MessageKind) -> bool {
    match kind {
        MessageKind::RetryResult => layout.has_retry_kind,
        _ => true,
    }
}
