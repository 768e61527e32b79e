//! # Core Codec Components
//!
//! Framing primitives, per-version layouts and stream adapters.
//!
//! ## Components
//! - **Counter**: fixed-width decimal/hex counters and the slices they announce
//! - **Layout**: per-version field widths, bases and kind availability
//! - **Codec**: tokio-util `Decoder`/`Encoder` for frames and the version token
//! - **Serialization**: serde payload bodies (JSON, bincode)
//!
//! ## Wire Format
//! ```text
//! [Tag(1)] [RequestId(3|4)]? [Count3 Name]? [Count8Hex Wait]? [Count8Hex Payload]
//! ```
//!
//! ## Limits
//! - Operation / notification name: 4095 bytes
//! - Payload: 4 GiB - 1
//! - Counters never truncate: oversize values fail `FieldOverflow`

pub mod codec;
pub mod counter;
pub mod layout;
pub mod serialization;
