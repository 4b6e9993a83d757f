//! Persistence for asset variables: pluggable codecs and a file-backed store.
//!
//! # Invariants
//! - Only the stored value is written. Subscribers never reach disk.
//! - Payloads are hash-checked against their meta file on load (fail-closed).
//! - Reloading into a live variable keeps its subscribers and notifies them.

pub mod codec;
pub mod store;

pub use codec::{CborCodec, CodecError, Format, JsonCodec, VariableCodec, YamlCodec};
pub use store::{AssetMeta, StoreError, VariableStore};
