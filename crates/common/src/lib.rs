//! Shared identifiers and value types used across the asset variable crates.

pub mod types;

pub use types::{AssetGuid, Color, Vec3};
