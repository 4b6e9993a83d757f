use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use glam::Vec3;

/// Stable identity of a persisted variable asset.
///
/// Assigned once when an asset is first written and kept across re-saves, so
/// references to the asset survive edits of its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssetGuid(pub Uuid);

impl AssetGuid {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AssetGuid {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AssetGuid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

/// Linear RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color(pub [f32; 4]);

impl Color {
    pub const WHITE: Self = Self([1.0, 1.0, 1.0, 1.0]);
    pub const BLACK: Self = Self([0.0, 0.0, 0.0, 1.0]);

    pub fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self([r, g, b, a])
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guid_uniqueness() {
        let a = AssetGuid::new();
        let b = AssetGuid::new();
        assert_ne!(a, b);
    }

    #[test]
    fn guid_display_is_compact_hex() {
        let guid = AssetGuid::new();
        let s = guid.to_string();
        assert_eq!(s.len(), 32);
        assert!(s.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn color_default_is_white() {
        assert_eq!(Color::default(), Color::WHITE);
        assert_eq!(Color::rgba(0.0, 0.0, 0.0, 1.0), Color::BLACK);
    }
}
