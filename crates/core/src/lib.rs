//! Asset variables: a single shared value that designers edit as an asset,
//! with change callbacks so dependent components can react to edits.
//!
//! # Invariants
//! - Reading a value never notifies; only `set`, `replace`, `invoke_callback`
//!   and `on_external_edit` do.
//! - Subscribers run synchronously, in subscription order, on the calling thread.
//! - Only the value is persisted. Subscribers are runtime-only.

pub mod callback;
pub mod variable;

pub use callback::Callback;
pub use variable::AssetVariable;

use assetvar_common::{Color, Vec3};

pub type FloatVariable = AssetVariable<f32>;
pub type IntVariable = AssetVariable<i64>;
pub type BoolVariable = AssetVariable<bool>;
pub type StringVariable = AssetVariable<String>;
pub type Vec3Variable = AssetVariable<Vec3>;
pub type ColorVariable = AssetVariable<Color>;
