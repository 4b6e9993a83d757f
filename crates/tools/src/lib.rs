//! Developer tooling: a variable inspector that stands in for an editor's
//! property panel.
//!
//! # Invariants
//! - Inspector edits bypass the setter and then fire the external-edit hook,
//!   so subscribers see exactly one notification per edit.
//! - Rejected edits leave the variable untouched and notify nobody.

pub mod inspector;

pub use inspector::{InspectError, VariableInspector, VariableSummary};
