use assetvar_core::AssetVariable;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Errors from inspector edits.
#[derive(Debug, thiserror::Error)]
pub enum InspectError {
    #[error("could not parse edit: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Variable inspector for developer tooling.
///
/// Plays the part of the editor's validation layer: edits are written straight
/// into the stored value and then reported through
/// [`AssetVariable::on_external_edit`].
pub struct VariableInspector;

impl VariableInspector {
    /// Produce a summary of a variable. The value is rendered as JSON, the
    /// same text [`VariableInspector::edit_json`] accepts.
    pub fn summary<T: Serialize>(var: &AssetVariable<T>) -> VariableSummary {
        let value = serde_json::to_string(var.get()).unwrap_or_else(|e| format!("<{e}>"));
        VariableSummary {
            type_name: std::any::type_name::<T>(),
            subscribers: var.subscriber_count(),
            value,
        }
    }

    /// Overwrite the value as an external edit.
    pub fn edit<T>(var: &mut AssetVariable<T>, value: T) {
        *var.value_mut() = value;
        debug!(subscribers = var.subscriber_count(), "inspector edit");
        var.on_external_edit();
    }

    /// Apply a JSON text edit, as typed into a property field.
    pub fn edit_json<T: DeserializeOwned>(
        var: &mut AssetVariable<T>,
        text: &str,
    ) -> Result<(), InspectError> {
        let value = serde_json::from_str(text)?;
        Self::edit(var, value);
        Ok(())
    }

    /// Force a refresh of everything watching the variable.
    pub fn refresh<T>(var: &AssetVariable<T>) {
        var.invoke_callback();
    }
}

/// Summary of a variable for the inspector.
#[derive(Debug, Clone)]
pub struct VariableSummary {
    pub type_name: &'static str,
    pub subscribers: usize,
    pub value: String,
}

impl std::fmt::Display for VariableSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Variable<{}> value={} subscribers={}",
            self.type_name, self.value, self.subscribers
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assetvar_common::Vec3;
    use assetvar_core::Callback;
    use std::cell::Cell;
    use std::rc::Rc;

    fn watched<T>(value: T) -> (AssetVariable<T>, Rc<Cell<u32>>) {
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let mut var = AssetVariable::new(value);
        var.subscribe(Callback::new(move || h.set(h.get() + 1)));
        (var, hits)
    }

    #[test]
    fn summary_fields() {
        let (var, _) = watched(7i64);
        let summary = VariableInspector::summary(&var);
        assert_eq!(summary.type_name, "i64");
        assert_eq!(summary.subscribers, 1);
        assert_eq!(summary.value, "7");
    }

    #[test]
    fn summary_value_is_editable_json() {
        let (mut var, _) = watched(Vec3::new(1.0, 2.0, 3.0));
        let summary = VariableInspector::summary(&var);
        assert_eq!(summary.value, "[1.0,2.0,3.0]");

        VariableInspector::edit_json(&mut var, &summary.value).unwrap();
        assert_eq!(*var.get(), Vec3::new(1.0, 2.0, 3.0));

        let var = AssetVariable::new(String::from("hi"));
        assert_eq!(VariableInspector::summary(&var).value, "\"hi\"");
    }

    #[test]
    fn summary_display() {
        let var = AssetVariable::new(true);
        let s = format!("{}", VariableInspector::summary(&var));
        assert!(s.contains("value=true"));
        assert!(s.contains("subscribers=0"));
    }

    #[test]
    fn edit_notifies_once() {
        let (mut var, hits) = watched(1.0f32);
        VariableInspector::edit(&mut var, 2.0);
        assert_eq!(*var.get(), 2.0);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn edit_json_structured_value() {
        let (mut var, hits) = watched(Vec3::ZERO);
        VariableInspector::edit_json(&mut var, "[1.0, 2.0, 3.0]").unwrap();
        assert_eq!(*var.get(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn rejected_edit_is_silent() {
        let (mut var, hits) = watched(5u32);
        let err = VariableInspector::edit_json(&mut var, "\"five\"").unwrap_err();
        assert!(matches!(err, InspectError::Parse(_)));
        assert_eq!(*var.get(), 5);
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn refresh_keeps_value() {
        let (var, hits) = watched(String::from("title"));
        VariableInspector::refresh(&var);
        VariableInspector::refresh(&var);
        assert_eq!(var.get(), "title");
        assert_eq!(hits.get(), 2);
    }
}
