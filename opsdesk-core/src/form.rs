//! Form-state container for edit views
//!
//! Tracks the working copy of a record document against the snapshot it was
//! initialized from. Field addressing uses dotted paths (`lines.0.amount`),
//! where numeric segments index into arrays.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::error::ValidationFailure;

/// Mutable form state for one edit view.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    values: Value,
    initial: Value,
    sync_errors: BTreeMap<String, String>,
    async_errors: BTreeMap<String, String>,
    form_error: Option<String>,
    async_validating: bool,
}

impl FormState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            values: Value::Object(Map::new()),
            initial: Value::Object(Map::new()),
            ..Self::default()
        }
    }

    /// Load a document into the form, replacing both the working copy and
    /// the pristine snapshot. All errors are cleared.
    pub fn initialize(&mut self, values: Value) {
        self.initial = values.clone();
        self.values = values;
        self.sync_errors.clear();
        self.async_errors.clear();
        self.form_error = None;
        self.async_validating = false;
    }

    /// Write one field. Intermediate objects and arrays are created as
    /// needed; arrays are padded with `null` up to the written index.
    ///
    /// Changing a field clears its submission error and the form-level error.
    pub fn change(&mut self, path: &str, value: Value) {
        set_path(&mut self.values, path, value);
        self.async_errors.remove(path);
        self.form_error = None;
    }

    /// Read one field from the working copy.
    #[must_use]
    pub fn value(&self, path: &str) -> Option<&Value> {
        get_path(&self.values, path)
    }

    /// The whole working document.
    #[must_use]
    pub fn values(&self) -> &Value {
        &self.values
    }

    /// Discard edits: working copy reverts to the pristine snapshot.
    pub fn reset(&mut self) {
        self.values = self.initial.clone();
        self.sync_errors.clear();
        self.async_errors.clear();
        self.form_error = None;
    }

    /// Whether the working copy differs from the pristine snapshot.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.values != self.initial
    }

    pub fn set_sync_error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.sync_errors.insert(path.into(), message.into());
    }

    pub fn clear_sync_error(&mut self, path: &str) {
        self.sync_errors.remove(path);
    }

    /// Route a rejected submission into the error maps: field messages into
    /// the per-field map, the overall message into the form-level slot.
    pub fn apply_failure(&mut self, failure: &ValidationFailure) {
        for (path, message) in &failure.field_errors {
            self.async_errors.insert(path.clone(), message.clone());
        }
        if !failure.message.is_empty() {
            self.form_error = Some(failure.message.clone());
        }
    }

    /// Whether the form has no outstanding field errors.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.sync_errors.is_empty() && self.async_errors.is_empty()
    }

    #[must_use]
    pub fn field_error(&self, path: &str) -> Option<&str> {
        self.sync_errors
            .get(path)
            .or_else(|| self.async_errors.get(path))
            .map(String::as_str)
    }

    #[must_use]
    pub fn form_error(&self) -> Option<&str> {
        self.form_error.as_deref()
    }

    pub fn set_async_validating(&mut self, validating: bool) {
        self.async_validating = validating;
    }

    #[must_use]
    pub fn is_async_validating(&self) -> bool {
        self.async_validating
    }
}

fn get_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = root;
    for segment in path.split('.') {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

fn set_path(root: &mut Value, path: &str, new_value: Value) {
    let mut current = root;
    let segments: Vec<&str> = path.split('.').collect();
    for (pos, segment) in segments.iter().enumerate() {
        let last = pos + 1 == segments.len();
        if let Ok(index) = segment.parse::<usize>() {
            if !current.is_array() {
                *current = Value::Array(Vec::new());
            }
            let Value::Array(items) = current else { return };
            if items.len() <= index {
                items.resize(index + 1, Value::Null);
            }
            if last {
                items[index] = new_value;
                return;
            }
            current = &mut items[index];
        } else {
            if !current.is_object() {
                *current = Value::Object(Map::new());
            }
            let Value::Object(map) = current else { return };
            if last {
                map.insert((*segment).to_string(), new_value);
                return;
            }
            current = map.entry(*segment).or_insert(Value::Null);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn initialize_resets_dirty_state() {
        let mut form = FormState::new();
        form.initialize(json!({"customerName": "Acme"}));
        assert!(!form.is_dirty());

        form.change("customerName", json!("Globex"));
        assert!(form.is_dirty());

        form.initialize(json!({"customerName": "Globex"}));
        assert!(!form.is_dirty());
    }

    #[test]
    fn change_same_value_stays_pristine() {
        let mut form = FormState::new();
        form.initialize(json!({"status": "draft"}));
        form.change("status", json!("draft"));
        assert!(!form.is_dirty());
    }

    #[test]
    fn reset_restores_snapshot_and_clears_errors() {
        let mut form = FormState::new();
        form.initialize(json!({"total": 100}));
        form.change("total", json!(250));
        form.set_sync_error("total", "Too large");
        assert!(form.is_dirty());
        assert!(!form.is_valid());

        form.reset();
        assert!(!form.is_dirty());
        assert!(form.is_valid());
        assert_eq!(form.value("total"), Some(&json!(100)));
    }

    #[test]
    fn dotted_paths_reach_into_arrays() {
        let mut form = FormState::new();
        form.initialize(json!({"lines": [{"amount": 10}, {"amount": 20}]}));
        form.change("lines.1.amount", json!(25));
        assert_eq!(form.value("lines.1.amount"), Some(&json!(25)));
        assert_eq!(form.value("lines.0.amount"), Some(&json!(10)));
        assert!(form.is_dirty());
    }

    #[test]
    fn change_creates_missing_intermediates() {
        let mut form = FormState::new();
        form.initialize(json!({}));
        form.change("plan.installments.0.due", json!("2026-09-01"));
        assert_eq!(
            form.values(),
            &json!({"plan": {"installments": [{"due": "2026-09-01"}]}})
        );

        form.change("plan.installments.2.due", json!("2026-11-01"));
        let installments = form.value("plan.installments").and_then(Value::as_array);
        assert_eq!(installments.map(Vec::len), Some(3));
        assert_eq!(form.value("plan.installments.1"), Some(&Value::Null));
    }

    #[test]
    fn missing_paths_read_as_none() {
        let mut form = FormState::new();
        form.initialize(json!({"lines": [{"amount": 10}]}));
        assert_eq!(form.value("lines.5.amount"), None);
        assert_eq!(form.value("lines.x"), None);
        assert_eq!(form.value("contact.email"), None);
    }

    #[test]
    fn apply_failure_routes_messages() {
        let mut form = FormState::new();
        form.initialize(json!({"customerName": ""}));

        let failure = ValidationFailure::new("Submission failed")
            .with_field("customerName", "Required");
        form.apply_failure(&failure);

        assert!(!form.is_valid());
        assert_eq!(form.field_error("customerName"), Some("Required"));
        assert_eq!(form.form_error(), Some("Submission failed"));
    }

    #[test]
    fn changing_a_field_clears_its_submission_error() {
        let mut form = FormState::new();
        form.initialize(json!({"customerName": ""}));
        form.apply_failure(
            &ValidationFailure::new("Submission failed").with_field("customerName", "Required"),
        );

        form.change("customerName", json!("Acme"));
        assert_eq!(form.field_error("customerName"), None);
        assert_eq!(form.form_error(), None);
        assert!(form.is_valid());
    }
}
