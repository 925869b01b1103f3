//! Shared types for the edit-view framework

use std::collections::BTreeSet;

use serde_json::Value;

/// Selection sentinel for a record that has not been persisted yet.
pub const NEW_RECORD_ID: &str = "new";

/// A record document as exchanged with the record service.
///
/// Screens work with schemaless JSON documents; drivers that want typed
/// structs convert at their own boundary.
pub type Record = Value;

/// Extract the persisted id of a record document.
///
/// Returns `None` when the `id` attribute is absent or holds the
/// [`NEW_RECORD_ID`] sentinel, i.e. the record is unsaved.
#[must_use]
pub fn record_id(doc: &Record) -> Option<&str> {
    match doc.get("id").and_then(Value::as_str) {
        Some(NEW_RECORD_ID) | None => None,
        Some(id) => Some(id),
    }
}

/// Extract the display name of a record document (`name` attribute).
#[must_use]
pub fn record_name(doc: &Record) -> Option<&str> {
    doc.get("name").and_then(Value::as_str)
}

/// One section of an edit view, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Heading shown in the content pane and the side index.
    pub label: String,
    /// Whether the section supports collapse/expand.
    pub expandable: bool,
    /// Short suffix rendered after the label (e.g. an item count).
    pub adornment: Option<String>,
}

impl Section {
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            expandable: false,
            adornment: None,
        }
    }

    #[must_use]
    pub fn expandable(mut self) -> Self {
        self.expandable = true;
        self
    }

    #[must_use]
    pub fn with_adornment(mut self, adornment: impl Into<String>) -> Self {
        self.adornment = Some(adornment.into());
        self
    }
}

/// Which section is active and which are expanded.
///
/// `active` names a section by label; `expanded` holds section indices.
/// Both always refer to sections present in the current list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub active: Option<String>,
    pub expanded: BTreeSet<usize>,
}

/// Pane arrangement of the edit view.
///
/// Scroll-driven section tracking only runs in [`TwoColumn`](Self::TwoColumn)
/// mode; in single-column mode the index pane is hidden and selection only
/// changes on explicit navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    TwoColumn,
    SingleColumn,
}

impl LayoutMode {
    #[must_use]
    pub fn is_two_column(self) -> bool {
        matches!(self, Self::TwoColumn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_id_treats_sentinel_as_unsaved() {
        assert_eq!(record_id(&json!({"id": "inv-1"})), Some("inv-1"));
        assert_eq!(record_id(&json!({"id": "new"})), None);
        assert_eq!(record_id(&json!({"name": "no id"})), None);
    }

    #[test]
    fn section_builder_sets_flags() {
        let section = Section::new("Line items").expandable().with_adornment("(3)");
        assert_eq!(section.label, "Line items");
        assert!(section.expandable);
        assert_eq!(section.adornment.as_deref(), Some("(3)"));

        let plain = Section::new("Notes");
        assert!(!plain.expandable);
        assert!(plain.adornment.is_none());
    }
}
