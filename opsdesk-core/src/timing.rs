//! Edit-view timing instrumentation
//!
//! Named start marks measured on the pending-to-settled transition. Purely
//! informational; measurements are logged by the driver and never affect
//! behavior.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Mark set when a root edit view opens.
pub const EDIT_VIEW_START: &str = "EditViewStart";

/// Mark set when a nested edit view opens.
pub const NESTED_EDIT_VIEW_START: &str = "NestedEditViewStart";

/// One completed measurement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimingEvent {
    pub label: String,
    pub duration: Duration,
}

/// Registry of named start marks.
#[derive(Debug, Clone, Default)]
pub struct TimingMarks {
    marks: HashMap<&'static str, Instant>,
}

impl TimingMarks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record (or overwrite) a start mark.
    pub fn mark(&mut self, name: &'static str) {
        self.marks.insert(name, Instant::now());
    }

    #[must_use]
    pub fn has_mark(&self, name: &str) -> bool {
        self.marks.contains_key(name)
    }

    /// Measure the time since `name` was marked and clear the mark.
    ///
    /// Returns `None` when the mark was never set (or already measured).
    pub fn measure_since(&mut self, name: &'static str, label: impl Into<String>) -> Option<TimingEvent> {
        let start = self.marks.remove(name)?;
        Some(TimingEvent {
            label: label.into(),
            duration: start.elapsed(),
        })
    }

    /// Drop every outstanding mark. Called on editor teardown so a later
    /// editor never measures against a stale start.
    pub fn clear(&mut self) {
        self.marks.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measure_consumes_the_mark() {
        let mut marks = TimingMarks::new();
        marks.mark(EDIT_VIEW_START);
        assert!(marks.has_mark(EDIT_VIEW_START));

        let event = marks.measure_since(EDIT_VIEW_START, "InvoiceEditView");
        assert!(event.is_some_and(|e| e.label == "InvoiceEditView"));
        assert!(!marks.has_mark(EDIT_VIEW_START));
        assert_eq!(marks.measure_since(EDIT_VIEW_START, "InvoiceEditView"), None);
    }

    #[test]
    fn unset_marks_measure_as_none() {
        let mut marks = TimingMarks::new();
        assert_eq!(marks.measure_since(NESTED_EDIT_VIEW_START, "x"), None);
    }

    #[test]
    fn clear_discards_everything() {
        let mut marks = TimingMarks::new();
        marks.mark(EDIT_VIEW_START);
        marks.mark(NESTED_EDIT_VIEW_START);
        marks.clear();
        assert!(!marks.has_mark(EDIT_VIEW_START));
        assert!(!marks.has_mark(NESTED_EDIT_VIEW_START));
    }
}
