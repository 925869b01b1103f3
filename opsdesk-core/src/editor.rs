//! Edit-View Orchestrator
//!
//! Coordinates one record editor: create/update/delete round-trips against
//! the record service, pending-state gating, inline vs full-screen
//! presentation, nested edit views, and title derivation. The orchestrator
//! never retries and never swallows failures; rejected submissions land in
//! the form's error maps and pending is cleared so the user can try again.

use serde_json::{Map, Value};

use crate::error::{CoreError, CoreResult, ValidationFailure};
use crate::form::FormState;
use crate::timing::{TimingEvent, TimingMarks, EDIT_VIEW_START, NESTED_EDIT_VIEW_START};
use crate::types::{record_id, record_name, Record, Section, NEW_RECORD_ID};

/// Static description of one edit view, fixed at composition time.
#[derive(Debug, Clone)]
pub struct EditorSpec {
    /// Domain type name, used for timing labels and preference namespacing.
    pub root_entity: &'static str,
    /// Human name shown in the window title.
    pub display_name: &'static str,
    /// Sections in display order.
    pub sections: Vec<Section>,
    /// Derives the display title from form values; falls back to the
    /// record's `name` attribute when absent.
    pub name_condition: Option<fn(&Record) -> Option<String>>,
    /// Extra caller-supplied submit disablement predicate.
    pub disabled_submit: Option<fn(&Record) -> bool>,
    /// Show the create flow full-screen even in a three-column layout.
    pub always_full_screen_create: bool,
}

impl EditorSpec {
    #[must_use]
    pub fn new(
        root_entity: &'static str,
        display_name: &'static str,
        sections: Vec<Section>,
    ) -> Self {
        Self {
            root_entity,
            display_name,
            sections,
            name_condition: None,
            disabled_submit: None,
            always_full_screen_create: true,
        }
    }

    #[must_use]
    pub fn with_name_condition(mut self, f: fn(&Record) -> Option<String>) -> Self {
        self.name_condition = Some(f);
        self
    }

    #[must_use]
    pub fn with_disabled_submit(mut self, f: fn(&Record) -> bool) -> Self {
        self.disabled_submit = Some(f);
        self
    }

    /// Let the create flow render inline when the layout has room for it.
    #[must_use]
    pub fn inline_create(mut self) -> Self {
        self.always_full_screen_create = false;
        self
    }
}

/// The at-most-one in-flight operation of an editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingOperation {
    Create,
    Update,
    Delete,
}

/// What a submission asks the record service to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitAction {
    Create(Record),
    Update { id: String, record: Record },
}

/// Runtime state of one edit view (plus its nested child, if open).
#[derive(Debug, Clone)]
pub struct EditorState {
    spec: EditorSpec,
    form: FormState,
    selected: Option<String>,
    creating_new: bool,
    pending: Option<PendingOperation>,
    full_screen_requested: bool,
    timing: TimingMarks,
    nested_level: bool,
    nested: Option<Box<EditorState>>,
}

impl EditorState {
    #[must_use]
    pub fn new(spec: EditorSpec) -> Self {
        Self {
            spec,
            form: FormState::new(),
            selected: None,
            creating_new: false,
            pending: None,
            full_screen_requested: false,
            timing: TimingMarks::new(),
            nested_level: false,
            nested: None,
        }
    }

    fn new_nested(spec: EditorSpec) -> Self {
        Self {
            nested_level: true,
            ..Self::new(spec)
        }
    }

    #[must_use]
    pub fn spec(&self) -> &EditorSpec {
        &self.spec
    }

    #[must_use]
    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormState {
        &mut self.form
    }

    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    #[must_use]
    pub fn is_creating_new(&self) -> bool {
        self.creating_new
    }

    #[must_use]
    pub fn pending(&self) -> Option<PendingOperation> {
        self.pending
    }

    #[must_use]
    pub fn is_nested_level(&self) -> bool {
        self.nested_level
    }

    // ----- opening -----

    /// Start the timing mark for an opening edit view. Called at the moment
    /// of selection, before any fetch round-trip.
    pub fn mark_opening(&mut self) {
        self.timing.mark(self.start_mark());
    }

    /// Load a fetched record into the editor.
    pub fn open_record(&mut self, doc: Record) {
        self.selected = record_id(&doc).map(ToString::to_string);
        self.creating_new = false;
        self.pending = None;
        self.form.initialize(doc);
    }

    /// Begin creating a record from an initial document.
    pub fn open_new(&mut self, initial: Record) {
        self.selected = Some(NEW_RECORD_ID.to_string());
        self.creating_new = true;
        self.pending = None;
        self.form.initialize(initial);
    }

    /// Measure click-to-loaded time once the opened record is on screen.
    ///
    /// Consumes the mark set by [`mark_opening`](Self::mark_opening);
    /// returns `None` when it was never set or was already measured.
    pub fn measure_opened(&mut self) -> Option<TimingEvent> {
        self.measure()
    }

    // ----- presentation -----

    /// Toggle the explicit full-screen request.
    pub fn toggle_full_screen(&mut self) {
        self.full_screen_requested = !self.full_screen_requested;
    }

    #[must_use]
    pub fn full_screen_requested(&self) -> bool {
        self.full_screen_requested
    }

    /// Whether the editor presents as a full-screen modal.
    ///
    /// True when a record is selected and either full screen was requested
    /// explicitly, or a create is underway and the layout (or the spec's
    /// create override) calls for it.
    #[must_use]
    pub fn is_full_screen(&self, three_column: bool) -> bool {
        self.selected.is_some()
            && (self.full_screen_requested
                || ((!three_column || self.spec.always_full_screen_create) && self.creating_new))
    }

    /// Display title from the naming function, falling back to the `name`
    /// attribute.
    #[must_use]
    pub fn title(&self) -> Option<String> {
        let values = self.form.values();
        match self.spec.name_condition {
            Some(f) => f(values),
            None => record_name(values).map(ToString::to_string),
        }
    }

    /// Window title, emitted only while full screen is explicitly active
    /// and a title exists.
    #[must_use]
    pub fn window_title(&self) -> Option<String> {
        if !self.full_screen_requested {
            return None;
        }
        self.title()
            .map(|title| format!("{} ({})", self.spec.display_name, title))
    }

    // ----- submission -----

    /// Whether the submit control is enabled.
    ///
    /// Disabled when nothing changed on an existing record, while async
    /// validation or an operation is in flight, when the caller's
    /// disablement predicate holds, or while the form is invalid.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        let disabled = (!self.creating_new && !self.form.is_dirty())
            || self.form.is_async_validating()
            || self.spec.disabled_submit.is_some_and(|f| f(self.form.values()))
            || !self.form.is_valid()
            || self.pending.is_some();
        !disabled
    }

    /// Turn the working document into a create or update request and mark
    /// the editor pending.
    ///
    /// Callers consult [`can_submit`](Self::can_submit) for control
    /// disablement; `submit` itself rejects only overlapping operations
    /// and a missing selection.
    pub fn submit(&mut self) -> CoreResult<SubmitAction> {
        if self.pending.is_some() {
            return Err(CoreError::OperationPending);
        }
        let record = self.form.values().clone();
        if self.creating_new {
            self.pending = Some(PendingOperation::Create);
            return Ok(SubmitAction::Create(record));
        }
        match &self.selected {
            Some(id) => {
                self.pending = Some(PendingOperation::Update);
                Ok(SubmitAction::Update {
                    id: id.clone(),
                    record,
                })
            }
            None => Err(CoreError::RecordNotFound(
                "no record is selected".to_string(),
            )),
        }
    }

    /// A create/update round-trip succeeded: reinitialize from the stored
    /// document and clear pending. Returns the timing measurement when an
    /// opening mark was still outstanding.
    pub fn settle_saved(&mut self, doc: Record) -> Option<TimingEvent> {
        self.pending = None;
        self.creating_new = false;
        self.selected = record_id(&doc).map(ToString::to_string);
        self.form.initialize(doc);
        self.measure()
    }

    /// A create/update round-trip failed: clear pending and route the
    /// failure into the form so the user can correct and resubmit.
    pub fn settle_failed(&mut self, err: &CoreError) -> Option<TimingEvent> {
        self.pending = None;
        match err {
            CoreError::Validation(failure) => self.form.apply_failure(failure),
            other => self
                .form
                .apply_failure(&ValidationFailure::new(other.to_string())),
        }
        self.measure()
    }

    // ----- deletion -----

    /// Mark the editor pending for deletion, returning the id to delete.
    pub fn delete(&mut self) -> CoreResult<String> {
        if self.pending.is_some() {
            return Err(CoreError::OperationPending);
        }
        match self.selected.clone().filter(|id| id != NEW_RECORD_ID) {
            Some(id) => {
                self.pending = Some(PendingOperation::Delete);
                Ok(id)
            }
            None => Err(CoreError::RecordNotFound(
                "no persisted record is selected".to_string(),
            )),
        }
    }

    /// The delete round-trip succeeded: clear the editor entirely.
    pub fn settle_deleted(&mut self) {
        self.pending = None;
        self.selected = None;
        self.creating_new = false;
        self.full_screen_requested = false;
        self.form.initialize(Value::Object(Map::new()));
        self.timing.clear();
        self.nested = None;
    }

    // ----- closing -----

    /// Confirmed or clean close: revert the form and leave full screen.
    ///
    /// Closing a create flow also drops the `"new"` pseudo-selection;
    /// closing an existing record keeps the selection for any inline view.
    /// Callers cancel the editor's deferred tasks alongside.
    pub fn close(&mut self) {
        if self.creating_new {
            self.selected = None;
            self.creating_new = false;
            self.form.initialize(Value::Object(Map::new()));
        } else {
            self.form.reset();
        }
        self.full_screen_requested = false;
        self.timing.clear();
        self.nested = None;
    }

    // ----- nested edit views -----

    /// Open a nested editor on a fetched record. At most one nested level;
    /// an already-open nested editor is replaced.
    pub fn open_nested_record(&mut self, spec: EditorSpec, doc: Record) {
        let mut nested = Self::new_nested(spec);
        nested.mark_opening();
        nested.open_record(doc);
        nested.full_screen_requested = true;
        self.nested = Some(Box::new(nested));
    }

    /// Open a nested editor creating a record.
    pub fn open_nested_new(&mut self, spec: EditorSpec, initial: Record) {
        let mut nested = Self::new_nested(spec);
        nested.mark_opening();
        nested.open_new(initial);
        nested.full_screen_requested = true;
        self.nested = Some(Box::new(nested));
    }

    #[must_use]
    pub fn nested(&self) -> Option<&EditorState> {
        self.nested.as_deref()
    }

    pub fn nested_mut(&mut self) -> Option<&mut EditorState> {
        self.nested.as_deref_mut()
    }

    /// Drop the nested editor. Its own close path (guard included) runs
    /// before this.
    pub fn close_nested(&mut self) {
        self.nested = None;
    }

    // ----- timing -----

    fn start_mark(&self) -> &'static str {
        if self.nested_level {
            NESTED_EDIT_VIEW_START
        } else {
            EDIT_VIEW_START
        }
    }

    fn measure(&mut self) -> Option<TimingEvent> {
        let label = format!("{}EditView", self.spec.root_entity);
        self.timing.measure_since(self.start_mark(), label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn invoice_spec() -> EditorSpec {
        EditorSpec::new(
            "Invoice",
            "Invoice",
            vec![Section::new("Overview"), Section::new("Line items").expandable()],
        )
        .with_name_condition(|values| {
            values
                .get("invoiceNumber")
                .and_then(Value::as_i64)
                .map(|n| format!("#{n}"))
        })
    }

    fn saved_invoice() -> Record {
        json!({"id": "inv-1", "invoiceNumber": 17, "customerName": "Acme"})
    }

    #[test]
    fn open_record_selects_and_settles_pristine() {
        let mut editor = EditorState::new(invoice_spec());
        editor.open_record(saved_invoice());
        assert_eq!(editor.selected(), Some("inv-1"));
        assert!(!editor.is_creating_new());
        assert!(!editor.form().is_dirty());
    }

    #[test]
    fn open_new_uses_the_sentinel_selection() {
        let mut editor = EditorState::new(invoice_spec());
        editor.open_new(json!({}));
        assert_eq!(editor.selected(), Some("new"));
        assert!(editor.is_creating_new());
    }

    #[test]
    fn full_screen_rule_matches_layout_and_create_override() {
        let mut editor = EditorState::new(invoice_spec());
        assert!(!editor.is_full_screen(false));

        editor.open_record(saved_invoice());
        assert!(!editor.is_full_screen(false));
        editor.toggle_full_screen();
        assert!(editor.is_full_screen(false));
        assert!(editor.is_full_screen(true));
        editor.toggle_full_screen();

        // Creating goes full screen in a two-column layout.
        editor.open_new(json!({}));
        assert!(editor.is_full_screen(false));
        // Default spec forces create full screen even with three columns.
        assert!(editor.is_full_screen(true));

        let mut inline = EditorState::new(invoice_spec().inline_create());
        inline.open_new(json!({}));
        assert!(inline.is_full_screen(false));
        assert!(!inline.is_full_screen(true));
    }

    #[test]
    fn title_prefers_the_naming_function() {
        let mut editor = EditorState::new(invoice_spec());
        editor.open_record(saved_invoice());
        assert_eq!(editor.title().as_deref(), Some("#17"));

        let mut plain = EditorState::new(EditorSpec::new("Sale", "Sale", Vec::new()));
        plain.open_record(json!({"id": "s-1", "name": "Spring promo"}));
        assert_eq!(plain.title().as_deref(), Some("Spring promo"));
    }

    #[test]
    fn window_title_requires_explicit_full_screen() {
        let mut editor = EditorState::new(invoice_spec());
        editor.open_record(saved_invoice());
        assert_eq!(editor.window_title(), None);

        editor.toggle_full_screen();
        assert_eq!(editor.window_title().as_deref(), Some("Invoice (#17)"));
    }

    #[test]
    fn submit_gating_matrix() {
        let mut editor = EditorState::new(invoice_spec());

        // Existing record, pristine: disabled regardless of validity.
        editor.open_record(saved_invoice());
        assert!(!editor.can_submit());

        // Dirty existing record: enabled.
        editor.form_mut().change("customerName", json!("Globex"));
        assert!(editor.can_submit());

        // Invalid form: disabled.
        editor.form_mut().set_sync_error("customerName", "Required");
        assert!(!editor.can_submit());
        editor.form_mut().clear_sync_error("customerName");

        // Async validation in flight: disabled.
        editor.form_mut().set_async_validating(true);
        assert!(!editor.can_submit());
        editor.form_mut().set_async_validating(false);

        // New pristine record: enabled while valid and not pending.
        let mut fresh = EditorState::new(invoice_spec());
        fresh.open_new(json!({}));
        assert!(fresh.can_submit());
    }

    #[test]
    fn disablement_predicate_wins_over_dirtiness() {
        let spec = invoice_spec()
            .with_disabled_submit(|values| values.get("locked").and_then(Value::as_bool) == Some(true));
        let mut editor = EditorState::new(spec);
        editor.open_record(json!({"id": "inv-1", "locked": true}));
        editor.form_mut().change("customerName", json!("Globex"));
        assert!(!editor.can_submit());
    }

    #[test]
    fn submit_produces_create_then_update_actions() {
        let mut editor = EditorState::new(invoice_spec());
        editor.open_new(json!({"customerName": "Acme"}));
        let action = editor.submit().unwrap();
        assert_eq!(action, SubmitAction::Create(json!({"customerName": "Acme"})));
        assert_eq!(editor.pending(), Some(PendingOperation::Create));

        editor.settle_saved(saved_invoice());
        assert_eq!(editor.pending(), None);
        assert_eq!(editor.selected(), Some("inv-1"));
        assert!(!editor.form().is_dirty());

        editor.form_mut().change("customerName", json!("Globex"));
        let action = editor.submit().unwrap();
        let SubmitAction::Update { id, record } = action else {
            panic!("expected an update");
        };
        assert_eq!(id, "inv-1");
        assert_eq!(record["customerName"], "Globex");
    }

    #[test]
    fn overlapping_submissions_are_rejected() {
        let mut editor = EditorState::new(invoice_spec());
        editor.open_new(json!({}));
        editor.submit().unwrap();
        assert!(matches!(editor.submit(), Err(CoreError::OperationPending)));
        assert!(matches!(editor.delete(), Err(CoreError::OperationPending)));
        assert!(!editor.can_submit());
    }

    #[test]
    fn failed_save_lands_in_the_form_and_clears_pending() {
        let mut editor = EditorState::new(invoice_spec());
        editor.open_new(json!({"customerName": ""}));
        editor.submit().unwrap();

        let err = CoreError::Validation(
            ValidationFailure::new("Submission failed").with_field("customerName", "Required"),
        );
        editor.settle_failed(&err);

        assert_eq!(editor.pending(), None);
        assert_eq!(editor.form().field_error("customerName"), Some("Required"));
        assert_eq!(editor.form().form_error(), Some("Submission failed"));
        assert!(editor.is_creating_new());

        // Correcting the field re-enables submission.
        editor.form_mut().change("customerName", json!("Acme"));
        assert!(editor.can_submit());
    }

    #[test]
    fn non_validation_failures_become_form_level_errors() {
        let mut editor = EditorState::new(invoice_spec());
        editor.open_record(saved_invoice());
        editor.form_mut().change("customerName", json!("Globex"));
        editor.submit().unwrap();

        editor.settle_failed(&CoreError::NetworkError("connection refused".to_string()));
        assert_eq!(
            editor.form().form_error(),
            Some("Network error: connection refused")
        );
        assert!(editor.form().is_dirty());
    }

    #[test]
    fn delete_requires_a_persisted_record() {
        let mut editor = EditorState::new(invoice_spec());
        editor.open_new(json!({}));
        assert!(matches!(editor.delete(), Err(CoreError::RecordNotFound(_))));

        editor.open_record(saved_invoice());
        let id = editor.delete().unwrap();
        assert_eq!(id, "inv-1");
        assert_eq!(editor.pending(), Some(PendingOperation::Delete));

        editor.settle_deleted();
        assert_eq!(editor.selected(), None);
        assert_eq!(editor.pending(), None);
        assert!(!editor.is_full_screen(false));
    }

    #[test]
    fn close_reverts_an_existing_record_but_keeps_it_selected() {
        let mut editor = EditorState::new(invoice_spec());
        editor.open_record(saved_invoice());
        editor.toggle_full_screen();
        editor.form_mut().change("customerName", json!("Globex"));

        editor.close();
        assert_eq!(editor.selected(), Some("inv-1"));
        assert!(!editor.form().is_dirty());
        assert_eq!(editor.form().value("customerName"), Some(&json!("Acme")));
        assert!(!editor.full_screen_requested());
    }

    #[test]
    fn close_drops_a_create_flow_entirely() {
        let mut editor = EditorState::new(invoice_spec());
        editor.open_new(json!({"customerName": "Draft"}));
        editor.close();
        assert_eq!(editor.selected(), None);
        assert!(!editor.is_creating_new());
        assert!(!editor.is_full_screen(false));
    }

    #[test]
    fn nested_editor_measures_its_own_mark() {
        let payment_spec = EditorSpec::new("PaymentIn", "Payment In", Vec::new());
        let mut editor = EditorState::new(invoice_spec());
        editor.open_record(saved_invoice());

        editor.open_nested_new(payment_spec, json!({"amount": 0}));
        let nested = editor.nested_mut().expect("nested editor open");
        assert!(nested.is_nested_level());
        assert!(nested.is_creating_new());

        nested.submit().unwrap();
        let timing = nested.settle_saved(json!({"id": "pay-1", "amount": 100}));
        assert!(timing.is_some_and(|t| t.label == "PaymentInEditView"));

        editor.close_nested();
        assert!(editor.nested().is_none());
    }

    #[test]
    fn opening_mark_is_measured_once() {
        let mut editor = EditorState::new(invoice_spec());
        editor.mark_opening();
        editor.open_record(saved_invoice());

        let first = editor.measure_opened();
        assert!(first.is_some_and(|t| t.label == "InvoiceEditView"));
        assert_eq!(editor.measure_opened(), None);

        // A later save settles without an outstanding mark.
        editor.form_mut().change("customerName", json!("Globex"));
        editor.submit().unwrap();
        assert_eq!(editor.settle_saved(saved_invoice()), None);
    }
}
