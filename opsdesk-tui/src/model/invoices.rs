//! Invoice list state and editor specifications

use opsdesk_core::{record_id, EditorSpec, Record, Section};
use serde_json::Value;

/// Invoice list panel state.
#[derive(Debug, Default)]
pub struct InvoicesState {
    /// Loaded invoice documents, in service order.
    pub records: Vec<Record>,
    /// Index of the highlighted row.
    pub selected: usize,
    /// Whether a load is in flight.
    pub loading: bool,
    /// Load error, shown in place of the list.
    pub error: Option<String>,
}

impl InvoicesState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_previous(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    pub fn select_next(&mut self) {
        if !self.records.is_empty() && self.selected < self.records.len() - 1 {
            self.selected += 1;
        }
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        if !self.records.is_empty() {
            self.selected = self.records.len() - 1;
        }
    }

    /// The highlighted invoice, if any are loaded.
    pub fn selected_record(&self) -> Option<&Record> {
        self.records.get(self.selected)
    }

    /// Replace the list, keeping the highlight on the same record id
    /// when it is still present.
    pub fn set_records(&mut self, records: Vec<Record>) {
        let keep = self
            .selected_record()
            .and_then(record_id)
            .map(str::to_string);
        self.records = records;
        self.selected = keep
            .and_then(|id| self.position_of(&id))
            .unwrap_or(0);
        self.loading = false;
        self.error = None;
    }

    /// Index of the record with `id`, if loaded.
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.records
            .iter()
            .position(|doc| record_id(doc) == Some(id))
    }

    /// Replace or insert one record after a save round trip.
    pub fn upsert(&mut self, doc: Record) {
        match record_id(&doc).and_then(|id| self.position_of(id)) {
            Some(index) => self.records[index] = doc,
            None => self.records.push(doc),
        }
    }

    /// Drop the record with `id`, pulling the highlight back if it
    /// pointed past the end afterwards.
    pub fn remove(&mut self, id: &str) {
        if let Some(index) = self.position_of(id) {
            self.records.remove(index);
            if self.selected >= self.records.len() && self.selected > 0 {
                self.selected = self.records.len() - 1;
            }
        }
    }
}

/// Title line of the invoice editor: the invoice number when one is set.
fn invoice_title(doc: &Record) -> Option<String> {
    doc.get("invoiceNumber")
        .filter(|v| !v.is_null())
        .map(|v| match v {
            Value::String(s) => format!("#{s}"),
            other => format!("#{other}"),
        })
}

/// Specification of the invoice edit view.
pub fn invoice_editor_spec() -> EditorSpec {
    EditorSpec::new(
        "Invoice",
        "Invoice",
        vec![
            Section::new("Overview"),
            Section::new("Line items").expandable(),
            Section::new("Payments").expandable(),
            Section::new("Notes"),
            Section::new("History").with_adornment("read-only"),
        ],
    )
    .with_name_condition(invoice_title)
    .with_disabled_submit(|doc| {
        doc.get("status").and_then(Value::as_str) == Some("void")
    })
}

/// Specification of the nested payment editor.
pub fn payment_editor_spec() -> EditorSpec {
    EditorSpec::new("PaymentIn", "Payment", vec![Section::new("Payment")])
}
