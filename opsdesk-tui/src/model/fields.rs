//! Editable field definitions and input handling
//!
//! Fields edit the working document through the form container; numeric
//! and date fields validate synchronously on every keystroke so the
//! submit control reflects validity immediately.

use chrono::NaiveDate;
use opsdesk_core::{FormState, Record};
use serde_json::Value;

/// How a field's text is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Date,
}

/// One editable field of an edit view.
#[derive(Debug, Clone)]
pub struct FieldDef {
    /// Dotted path into the working document.
    pub path: &'static str,
    /// Label shown above the value.
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// Index of the owning section.
    pub section: usize,
}

impl FieldDef {
    const fn new(
        path: &'static str,
        label: &'static str,
        kind: FieldKind,
        required: bool,
        section: usize,
    ) -> Self {
        Self {
            path,
            label,
            kind,
            required,
            section,
        }
    }
}

/// Editable fields of the invoice editor, in focus order.
pub fn invoice_fields() -> Vec<FieldDef> {
    vec![
        FieldDef::new("invoiceNumber", "Invoice number", FieldKind::Number, true, 0),
        FieldDef::new("customerName", "Customer", FieldKind::Text, true, 0),
        FieldDef::new("status", "Status", FieldKind::Text, false, 0),
        FieldDef::new("issuedOn", "Issued on", FieldKind::Date, false, 0),
        FieldDef::new("dueOn", "Due on", FieldKind::Date, false, 0),
        FieldDef::new("notes", "Notes", FieldKind::Text, false, 3),
    ]
}

/// Editable fields of the nested payment editor, in focus order.
pub fn payment_fields() -> Vec<FieldDef> {
    vec![
        FieldDef::new("amount", "Amount", FieldKind::Number, true, 0),
        FieldDef::new("receivedOn", "Received on", FieldKind::Date, false, 0),
        FieldDef::new("method", "Method", FieldKind::Text, false, 0),
    ]
}

/// Text rendering of the value at `path`, as shown and edited in the UI.
pub fn field_text(form: &FormState, path: &str) -> String {
    match form.value(path) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

/// Write `text` into the field and refresh its synchronous validation.
///
/// Numbers are stored as JSON numbers once they parse; until then the raw
/// text is kept so nothing the user typed is lost.
pub fn apply_field_input(form: &mut FormState, field: &FieldDef, text: &str) {
    let value = match field.kind {
        FieldKind::Number => text
            .parse::<i64>()
            .map(Value::from)
            .or_else(|_| text.parse::<f64>().map(Value::from))
            .unwrap_or_else(|_| Value::String(text.to_string())),
        FieldKind::Text | FieldKind::Date => {
            if text.is_empty() {
                Value::Null
            } else {
                Value::String(text.to_string())
            }
        }
    };
    form.change(field.path, value);
    validate_field(form, field);
}

/// Synchronous validation for one field.
pub fn validate_field(form: &mut FormState, field: &FieldDef) {
    let text = field_text(form, field.path);

    if field.required && text.is_empty() {
        form.set_sync_error(field.path, "Required");
        return;
    }

    match field.kind {
        FieldKind::Number if !text.is_empty() && text.parse::<f64>().is_err() => {
            form.set_sync_error(field.path, "Must be a number");
        }
        FieldKind::Date
            if !text.is_empty() && NaiveDate::parse_from_str(&text, "%Y-%m-%d").is_err() =>
        {
            form.set_sync_error(field.path, "Use YYYY-MM-DD");
        }
        _ => form.clear_sync_error(field.path),
    }
}

/// Run synchronous validation over every field of a freshly opened form.
pub fn validate_all(form: &mut FormState, fields: &[FieldDef]) {
    for field in fields {
        validate_field(form, field);
    }
}

/// Sum of `quantity * unitPrice` over the invoice's line items.
pub fn invoice_total(doc: &Record) -> f64 {
    doc.get("lineItems")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|item| {
                    let quantity = item.get("quantity").and_then(Value::as_f64).unwrap_or(0.0);
                    let price = item.get("unitPrice").and_then(Value::as_f64).unwrap_or(0.0);
                    quantity * price
                })
                .sum()
        })
        .unwrap_or(0.0)
}
