//! Row plan of the invoice edit view
//!
//! The update phase and the renderer must agree on where every row of the
//! content pane sits, since scroll synchronization compares section tops
//! against the scroll offset. Both therefore consume the same row plan,
//! rebuilt whenever form values or expansion state change. Row heights are
//! fixed, so the plan is independent of the pane width.

use opsdesk_core::{FormState, SectionBounds, SectionList};
use serde_json::Value;

use crate::model::fields::FieldDef;

/// Rows of the sticky editor header (title plus separator), not part of
/// the scrollable content.
pub const EDITOR_HEADER_ROWS: u16 = 2;

/// One row of the scrollable content pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormRow {
    /// Section heading, with expand marker where applicable.
    SectionHeader(usize),
    /// Label line of the field at this index.
    FieldLabel(usize),
    /// Value line of the field at this index; carries the cursor when
    /// the field has focus.
    FieldValue(usize),
    /// One invoice line item.
    LineItem(usize),
    /// Line-item total.
    Total,
    /// One recorded payment.
    Payment(usize),
    /// Dim hint text.
    Note(&'static str),
    /// History attribute: 0 created, 1 modified.
    History(usize),
    /// Form-level error banner.
    FormError,
    Blank,
}

/// The computed plan: rows in order, per-section bounds, and the row of
/// each field's value line.
#[derive(Debug, Clone, Default)]
pub struct RowPlan {
    pub rows: Vec<FormRow>,
    pub bounds: Vec<SectionBounds>,
    pub field_rows: Vec<u16>,
}

impl RowPlan {
    pub fn content_height(&self) -> u16 {
        self.rows.len() as u16
    }
}

/// Number of entries in an array attribute of the working document.
pub fn array_len(form: &FormState, path: &str) -> usize {
    form.value(path)
        .and_then(Value::as_array)
        .map_or(0, Vec::len)
}

/// Build the row plan for the invoice editor's current state.
pub fn build_row_plan(form: &FormState, sections: &SectionList, fields: &[FieldDef]) -> RowPlan {
    let mut plan = RowPlan {
        field_rows: vec![0; fields.len()],
        ..RowPlan::default()
    };

    if form.form_error().is_some() {
        plan.rows.push(FormRow::FormError);
        plan.rows.push(FormRow::Blank);
    }

    for index in 0..sections.len() {
        let top = plan.rows.len() as u16;
        plan.rows.push(FormRow::SectionHeader(index));

        match index {
            1 => push_line_items(&mut plan, form, sections.is_expanded(index)),
            2 => push_payments(&mut plan, form, sections.is_expanded(index)),
            4 => {
                plan.rows.push(FormRow::History(0));
                plan.rows.push(FormRow::History(1));
            }
            _ => push_fields(&mut plan, fields, index),
        }

        if index + 1 < sections.len() {
            plan.rows.push(FormRow::Blank);
        }
        plan.bounds.push(SectionBounds {
            top,
            height: plan.rows.len() as u16 - top,
        });
    }

    plan
}

fn push_fields(plan: &mut RowPlan, fields: &[FieldDef], section: usize) {
    for (index, field) in fields.iter().enumerate() {
        if field.section != section {
            continue;
        }
        plan.rows.push(FormRow::FieldLabel(index));
        plan.field_rows[index] = plan.rows.len() as u16;
        plan.rows.push(FormRow::FieldValue(index));
    }
}

fn push_line_items(plan: &mut RowPlan, form: &FormState, expanded: bool) {
    if !expanded {
        return;
    }
    let count = array_len(form, "lineItems");
    if count == 0 {
        plan.rows.push(FormRow::Note("No line items"));
    } else {
        for index in 0..count {
            plan.rows.push(FormRow::LineItem(index));
        }
        plan.rows.push(FormRow::Total);
    }
}

fn push_payments(plan: &mut RowPlan, form: &FormState, expanded: bool) {
    if !expanded {
        return;
    }
    let count = array_len(form, "payments");
    if count == 0 {
        plan.rows.push(FormRow::Note("No payments recorded"));
    } else {
        for index in 0..count {
            plan.rows.push(FormRow::Payment(index));
        }
    }
    plan.rows.push(FormRow::Note("Alt+p records a payment"));
}
