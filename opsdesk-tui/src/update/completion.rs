//! Background task completion handling

use opsdesk_core::{record_id, DeferredTask, Route, ScreenContext};

use crate::message::{AppMessage, Completion, EditorMessage};
use crate::model::{App, FocusPanel};
use crate::update::{editor, list, log_timing};

pub fn update(app: &mut App, completion: Completion) {
    match completion {
        Completion::InvoicesLoaded(records) => {
            let count = records.len();
            app.invoices.set_records(records);
            app.set_status(format!("{count} invoice(s)"));

            // A deep-linked record id waits for the list to identify it.
            if let Some(id) = app.pending_open.take() {
                match app.invoices.position_of(&id) {
                    Some(index) => list::open_row(app, index),
                    None => app.set_status(format!("Invoice {id} not found")),
                }
            }
        }

        Completion::InvoicesLoadFailed(err) => {
            ScreenContext::log_failure("load invoices", &err);
            app.invoices.loading = false;
            app.invoices.error = Some(err.to_string());
            app.clear_status();
        }

        Completion::RecordFetched(doc) => {
            app.editor.open_record(doc);
            editor::reset_editor_view(app);
            log_timing(app.editor.measure_opened());
            app.focus = FocusPanel::Editor;
            app.clear_status();

            // Consumed deep link: run the click-equivalent selection after
            // the standard delay.
            if let Some(index) = app.pending_expand_tab.take() {
                if index < app.sections.len() {
                    app.schedule(DeferredTask::deep_link(AppMessage::Editor(
                        EditorMessage::JumpToSection(index),
                    )));
                }
            }
        }

        Completion::RecordFetchFailed(err) => {
            ScreenContext::log_failure("fetch invoice", &err);
            app.set_status(err.to_string());
        }

        Completion::Saved(doc) => {
            app.invoices.upsert(doc.clone());
            if let Some(id) = record_id(&doc) {
                app.history.replace(Route::new(format!("/invoices/{id}")));
                if let Some(index) = app.invoices.position_of(id) {
                    app.invoices.selected = index;
                }
            }
            log_timing(app.editor.settle_saved(doc));
            editor::rebuild_plan(app);
            app.set_status("Saved");
        }

        Completion::SaveFailed(err) => {
            ScreenContext::log_failure("save invoice", &err);
            log_timing(app.editor.settle_failed(&err));
            editor::rebuild_plan(app);
            app.set_status("Save failed");
        }

        Completion::Deleted(id) => {
            app.invoices.remove(&id);
            app.editor.settle_deleted();
            app.cancel_editor_timers();
            app.field_focus = 0;
            editor::rebuild_plan(app);
            app.history.push(Route::new("/invoices"));
            app.focus = FocusPanel::List;
            app.set_status("Invoice deleted");
        }

        Completion::DeleteFailed(err) => {
            ScreenContext::log_failure("delete invoice", &err);
            log_timing(app.editor.settle_failed(&err));
            app.set_status("Delete failed");
        }

        Completion::Duplicated(doc) => {
            app.invoices.upsert(doc.clone());
            if let Some(index) = record_id(&doc).and_then(|id| app.invoices.position_of(id)) {
                app.invoices.selected = index;
            }
            let number = doc
                .get("invoiceNumber")
                .map_or_else(String::new, ToString::to_string);
            app.set_status(format!("Duplicated as #{number}"));
        }

        Completion::DuplicateFailed(err) => {
            ScreenContext::log_failure("duplicate invoice", &err);
            app.set_status("Duplicate failed");
        }
    }
}
