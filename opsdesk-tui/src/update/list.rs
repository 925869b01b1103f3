//! Invoice list message handling

use std::sync::Arc;

use opsdesk_core::{guard_action, record_id, GuardDecision, GuardPrompt, Route};
use serde_json::json;

use crate::message::{AppMessage, Completion, ListMessage};
use crate::model::{App, ConfirmState, FocusPanel};
use crate::update::{editor, log_timing, unsaved_state};

pub fn update(app: &mut App, msg: ListMessage) {
    match msg {
        ListMessage::SelectPrevious => app.invoices.select_previous(),
        ListMessage::SelectNext => app.invoices.select_next(),
        ListMessage::SelectFirst => app.invoices.select_first(),
        ListMessage::SelectLast => app.invoices.select_last(),

        ListMessage::Open => {
            let index = app.invoices.selected;
            let Some(doc) = app.invoices.selected_record() else {
                return;
            };

            // Re-opening the already open record just moves focus.
            let id = record_id(doc).map(str::to_string);
            if id.is_some() && id.as_deref() == app.editor.selected() {
                app.focus = FocusPanel::Editor;
                return;
            }

            let (dirty, creating) = unsaved_state(app);
            let action = AppMessage::List(ListMessage::OpenConfirmed(index));
            match guard_action(dirty, creating, GuardPrompt::default(), action) {
                GuardDecision::Proceed(_) => open_row(app, index),
                GuardDecision::Confirm(request) => {
                    app.confirm = Some(ConfirmState::new(request));
                }
            }
        }

        ListMessage::OpenConfirmed(index) => open_row(app, index),

        ListMessage::New => {
            let (dirty, creating) = unsaved_state(app);
            let action = AppMessage::List(ListMessage::NewConfirmed);
            match guard_action(dirty, creating, GuardPrompt::default(), action) {
                GuardDecision::Proceed(_) => start_create(app),
                GuardDecision::Confirm(request) => {
                    app.confirm = Some(ConfirmState::new(request));
                }
            }
        }

        ListMessage::NewConfirmed => start_create(app),

        ListMessage::Reload => {
            app.invoices.loading = true;
            app.set_status("Loading invoices...");
            let backend = Arc::clone(&app.backend);
            let tx = app.sender();
            app.spawn(async move {
                let completion = match backend.list().await {
                    Ok(records) => Completion::InvoicesLoaded(records),
                    Err(err) => Completion::InvoicesLoadFailed(Arc::new(err)),
                };
                let _ = tx.send(AppMessage::Completed(completion));
            });
        }
    }
}

/// Open the invoice at `index`: tear down the current edit view and fetch
/// a fresh copy from the service.
pub fn open_row(app: &mut App, index: usize) {
    let Some(id) = app
        .invoices
        .records
        .get(index)
        .and_then(record_id)
        .map(str::to_string)
    else {
        return;
    };
    app.invoices.selected = index;

    app.cancel_editor_timers();
    app.editor.close_nested();
    app.editor.mark_opening();
    app.history.push(Route::new(format!("/invoices/{id}")));

    let service = Arc::clone(&app.ctx.record_service);
    let tx = app.sender();
    app.spawn(async move {
        let completion = match service.fetch(&id).await {
            Ok(doc) => Completion::RecordFetched(doc),
            Err(err) => Completion::RecordFetchFailed(Arc::new(err)),
        };
        let _ = tx.send(AppMessage::Completed(completion));
    });
}

/// Begin the create flow with an empty draft.
fn start_create(app: &mut App) {
    app.cancel_editor_timers();
    app.editor.close_nested();
    app.editor.mark_opening();
    app.editor.open_new(json!({
        "status": "draft",
        "lineItems": [],
        "payments": [],
    }));
    editor::reset_editor_view(app);
    log_timing(app.editor.measure_opened());
    app.history.push(Route::new("/invoices/new"));
    app.focus = FocusPanel::Editor;
    app.clear_status();
}
