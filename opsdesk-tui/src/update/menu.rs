//! Speed-dial menu message handling

use std::sync::Arc;

use opsdesk_core::{record_id, ConfirmRequest, MenuDispatch, RecordService, ScreenContext};
use serde_json::{json, Value};

use crate::message::{AppMessage, Completion, MenuAction, MenuMessage};
use crate::model::{App, ConfirmState};
use crate::update::editor;

pub fn update(app: &mut App, msg: MenuMessage) {
    match msg {
        MenuMessage::Toggle => {
            if app.menu.is_open() {
                app.menu.close();
                return;
            }
            if app.editor.selected().is_none() {
                app.set_status("Open an invoice first");
                return;
            }
            refresh_disabled(app);
            app.menu_cursor = 0;
            app.menu.open();
        }

        MenuMessage::Close => app.menu.close(),

        MenuMessage::CursorNext => {
            let len = app.menu.items().len();
            if len > 0 {
                app.menu_cursor = (app.menu_cursor + 1) % len;
            }
        }

        MenuMessage::CursorPrev => {
            let len = app.menu.items().len();
            if len > 0 {
                app.menu_cursor = (app.menu_cursor + len - 1) % len;
            }
        }

        MenuMessage::Activate => {
            let index = app.menu_cursor;
            let dispatch = app.menu.dispatch(index);
            handle_dispatch(app, dispatch);
        }

        MenuMessage::ActivateItem(index) => {
            // Keyboard shortcut path: the click-equivalent of expanding the
            // dial and picking one entry.
            if app.editor.selected().is_none() {
                app.set_status("Open an invoice first");
                return;
            }
            refresh_disabled(app);
            app.menu.open();
            let dispatch = app.menu.dispatch(index);
            handle_dispatch(app, dispatch);
            app.menu.close();
        }

        MenuMessage::Execute(action) => run_action(app, action),
    }
}

/// Entries that need a persisted record grey out during a create flow or
/// while an operation is in flight.
fn refresh_disabled(app: &mut App) {
    let unsaved = app.editor.is_creating_new() || app.editor.pending().is_some();
    app.menu.set_item_disabled(0, unsaved);
    app.menu.set_item_disabled(1, unsaved);
}

fn handle_dispatch(app: &mut App, dispatch: Option<MenuDispatch<MenuAction>>) {
    match dispatch {
        Some(MenuDispatch::Direct(action)) => run_action(app, action),
        Some(MenuDispatch::NeedsConfirm(request)) => {
            app.confirm = Some(ConfirmState::new(into_app_request(request)));
        }
        None => {}
    }
}

/// Lift a menu confirmation into the top-level message type the dialog
/// dispatches on confirm.
fn into_app_request(request: ConfirmRequest<MenuAction>) -> ConfirmRequest<AppMessage> {
    ConfirmRequest {
        message: request.message,
        confirm_label: request.confirm_label,
        cancel_label: request.cancel_label,
        reset_first: request.reset_first,
        action: AppMessage::Menu(MenuMessage::Execute(request.action)),
    }
}

fn run_action(app: &mut App, action: MenuAction) {
    match action {
        MenuAction::Delete => delete_invoice(app),
        MenuAction::Duplicate => duplicate_invoice(app),
        MenuAction::RecordPayment => editor::open_payment(app),
    }
}

fn delete_invoice(app: &mut App) {
    match app.editor.delete() {
        Ok(id) => {
            app.set_status("Deleting...");
            let service = Arc::clone(&app.ctx.record_service);
            let tx = app.sender();
            app.spawn(async move {
                let completion = match service.delete(&id).await {
                    Ok(()) => Completion::Deleted(id),
                    Err(err) => Completion::DeleteFailed(Arc::new(err)),
                };
                let _ = tx.send(AppMessage::Completed(completion));
            });
        }
        Err(err) => {
            ScreenContext::log_failure("delete invoice", &err);
            app.set_status(err.to_string());
        }
    }
}

/// Copy the open invoice into a new draft: next free number, no payments,
/// no audit attributes.
fn duplicate_invoice(app: &mut App) {
    let source = app.editor.form().values().clone();
    if record_id(&source).is_none() {
        app.set_status("Save the invoice before duplicating it");
        return;
    }

    app.set_status("Duplicating...");
    let backend = Arc::clone(&app.backend);
    let tx = app.sender();
    app.spawn(async move {
        let completion = match backend.next_invoice_number().await {
            Ok(number) => {
                let mut draft = source;
                if let Value::Object(map) = &mut draft {
                    map.remove("id");
                    map.remove("createdOn");
                    map.remove("modifiedOn");
                }
                draft["invoiceNumber"] = json!(number);
                draft["status"] = json!("draft");
                draft["payments"] = json!([]);
                match backend.create(&draft).await {
                    Ok(doc) => Completion::Duplicated(doc),
                    Err(err) => Completion::DuplicateFailed(Arc::new(err)),
                }
            }
            Err(err) => Completion::DuplicateFailed(Arc::new(err)),
        };
        let _ = tx.send(AppMessage::Completed(completion));
    });
}
