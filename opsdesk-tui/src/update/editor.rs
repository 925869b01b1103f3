//! Edit view message handling
//!
//! Field edits, scroll/section synchronization, submission round trips
//! and the nested payment editor. Payments live inside the invoice
//! document, so a submitted payment folds into the parent form and is
//! persisted by the next invoice submit.

use std::sync::Arc;

use opsdesk_core::{
    guard_action, DeferredTask, EditorState, GuardDecision, GuardPrompt, Route, ScreenContext,
    ScrollMetrics, SubmitAction, TimerKey,
};
use serde_json::json;
use uuid::Uuid;

use crate::message::{AppMessage, Completion, EditorMessage};
use crate::model::fields;
use crate::model::geometry::{array_len, build_row_plan};
use crate::model::invoices::payment_editor_spec;
use crate::model::{App, ConfirmState, FocusPanel};
use crate::update::log_timing;

pub fn update(app: &mut App, msg: EditorMessage) {
    match msg {
        EditorMessage::NextField => move_field(app, 1),
        EditorMessage::PrevField => move_field(app, -1),
        EditorMessage::Input(ch) => edit_focused_field(app, Some(ch)),
        EditorMessage::Backspace => edit_focused_field(app, None),

        EditorMessage::ScrollBy(delta) => {
            let target = i32::from(app.editor_scroll) + i32::from(delta);
            let target = u16::try_from(target.max(0)).unwrap_or(u16::MAX);
            apply_scroll(app, target);
        }

        EditorMessage::JumpToSection(index) => {
            if app.editor.selected().is_none() {
                return;
            }
            app.focus = FocusPanel::Editor;
            let effects = app.sections.select(index);
            if let Some(target) = effects.scroll_to {
                let max = max_scroll(app);
                app.editor_scroll = target.min(max);
            }
            if let Some(expand) = effects.deferred_expand {
                app.schedule(DeferredTask::expand_section(
                    expand,
                    AppMessage::Editor(EditorMessage::CompleteExpand(expand)),
                ));
            }
        }

        EditorMessage::ToggleSection => {
            let Some(index) = app.sections.active_index() else {
                return;
            };
            if app.sections.toggle_expanded(index) {
                persist_sections(app);
                rebuild_plan(app);
            }
        }

        EditorMessage::CompleteExpand(index) => {
            app.cancel_timer(TimerKey::ExpandSection(index));
            if app.sections.complete_deferred_expand(index) {
                persist_sections(app);
                rebuild_plan(app);
            }
        }

        EditorMessage::Submit => {
            if app.editor.nested().is_some() {
                submit_nested(app);
            } else {
                submit_root(app);
            }
        }

        EditorMessage::ToggleFullScreen => {
            if app.editor.selected().is_some() {
                app.editor.toggle_full_screen();
            }
        }

        EditorMessage::RequestClose => request_close(app),
        EditorMessage::CloseConfirmed => close_confirmed(app),

        EditorMessage::RecordPayment => open_payment(app),
    }
}

/// Rebuild the content row plan and hand the section geometry to the
/// synchronizer. Runs after anything that can move rows around.
pub fn rebuild_plan(app: &mut App) {
    let plan = build_row_plan(app.editor.form(), &app.sections, &app.fields);
    for (index, bounds) in plan.bounds.iter().enumerate() {
        app.sections.register_bounds(index, *bounds);
    }
    app.plan = plan;
    let max = max_scroll(app);
    if app.editor_scroll > max {
        app.editor_scroll = max;
    }
}

/// Reset per-record view state after the editor (re)opened.
pub fn reset_editor_view(app: &mut App) {
    app.field_focus = 0;
    app.editor_scroll = 0;
    fields::validate_all(app.editor.form_mut(), &app.fields);
    app.sections.ensure_default();
    rebuild_plan(app);
}

/// Open the nested payment editor over the invoice.
pub fn open_payment(app: &mut App) {
    if app.editor.selected().is_none() || app.editor.nested().is_some() {
        return;
    }
    let today = chrono::Local::now().format("%Y-%m-%d").to_string();
    app.editor
        .open_nested_new(payment_editor_spec(), json!({ "receivedOn": today }));
    if let Some(nested) = app.editor.nested_mut() {
        fields::validate_all(nested.form_mut(), &app.payment_fields);
    }
    app.nested_field_focus = 0;
}

fn max_scroll(app: &App) -> u16 {
    app.plan
        .content_height()
        .saturating_sub(app.editor_viewport())
}

/// Move the editor scroll and let the synchronizer track the active
/// section from the new position.
fn apply_scroll(app: &mut App, target: u16) {
    let max = max_scroll(app);
    app.editor_scroll = target.min(max);
    let metrics = ScrollMetrics {
        scroll_top: app.editor_scroll,
        viewport_height: app.editor_viewport(),
        content_height: app.plan.content_height(),
    };
    let _ = app.sections.on_scroll(metrics);
}

fn move_field(app: &mut App, step: i32) {
    if app.editor.nested().is_some() {
        app.nested_field_focus = cycle(app.nested_field_focus, app.payment_fields.len(), step);
        return;
    }
    if app.editor.selected().is_none() {
        return;
    }
    app.field_focus = cycle(app.field_focus, app.fields.len(), step);
    ensure_field_visible(app);
}

fn cycle(current: usize, len: usize, step: i32) -> usize {
    if len == 0 {
        return 0;
    }
    let len = len as i32;
    ((current as i32 + step).rem_euclid(len)) as usize
}

/// Keep the focused field (and its label) inside the viewport.
fn ensure_field_visible(app: &mut App) {
    let Some(&row) = app.plan.field_rows.get(app.field_focus) else {
        return;
    };
    let viewport = app.editor_viewport();
    let label_row = row.saturating_sub(1);
    if label_row < app.editor_scroll {
        apply_scroll(app, label_row);
    } else if viewport > 0 && row >= app.editor_scroll + viewport {
        apply_scroll(app, row + 1 - viewport);
    }
}

fn edit_focused_field(app: &mut App, ch: Option<char>) {
    if app.editor.nested().is_some() {
        let Some(field) = app.payment_fields.get(app.nested_field_focus).cloned() else {
            return;
        };
        let Some(nested) = app.editor.nested_mut() else {
            return;
        };
        let mut text = fields::field_text(nested.form(), field.path);
        match ch {
            Some(c) => text.push(c),
            None => {
                text.pop();
            }
        }
        fields::apply_field_input(nested.form_mut(), &field, &text);
        return;
    }

    if app.editor.selected().is_none() {
        return;
    }
    let Some(field) = app.fields.get(app.field_focus).cloned() else {
        return;
    };
    let mut text = fields::field_text(app.editor.form(), field.path);
    match ch {
        Some(c) => text.push(c),
        None => {
            text.pop();
        }
    }
    fields::apply_field_input(app.editor.form_mut(), &field, &text);
    // Edits clear the form-level banner, which shifts rows.
    rebuild_plan(app);
}

fn submit_root(app: &mut App) {
    if app.editor.selected().is_none() {
        return;
    }
    if !app.editor.can_submit() {
        app.set_status(submit_blocker(&app.editor));
        return;
    }
    match app.editor.submit() {
        Ok(action) => {
            app.set_status("Saving...");
            let service = Arc::clone(&app.ctx.record_service);
            let tx = app.sender();
            app.spawn(async move {
                let result = match action {
                    SubmitAction::Create(doc) => service.create(&doc).await,
                    SubmitAction::Update { id, record } => service.update(&id, &record).await,
                };
                let completion = match result {
                    Ok(doc) => Completion::Saved(doc),
                    Err(err) => Completion::SaveFailed(Arc::new(err)),
                };
                let _ = tx.send(AppMessage::Completed(completion));
            });
        }
        Err(err) => {
            ScreenContext::log_failure("submit invoice", &err);
            app.set_status(err.to_string());
        }
    }
}

/// Why the submit control is disabled right now.
fn submit_blocker(editor: &EditorState) -> &'static str {
    if editor.pending().is_some() {
        "A save is already running"
    } else if !editor.form().is_valid() {
        "Fix the highlighted fields first"
    } else if editor
        .spec()
        .disabled_submit
        .is_some_and(|f| f(editor.form().values()))
    {
        "This invoice cannot be submitted"
    } else {
        "No changes to save"
    }
}

/// Submit the nested payment editor: settle locally and fold the payment
/// into the parent document.
fn submit_nested(app: &mut App) {
    let Some(nested) = app.editor.nested_mut() else {
        return;
    };
    if !nested.can_submit() {
        let message = if nested.pending().is_some() {
            "A save is already running"
        } else {
            "Fix the highlighted fields first"
        };
        app.set_status(message);
        return;
    }

    let Some(result) = app.editor.nested_mut().map(EditorState::submit) else {
        return;
    };
    match result {
        Ok(SubmitAction::Create(mut doc)) => {
            doc["id"] = json!(format!("pay-{}", Uuid::new_v4().simple()));
            if let Some(nested) = app.editor.nested_mut() {
                log_timing(nested.settle_saved(doc.clone()));
            }
            let index = array_len(app.editor.form(), "payments");
            app.editor.form_mut().change(&format!("payments.{index}"), doc);
            finish_nested(app);
        }
        Ok(SubmitAction::Update { id, record }) => {
            if let Some(nested) = app.editor.nested_mut() {
                log_timing(nested.settle_saved(record.clone()));
            }
            if let Some(index) = payment_position(app, &id) {
                app.editor
                    .form_mut()
                    .change(&format!("payments.{index}"), record);
            }
            finish_nested(app);
        }
        Err(err) => {
            ScreenContext::log_failure("record payment", &err);
            app.set_status(err.to_string());
        }
    }
}

fn finish_nested(app: &mut App) {
    app.editor.close_nested();
    app.nested_field_focus = 0;
    rebuild_plan(app);
    app.set_status("Payment recorded; submit the invoice to save it");
}

fn payment_position(app: &App, id: &str) -> Option<usize> {
    app.editor
        .form()
        .value("payments")
        .and_then(serde_json::Value::as_array)
        .and_then(|items| {
            items
                .iter()
                .position(|p| p.get("id").and_then(serde_json::Value::as_str) == Some(id))
        })
}

fn request_close(app: &mut App) {
    let (dirty, creating) = if let Some(nested) = app.editor.nested() {
        (nested.form().is_dirty(), nested.is_creating_new())
    } else {
        if app.editor.selected().is_none() {
            app.focus = FocusPanel::List;
            return;
        }
        (app.editor.form().is_dirty(), app.editor.is_creating_new())
    };

    let action = AppMessage::Editor(EditorMessage::CloseConfirmed);
    let prompt = GuardPrompt::default().without_reset();
    match guard_action(dirty, creating, prompt, action) {
        GuardDecision::Proceed(_) => close_confirmed(app),
        GuardDecision::Confirm(request) => {
            app.confirm = Some(ConfirmState::new(request));
        }
    }
}

/// Close whichever editor is on top. The nested editor closes back to
/// its parent; the root editor reverts and returns focus to the list.
fn close_confirmed(app: &mut App) {
    if app.editor.nested().is_some() {
        app.editor.close_nested();
        app.nested_field_focus = 0;
        return;
    }
    app.cancel_editor_timers();
    app.editor.close();
    app.field_focus = 0;
    app.history.push(Route::new("/invoices"));
    rebuild_plan(app);
    app.focus = FocusPanel::List;
}

fn persist_sections(app: &App) {
    let root = app.ctx.spec.root_entity;
    if let Err(err) = app
        .sections
        .persist_expanded(app.ctx.preference_store.as_ref(), root)
    {
        ScreenContext::log_failure("persist expanded sections", &err);
    }
}
