//! State update logic
//!
//! Consumes messages and mutates the model; the only place state changes.
//! Async work is spawned onto the runtime here and reports back through
//! `AppMessage::Completed`.

mod completion;
mod confirm;
mod editor;
mod list;
mod menu;

use opsdesk_core::{guard_action, GuardDecision, GuardPrompt, TimingEvent};

use crate::message::AppMessage;
use crate::model::{App, ConfirmState};

/// Apply one message to the application state.
pub fn update(app: &mut App, msg: AppMessage) {
    match msg {
        AppMessage::Quit => {
            let (dirty, creating) = unsaved_state(app);
            match guard_action(dirty, creating, GuardPrompt::default(), AppMessage::ForceQuit) {
                GuardDecision::Proceed(_) => app.should_quit = true,
                GuardDecision::Confirm(request) => {
                    app.confirm = Some(ConfirmState::new(request));
                }
            }
        }

        AppMessage::ForceQuit => {
            app.should_quit = true;
        }

        AppMessage::ToggleFocus => {
            // Only two real targets; the editor side needs an open record.
            if app.focus.is_list() && app.editor.selected().is_none() {
                return;
            }
            app.focus.toggle();
        }

        AppMessage::ShowHelp => app.show_help = true,
        AppMessage::CloseHelp => app.show_help = false,

        AppMessage::Resized(cols, rows) => {
            app.update_layout(cols, rows);
            editor::rebuild_plan(app);
        }

        AppMessage::List(list_msg) => list::update(app, list_msg),
        AppMessage::Editor(editor_msg) => editor::update(app, editor_msg),
        AppMessage::Menu(menu_msg) => menu::update(app, menu_msg),
        AppMessage::Confirm(confirm_msg) => confirm::update(app, confirm_msg),
        AppMessage::Completed(completion) => completion::update(app, completion),

        AppMessage::ClearStatus => app.clear_status(),
        AppMessage::Noop => {}
    }
}

/// Unsaved work across the editor and its nested editor, as consulted by
/// every guarded action.
fn unsaved_state(app: &App) -> (bool, bool) {
    let editor = &app.editor;
    let dirty = editor.form().is_dirty() || editor.nested().is_some_and(|n| n.form().is_dirty());
    let creating =
        editor.is_creating_new() || editor.nested().is_some_and(|n| n.is_creating_new());
    (dirty, creating)
}

fn log_timing(event: Option<TimingEvent>) {
    if let Some(event) = event {
        log::debug!("{} settled in {:?}", event.label, event.duration);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use opsdesk_core::sections::SECTION_EXPANDED_STORAGE_KEY;
    use opsdesk_core::{MemoryPreferenceStore, PendingOperation, PreferenceStore, Route};
    use serde_json::json;

    use super::*;
    use crate::backend::JsonRecordService;
    use crate::message::{Completion, ConfirmMessage, EditorMessage, ListMessage, MenuMessage};

    fn test_app() -> (
        tokio::runtime::Runtime,
        App,
        Arc<MemoryPreferenceStore>,
        tempfile::TempDir,
    ) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let dir = tempfile::tempdir().unwrap();
        let backend = Arc::new(JsonRecordService::with_dir(dir.path().to_path_buf()));
        let prefs = Arc::new(MemoryPreferenceStore::new());
        let mut app = App::new(
            runtime.handle().clone(),
            tx,
            rx,
            backend,
            Arc::clone(&prefs) as Arc<dyn PreferenceStore>,
            Route::new("/invoices"),
        );
        app.update_layout(120, 12);
        (runtime, app, prefs, dir)
    }

    fn open_invoice(app: &mut App) {
        let doc = json!({
            "id": "inv-9",
            "invoiceNumber": 1009,
            "customerName": "Acme",
            "status": "sent",
            "lineItems": [],
            "payments": [],
        });
        app.invoices.set_records(vec![doc.clone()]);
        update(app, AppMessage::Completed(Completion::RecordFetched(doc)));
    }

    // ===== Dirty-state guard =====

    #[test]
    fn clean_quit_needs_no_confirmation() {
        let (_rt, mut app, _prefs, _dir) = test_app();
        update(&mut app, AppMessage::Quit);
        assert!(app.should_quit);
        assert!(app.confirm.is_none());
    }

    #[test]
    fn dirty_quit_prompts_and_cancel_drops_the_action() {
        let (_rt, mut app, _prefs, _dir) = test_app();
        open_invoice(&mut app);
        update(&mut app, AppMessage::Editor(EditorMessage::Input('x')));

        update(&mut app, AppMessage::Quit);
        assert!(!app.should_quit);
        let request = &app.confirm.as_ref().unwrap().request;
        assert_eq!(request.confirm_label, "DISCARD");

        update(&mut app, AppMessage::Confirm(ConfirmMessage::Cancel));
        assert!(app.confirm.is_none());
        assert!(!app.should_quit);

        // A stray accept after the dialog closed does nothing.
        update(&mut app, AppMessage::Confirm(ConfirmMessage::Accept));
        assert!(!app.should_quit);
    }

    #[test]
    fn confirmed_quit_goes_through() {
        let (_rt, mut app, _prefs, _dir) = test_app();
        open_invoice(&mut app);
        update(&mut app, AppMessage::Editor(EditorMessage::Input('x')));

        update(&mut app, AppMessage::Quit);
        update(&mut app, AppMessage::Confirm(ConfirmMessage::ToggleFocus));
        update(&mut app, AppMessage::Confirm(ConfirmMessage::Accept));
        assert!(app.should_quit);
    }

    #[test]
    fn opening_another_row_is_guarded_while_dirty() {
        let (_rt, mut app, _prefs, _dir) = test_app();
        open_invoice(&mut app);
        app.invoices.set_records(vec![
            json!({"id": "inv-9", "invoiceNumber": 1009, "customerName": "Acme"}),
            json!({"id": "inv-10", "invoiceNumber": 1010, "customerName": "Globex"}),
        ]);
        update(&mut app, AppMessage::Editor(EditorMessage::Input('x')));

        app.invoices.selected = 1;
        update(&mut app, AppMessage::List(ListMessage::Open));
        assert!(app.confirm.is_some());
        // Editor still shows the first record until confirmed.
        assert_eq!(app.editor.selected(), Some("inv-9"));
    }

    // ===== Speed-dial menu =====

    #[test]
    fn delete_routes_through_confirmation() {
        let (_rt, mut app, _prefs, _dir) = test_app();
        open_invoice(&mut app);

        update(&mut app, AppMessage::Menu(MenuMessage::ActivateItem(0)));
        let request = app.confirm.as_ref().unwrap().request.clone();
        assert_eq!(request.confirm_label, "DELETE");
        assert!(request.message.contains("deleted permanently"));
        assert!(app.editor.pending().is_none());

        update(&mut app, AppMessage::Confirm(ConfirmMessage::ToggleFocus));
        update(&mut app, AppMessage::Confirm(ConfirmMessage::Accept));
        assert_eq!(app.editor.pending(), Some(PendingOperation::Delete));
    }

    #[test]
    fn menu_needs_an_open_record() {
        let (_rt, mut app, _prefs, _dir) = test_app();
        update(&mut app, AppMessage::Menu(MenuMessage::Toggle));
        assert!(!app.menu.is_open());
    }

    #[test]
    fn delete_is_disabled_during_a_create_flow() {
        let (_rt, mut app, _prefs, _dir) = test_app();
        update(&mut app, AppMessage::List(ListMessage::New));

        update(&mut app, AppMessage::Menu(MenuMessage::ActivateItem(0)));
        assert!(app.confirm.is_none());
        assert!(app.editor.pending().is_none());
    }

    // ===== Scroll synchronization =====

    #[test]
    fn scrolling_down_advances_the_active_section() {
        let (_rt, mut app, _prefs, _dir) = test_app();
        open_invoice(&mut app);
        assert_eq!(app.sections.active_label(), Some("Overview"));

        for _ in 0..4 {
            update(&mut app, AppMessage::Editor(EditorMessage::ScrollBy(3)));
        }
        assert_eq!(app.sections.active_label(), Some("Line items"));
    }

    #[test]
    fn scrolling_to_the_end_activates_the_last_section() {
        let (_rt, mut app, _prefs, _dir) = test_app();
        open_invoice(&mut app);

        update(&mut app, AppMessage::Editor(EditorMessage::ScrollBy(100)));
        assert_eq!(app.sections.active_label(), Some("History"));
    }

    // ===== Deferred expand timers =====

    #[test]
    fn jump_schedules_expand_and_the_timer_lands() {
        let (_rt, mut app, prefs, _dir) = test_app();
        open_invoice(&mut app);

        update(&mut app, AppMessage::Editor(EditorMessage::JumpToSection(1)));
        assert_eq!(app.sections.active_label(), Some("Line items"));
        assert!(!app.sections.is_expanded(1));

        std::thread::sleep(Duration::from_millis(450));
        let msg = app.try_take_message().expect("timer message");
        update(&mut app, msg);
        assert!(app.sections.is_expanded(1));

        let raw = prefs.get(SECTION_EXPANDED_STORAGE_KEY).unwrap().unwrap();
        assert!(raw.contains("Invoice"));
    }

    #[test]
    fn closing_the_editor_cancels_armed_timers() {
        let (_rt, mut app, _prefs, _dir) = test_app();
        open_invoice(&mut app);

        update(&mut app, AppMessage::Editor(EditorMessage::JumpToSection(1)));
        update(&mut app, AppMessage::Editor(EditorMessage::RequestClose));

        std::thread::sleep(Duration::from_millis(450));
        assert!(app.try_take_message().is_none());
        assert!(!app.sections.is_expanded(1));
    }

    // ===== Help overlay =====

    #[test]
    fn help_opens_from_the_list_and_swallows_keys() {
        use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};

        let (_rt, mut app, _prefs, _dir) = test_app();
        let press = |code| Event::Key(KeyEvent::new(code, KeyModifiers::NONE));

        let msg = crate::event::handle_event(&press(KeyCode::Char('?')), &app);
        update(&mut app, msg);
        assert!(app.show_help);

        // List navigation is swallowed while the overlay is up.
        let msg = crate::event::handle_event(&press(KeyCode::Down), &app);
        assert!(matches!(msg, AppMessage::Noop));

        let msg = crate::event::handle_event(&press(KeyCode::Esc), &app);
        update(&mut app, msg);
        assert!(!app.show_help);
    }

    // ===== Nested payment editor =====

    #[test]
    fn submitted_payment_folds_into_the_invoice() {
        let (_rt, mut app, _prefs, _dir) = test_app();
        open_invoice(&mut app);

        update(
            &mut app,
            AppMessage::Menu(MenuMessage::Execute(crate::message::MenuAction::RecordPayment)),
        );
        assert!(app.editor.nested().is_some());

        // Amount is the first payment field.
        for ch in "250".chars() {
            update(&mut app, AppMessage::Editor(EditorMessage::Input(ch)));
        }
        update(&mut app, AppMessage::Editor(EditorMessage::Submit));

        assert!(app.editor.nested().is_none());
        let amount = app.editor.form().value("payments.0.amount");
        assert_eq!(amount, Some(&json!(250)));
        assert!(app.editor.form().is_dirty());
        // The invoice itself has not been persisted yet.
        assert!(app.editor.pending().is_none());
    }

    #[test]
    fn closing_a_dirty_payment_editor_is_guarded() {
        let (_rt, mut app, _prefs, _dir) = test_app();
        open_invoice(&mut app);
        update(&mut app, AppMessage::Editor(EditorMessage::RecordPayment));
        update(&mut app, AppMessage::Editor(EditorMessage::Input('5')));

        update(&mut app, AppMessage::Editor(EditorMessage::RequestClose));
        assert!(app.confirm.is_some());
        assert!(app.editor.nested().is_some());

        update(&mut app, AppMessage::Confirm(ConfirmMessage::ToggleFocus));
        update(&mut app, AppMessage::Confirm(ConfirmMessage::Accept));
        assert!(app.editor.nested().is_none());
        // The parent invoice survives untouched.
        assert_eq!(app.editor.selected(), Some("inv-9"));
    }
}
