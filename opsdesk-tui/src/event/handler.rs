//! Event handling

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::event::keymap::DefaultKeymap;
use crate::message::{
    AppMessage, ConfirmMessage, EditorMessage, ListMessage, MenuMessage,
};
use crate::model::App;

/// Poll for the next input event, waiting at most `timeout`.
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Translate an input event into a message.
pub fn handle_event(event: &Event, app: &App) -> AppMessage {
    match event {
        Event::Key(key_event) => handle_key_event(*key_event, app),
        Event::Resize(cols, rows) => AppMessage::Resized(*cols, *rows),
        _ => AppMessage::Noop,
    }
}

fn handle_key_event(key: KeyEvent, app: &App) -> AppMessage {
    // Press only; Release and Repeat double up on some terminals.
    if key.kind != KeyEventKind::Press {
        return AppMessage::Noop;
    }

    // Ctrl+C always works, even over a confirmation dialog.
    if DefaultKeymap::FORCE_QUIT.matches(&key) {
        return AppMessage::ForceQuit;
    }

    // Modal surfaces first: help, the confirmation dialog, the open menu,
    // then the nested payment editor. They swallow the global bindings.
    if app.show_help {
        return handle_help_keys(key);
    }
    if app.confirm.is_some() {
        return handle_confirm_keys(key);
    }
    if app.menu.is_open() {
        return handle_menu_keys(key);
    }
    if app.editor.nested().is_some() {
        return handle_nested_editor_keys(key);
    }

    // Global bindings, wherever the focus is.
    if DefaultKeymap::QUIT.matches(&key) {
        return AppMessage::Quit;
    }
    if DefaultKeymap::HELP.matches(&key) {
        return AppMessage::ShowHelp;
    }
    if DefaultKeymap::RELOAD.matches(&key) {
        return AppMessage::List(ListMessage::Reload);
    }
    if DefaultKeymap::NEW_INVOICE.matches(&key) {
        return AppMessage::List(ListMessage::New);
    }
    if DefaultKeymap::MENU.matches(&key) {
        return AppMessage::Menu(MenuMessage::Toggle);
    }
    if DefaultKeymap::DELETE.matches(&key) {
        return AppMessage::Menu(MenuMessage::ActivateItem(0));
    }
    if DefaultKeymap::DUPLICATE.matches(&key) {
        return AppMessage::Menu(MenuMessage::ActivateItem(1));
    }
    if DefaultKeymap::RECORD_PAYMENT.matches(&key) {
        return AppMessage::Menu(MenuMessage::ActivateItem(2));
    }

    if app.focus.is_list() {
        handle_list_keys(key)
    } else {
        handle_editor_keys(key, app)
    }
}

fn handle_list_keys(key: KeyEvent) -> AppMessage {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => AppMessage::List(ListMessage::SelectPrevious),
        KeyCode::Down | KeyCode::Char('j') => AppMessage::List(ListMessage::SelectNext),
        KeyCode::Home => AppMessage::List(ListMessage::SelectFirst),
        KeyCode::End => AppMessage::List(ListMessage::SelectLast),
        KeyCode::Enter => AppMessage::List(ListMessage::Open),
        KeyCode::Char('n') => AppMessage::List(ListMessage::New),
        // Plain '?' is free here; the editor panes own printable keys.
        KeyCode::Char('?') => AppMessage::ShowHelp,
        KeyCode::Tab | KeyCode::Right => AppMessage::ToggleFocus,
        _ => AppMessage::Noop,
    }
}

fn handle_help_keys(key: KeyEvent) -> AppMessage {
    match key.code {
        KeyCode::Enter | KeyCode::Esc => AppMessage::CloseHelp,
        _ => AppMessage::Noop,
    }
}

fn handle_editor_keys(key: KeyEvent, app: &App) -> AppMessage {
    if DefaultKeymap::SUBMIT.matches(&key) {
        return AppMessage::Editor(EditorMessage::Submit);
    }
    if DefaultKeymap::FULL_SCREEN.matches(&key) {
        return AppMessage::Editor(EditorMessage::ToggleFullScreen);
    }
    if DefaultKeymap::TOGGLE_SECTION.matches(&key) {
        return AppMessage::Editor(EditorMessage::ToggleSection);
    }

    // Alt+1..Alt+9: jump to a section of the side index.
    if key.modifiers == KeyModifiers::ALT {
        if let KeyCode::Char(ch @ '1'..='9') = key.code {
            let index = ch as usize - '1' as usize;
            if index < app.sections.len() {
                return AppMessage::Editor(EditorMessage::JumpToSection(index));
            }
            return AppMessage::Noop;
        }
    }

    match key.code {
        KeyCode::Esc => AppMessage::Editor(EditorMessage::RequestClose),
        KeyCode::Tab | KeyCode::Down | KeyCode::Enter => {
            AppMessage::Editor(EditorMessage::NextField)
        }
        KeyCode::BackTab | KeyCode::Up => AppMessage::Editor(EditorMessage::PrevField),
        KeyCode::PageDown => AppMessage::Editor(EditorMessage::ScrollBy(3)),
        KeyCode::PageUp => AppMessage::Editor(EditorMessage::ScrollBy(-3)),
        KeyCode::Backspace => AppMessage::Editor(EditorMessage::Backspace),
        KeyCode::Char(ch) if is_text_input(key.modifiers) => {
            AppMessage::Editor(EditorMessage::Input(ch))
        }
        _ => AppMessage::Noop,
    }
}

fn handle_nested_editor_keys(key: KeyEvent) -> AppMessage {
    if DefaultKeymap::SUBMIT.matches(&key) {
        return AppMessage::Editor(EditorMessage::Submit);
    }
    match key.code {
        KeyCode::Esc => AppMessage::Editor(EditorMessage::RequestClose),
        KeyCode::Tab | KeyCode::Down => AppMessage::Editor(EditorMessage::NextField),
        KeyCode::BackTab | KeyCode::Up => AppMessage::Editor(EditorMessage::PrevField),
        KeyCode::Enter => AppMessage::Editor(EditorMessage::Submit),
        KeyCode::Backspace => AppMessage::Editor(EditorMessage::Backspace),
        KeyCode::Char(ch) if is_text_input(key.modifiers) => {
            AppMessage::Editor(EditorMessage::Input(ch))
        }
        _ => AppMessage::Noop,
    }
}

fn handle_menu_keys(key: KeyEvent) -> AppMessage {
    match key.code {
        KeyCode::Esc => AppMessage::Menu(MenuMessage::Close),
        KeyCode::Up | KeyCode::Char('k') => AppMessage::Menu(MenuMessage::CursorPrev),
        KeyCode::Down | KeyCode::Char('j') => AppMessage::Menu(MenuMessage::CursorNext),
        KeyCode::Enter => AppMessage::Menu(MenuMessage::Activate),
        _ => AppMessage::Noop,
    }
}

fn handle_confirm_keys(key: KeyEvent) -> AppMessage {
    match key.code {
        KeyCode::Tab | KeyCode::Left | KeyCode::Right => {
            AppMessage::Confirm(ConfirmMessage::ToggleFocus)
        }
        KeyCode::Enter => AppMessage::Confirm(ConfirmMessage::Accept),
        KeyCode::Esc => AppMessage::Confirm(ConfirmMessage::Cancel),
        _ => AppMessage::Noop,
    }
}

/// Shifted characters still count as text input.
fn is_text_input(modifiers: KeyModifiers) -> bool {
    modifiers.is_empty() || modifiers == KeyModifiers::SHIFT
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn shifted_characters_count_as_input() {
        assert!(is_text_input(KeyModifiers::NONE));
        assert!(is_text_input(KeyModifiers::SHIFT));
        assert!(!is_text_input(KeyModifiers::ALT));
        assert!(!is_text_input(KeyModifiers::CONTROL));
    }

    #[test]
    fn bindings_match_exact_modifiers() {
        let alt_q = press(KeyCode::Char('q'), KeyModifiers::ALT);
        assert!(DefaultKeymap::QUIT.matches(&alt_q));

        let plain_q = press(KeyCode::Char('q'), KeyModifiers::NONE);
        assert!(!DefaultKeymap::QUIT.matches(&plain_q));
    }
}
