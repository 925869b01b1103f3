//! Key bindings

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// One key binding.
#[derive(Debug, Clone)]
pub struct KeyBinding {
    pub modifiers: KeyModifiers,
    pub code: KeyCode,
}

impl KeyBinding {
    pub const fn new(modifiers: KeyModifiers, code: KeyCode) -> Self {
        Self { modifiers, code }
    }

    pub const fn key(code: KeyCode) -> Self {
        Self::new(KeyModifiers::NONE, code)
    }

    pub const fn alt(code: KeyCode) -> Self {
        Self::new(KeyModifiers::ALT, code)
    }

    pub const fn ctrl(code: KeyCode) -> Self {
        Self::new(KeyModifiers::CONTROL, code)
    }

    pub fn matches(&self, key: &KeyEvent) -> bool {
        key.modifiers == self.modifiers && key.code == self.code
    }
}

/// Default bindings. Alt combinations stay clear of text input, which
/// owns the unmodified printable keys while the editor has focus.
pub struct DefaultKeymap;

impl DefaultKeymap {
    // Global
    pub const QUIT: KeyBinding = KeyBinding::alt(KeyCode::Char('q'));
    pub const FORCE_QUIT: KeyBinding = KeyBinding::ctrl(KeyCode::Char('c'));
    pub const HELP: KeyBinding = KeyBinding::alt(KeyCode::Char('h'));
    pub const RELOAD: KeyBinding = KeyBinding::alt(KeyCode::Char('r'));
    pub const NEW_INVOICE: KeyBinding = KeyBinding::alt(KeyCode::Char('n'));

    // Editor
    pub const SUBMIT: KeyBinding = KeyBinding::alt(KeyCode::Char('s'));
    pub const FULL_SCREEN: KeyBinding = KeyBinding::alt(KeyCode::Char('f'));
    pub const TOGGLE_SECTION: KeyBinding = KeyBinding::alt(KeyCode::Char('e'));

    // Speed dial
    pub const MENU: KeyBinding = KeyBinding::alt(KeyCode::Char('a'));
    pub const DELETE: KeyBinding = KeyBinding::alt(KeyCode::Char('d'));
    pub const DUPLICATE: KeyBinding = KeyBinding::alt(KeyCode::Char('u'));
    pub const RECORD_PAYMENT: KeyBinding = KeyBinding::alt(KeyCode::Char('p'));
}
