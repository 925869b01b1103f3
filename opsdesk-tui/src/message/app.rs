//! Top-level message enum

use super::{Completion, ConfirmMessage, EditorMessage, ListMessage, MenuMessage};

/// Application message
#[derive(Debug, Clone)]
pub enum AppMessage {
    /// Quit, subject to the unsaved-changes guard
    Quit,

    /// Quit immediately, bypassing the guard
    ForceQuit,

    /// Switch focus between the list and the editor
    ToggleFocus,

    /// Open the keyboard shortcut overlay
    ShowHelp,

    /// Close the keyboard shortcut overlay
    CloseHelp,

    /// Terminal was resized to (columns, rows)
    Resized(u16, u16),

    /// Invoice list messages
    List(ListMessage),

    /// Editor messages
    Editor(EditorMessage),

    /// Speed-dial menu messages
    Menu(MenuMessage),

    /// Confirmation dialog messages
    Confirm(ConfirmMessage),

    /// A background task finished
    Completed(Completion),

    /// Clear the transient status message
    ClearStatus,

    /// Ignore (unhandled event)
    Noop,
}
