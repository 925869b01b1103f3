//! Speed-dial menu messages

/// What a menu entry does once it is past its confirmation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    /// Delete the open invoice
    Delete,
    /// Duplicate the open invoice as a new draft
    Duplicate,
    /// Open the nested payment editor
    RecordPayment,
}

/// Speed-dial menu message
#[derive(Debug, Clone)]
pub enum MenuMessage {
    /// Open the menu (or close it when already open)
    Toggle,
    /// Close the menu without dispatching
    Close,
    /// Move the cursor down
    CursorNext,
    /// Move the cursor up
    CursorPrev,
    /// Dispatch the entry under the cursor
    Activate,
    /// Dispatch the entry at this index
    ActivateItem(usize),
    /// Run an action whose confirmation (if any) has been given
    Execute(MenuAction),
}
