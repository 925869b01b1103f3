//! Editor messages
//!
//! While a nested editor is open its parent is inert; field, submit and
//! close messages are routed to the nested editor first.

/// Editor message
#[derive(Debug, Clone)]
pub enum EditorMessage {
    /// Focus the next editable field
    NextField,
    /// Focus the previous editable field
    PrevField,
    /// Type a character into the focused field
    Input(char),
    /// Delete the last character of the focused field
    Backspace,

    /// Scroll the form by this many rows (negative scrolls up)
    ScrollBy(i16),
    /// Select the section at this index, scrolling its heading into view
    JumpToSection(usize),
    /// Toggle expansion of the active section
    ToggleSection,
    /// A deferred expand-after-scroll timer fired for this section
    CompleteExpand(usize),

    /// Submit the working document
    Submit,
    /// Toggle the explicit full-screen request
    ToggleFullScreen,

    /// Close the editor (or the nested editor), subject to the guard
    RequestClose,
    /// Close after the guard was confirmed (or when nothing was dirty)
    CloseConfirmed,

    /// Open the nested payment editor
    RecordPayment,
}
