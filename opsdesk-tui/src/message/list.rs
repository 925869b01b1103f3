//! Invoice list messages

/// Invoice list message
#[derive(Debug, Clone)]
pub enum ListMessage {
    /// Select the previous row
    SelectPrevious,
    /// Select the next row
    SelectNext,
    /// Jump to the first row
    SelectFirst,
    /// Jump to the last row
    SelectLast,
    /// Open the selected invoice in the editor, subject to the guard
    Open,
    /// Open the row at this index after the guard was confirmed
    OpenConfirmed(usize),
    /// Start creating an invoice, subject to the guard
    New,
    /// Start creating an invoice after the guard was confirmed
    NewConfirmed,
    /// Reload the list from storage
    Reload,
}
