//! Confirmation dialog messages

/// Confirmation dialog message
#[derive(Debug, Clone)]
pub enum ConfirmMessage {
    /// Move focus between Cancel and the confirm button
    ToggleFocus,
    /// Run the focused button
    Accept,
    /// Dismiss the dialog without running the guarded action
    Cancel,
}
