//! Dirty-State Guard
//!
//! Wraps navigation-triggering or record-discarding actions. A clean form
//! lets the action through untouched; unsaved changes (or an in-progress
//! create) turn it into a confirmation request the driver presents in a
//! modal. Declining drops the request entirely, so the action never runs.

/// Prompt texts for a guarded action, with the standard discard wording as
/// the default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardPrompt {
    pub message: String,
    pub confirm_label: String,
    pub cancel_label: String,
    /// Run the caller's reset procedure before the action on confirm.
    pub reset_first: bool,
}

impl Default for GuardPrompt {
    fn default() -> Self {
        Self {
            message: "You have unsaved changes. Discard them?".to_string(),
            confirm_label: "DISCARD".to_string(),
            cancel_label: "Cancel".to_string(),
            reset_first: true,
        }
    }
}

impl GuardPrompt {
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    #[must_use]
    pub fn with_confirm_label(mut self, label: impl Into<String>) -> Self {
        self.confirm_label = label.into();
        self
    }

    #[must_use]
    pub fn with_cancel_label(mut self, label: impl Into<String>) -> Self {
        self.cancel_label = label.into();
        self
    }

    /// Leave the form untouched on confirm.
    #[must_use]
    pub fn without_reset(mut self) -> Self {
        self.reset_first = false;
        self
    }
}

/// A confirmation the driver must present before dispatching `action`.
///
/// On confirm the driver resets the form first when `reset_first` is set,
/// then dispatches `action` exactly once. On decline it drops the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmRequest<M> {
    pub message: String,
    pub confirm_label: String,
    pub cancel_label: String,
    pub reset_first: bool,
    pub action: M,
}

/// Outcome of guarding one action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision<M> {
    /// Nothing unsaved: dispatch immediately, no prompt.
    Proceed(M),
    /// Unsaved changes: present the prompt first.
    Confirm(ConfirmRequest<M>),
}

/// Gate `action` behind the dirty check.
///
/// The prompt is only consulted when `dirty` or `creating_new` holds.
pub fn guard_action<M>(
    dirty: bool,
    creating_new: bool,
    prompt: GuardPrompt,
    action: M,
) -> GuardDecision<M> {
    if dirty || creating_new {
        GuardDecision::Confirm(ConfirmRequest {
            message: prompt.message,
            confirm_label: prompt.confirm_label,
            cancel_label: prompt.cancel_label,
            reset_first: prompt.reset_first,
            action,
        })
    } else {
        GuardDecision::Proceed(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Msg {
        CloseEditor,
    }

    #[test]
    fn clean_form_proceeds_without_prompt() {
        let decision = guard_action(false, false, GuardPrompt::default(), Msg::CloseEditor);
        assert_eq!(decision, GuardDecision::Proceed(Msg::CloseEditor));
    }

    #[test]
    fn dirty_form_requires_confirmation() {
        let decision = guard_action(true, false, GuardPrompt::default(), Msg::CloseEditor);
        let GuardDecision::Confirm(request) = decision else {
            panic!("expected a confirmation request");
        };
        assert_eq!(request.action, Msg::CloseEditor);
        assert!(request.reset_first);
        assert_eq!(request.confirm_label, "DISCARD");
        assert_eq!(request.cancel_label, "Cancel");
    }

    #[test]
    fn creating_new_requires_confirmation_even_when_pristine() {
        let decision = guard_action(false, true, GuardPrompt::default(), Msg::CloseEditor);
        assert!(matches!(decision, GuardDecision::Confirm(_)));
    }

    #[test]
    fn prompt_texts_flow_into_the_request() {
        let prompt = GuardPrompt::default()
            .with_message("Leave without saving?")
            .with_confirm_label("LEAVE")
            .with_cancel_label("Stay")
            .without_reset();
        let decision = guard_action(true, true, prompt, Msg::CloseEditor);
        let GuardDecision::Confirm(request) = decision else {
            panic!("expected a confirmation request");
        };
        assert_eq!(request.message, "Leave without saving?");
        assert_eq!(request.confirm_label, "LEAVE");
        assert_eq!(request.cancel_label, "Stay");
        assert!(!request.reset_first);
    }
}
