//! Confirmation dialog message handling
//!
//! Declining drops the guarded action entirely; confirming optionally
//! resets the form first, then dispatches the action exactly once.

use crate::message::ConfirmMessage;
use crate::model::App;

pub fn update(app: &mut App, msg: ConfirmMessage) {
    match msg {
        ConfirmMessage::ToggleFocus => {
            if let Some(confirm) = app.confirm.as_mut() {
                confirm.toggle_focus();
            }
        }

        ConfirmMessage::Accept => {
            let Some(confirm) = app.confirm.take() else {
                return;
            };
            if !confirm.confirm_focused {
                // The focused button was Cancel.
                return;
            }
            if confirm.request.reset_first {
                app.editor.form_mut().reset();
            }
            super::update(app, confirm.request.action);
        }

        ConfirmMessage::Cancel => {
            app.confirm = None;
        }
    }
}
