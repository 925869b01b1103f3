//! Application main loop
//!
//! Runs the draw / drain / poll cycle roughly every 100ms:
//! render the current state, apply any completions queued by spawned
//! tasks, then wait briefly for input and feed it through `update`.

use std::time::Duration;

use anyhow::Result;

use opsdesk_core::EditorState;

use crate::event;
use crate::model::App;
use crate::update;
use crate::util::{set_window_title, Term};
use crate::view;

pub fn run(terminal: &mut Term, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|frame| {
            view::render(app, frame);
        })?;

        sync_window_title(terminal, app)?;

        if app.should_quit {
            break;
        }

        // Completions from async tasks, queued since the last frame.
        while let Some(message) = app.try_take_message() {
            update::update(app, message);
        }

        if let Some(event) = event::poll_event(Duration::from_millis(100))? {
            let message = event::handle_event(&event, app);
            update::update(app, message);
        }
    }

    Ok(())
}

/// Mirror the full-screen edit view's title onto the terminal window,
/// falling back to the application name. Re-applied only on change.
fn sync_window_title(terminal: &mut Term, app: &mut App) -> Result<()> {
    let desired = app
        .editor
        .nested()
        .and_then(EditorState::window_title)
        .or_else(|| app.editor.window_title())
        .unwrap_or_else(|| "OpsDesk".to_string());

    if app.applied_title.as_deref() != Some(desired.as_str()) {
        set_window_title(terminal, &desired)?;
        app.applied_title = Some(desired);
    }
    Ok(())
}
