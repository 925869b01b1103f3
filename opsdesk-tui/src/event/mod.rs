//! Input translation
//!
//! Turns keyboard and resize events into messages. Routing order matters:
//! force quit, then the modal surfaces (help overlay, confirmation dialog,
//! open menu, nested editor), then the global bindings, then panel focus.

mod handler;
mod keymap;

pub use handler::{handle_event, poll_event};
pub use keymap::{DefaultKeymap, KeyBinding};
