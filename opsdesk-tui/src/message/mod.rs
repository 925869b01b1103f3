//! Messages flowing from the event layer and async tasks into update

mod app;
mod completion;
mod confirm;
mod editor;
mod list;
mod menu;

pub use app::AppMessage;
pub use completion::Completion;
pub use confirm::ConfirmMessage;
pub use editor::EditorMessage;
pub use list::ListMessage;
pub use menu::{MenuAction, MenuMessage};
