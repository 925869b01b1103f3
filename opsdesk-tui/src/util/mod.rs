//! Infrastructure helpers with no business logic

mod terminal;
pub mod text;

pub use terminal::{init_terminal, restore_terminal, set_window_title, Term};
pub use text::truncate_to_width;
