//! Rendering, split into the frame layout, the two panes and the
//! overlay components. Everything draws from `&App`; no view code
//! mutates state.

pub mod components;
pub mod editor;
pub mod invoices;
pub mod layout;
pub mod theme;

pub use layout::render;
