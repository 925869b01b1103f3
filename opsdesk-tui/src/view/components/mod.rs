//! Shared view components

pub mod menu;
pub mod modal;
pub mod statusbar;
