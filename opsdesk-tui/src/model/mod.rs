//! Application state model

pub mod app;
pub mod fields;
pub mod focus;
pub mod geometry;
pub mod invoices;

pub use app::{App, ConfirmState, TWO_COLUMN_MIN_WIDTH};
pub use fields::{FieldDef, FieldKind};
pub use focus::FocusPanel;
pub use geometry::{FormRow, RowPlan, EDITOR_HEADER_ROWS};
pub use invoices::InvoicesState;
