//! Local storage backends

mod preference_store;
mod record_service;

pub use preference_store::JsonPreferenceStore;
pub use record_service::{default_data_dir, JsonRecordService};
