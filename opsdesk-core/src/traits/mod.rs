//! Collaborator boundary traits

mod preference_store;
mod record_service;

pub use preference_store::{MemoryPreferenceStore, PreferenceStore};
pub use record_service::RecordService;
