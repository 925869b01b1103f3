//! Shared collaborator context for a screen

use std::sync::Arc;

use crate::editor::EditorSpec;
use crate::error::CoreError;
use crate::traits::{PreferenceStore, RecordService};

/// Everything a screen driver needs to run one list/edit view pair.
///
/// The shell creates this once per screen and injects its platform
/// storage and transport implementations.
pub struct ScreenContext {
    /// Record persistence for the screen's root entity.
    pub record_service: Arc<dyn RecordService>,
    /// Cross-session UI preferences.
    pub preference_store: Arc<dyn PreferenceStore>,
    /// The edit view this screen hosts.
    pub spec: EditorSpec,
}

impl ScreenContext {
    #[must_use]
    pub fn new(
        record_service: Arc<dyn RecordService>,
        preference_store: Arc<dyn PreferenceStore>,
        spec: EditorSpec,
    ) -> Self {
        Self {
            record_service,
            preference_store,
            spec,
        }
    }

    /// Log a failed collaborator call at the severity its classification
    /// warrants.
    pub fn log_failure(operation: &str, err: &CoreError) {
        if err.is_expected() {
            log::warn!("{operation}: {err}");
        } else {
            log::error!("{operation}: {err}");
        }
    }
}
