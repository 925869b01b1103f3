//! OpsDesk Core Library
//!
//! Headless orchestration for the OpsDesk admin client's record screens,
//! including:
//! - Dirty-state guarding of destructive navigation
//! - Section list / scroll synchronization for long edit views
//! - Edit view lifecycle (create, update, delete, nested editors)
//! - Speed-dial action menus with optional confirmation
//!
//! This library is platform-independent; rendering shells inject their
//! storage and transport through traits and drive the state machines here
//! from their own event loops.

pub mod context;
pub mod editor;
pub mod error;
pub mod form;
pub mod guard;
pub mod menu;
pub mod route;
pub mod schedule;
pub mod sections;
pub mod timing;
pub mod traits;
pub mod types;

// Re-export common types
pub use context::ScreenContext;
pub use editor::{EditorSpec, EditorState, PendingOperation, SubmitAction};
pub use error::{CoreError, CoreResult, ValidationFailure};
pub use form::FormState;
pub use guard::{guard_action, ConfirmRequest, GuardDecision, GuardPrompt};
pub use menu::{ActionItem, ActionMenu, MenuBehaviour, MenuDispatch};
pub use route::{take_expand_tab, History, Route};
pub use schedule::{DeferredTask, TimerKey};
pub use sections::{ScrollMetrics, ScrollSpy, SectionBounds, SectionList, SelectEffects};
pub use timing::{TimingEvent, TimingMarks};
pub use traits::{MemoryPreferenceStore, PreferenceStore, RecordService};
pub use types::{record_id, record_name, LayoutMode, Record, Section, SelectionState, NEW_RECORD_ID};
