//! Results of background tasks
//!
//! Errors cross the channel as `Arc<CoreError>` so messages stay `Clone`
//! without flattening structured validation failures into strings.

use std::sync::Arc;

use opsdesk_core::{CoreError, Record};

/// A finished background task
#[derive(Debug, Clone)]
pub enum Completion {
    /// The invoice list arrived
    InvoicesLoaded(Vec<Record>),
    /// The invoice list could not be loaded
    InvoicesLoadFailed(Arc<CoreError>),

    /// A record fetch for the editor finished
    RecordFetched(Record),
    /// A record fetch for the editor failed
    RecordFetchFailed(Arc<CoreError>),

    /// A create or update round trip succeeded
    Saved(Record),
    /// A create or update round trip failed
    SaveFailed(Arc<CoreError>),

    /// The delete round trip succeeded for this id
    Deleted(String),
    /// The delete round trip failed
    DeleteFailed(Arc<CoreError>),

    /// A duplicate was stored as a new draft
    Duplicated(Record),
    /// The duplicate round trip failed
    DuplicateFailed(Arc<CoreError>),
}
