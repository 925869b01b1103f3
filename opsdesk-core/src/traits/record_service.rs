//! Record persistence abstract Trait

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::Record;

/// CRUD boundary to the backing record store.
///
/// Records cross this boundary as schemaless JSON documents. Failures
/// surface as [`CoreError`](crate::CoreError), with rejected submissions
/// carrying a structured per-field error map
/// ([`CoreError::Validation`](crate::CoreError::Validation)).
#[async_trait]
pub trait RecordService: Send + Sync {
    /// Persist a new record, returning the stored document (with its
    /// assigned id and audit attributes).
    async fn create(&self, record: &Record) -> CoreResult<Record>;

    /// Replace the record at `id`, returning the stored document.
    async fn update(&self, id: &str, record: &Record) -> CoreResult<Record>;

    /// Remove the record at `id`.
    async fn delete(&self, id: &str) -> CoreResult<()>;

    /// Fetch the record at `id`.
    async fn fetch(&self, id: &str) -> CoreResult<Record>;
}
