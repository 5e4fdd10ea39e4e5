//! Storage abstractions for the service layer
//!
//! A [`RecordStore`] is a keyed collection of records addressed by their
//! integer `id`. At most one record is held per key. Every mutation either
//! applies fully or leaves the store unchanged.

use async_trait::async_trait;
use models::record::{Record, RecordRef, StoredRecord};

use crate::errors::ServiceError;

pub mod memory;
pub mod document;

pub use document::DocumentRecordStore;
pub use memory::MemoryRecordStore;

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Every record currently held.
    async fn get_all(&self) -> Result<Vec<StoredRecord>, ServiceError>;

    async fn get_by_id(&self, id: i64) -> Result<Option<StoredRecord>, ServiceError>;

    async fn exists(&self, id: i64) -> Result<bool, ServiceError>;

    /// Add a record under its own `id`. Fails with `Conflict` if the key is taken.
    async fn insert(&self, record: Record) -> Result<RecordRef, ServiceError>;

    /// Overwrite the body stored under `id`; the key does not follow the body's `id`.
    async fn replace(&self, id: i64, record: Record) -> Result<bool, ServiceError>;

    /// Returns whether a record was removed.
    async fn delete(&self, id: i64) -> Result<bool, ServiceError>;

    async fn count(&self) -> Result<u64, ServiceError>;

    /// Replace the whole content with `records`.
    async fn reset(&self, records: Vec<Record>) -> Result<(), ServiceError>;
}

/// Reject a batch holding two records with the same `id` or one without an `id`.
pub(crate) fn keyed(records: Vec<Record>) -> Result<Vec<(i64, Record)>, ServiceError> {
    let mut seen = std::collections::HashSet::with_capacity(records.len());
    records
        .into_iter()
        .map(|r| {
            let id = r.require_id()?;
            if !seen.insert(id) {
                return Err(ServiceError::Validation(format!("duplicate id {id} in batch")));
            }
            Ok((id, r))
        })
        .collect()
}
