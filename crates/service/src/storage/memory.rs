use async_trait::async_trait;
use models::record::{Record, RecordRef, StoredRecord};
use tokio::sync::RwLock;

use super::{keyed, RecordStore};
use crate::errors::ServiceError;

/// Process-local record store.
///
/// Records are kept in insertion order. Mutations hold the write lock for
/// their whole check-and-apply, so concurrent creates with the same `id`
/// cannot both succeed.
#[derive(Default)]
pub struct MemoryRecordStore {
    inner: RwLock<Vec<StoredRecord>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<Record>) -> Result<Self, ServiceError> {
        Ok(Self { inner: RwLock::new(stored(keyed(records)?)) })
    }
}

fn stored(records: Vec<(i64, Record)>) -> Vec<StoredRecord> {
    records
        .into_iter()
        .map(|(key, record)| StoredRecord { key, reference: RecordRef::generate(), record })
        .collect()
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn get_all(&self) -> Result<Vec<StoredRecord>, ServiceError> {
        Ok(self.inner.read().await.clone())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<StoredRecord>, ServiceError> {
        let items = self.inner.read().await;
        Ok(items.iter().find(|s| s.key == id).cloned())
    }

    async fn exists(&self, id: i64) -> Result<bool, ServiceError> {
        Ok(self.inner.read().await.iter().any(|s| s.key == id))
    }

    async fn insert(&self, record: Record) -> Result<RecordRef, ServiceError> {
        let key = record.require_id()?;
        let mut items = self.inner.write().await;
        if items.iter().any(|s| s.key == key) {
            return Err(ServiceError::Conflict(key));
        }
        let reference = RecordRef::generate();
        items.push(StoredRecord { key, reference, record });
        Ok(reference)
    }

    async fn replace(&self, id: i64, record: Record) -> Result<bool, ServiceError> {
        let mut items = self.inner.write().await;
        match items.iter_mut().find(|s| s.key == id) {
            Some(slot) => {
                slot.record = record;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: i64) -> Result<bool, ServiceError> {
        let mut items = self.inner.write().await;
        let before = items.len();
        items.retain(|s| s.key != id);
        Ok(items.len() != before)
    }

    async fn count(&self) -> Result<u64, ServiceError> {
        Ok(self.inner.read().await.len() as u64)
    }

    async fn reset(&self, records: Vec<Record>) -> Result<(), ServiceError> {
        let fresh = stored(keyed(records)?);
        *self.inner.write().await = fresh;
        Ok(())
    }
}
