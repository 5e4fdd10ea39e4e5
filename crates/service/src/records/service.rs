use std::sync::Arc;

use common::types::Health;
use models::record::{Record, StoredRecord};
use tracing::{debug, info, instrument};

use super::profile::{EntityProfile, UpdatePolicy};
use crate::errors::ServiceError;
use crate::storage::RecordStore;

/// Result of an update that passed validation and found its record.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    Updated(StoredRecord),
    /// The input matched the stored record; nothing was written.
    Unchanged,
}

/// CRUD handler for one collection. The sole writer of its store.
pub struct RecordService {
    store: Arc<dyn RecordStore>,
    profile: EntityProfile,
}

impl RecordService {
    pub fn new(store: Arc<dyn RecordStore>, profile: EntityProfile) -> Self {
        Self { store, profile }
    }

    pub fn profile(&self) -> &EntityProfile {
        &self.profile
    }

    pub fn health(&self) -> Health {
        Health::ok()
    }

    pub async fn count(&self) -> Result<u64, ServiceError> {
        self.store.count().await
    }

    pub async fn list_all(&self) -> Result<Vec<StoredRecord>, ServiceError> {
        self.store.get_all().await
    }

    pub async fn get_by_id(&self, id: i64) -> Result<StoredRecord, ServiceError> {
        self.store
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(self.profile.name))
    }

    /// Insert a record under its own `id`, refusing ids already present.
    #[instrument(skip(self, input), fields(entity = self.profile.name))]
    pub async fn create(&self, input: Record) -> Result<StoredRecord, ServiceError> {
        self.check_required(&input)?;
        let id = input
            .require_id()
            .map_err(|e| ServiceError::Validation(e.to_string()))?;
        if self.store.exists(id).await? {
            return Err(self.duplicate(id));
        }
        let reference = match self.store.insert(input.clone()).await {
            Ok(r) => r,
            // lost a race with a concurrent create of the same id
            Err(ServiceError::Conflict(_)) => return Err(self.duplicate(id)),
            Err(e) => return Err(e),
        };
        info!(id, %reference, "record_created");
        Ok(StoredRecord { key: id, reference, record: input })
    }

    #[instrument(skip(self, input), fields(entity = self.profile.name))]
    pub async fn update(&self, id: i64, input: Record) -> Result<UpdateOutcome, ServiceError> {
        self.check_required(&input)?;
        let stored = self.get_by_id(id).await?;

        let required = self.profile.required_fields;
        if !required.is_empty() && required.iter().all(|f| input.get(f) == stored.record.get(f)) {
            debug!(id, "update_without_changes");
            return Ok(UpdateOutcome::Unchanged);
        }

        let next = match self.profile.update_policy {
            UpdatePolicy::Overwrite => input,
            UpdatePolicy::Merge => {
                let mut merged = stored.record.clone();
                merged.merge(&input);
                merged
            }
        };
        if !self.store.replace(id, next).await? {
            return Err(ServiceError::not_found(self.profile.name));
        }
        let updated = self.get_by_id(id).await?;
        info!(id, "record_updated");
        Ok(UpdateOutcome::Updated(updated))
    }

    #[instrument(skip(self), fields(entity = self.profile.name))]
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        if !self.store.delete(id).await? {
            return Err(ServiceError::not_found(self.profile.name));
        }
        info!(id, "record_deleted");
        Ok(())
    }

    fn check_required(&self, input: &Record) -> Result<(), ServiceError> {
        let required = self.profile.required_fields;
        if required.iter().any(|f| !input.contains(f)) {
            return Err(ServiceError::missing_fields(required));
        }
        Ok(())
    }

    fn duplicate(&self, id: i64) -> ServiceError {
        ServiceError::Duplicate { entity: self.profile.name.to_string(), id }
    }
}
