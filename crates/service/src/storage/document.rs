use async_trait::async_trait;
use models::{
    document,
    errors::ModelError,
    record::{Record, RecordRef, StoredRecord},
};
use sea_orm::DatabaseConnection;

use super::{keyed, RecordStore};
use crate::errors::ServiceError;

/// Record store over the PostgreSQL document table, scoped to one collection.
///
/// Single-document operations rely on the database for atomicity; the unique
/// `(collection, record_id)` index turns a racing duplicate insert into
/// `Conflict`.
#[derive(Clone)]
pub struct DocumentRecordStore {
    db: DatabaseConnection,
    collection: String,
}

impl DocumentRecordStore {
    pub fn new(db: DatabaseConnection, collection: impl Into<String>) -> Self {
        Self { db, collection: collection.into() }
    }
}

fn into_stored(model: document::Model) -> Result<StoredRecord, ServiceError> {
    Ok(StoredRecord {
        key: model.record_id,
        reference: RecordRef(model.ref_id),
        record: Record::from_value(model.body)?,
    })
}

fn db_err(e: ModelError) -> ServiceError {
    match e {
        ModelError::Db(msg) => ServiceError::Db(msg),
        other => ServiceError::Model(other),
    }
}

#[async_trait]
impl RecordStore for DocumentRecordStore {
    async fn get_all(&self) -> Result<Vec<StoredRecord>, ServiceError> {
        document::list(&self.db, &self.collection)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(into_stored)
            .collect()
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<StoredRecord>, ServiceError> {
        document::find(&self.db, &self.collection, id)
            .await
            .map_err(db_err)?
            .map(into_stored)
            .transpose()
    }

    async fn exists(&self, id: i64) -> Result<bool, ServiceError> {
        document::exists(&self.db, &self.collection, id).await.map_err(db_err)
    }

    async fn insert(&self, record: Record) -> Result<RecordRef, ServiceError> {
        let key = record.require_id()?;
        match document::create(&self.db, &self.collection, key, record.into_value()).await {
            Ok(model) => Ok(RecordRef(model.ref_id)),
            Err(ModelError::Conflict(_)) => Err(ServiceError::Conflict(key)),
            Err(e) => Err(db_err(e)),
        }
    }

    async fn replace(&self, id: i64, record: Record) -> Result<bool, ServiceError> {
        document::replace_body(&self.db, &self.collection, id, record.into_value())
            .await
            .map_err(db_err)
    }

    async fn delete(&self, id: i64) -> Result<bool, ServiceError> {
        document::delete(&self.db, &self.collection, id).await.map_err(db_err)
    }

    async fn count(&self) -> Result<u64, ServiceError> {
        document::count(&self.db, &self.collection).await.map_err(db_err)
    }

    async fn reset(&self, records: Vec<Record>) -> Result<(), ServiceError> {
        let documents = keyed(records)?
            .into_iter()
            .map(|(id, r)| (id, r.into_value()))
            .collect();
        document::reset(&self.db, &self.collection, documents)
            .await
            .map_err(db_err)?;
        Ok(())
    }
}
