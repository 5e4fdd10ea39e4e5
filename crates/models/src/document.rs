use chrono::Utc;
use sea_orm::{
    entity::prelude::*, sea_query::Expr, ActiveModelTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "record_document")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub ref_id: Uuid,
    pub collection: String,
    pub record_id: i64,
    pub body: Json,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

fn in_collection(collection: &str) -> sea_orm::Select<Entity> {
    Entity::find().filter(Column::Collection.eq(collection))
}

fn new_document(ref_id: Uuid, collection: &str, record_id: i64, body: Json) -> ActiveModel {
    ActiveModel {
        ref_id: Set(ref_id),
        collection: Set(collection.to_string()),
        record_id: Set(record_id),
        body: Set(body),
        created_at: Set(Utc::now().into()),
    }
}

pub async fn list(db: &DatabaseConnection, collection: &str) -> Result<Vec<Model>, ModelError> {
    Ok(in_collection(collection)
        .order_by_asc(Column::CreatedAt)
        .order_by_asc(Column::RecordId)
        .all(db)
        .await?)
}

pub async fn find(
    db: &DatabaseConnection,
    collection: &str,
    record_id: i64,
) -> Result<Option<Model>, ModelError> {
    Ok(in_collection(collection)
        .filter(Column::RecordId.eq(record_id))
        .one(db)
        .await?)
}

pub async fn count(db: &DatabaseConnection, collection: &str) -> Result<u64, ModelError> {
    Ok(in_collection(collection).count(db).await?)
}

pub async fn exists(
    db: &DatabaseConnection,
    collection: &str,
    record_id: i64,
) -> Result<bool, ModelError> {
    let n = in_collection(collection)
        .filter(Column::RecordId.eq(record_id))
        .count(db)
        .await?;
    Ok(n > 0)
}

/// Insert one document. A second document with the same `record_id` in the
/// collection is rejected by the unique index and surfaces as `Conflict`.
pub async fn create(
    db: &DatabaseConnection,
    collection: &str,
    record_id: i64,
    body: Json,
) -> Result<Model, ModelError> {
    if collection.trim().is_empty() {
        return Err(ModelError::Validation("collection required".into()));
    }
    Ok(new_document(Uuid::new_v4(), collection, record_id, body).insert(db).await?)
}

/// Overwrite the body stored under `record_id`; returns whether a row matched.
pub async fn replace_body(
    db: &DatabaseConnection,
    collection: &str,
    record_id: i64,
    body: Json,
) -> Result<bool, ModelError> {
    let res = Entity::update_many()
        .col_expr(Column::Body, Expr::value(body))
        .filter(Column::Collection.eq(collection))
        .filter(Column::RecordId.eq(record_id))
        .exec(db)
        .await?;
    Ok(res.rows_affected > 0)
}

pub async fn delete(
    db: &DatabaseConnection,
    collection: &str,
    record_id: i64,
) -> Result<bool, ModelError> {
    let res = Entity::delete_many()
        .filter(Column::Collection.eq(collection))
        .filter(Column::RecordId.eq(record_id))
        .exec(db)
        .await?;
    Ok(res.rows_affected > 0)
}

/// Drop every document of the collection and bulk-insert `documents` in one
/// transaction. Returns the refs assigned to the inserted documents, in order.
pub async fn reset(
    db: &DatabaseConnection,
    collection: &str,
    documents: Vec<(i64, Json)>,
) -> Result<Vec<Uuid>, ModelError> {
    let txn = db.begin().await?;
    Entity::delete_many()
        .filter(Column::Collection.eq(collection))
        .exec(&txn)
        .await?;

    let refs: Vec<Uuid> = documents.iter().map(|_| Uuid::new_v4()).collect();
    let models: Vec<ActiveModel> = documents
        .into_iter()
        .zip(&refs)
        .map(|((record_id, body), ref_id)| new_document(*ref_id, collection, record_id, body))
        .collect();
    // insert_many rejects an empty batch
    if !models.is_empty() {
        Entity::insert_many(models).exec(&txn).await?;
    }
    txn.commit().await?;
    Ok(refs)
}
