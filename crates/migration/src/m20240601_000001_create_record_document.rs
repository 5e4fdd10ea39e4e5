//! Create `record_document` table.
//!
//! Every collection (pictures, songs) shares the table; a record is keyed by
//! `(collection, record_id)` and its body is kept verbatim as JSONB.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RecordDocument::Table)
                    .if_not_exists()
                    .col(uuid(RecordDocument::RefId).primary_key())
                    .col(string_len(RecordDocument::Collection, 64).not_null())
                    .col(big_integer(RecordDocument::RecordId).not_null())
                    .col(json_binary(RecordDocument::Body).not_null())
                    .col(timestamp_with_time_zone(RecordDocument::CreatedAt).not_null())
                    .to_owned(),
            )
            .await?;

        // One record per id within a collection
        manager
            .create_index(
                Index::create()
                    .name("idx_record_document_collection_record_id")
                    .table(RecordDocument::Table)
                    .col(RecordDocument::Collection)
                    .col(RecordDocument::RecordId)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(RecordDocument::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum RecordDocument {
    Table,
    RefId,
    Collection,
    RecordId,
    Body,
    CreatedAt,
}
