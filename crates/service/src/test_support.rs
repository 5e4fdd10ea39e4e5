#![cfg(test)]
use models::db::{connect_and_migrate, DatabaseConfig, DATABASE_URL};
use models::record::Record;
use serde_json::Value;
use uuid::Uuid;

use crate::storage::DocumentRecordStore;

/// Build records from a JSON array literal.
pub fn records(v: Value) -> Vec<Record> {
    match v {
        Value::Array(items) => items
            .into_iter()
            .map(|i| Record::from_value(i).expect("record object"))
            .collect(),
        other => panic!("expected array, got {other}"),
    }
}

/// Document store on an isolated collection, or `None` when no database is configured.
pub async fn document_store() -> Option<DocumentRecordStore> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return None;
    }
    let url = DATABASE_URL.clone()?;
    match connect_and_migrate(&DatabaseConfig::new(url)).await {
        Ok(db) => Some(DocumentRecordStore::new(db, format!("test_{}", Uuid::new_v4().simple()))),
        Err(e) => {
            eprintln!("skip: cannot connect to db: {}", e);
            None
        }
    }
}

/// Write `contents` to a fresh temp file and return its path.
pub async fn temp_seed(contents: &str) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(format!("seed_{}.json", Uuid::new_v4()));
    tokio::fs::write(&path, contents).await.expect("write seed");
    path
}
