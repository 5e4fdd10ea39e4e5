//! Seed loading: read the bundled JSON array and install it into a store.

use std::path::Path;

use models::record::Record;
use serde_json::Value;
use tracing::info;

use crate::errors::ServiceError;
use crate::storage::RecordStore;

/// Parse a seed file into records. Every element must be an object with a
/// unique integer `id`.
pub async fn load_seed(path: &Path) -> Result<Vec<Record>, ServiceError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| ServiceError::Seed(format!("cannot read {}: {e}", path.display())))?;
    parse_seed(&bytes).map_err(|e| ServiceError::Seed(format!("{}: {e}", path.display())))
}

fn parse_seed(bytes: &[u8]) -> Result<Vec<Record>, ServiceError> {
    let items: Vec<Value> = serde_json::from_slice(bytes)
        .map_err(|e| ServiceError::Seed(format!("expected a JSON array of records: {e}")))?;
    let records = items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            let record = Record::from_value(item)
                .map_err(|e| ServiceError::Seed(format!("entry {i}: {e}")))?;
            record
                .require_id()
                .map_err(|e| ServiceError::Seed(format!("entry {i}: {e}")))?;
            Ok(record)
        })
        .collect::<Result<Vec<_>, ServiceError>>()?;
    Ok(records)
}

/// Replace the store content with the seed file. Returns the number of records loaded.
pub async fn seed_store(store: &dyn RecordStore, path: &Path) -> Result<usize, ServiceError> {
    let records = load_seed(path).await?;
    let n = records.len();
    store
        .reset(records)
        .await
        .map_err(|e| ServiceError::Seed(format!("cannot install seed {}: {e}", path.display())))?;
    info!(event = "seeded", seed = %path.display(), records = n, "record store seeded");
    Ok(n)
}
