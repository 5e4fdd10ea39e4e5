//! Runtime environment helpers
//!
//! Thin wrapper around `common::env` so binary crates validate startup
//! prerequisites through `service::runtime` without depending on `common`.

use std::path::Path;

use crate::errors::ServiceError;

/// Fail early when the seed file is missing.
pub async fn ensure_seed(seed_path: &Path) -> Result<(), ServiceError> {
    common::env::ensure_seed_file(seed_path)
        .await
        .map_err(|e| ServiceError::Seed(e.to_string()))
}
