//! Environment/runtime helpers
//!
//! Sanity checks run at startup and the document-store connection string.

use std::path::Path;

use tracing::warn;

use crate::CoreError;

/// Ensure the seed file is readable before anything is bound.
pub async fn ensure_seed_file(seed_path: &Path) -> Result<(), CoreError> {
    let meta = tokio::fs::metadata(seed_path)
        .await
        .map_err(|e| CoreError::Io(format!("cannot stat {}: {e}", seed_path.display())))?;
    if !meta.is_file() {
        return Err(CoreError::Io(format!("{} is not a file", seed_path.display())));
    }
    if meta.len() == 0 {
        warn!(seed = %seed_path.display(), "seed file is empty");
    }
    Ok(())
}

/// Compose a PostgreSQL connection string for the document store.
///
/// Credentials are only embedded when both username and password are present.
pub fn compose_store_url(
    service: Option<&str>,
    username: Option<&str>,
    password: Option<&str>,
    database: &str,
) -> Result<String, CoreError> {
    let service = service
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| CoreError::MissingVar("DOCSTORE_SERVICE".into()))?;
    let url = match (username.filter(|u| !u.is_empty()), password.filter(|p| !p.is_empty())) {
        (Some(user), Some(pass)) => format!("postgres://{user}:{pass}@{service}/{database}"),
        _ => format!("postgres://{service}/{database}"),
    };
    Ok(url)
}
