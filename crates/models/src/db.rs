use std::time::Duration;

use once_cell::sync::Lazy;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

use crate::errors::ModelError;

/// Connection string used by database-backed tests; `None` skips them.
pub static DATABASE_URL: Lazy<Option<String>> = Lazy::new(|| {
    // Load .env if present
    let _ = dotenvy::dotenv();
    std::env::var("DATABASE_URL").ok().filter(|v| !v.trim().is_empty())
});

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connect_timeout: Duration,
    pub sqlx_logging: bool,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            connect_timeout: Duration::from_secs(30),
            sqlx_logging: false,
        }
    }
}

pub async fn connect_with_config(cfg: &DatabaseConfig) -> Result<DatabaseConnection, ModelError> {
    let mut opt = ConnectOptions::new(cfg.url.clone());
    opt.max_connections(cfg.max_connections)
        .min_connections(1)
        .connect_timeout(cfg.connect_timeout)
        .acquire_timeout(cfg.connect_timeout)
        .sqlx_logging(cfg.sqlx_logging);
    Ok(Database::connect(opt).await?)
}

/// Apply pending migrations so the document table exists.
pub async fn migrate(db: &DatabaseConnection) -> Result<(), ModelError> {
    use migration::MigratorTrait;
    migration::Migrator::up(db, None).await?;
    info!(event = "migrations_applied", "document store schema is up to date");
    Ok(())
}

pub async fn connect_and_migrate(cfg: &DatabaseConfig) -> Result<DatabaseConnection, ModelError> {
    let db = connect_with_config(cfg).await?;
    migrate(&db).await?;
    Ok(db)
}
