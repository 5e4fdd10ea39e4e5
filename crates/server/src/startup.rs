use std::{net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};

use configs::{AppConfig, StoreBackend};
use models::db::{self, DatabaseConfig};
use service::{
    records::{EntityProfile, RecordService},
    runtime, seed,
    storage::{DocumentRecordStore, MemoryRecordStore, RecordStore},
};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes::{self, AppState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    let port = cfg
        .server
        .port
        .ok_or_else(|| StartupError::InvalidConfig("server.port is not set".into()))?;
    format!("{}:{}", cfg.server.host, port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bad bind address: {e}")))
}

async fn open_store(cfg: &AppConfig) -> Result<Arc<dyn RecordStore>, StartupError> {
    match cfg.backend() {
        StoreBackend::Memory => Ok(Arc::new(MemoryRecordStore::new())),
        StoreBackend::Document => {
            let url = cfg
                .database
                .url()
                .map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
            let db_cfg = DatabaseConfig {
                url,
                max_connections: cfg.database.max_connections,
                connect_timeout: Duration::from_secs(cfg.database.connect_timeout_secs),
                sqlx_logging: cfg.database.sqlx_logging,
            };
            let conn = db::connect_and_migrate(&db_cfg)
                .await
                .map_err(|e| StartupError::Store(e.to_string()))?;
            info!(
                service = ?cfg.database.service,
                collection = %cfg.store.collection,
                "connected to document store"
            );
            Ok(Arc::new(DocumentRecordStore::new(conn, cfg.store.collection.clone())))
        }
    }
}

/// Build the application state: open the configured store and seed it.
pub async fn init(cfg: &AppConfig, profile: EntityProfile) -> Result<AppState, StartupError> {
    let seed_path = PathBuf::from(&cfg.store.seed_path);
    runtime::ensure_seed(&seed_path)
        .await
        .map_err(|e| StartupError::Runtime(e.to_string()))?;

    let store = open_store(cfg).await?;
    seed::seed_store(store.as_ref(), &seed_path)
        .await
        .map_err(|e| StartupError::Seed(e.to_string()))?;

    Ok(AppState::new(RecordService::new(store, profile)))
}

/// Initialize, bind and serve until Ctrl+C.
pub async fn serve(cfg: AppConfig, profile: EntityProfile) -> Result<(), StartupError> {
    let entity = profile.name;
    let state = init(&cfg, profile).await?;
    let app = routes::build_router(state, build_cors());

    let addr = bind_addr(&cfg)?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| StartupError::Runtime(format!("cannot bind {addr}: {e}")))?;
    info!(%addr, entity, backend = ?cfg.backend(), "serving records");
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!(event = "shutdown_signal", "received Ctrl+C, shutting down");
        })
        .await
        .map_err(|e| StartupError::Runtime(e.to_string()))
}

