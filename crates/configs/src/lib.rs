use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// `port` stays `None` until normalization fills in the service default.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ServerConfig {
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    Document,
}

impl std::str::FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "document" => Ok(Self::Document),
            other => Err(anyhow!("unknown store backend `{other}`, expected memory or document")),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: Option<StoreBackend>,
    #[serde(default)]
    pub seed_path: String,
    #[serde(default)]
    pub collection: String,
}

/// Document-store connection settings. The URL is composed from the parts,
/// see [`DatabaseConfig::url`].
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

fn default_max_connections() -> u32 {
    10
}

fn default_connect_timeout() -> u64 {
    30
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            service: None,
            username: None,
            password: None,
            name: String::new(),
            max_connections: default_max_connections(),
            connect_timeout_secs: default_connect_timeout(),
            sqlx_logging: false,
        }
    }
}

/// Per-service fallbacks applied before validation.
#[derive(Debug, Clone)]
pub struct Defaults {
    pub port: u16,
    pub backend: StoreBackend,
    pub seed_path: &'static str,
    pub collection: &'static str,
}

pub fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn load_default() -> Result<AppConfig> {
    load_from_file(&config_path())
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)
        .map_err(|e| anyhow!("cannot parse config file {path}: {e}"))?;
    Ok(cfg)
}

/// Like [`load_from_file`], but a missing file yields `None`. Any other read
/// or parse failure is returned.
pub fn load_optional(path: &str) -> Result<Option<AppConfig>> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let cfg: AppConfig = toml::from_str(&content)
                .map_err(|e| anyhow!("cannot parse config file {path}: {e}"))?;
            Ok(Some(cfg))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(anyhow!("cannot read config file {path}: {e}")),
    }
}

impl AppConfig {
    /// Load `config.toml` (or `CONFIG_PATH`) when present, otherwise start from
    /// the service defaults; then apply environment overrides and validate.
    pub fn load_and_validate(defaults: &Defaults) -> Result<Self> {
        Self::load_and_validate_from(&config_path(), defaults)
    }

    pub fn load_and_validate_from(path: &str, defaults: &Defaults) -> Result<Self> {
        let mut cfg = load_optional(path)?.unwrap_or_default();
        cfg.apply_env();
        cfg.normalize_and_validate(defaults)?;
        Ok(cfg)
    }

    pub fn apply_env(&mut self) {
        if let Ok(host) = std::env::var("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            self.server.port = Some(port);
        }
        if let Some(w) = std::env::var("TOKIO_WORKER_THREADS")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
        {
            self.server.worker_threads = Some(w);
        }
        if let Some(backend) = std::env::var("STORE_BACKEND").ok().and_then(|v| v.parse().ok()) {
            self.store.backend = Some(backend);
        }
        if let Ok(seed) = std::env::var("SEED_PATH") {
            self.store.seed_path = seed;
        }
        self.database.normalize_from_env();
    }

    pub fn normalize_and_validate(&mut self, defaults: &Defaults) -> Result<()> {
        self.server.normalize(defaults)?;
        self.store.normalize(defaults);
        if self.database.name.trim().is_empty() {
            self.database.name = defaults.collection.to_string();
        }
        if self.store.backend == Some(StoreBackend::Document) {
            self.database.validate()?;
        }
        Ok(())
    }

    pub fn backend(&self) -> StoreBackend {
        self.store.backend.unwrap_or_default()
    }
}

impl ServerConfig {
    fn normalize(&mut self, defaults: &Defaults) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        match self.port {
            None => self.port = Some(defaults.port),
            Some(0) => return Err(anyhow!("server.port must be within 1..=65535")),
            Some(_) => {}
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }
}

impl StoreConfig {
    fn normalize(&mut self, defaults: &Defaults) {
        if self.backend.is_none() {
            self.backend = Some(defaults.backend);
        }
        if self.seed_path.trim().is_empty() {
            self.seed_path = defaults.seed_path.to_string();
        }
        if self.collection.trim().is_empty() {
            self.collection = defaults.collection.to_string();
        }
    }
}

impl DatabaseConfig {
    pub fn normalize_from_env(&mut self) {
        let var = |k: &str| std::env::var(k).ok().filter(|v| !v.trim().is_empty());
        if let Some(service) = var("DOCSTORE_SERVICE") {
            self.service = Some(service);
        }
        if let Some(user) = var("DOCSTORE_USERNAME") {
            self.username = Some(user);
        }
        if let Some(pass) = var("DOCSTORE_PASSWORD") {
            self.password = Some(pass);
        }
        if let Some(name) = var("DOCSTORE_DATABASE") {
            self.name = name;
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.url()?;
        if self.max_connections == 0 {
            return Err(anyhow!("database.max_connections must be >= 1"));
        }
        if self.connect_timeout_secs == 0 {
            return Err(anyhow!(
                "database.connect_timeout_secs must be a positive number of seconds"
            ));
        }
        Ok(())
    }

    /// Connection string for the document store; fails when no service address is set.
    pub fn url(&self) -> Result<String> {
        common::env::compose_store_url(
            self.service.as_deref(),
            self.username.as_deref(),
            self.password.as_deref(),
            &self.name,
        )
        .map_err(|e| anyhow!("document store not configured: {e}"))
    }
}
