use anyhow::{anyhow, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub blob: BlobConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    #[serde(default = "default_max_photo_bytes")]
    pub max_photo_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4), max_photo_bytes: default_max_photo_bytes() }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

/// Which document store backs the office collection.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    #[default]
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    #[serde(default = "default_json_path")]
    pub json_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { backend: StorageBackend::default(), json_path: default_json_path() }
    }
}

/// Which object store holds office photos.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BlobBackend {
    Http,
    #[default]
    Local,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BlobConfig {
    #[serde(default)]
    pub backend: BlobBackend,
    #[serde(default = "default_container")]
    pub container: String,
    /// Base URL of an S3-compatible endpoint, e.g. `http://localhost:9000`.
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default = "default_local_root")]
    pub local_root: String,
    /// Prefix used to build photo URLs for the local backend.
    #[serde(default)]
    pub public_base_url: String,
}

impl Default for BlobConfig {
    fn default() -> Self {
        Self {
            backend: BlobBackend::default(),
            container: default_container(),
            endpoint: String::new(),
            access_token: None,
            local_root: default_local_root(),
            public_base_url: String::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingConfig {
    #[serde(default)]
    pub json: bool,
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_acquire_timeout() -> u64 { 30 }
fn default_max_photo_bytes() -> usize { 10 * 1024 * 1024 }
fn default_json_path() -> String { "data/offices.json".into() }
fn default_container() -> String { "offices".into() }
fn default_local_root() -> String { "data/blobs".into() }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Config file if present, otherwise defaults filled from the environment.
    pub fn load_or_env() -> Result<Self> {
        let mut cfg = load_default().unwrap_or_else(|_| Self::from_env());
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Build a configuration from environment variables only.
    pub fn from_env() -> Self {
        let env = |k: &str| std::env::var(k).ok().filter(|v| !v.trim().is_empty());
        let mut cfg = AppConfig::default();
        if let Some(host) = env("SERVER_HOST") {
            cfg.server.host = host;
        }
        if let Some(port) = env("SERVER_PORT").and_then(|p| p.parse::<u16>().ok()) {
            cfg.server.port = port;
        }
        if let Some(url) = env("DATABASE_URL") {
            cfg.database.url = url;
        }
        if let Some(backend) = env("OFFICES_STORAGE_BACKEND") {
            cfg.storage.backend = if backend.eq_ignore_ascii_case("postgres") { StorageBackend::Postgres } else { StorageBackend::Json };
        }
        if let Some(path) = env("OFFICES_JSON_PATH") {
            cfg.storage.json_path = path;
        }
        if let Some(backend) = env("BLOB_BACKEND") {
            cfg.blob.backend = if backend.eq_ignore_ascii_case("http") { BlobBackend::Http } else { BlobBackend::Local };
        }
        if let Some(endpoint) = env("BLOB_ENDPOINT") {
            cfg.blob.endpoint = endpoint;
        }
        if let Some(container) = env("BLOB_CONTAINER") {
            cfg.blob.container = container;
        }
        cfg.blob.access_token = env("BLOB_ACCESS_TOKEN");
        cfg.logging.json = env("LOG_JSON").map(|v| v == "1" || v.eq_ignore_ascii_case("true")).unwrap_or(false);
        cfg
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.database.normalize_from_env();
        if self.storage.backend == StorageBackend::Postgres {
            self.database.validate()?;
        }
        self.storage.validate()?;
        self.blob.normalize(&self.server)?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        if self.worker_threads.map_or(true, |w| w == 0) {
            self.worker_threads = Some(4);
        }
        if self.max_photo_bytes == 0 {
            self.max_photo_bytes = default_max_photo_bytes();
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn normalize_from_env(&mut self) {
        if self.url.trim().is_empty() {
            if let Ok(url) = std::env::var("DATABASE_URL") {
                self.url = url;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml or DATABASE_URL"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://")) {
            return Err(anyhow!("database.url must start with postgresql:// or postgres://"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }
}

impl StorageConfig {
    fn validate(&self) -> Result<()> {
        if self.backend == StorageBackend::Json && self.json_path.trim().is_empty() {
            return Err(anyhow!("storage.json_path is required for the json backend"));
        }
        Ok(())
    }
}

impl BlobConfig {
    fn normalize(&mut self, server: &ServerConfig) -> Result<()> {
        if self.container.trim().is_empty() {
            return Err(anyhow!("blob.container must not be empty"));
        }
        self.endpoint = self.endpoint.trim_end_matches('/').to_string();
        self.public_base_url = self.public_base_url.trim_end_matches('/').to_string();
        match self.backend {
            BlobBackend::Http => {
                let lower = self.endpoint.to_lowercase();
                if !(lower.starts_with("http://") || lower.starts_with("https://")) {
                    return Err(anyhow!("blob.endpoint must start with http(s) for the http backend"));
                }
            }
            BlobBackend::Local => {
                if self.local_root.trim().is_empty() {
                    return Err(anyhow!("blob.local_root must not be empty for the local backend"));
                }
                if self.public_base_url.is_empty() {
                    self.public_base_url = format!("http://{}:{}/photos", server.host, server.port);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() -> Result<()> {
        let mut cfg = parse(
            r#"
            [server]
            host = "0.0.0.0"
            port = 9090
            max_photo_bytes = 1024

            [database]
            url = "postgres://u:p@localhost:5432/offices"

            [storage]
            backend = "postgres"

            [blob]
            backend = "http"
            container = "office-photos"
            endpoint = "http://localhost:9000/"

            [logging]
            json = true
            "#,
        )?;
        cfg.normalize_and_validate()?;
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.server.max_photo_bytes, 1024);
        assert_eq!(cfg.storage.backend, StorageBackend::Postgres);
        assert_eq!(cfg.blob.backend, BlobBackend::Http);
        assert_eq!(cfg.blob.endpoint, "http://localhost:9000");
        assert!(cfg.logging.json);
        Ok(())
    }

    #[test]
    fn defaults_use_json_store_and_local_blobs() -> Result<()> {
        let mut cfg = parse("")?;
        cfg.normalize_and_validate()?;
        assert_eq!(cfg.storage.backend, StorageBackend::Json);
        assert_eq!(cfg.storage.json_path, "data/offices.json");
        assert_eq!(cfg.blob.backend, BlobBackend::Local);
        assert_eq!(cfg.blob.public_base_url, "http://127.0.0.1:8080/photos");
        assert_eq!(cfg.server.max_photo_bytes, 10 * 1024 * 1024);
        Ok(())
    }

    #[test]
    fn http_backend_requires_endpoint() -> Result<()> {
        let mut cfg = parse("[blob]\nbackend = \"http\"\n")?;
        assert!(cfg.normalize_and_validate().is_err());
        Ok(())
    }

    #[test]
    fn rejects_non_postgres_url() -> Result<()> {
        let mut cfg = parse("[storage]\nbackend = \"postgres\"\n[database]\nurl = \"mysql://x\"\n")?;
        assert!(cfg.normalize_and_validate().is_err());
        Ok(())
    }
}
