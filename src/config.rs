use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::auth::MAX_TOKEN_LIFETIME_MINUTES;

pub const ENV_CONNECTION_STRING: &str = "WATCHALL_CONNECTION_STRING";
pub const ENV_DATABASE: &str = "WATCHALL_DATABASE";
pub const ENV_JWT_SECRET: &str = "WATCHALL_JWT_SECRET";
pub const ENV_PORT: &str = "WATCHALL_PORT";

const DEV_SIGNING_KEY: &str = "watchall-development-signing-key-change-me";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub database: DatabaseConfig,

    pub auth: AuthConfig,

    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: String,

    /// "pretty" or "json"
    pub log_format: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            worker_threads: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,

    /// Empty or containing "*" allows any origin.
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            cors_allowed_origins: vec!["*".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `mongodb://`, `mongodb+srv://` or `sqlite:` URL.
    pub connection_string: String,

    /// Database name. Only used by MongoDB.
    pub database: String,

    /// SQLite pool bounds.
    pub max_connections: u32,

    pub min_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            connection_string: "mongodb://localhost:27017".to_string(),
            database: "watchall".to_string(),
            max_connections: 5,
            min_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub issuer: String,

    /// Shared HS256 secret.
    pub signing_key: String,

    /// Lifetime of tokens minted by `watchall token`.
    pub token_lifetime_minutes: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            issuer: "https://identity.watch-all.com/".to_string(),
            signing_key: DEV_SIGNING_KEY.to_string(),
            token_lifetime_minutes: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: true,
        }
    }
}

impl Config {
    /// Loads the first config file found and applies environment overrides.
    /// First existing file on the search path, if any.
    #[must_use]
    pub fn locate() -> Option<PathBuf> {
        Self::config_paths().into_iter().find(|path| path.exists())
    }

    /// Reads the located file (or defaults) and applies env overrides.
    /// Runs before tracing is set up, so it does not log.
    pub fn load() -> Result<Self> {
        let mut config = match Self::locate() {
            Some(path) => Self::load_from_path(&path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Applies `WATCHALL_*` overrides. Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(value) = get(ENV_CONNECTION_STRING) {
            self.database.connection_string = value;
        }
        if let Some(value) = get(ENV_DATABASE) {
            self.database.database = value;
        }
        if let Some(value) = get(ENV_JWT_SECRET) {
            self.auth.signing_key = value;
        }
        if let Some(value) = get(ENV_PORT) {
            self.server.port = value
                .trim()
                .parse()
                .with_context(|| format!("{ENV_PORT} is not a valid port: {value}"))?;
        }

        Ok(())
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        paths.push(PathBuf::from("config.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("watchall").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".watchall").join("config.toml"));
        }

        paths
    }

    #[must_use]
    pub fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.database.connection_string.trim().is_empty() {
            anyhow::bail!("database.connection_string cannot be empty");
        }

        if self.database.connection_string.starts_with("mongodb")
            && self.database.database.trim().is_empty()
        {
            anyhow::bail!("database.database is required for MongoDB");
        }

        if self.database.max_connections == 0
            || self.database.min_connections > self.database.max_connections
        {
            anyhow::bail!(
                "database pool bounds are invalid ({}-{})",
                self.database.min_connections,
                self.database.max_connections
            );
        }

        if self.auth.issuer.trim().is_empty() {
            anyhow::bail!("auth.issuer cannot be empty");
        }

        if self.auth.signing_key.is_empty() {
            anyhow::bail!("auth.signing_key cannot be empty");
        }

        if !(1..=MAX_TOKEN_LIFETIME_MINUTES).contains(&self.auth.token_lifetime_minutes) {
            anyhow::bail!(
                "auth.token_lifetime_minutes must be between 1 and {MAX_TOKEN_LIFETIME_MINUTES}, got {}",
                self.auth.token_lifetime_minutes
            );
        }

        if !matches!(self.general.log_format.as_str(), "pretty" | "json") {
            anyhow::bail!(
                "general.log_format must be \"pretty\" or \"json\", got \"{}\"",
                self.general.log_format
            );
        }

        Ok(())
    }

    #[must_use]
    pub fn uses_development_signing_key(&self) -> bool {
        self.auth.signing_key == DEV_SIGNING_KEY
    }
}
