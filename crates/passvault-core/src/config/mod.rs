//! Configuration management with file persistence
//!
//! Settings live in `config.toml` under the config directory. The vault
//! secret is the exception: it is resolved from the environment and never
//! read from or written to the file.

use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::security::{DEFAULT_ISSUER, DEFAULT_TOKEN_TTL_SECS, MAX_TOKEN_TTL_SECS};
use crate::storage::database::DEFAULT_MAX_CONNECTIONS;
use crate::storage::DatabaseConfig;

/// Environment variables holding the vault secret, in lookup order
pub const SECRET_ENV_VARS: [&str; 2] = ["PASSVAULT_SECRET", "SECRET"];

/// Default listen address for the HTTP server
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3000";

/// Passvault configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: StorageConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub listen_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub path: PathBuf,
    pub max_connections: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: Config::default_database_path(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Programmatic override of the environment secret
    #[serde(skip)]
    pub secret: Option<String>,
    pub issuer: String,
    pub token_ttl_secs: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: None,
            issuer: DEFAULT_ISSUER.to_string(),
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &self.secret.as_ref().map(|_| "[REDACTED]"))
            .field("issuer", &self.issuer)
            .field("token_ttl_secs", &self.token_ttl_secs)
            .finish()
    }
}

impl AuthConfig {
    /// The secret seeding both the field cipher and token signing
    pub fn resolved_secret(&self) -> anyhow::Result<String> {
        let secret = match &self.secret {
            Some(secret) => Some(secret.clone()),
            None => SECRET_ENV_VARS
                .iter()
                .find_map(|name| env::var(name).ok())
                .filter(|s| !s.is_empty()),
        };

        match secret {
            Some(secret) if !secret.is_empty() => Ok(secret),
            _ => Err(anyhow!(
                "No vault secret configured. Set the PASSVAULT_SECRET (or SECRET) environment variable."
            )),
        }
    }

    pub fn token_ttl(&self) -> anyhow::Result<chrono::Duration> {
        chrono::Duration::try_seconds(self.token_ttl_secs)
            .ok_or_else(|| anyhow!("auth.token_ttl_secs is out of range: {}", self.token_ttl_secs))
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        let dir = if let Ok(custom_dir) = env::var("PASSVAULT_CONFIG_DIR") {
            PathBuf::from(custom_dir)
        } else {
            dirs::config_dir()
                .ok_or_else(|| anyhow!("Could not determine config directory"))?
                .join("passvault")
        };
        Ok(dir)
    }

    /// `passvault.db` next to `config.toml`
    pub fn default_database_path() -> PathBuf {
        Self::config_dir()
            .map(|dir| dir.join("passvault.db"))
            .unwrap_or_else(|_| PathBuf::from("passvault.db"))
    }

    /// Get the config file path
    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from the default path, or defaults if absent
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`, or defaults if it doesn't exist
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default path
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to `path`. The secret is never written.
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        self.validate()?;

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.listen_addr.trim().is_empty() {
            return Err(anyhow!("server.listen_addr must not be empty"));
        }
        if self.database.max_connections == 0 {
            return Err(anyhow!("database.max_connections must be at least 1"));
        }
        if self.auth.issuer.trim().is_empty() {
            return Err(anyhow!("auth.issuer must not be empty"));
        }
        if self.auth.token_ttl_secs <= 0 {
            return Err(anyhow!("auth.token_ttl_secs must be positive"));
        }
        if self.auth.token_ttl_secs > MAX_TOKEN_TTL_SECS {
            return Err(anyhow!(
                "auth.token_ttl_secs must not exceed {} (ten years)",
                MAX_TOKEN_TTL_SECS
            ));
        }
        Ok(())
    }

    /// Database settings for opening the pool
    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig::with_path(&self.database.path).max_connections(self.database.max_connections)
    }

    /// Get a configuration value by key
    pub fn get(&self, key: &str) -> anyhow::Result<String> {
        match key {
            "server.listen_addr" => Ok(self.server.listen_addr.clone()),
            "database.path" => Ok(self.database.path.display().to_string()),
            "database.max_connections" => Ok(self.database.max_connections.to_string()),
            "auth.issuer" => Ok(self.auth.issuer.clone()),
            "auth.token_ttl_secs" => Ok(self.auth.token_ttl_secs.to_string()),
            "auth.secret" | "secret" => Ok(match self.auth.resolved_secret() {
                Ok(_) => "(set)".to_string(),
                Err(_) => "(not set - use PASSVAULT_SECRET or SECRET env var)".to_string(),
            }),
            _ => Err(anyhow!("Unknown configuration key: {}", key)),
        }
    }

    /// Set a configuration value by key
    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "server.listen_addr" => {
                self.server.listen_addr = value.to_string();
            }
            "database.path" => {
                self.database.path = PathBuf::from(value);
            }
            "database.max_connections" => {
                self.database.max_connections = value
                    .parse()
                    .with_context(|| format!("Invalid max_connections value: {}", value))?;
            }
            "auth.issuer" => {
                self.auth.issuer = value.to_string();
            }
            "auth.token_ttl_secs" => {
                self.auth.token_ttl_secs = value
                    .parse()
                    .with_context(|| format!("Invalid token_ttl_secs value: {}", value))?;
            }
            "auth.secret" | "secret" => {
                return Err(anyhow!(
                    "The vault secret cannot be stored in configuration. \
                     Set the PASSVAULT_SECRET environment variable instead."
                ));
            }
            _ => return Err(anyhow!("Unknown configuration key: {}", key)),
        }
        self.validate()
    }

    /// List all configuration keys and their values
    pub fn list(&self) -> anyhow::Result<Vec<(String, String)>> {
        [
            "server.listen_addr",
            "database.path",
            "database.max_connections",
            "auth.issuer",
            "auth.token_ttl_secs",
            "auth.secret",
        ]
        .into_iter()
        .map(|key| Ok((key.to_string(), self.get(key)?)))
        .collect()
    }

    /// Remove the config file so defaults apply again
    pub fn reset() -> anyhow::Result<()> {
        let path = Self::config_path()?;
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove config file: {}", path.display()))?;
        }
        Ok(())
    }
}
