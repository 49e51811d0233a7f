//! Configuration infrastructure
//!
//! Configuration is layered, later sources overriding earlier ones:
//! 1. Built-in defaults
//! 2. Optional configuration file (`config/default.{toml,json,yaml}` or an explicit path)
//! 3. Environment variables prefixed with `SHOPCART__` (e.g. `SHOPCART__SERVER__PORT=8080`)

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

pub const ENV_PREFIX: &str = "SHOPCART";
pub const DEFAULT_CONFIG_FILE: &str = "config/default";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config: {source}")]
    Load {
        #[from]
        source: config::ConfigError,
    },

    #[error("Configuration validation failed: {message}")]
    Validation { message: String },
}

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    /// Settings for fetching the catalog over HTTP
    pub client: ClientConfig,
}

/// REST server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Frontend origins allowed by CORS
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite connection URL, e.g. `sqlite://shopcart.db` or `sqlite::memory:`
    pub url: String,
    pub max_connections: u32,
    /// JSON array of products loaded into an empty catalog at startup
    pub seed_file: Option<PathBuf>,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,
    /// Enable JSON formatted file logs
    pub json_format: bool,
    pub console_output: bool,
    pub file_output: bool,
    /// Directory for log files; defaults to `logs/` next to the executable
    pub log_dir: Option<PathBuf>,
    pub file_prefix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the product API
    pub base_url: String,
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            allowed_origins: vec!["http://localhost:5173".to_string()],
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://shopcart.db".to_string(),
            max_connections: 10,
            seed_file: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            console_output: true,
            file_output: false,
            log_dir: None,
            file_prefix: "shopcart.log".to_string(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout_seconds: 30,
            user_agent: format!("shopcart/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl AppConfig {
    /// Loads defaults, then `config/default.*` if present, then the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Some(Path::new(DEFAULT_CONFIG_FILE)), None)
    }

    /// Loads configuration from an optional file and an optional environment
    /// map. `env = None` reads the real process environment.
    pub fn load_from(
        path: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder =
            config::Config::builder().add_source(config::Config::try_from(&Self::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(false));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("server.allowed_origins")
                    .source(env),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation {
                message: "server.port must be greater than 0".to_string(),
            });
        }

        if self.database.url.trim().is_empty() {
            return Err(ConfigError::Validation {
                message: "database.url must not be empty".to_string(),
            });
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::Validation {
                message: "database.max_connections must be greater than 0".to_string(),
            });
        }

        if self.client.base_url.trim().is_empty() {
            return Err(ConfigError::Validation {
                message: "client.base_url must not be empty".to_string(),
            });
        }

        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Locates configuration and data directories for the storefront
pub struct ConfigManager {
    pub config_path: PathBuf,
}

impl ConfigManager {
    /// Get the application configuration directory
    pub fn get_config_dir() -> anyhow::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get user config directory")?
            .join("shopcart");

        Ok(config_dir)
    }

    pub fn new() -> anyhow::Result<Self> {
        let config_path = Self::get_config_dir()?.join("shopcart.toml");
        Ok(Self { config_path })
    }

    /// Prefers `config/default.*` in the working directory, falling back to the
    /// user config directory. Missing files are not an error.
    pub fn load_config(&self) -> Result<AppConfig, ConfigError> {
        let local = Path::new(DEFAULT_CONFIG_FILE);
        let has_local = ["toml", "json", "yaml"]
            .iter()
            .any(|ext| local.with_extension(ext).exists());

        let path = if has_local { local } else { self.config_path.as_path() };
        info!("Loading configuration from: {:?}", path);
        AppConfig::load_from(Some(path), None)
    }
}
