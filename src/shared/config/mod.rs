//! Application configuration module
//!
//! Provides the server configuration and its builder. Values are layered:
//! built-in defaults, then an optional TOML file, then environment variables
//! (see `AppConfig::load`).

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "SAGE3_CONFIG";
/// Config file picked up from the working directory when present
pub const DEFAULT_CONFIG_FILE: &str = "sage3.toml";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Name reported by `/api/info`
    pub server_name: String,
    /// Interface to bind
    pub host: String,
    /// Port to bind
    pub port: u16,
    /// SQLite database URL; the in-memory store is used when absent
    pub database_url: Option<String>,
    /// Capacity of the change broadcast channel
    pub broadcast_capacity: usize,
    /// Messages a WebSocket connection may queue before pushes are dropped
    pub outbound_capacity: usize,
    /// Directory served under `/static`
    pub public_dir: String,
    /// Default tracing filter when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_name: "sage3".to_string(),
            host: "0.0.0.0".to_string(),
            port: 3000,
            database_url: None,
            broadcast_capacity: 1024,
            outbound_capacity: 256,
            public_dir: "public".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.display().to_string(), e))?;
        Self::from_toml_str(&source)
    }

    /// Load configuration: defaults, then the config file, then environment
    ///
    /// The file is `$SAGE3_CONFIG` if set, otherwise `sage3.toml` when it exists.
    /// Recognized variables: `SERVER_HOST`, `SERVER_PORT`, `DATABASE_URL`, `SAGE3_LOG`.
    pub fn load() -> Result<Self, ConfigError> {
        let config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_file(path)?,
            Err(_) if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_file(DEFAULT_CONFIG_FILE)?,
            Err(_) => Self::default(),
        };
        config.apply_env()
    }

    /// Override fields from environment variables
    pub fn apply_env(mut self) -> Result<Self, ConfigError> {
        if let Ok(host) = std::env::var("SERVER_HOST") {
            self.host = host;
        }
        if let Ok(port) = std::env::var("SERVER_PORT") {
            self.port = port
                .parse()
                .map_err(|_| ConfigError::InvalidValue("SERVER_PORT", port.clone()))?;
        }
        if let Ok(url) = std::env::var("DATABASE_URL") {
            self.database_url = Some(url).filter(|u| !u.is_empty());
        }
        if let Ok(level) = std::env::var("SAGE3_LOG") {
            self.log_level = level;
        }
        self.validate()?;
        Ok(self)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server_name.trim().is_empty() {
            return Err(ConfigError::MissingValue("server_name"));
        }
        if self.port == 0 {
            return Err(ConfigError::InvalidValue("port", "0".to_string()));
        }
        if self.broadcast_capacity == 0 {
            return Err(ConfigError::InvalidValue("broadcast_capacity", "0".to_string()));
        }
        if self.outbound_capacity == 0 {
            return Err(ConfigError::InvalidValue("outbound_capacity", "0".to_string()));
        }
        Ok(())
    }

    /// `host:port` string for binding
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    pub fn server_name(mut self, name: impl Into<String>) -> Self {
        self.config.server_name = name.into();
        self
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Use a SQLite database instead of the in-memory store
    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.config.database_url = Some(url.into());
        self
    }

    pub fn broadcast_capacity(mut self, capacity: usize) -> Self {
        self.config.broadcast_capacity = capacity;
        self
    }

    pub fn outbound_capacity(mut self, capacity: usize) -> Self {
        self.config.outbound_capacity = capacity;
        self
    }

    pub fn public_dir(mut self, dir: impl Into<String>) -> Self {
        self.config.public_dir = dir.into();
        self
    }

    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.config.log_level = level.into();
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("failed to read {0}: {1}")]
    Io(String, #[source] std::io::Error),
    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
}
