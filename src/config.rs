//! Application configuration
//!
//! Loaded from a JSON file; every section and field has a default, so an
//! empty object (or no file at all) yields a working demo server.
//!
//! ```json
//! {
//!   "server":    { "host": "0.0.0.0", "port": 3030, "cors_origins": [] },
//!   "auth":      { "username": "admin", "password": "admin" },
//!   "realtime":  { "channel_capacity": 1024 },
//!   "logging":   { "level": "info" },
//!   "resources": [ { "name": "messages", "default_limit": 10, "max_limit": 50 } ]
//! }
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::MockAuthConfig;
use crate::http_server::HttpServerConfig;
use crate::observability::Severity;
use crate::realtime::DEFAULT_CHANNEL_CAPACITY;
use crate::service::ResourceConfig;

/// Path segments owned by the server itself
pub const RESERVED_RESOURCE_NAMES: &[&str] = &["health", "auth", "realtime"];

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Real-time settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Events buffered per client before it starts skipping
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

fn default_channel_capacity() -> usize {
    DEFAULT_CHANNEL_CAPACITY
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: Severity,
}

fn default_log_level() -> Severity {
    Severity::Info
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: HttpServerConfig,

    #[serde(default)]
    pub auth: MockAuthConfig,

    #[serde(default)]
    pub realtime: RealtimeConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default = "default_resources")]
    pub resources: Vec<ResourceConfig>,
}

fn default_resources() -> Vec<ResourceConfig> {
    vec![ResourceConfig::new("messages"), ResourceConfig::new("todos")]
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: HttpServerConfig::default(),
            auth: MockAuthConfig::default(),
            realtime: RealtimeConfig::default(),
            logging: LoggingConfig::default(),
            resources: default_resources(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_json(&content)
    }

    /// Parse and validate a JSON document
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.realtime.channel_capacity == 0 {
            return Err(ConfigError::Invalid(
                "realtime.channel_capacity must be > 0".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for resource in &self.resources {
            let name = resource.name.as_str();

            if name.is_empty() || name.contains('/') {
                return Err(ConfigError::Invalid(format!(
                    "Invalid resource name: '{}'",
                    name
                )));
            }
            if RESERVED_RESOURCE_NAMES.contains(&name) {
                return Err(ConfigError::Invalid(format!(
                    "Resource name '{}' is reserved",
                    name
                )));
            }
            if !seen.insert(name) {
                return Err(ConfigError::Invalid(format!(
                    "Duplicate resource name: '{}'",
                    name
                )));
            }
            resource
                .store
                .validate()
                .map_err(|e| ConfigError::Invalid(format!("resource '{}': {}", name, e)))?;
        }

        Ok(())
    }
}
