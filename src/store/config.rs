//! Store configuration
//!
//! Immutable per-store settings, fixed at store creation.

use serde::{Deserialize, Serialize};

/// Settings for one record store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Name of the reserved identifier field (default: "id")
    #[serde(default = "default_id_field")]
    pub id_field: String,

    /// First identifier handed out (default: 1)
    #[serde(default = "default_start_id")]
    pub start_id: u64,

    /// Page size used when a query has no limit (default: 10)
    #[serde(default = "default_limit")]
    pub default_limit: usize,

    /// Largest page size a query may request (default: 50)
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,
}

fn default_id_field() -> String {
    "id".to_string()
}

fn default_start_id() -> u64 {
    1
}

fn default_limit() -> usize {
    10
}

fn default_max_limit() -> usize {
    50
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            id_field: default_id_field(),
            start_id: default_start_id(),
            default_limit: default_limit(),
            max_limit: default_max_limit(),
        }
    }
}

impl StoreConfig {
    /// Override the page sizes
    pub fn with_limits(mut self, default_limit: usize, max_limit: usize) -> Self {
        self.default_limit = default_limit;
        self.max_limit = max_limit;
        self
    }

    /// Override the identifier field name
    pub fn with_id_field(mut self, id_field: impl Into<String>) -> Self {
        self.id_field = id_field.into();
        self
    }

    /// Override the first identifier
    pub fn with_start_id(mut self, start_id: u64) -> Self {
        self.start_id = start_id;
        self
    }

    /// Check that the settings are usable
    pub fn validate(&self) -> Result<(), String> {
        if self.id_field.trim().is_empty() {
            return Err("id_field must not be empty".to_string());
        }
        if self.max_limit == 0 {
            return Err("max_limit must be > 0".to_string());
        }
        if self.default_limit > self.max_limit {
            return Err(format!(
                "default_limit {} exceeds max_limit {}",
                self.default_limit, self.max_limit
            ));
        }
        Ok(())
    }

    /// Resolve a requested page size against the configured bounds.
    ///
    /// Oversized requests are clamped, not rejected.
    pub fn effective_limit(&self, requested: Option<usize>) -> usize {
        requested.unwrap_or(self.default_limit).min(self.max_limit)
    }
}
