//! CLI configuration
//!
//! Loaded from a TOML file (missing file means defaults), then overridden by
//! `HANDOVER_STORAGE_BACKEND` and `HANDOVER_STORAGE_PATH`.

use handover_ceremony::CeremonyConfig;
use handover_core::{CatalogConfig, CeremonyCatalog, ConfigError};
use handover_effects::StorageConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable selecting the storage backend
pub const ENV_STORAGE_BACKEND: &str = "HANDOVER_STORAGE_BACKEND";

/// Environment variable setting the filesystem storage root
pub const ENV_STORAGE_PATH: &str = "HANDOVER_STORAGE_PATH";

/// Default polling interval for `watch`, matching the participant screens
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2000;

/// `[watch]` configuration section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Delay between progress polls
    pub poll_interval_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

/// Complete CLI configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Storage backend selection
    pub storage: StorageConfig,
    /// Ceremony policy
    pub policy: CeremonyConfig,
    /// Polling behavior of `watch`
    pub watch: WatchConfig,
    /// Replacement credential table and step catalog
    pub catalog: Option<CatalogConfig>,
}

impl CliConfig {
    /// Load configuration from `path`; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&text)
    }

    /// Parse and validate configuration text
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: CliConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides; `lookup` is `std::env::var` in the binary
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(backend) = lookup(ENV_STORAGE_BACKEND).filter(|v| !v.trim().is_empty()) {
            self.storage.backend = backend
                .parse()
                .map_err(|e: String| ConfigError::invalid(format!("{ENV_STORAGE_BACKEND}: {e}")))?;
        }
        if let Some(path) = lookup(ENV_STORAGE_PATH).filter(|v| !v.trim().is_empty()) {
            self.storage.path = Some(PathBuf::from(path));
        }
        Ok(())
    }

    /// Reject values no command can work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.watch.poll_interval_ms == 0 {
            return Err(ConfigError::invalid("watch.poll_interval_ms must be positive"));
        }
        Ok(())
    }

    /// Build the catalog: the configured tables if present, else the built-in ones
    pub fn build_catalog(&self) -> Result<CeremonyCatalog, ConfigError> {
        match &self.catalog {
            Some(catalog) => CeremonyCatalog::from_config(catalog.clone()),
            None => Ok(CeremonyCatalog::builtin()),
        }
    }
}
