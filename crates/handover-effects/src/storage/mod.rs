//! Storage effect handlers and backend selection

mod filesystem;
mod memory;

pub use filesystem::FilesystemStorageHandler;
pub use memory::MemoryStorageHandler;

use handover_core::effects::StorageEffects;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

/// Which storage handler backs the ceremony
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process-local map
    #[default]
    Memory,
    /// One JSON file per key under `StorageConfig::path`
    Filesystem,
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::Memory => f.write_str("memory"),
            StorageBackend::Filesystem => f.write_str("filesystem"),
        }
    }
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StorageBackend::Memory),
            "filesystem" | "fs" => Ok(StorageBackend::Filesystem),
            other => Err(format!("unknown storage backend: {other}")),
        }
    }
}

/// `[storage]` configuration section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Selected backend
    #[serde(default)]
    pub backend: StorageBackend,
    /// Root directory for the filesystem backend
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Build the configured storage handler.
///
/// A filesystem backend without a path falls back to memory with a warning,
/// so a half-configured deployment still starts.
pub fn build_storage(config: &StorageConfig) -> Arc<dyn StorageEffects> {
    match (config.backend, &config.path) {
        (StorageBackend::Filesystem, Some(path)) => {
            tracing::info!(path = %path.display(), "Using filesystem storage backend");
            Arc::new(FilesystemStorageHandler::new(path.clone()))
        }
        (StorageBackend::Filesystem, None) => {
            tracing::warn!(
                "Filesystem storage selected but no storage path configured; \
                 falling back to in-memory storage"
            );
            Arc::new(MemoryStorageHandler::new())
        }
        (StorageBackend::Memory, _) => {
            tracing::debug!("Using in-memory storage backend");
            Arc::new(MemoryStorageHandler::new())
        }
    }
}
