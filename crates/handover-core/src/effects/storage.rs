//! Key-value storage effect
//!
//! - **Category**: Infrastructure Effect
//! - **Implementation**: `handover-effects` (memory and filesystem handlers)
//!
//! The collaborator offers get / set / delete / get-by-prefix over string keys
//! holding JSON values. It provides no transactions and no locking: concurrent
//! writers to the same key are last-writer-wins.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error type for storage operations
#[derive(Debug, Clone, thiserror::Error, Serialize, Deserialize)]
pub enum StorageError {
    /// Key is empty or contains characters the backend cannot represent
    #[error("Invalid key {key:?}: {reason}")]
    InvalidKey {
        /// Offending key
        key: String,
        /// Why it was rejected
        reason: String,
    },
    /// Backend could not read
    #[error("Read failed: {0}")]
    ReadFailed(String),
    /// Backend could not write
    #[error("Write failed: {0}")]
    WriteFailed(String),
    /// Backend could not delete
    #[error("Delete failed: {0}")]
    DeleteFailed(String),
    /// Stored value could not be encoded or decoded
    #[error("Serialization failed: {0}")]
    Serialization(String),
    /// Backend unreachable
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    /// Create an invalid key error
    pub fn invalid_key(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidKey {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Opaque key-value collaborator
#[async_trait]
pub trait StorageEffects: Send + Sync {
    /// Fetch the value stored under `key`
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError>;

    /// Store `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError>;

    /// Remove `key`; returns whether it existed
    async fn delete(&self, key: &str) -> Result<bool, StorageError>;

    /// Every entry whose key starts with `prefix`, sorted by key
    async fn get_by_prefix(&self, prefix: &str) -> Result<Vec<(String, Value)>, StorageError>;

    /// Remove every entry whose key starts with `prefix`; returns how many were removed
    async fn delete_by_prefix(&self, prefix: &str) -> Result<usize, StorageError>;

    /// Short backend name for logs
    fn backend_type(&self) -> &'static str;
}
