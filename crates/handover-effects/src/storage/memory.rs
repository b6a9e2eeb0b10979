//! In-memory storage handler
//!
//! Used when no durable backend is configured, and by tests. Contents live
//! only as long as the process.

use async_trait::async_trait;
use handover_core::effects::{StorageEffects, StorageError};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory storage handler
#[derive(Debug, Clone, Default)]
pub struct MemoryStorageHandler {
    data: Arc<RwLock<BTreeMap<String, Value>>>,
}

impl MemoryStorageHandler {
    /// Create an empty memory storage handler
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub async fn len(&self) -> usize {
        self.data.read().await.len()
    }

    /// Whether nothing is stored
    pub async fn is_empty(&self) -> bool {
        self.data.read().await.is_empty()
    }
}

fn check_key(key: &str) -> Result<(), StorageError> {
    if key.is_empty() {
        return Err(StorageError::invalid_key(key, "key cannot be empty"));
    }
    Ok(())
}

#[async_trait]
impl StorageEffects for MemoryStorageHandler {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let data = self.data.read().await;
        Ok(data.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        check_key(key)?;
        let mut data = self.data.write().await;
        data.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, StorageError> {
        let mut data = self.data.write().await;
        Ok(data.remove(key).is_some())
    }

    async fn get_by_prefix(&self, prefix: &str) -> Result<Vec<(String, Value)>, StorageError> {
        let data = self.data.read().await;
        Ok(data
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    async fn delete_by_prefix(&self, prefix: &str) -> Result<usize, StorageError> {
        let mut data = self.data.write().await;
        let before = data.len();
        data.retain(|k, _| !k.starts_with(prefix));
        Ok(before - data.len())
    }

    fn backend_type(&self) -> &'static str {
        "memory"
    }
}
