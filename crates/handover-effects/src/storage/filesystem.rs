//! Filesystem storage handler
//!
//! Durable key-value store. Each key maps to one JSON file; `:`-separated key
//! segments become directories, so `ceremony:step:2` lives at
//! `<base>/ceremony/step/2.json`. Writes go to a temporary file first and are
//! renamed into place, so a reader never observes a half-written value.

use async_trait::async_trait;
use handover_core::effects::{StorageEffects, StorageError};
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;

const EXTENSION: &str = "json";
const SEPARATOR: char = ':';

/// Distinguishes temporary files of concurrent writers to the same key
static TMP_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Filesystem-based storage handler
#[derive(Debug, Clone)]
pub struct FilesystemStorageHandler {
    /// Base directory for storage files
    base_path: PathBuf,
}

impl FilesystemStorageHandler {
    /// Create a handler rooted at `base_path`; the directory is created lazily
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Root directory of this store
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        if key.is_empty() {
            return Err(StorageError::invalid_key(key, "key cannot be empty"));
        }
        let segments: Vec<&str> = key.split(SEPARATOR).collect();
        let mut path = self.base_path.clone();
        for (i, segment) in segments.iter().enumerate() {
            if segment.is_empty() || *segment == "." || *segment == ".." {
                return Err(StorageError::invalid_key(key, "empty or relative segment"));
            }
            if !segment
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
            {
                return Err(StorageError::invalid_key(
                    key,
                    "segments may only contain ASCII alphanumerics, '_', '-' and '.'",
                ));
            }
            if i + 1 == segments.len() {
                path.push(format!("{segment}.{EXTENSION}"));
            } else {
                path.push(segment);
            }
        }
        Ok(path)
    }

    fn key_for(&self, path: &Path) -> Option<String> {
        let rel = path.strip_prefix(&self.base_path).ok()?.with_extension("");
        let segments: Option<Vec<&str>> = rel.components().map(|c| c.as_os_str().to_str()).collect();
        Some(segments?.join(&SEPARATOR.to_string()))
    }

    /// Every stored key starting with `prefix`, sorted
    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<(String, PathBuf)>, StorageError> {
        let mut found = Vec::new();
        let mut stack = vec![self.base_path.clone()];

        while let Some(dir) = stack.pop() {
            let mut entries = match fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => {
                    return Err(StorageError::ReadFailed(format!(
                        "Failed to read directory {}: {e}",
                        dir.display()
                    )))
                }
            };

            while let Some(entry) = entries.next_entry().await.map_err(|e| {
                StorageError::ReadFailed(format!("Failed to read directory entry: {e}"))
            })? {
                let file_type = entry.file_type().await.map_err(|e| {
                    StorageError::ReadFailed(format!("Failed to stat directory entry: {e}"))
                })?;
                let path = entry.path();
                if file_type.is_dir() {
                    stack.push(path);
                    continue;
                }
                if !file_type.is_file()
                    || path.extension().and_then(|e| e.to_str()) != Some(EXTENSION)
                {
                    continue;
                }
                if let Some(key) = self.key_for(&path) {
                    if key.starts_with(prefix) {
                        found.push((key, path));
                    }
                }
            }
        }

        found.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(found)
    }

    async fn read_value(path: &Path) -> Result<Option<Value>, StorageError> {
        let bytes = match fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StorageError::ReadFailed(format!(
                    "Failed to read {}: {e}",
                    path.display()
                )))
            }
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }
}

#[async_trait]
impl StorageEffects for FilesystemStorageHandler {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let path = self.path_for(key)?;
        Self::read_value(&path).await
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::WriteFailed(format!("Failed to create directory: {e}"))
            })?;
        }

        let data = serde_json::to_vec_pretty(&value)?;
        let sequence = TMP_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        let tmp_path =
            path.with_extension(format!("{EXTENSION}.{}-{sequence}.tmp", std::process::id()));
        fs::write(&tmp_path, data)
            .await
            .map_err(|e| StorageError::WriteFailed(format!("Failed to write file: {e}")))?;
        fs::rename(&tmp_path, &path)
            .await
            .map_err(|e| StorageError::WriteFailed(format!("Failed to move file into place: {e}")))?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::DeleteFailed(format!(
                "Failed to remove file: {e}"
            ))),
        }
    }

    async fn get_by_prefix(&self, prefix: &str) -> Result<Vec<(String, Value)>, StorageError> {
        let mut out = Vec::new();
        for (key, path) in self.keys_with_prefix(prefix).await? {
            // A concurrent delete between listing and reading is not an error
            if let Some(value) = Self::read_value(&path).await? {
                out.push((key, value));
            }
        }
        Ok(out)
    }

    async fn delete_by_prefix(&self, prefix: &str) -> Result<usize, StorageError> {
        let mut removed = 0;
        for (_, path) in self.keys_with_prefix(prefix).await? {
            match fs::remove_file(&path).await {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(StorageError::DeleteFailed(format!(
                        "Failed to remove {}: {e}",
                        path.display()
                    )))
                }
            }
        }
        Ok(removed)
    }

    fn backend_type(&self) -> &'static str {
        "filesystem"
    }
}
