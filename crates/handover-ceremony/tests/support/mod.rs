//! Shared fixtures for ceremony integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use handover_ceremony::{CeremonyConfig, CeremonyService, ReconfirmPolicy};
use handover_core::effects::{StorageEffects, StorageError};
use handover_core::CeremonyCatalog;
use handover_effects::{MemoryStorageHandler, SimulatedTimeHandler};
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub const ADVISOR: &str = "ADV2026";
pub const STUDENT_LIFE: &str = "SL2026";
pub const OUTGOING: &str = "OUT2026";
pub const INCOMING: &str = "INC2026";
pub const ADMIN: &str = "ADMIN2026";

/// Responsible code for each step, in step order
pub const RESPONSIBLE: [&str; 4] = [ADVISOR, STUDENT_LIFE, OUTGOING, INCOMING];

pub fn ceremony_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 4, 18, 0, 0).unwrap()
}

/// Service, its backing store and its clock
pub struct Harness {
    pub service: CeremonyService,
    pub storage: Arc<MemoryStorageHandler>,
    pub clock: SimulatedTimeHandler,
}

pub fn harness() -> Harness {
    harness_with_policy(ReconfirmPolicy::Overwrite)
}

pub fn harness_with_policy(reconfirm: ReconfirmPolicy) -> Harness {
    let storage = Arc::new(MemoryStorageHandler::new());
    let clock = SimulatedTimeHandler::with_auto_advance(ceremony_start(), Duration::seconds(1));
    let service = CeremonyService::new(
        Arc::new(CeremonyCatalog::builtin()),
        storage.clone(),
        Arc::new(clock.clone()),
        CeremonyConfig { reconfirm },
    );
    Harness {
        service,
        storage,
        clock,
    }
}

/// Storage double that delegates to memory until switched to failing
#[derive(Debug, Default)]
pub struct FlakyStorage {
    inner: MemoryStorageHandler,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    /// Writes, deletes and prefix deletes of exactly this key or prefix fail
    fail_target: Mutex<Option<String>>,
}

impl FlakyStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes_to(&self, target: &str) {
        *self.fail_target.lock() = Some(target.to_string());
    }

    fn check_read(&self) -> Result<(), StorageError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("store offline".into()));
        }
        Ok(())
    }

    fn check_write(&self, target: &str) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::WriteFailed("store is read-only".into()));
        }
        if self.fail_target.lock().as_deref() == Some(target) {
            return Err(StorageError::WriteFailed(format!("{target} is read-only")));
        }
        Ok(())
    }
}

#[async_trait]
impl StorageEffects for FlakyStorage {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        self.check_read()?;
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        self.check_write(key)?;
        self.inner.set(key, value).await
    }

    async fn delete(&self, key: &str) -> Result<bool, StorageError> {
        self.check_write(key)?;
        self.inner.delete(key).await
    }

    async fn get_by_prefix(&self, prefix: &str) -> Result<Vec<(String, Value)>, StorageError> {
        self.check_read()?;
        self.inner.get_by_prefix(prefix).await
    }

    async fn delete_by_prefix(&self, prefix: &str) -> Result<usize, StorageError> {
        self.check_write(prefix)?;
        self.inner.delete_by_prefix(prefix).await
    }

    fn backend_type(&self) -> &'static str {
        "flaky"
    }
}
