//! Handover Effects - Layer 3
//!
//! Stateless infrastructure handlers implementing the effect traits from
//! `handover-core`:
//!
//! - `MemoryStorageHandler`: in-process key-value map, the development fallback
//! - `FilesystemStorageHandler`: durable key-value store, one JSON file per key
//! - `RealTimeHandler` / `SimulatedTimeHandler`: wall clock and a settable test clock
//!
//! `build_storage` selects the storage backend from `StorageConfig` at startup.

#![forbid(unsafe_code)]

pub mod storage;
pub mod time;

pub use storage::{
    build_storage, FilesystemStorageHandler, MemoryStorageHandler, StorageBackend, StorageConfig,
};
pub use time::{RealTimeHandler, SimulatedTimeHandler};
