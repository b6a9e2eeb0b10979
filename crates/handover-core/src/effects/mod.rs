//! Effect trait definitions
//!
//! Pure trait definitions for the side effects the ceremony performs.
//! This module defines **what** effects exist; `handover-effects` defines **how**.
//!
//! - **Storage**: opaque key-value collaborator holding JSON values
//! - **Time**: wall-clock timestamps for `joinedAt` / `completedAt`
//!
//! Ceremony code is written against `Arc<dyn ...>` handles so a backend can
//! be chosen at startup without the engine knowing which one it got.

pub mod storage;
pub mod time;

pub use storage::{StorageEffects, StorageError};
pub use time::PhysicalTimeEffects;
