//! Wall-clock time effect
//!
//! - **Category**: Infrastructure Effect
//! - **Implementation**: `handover-effects` (`RealTimeHandler`, `SimulatedTimeHandler`)

use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Source of physical timestamps
#[async_trait]
pub trait PhysicalTimeEffects: Send + Sync {
    /// Current UTC time
    async fn now(&self) -> DateTime<Utc>;
}
