//! Time effect handlers

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use handover_core::effects::PhysicalTimeEffects;
use parking_lot::Mutex;
use std::sync::Arc;

/// Real time handler for production use
#[derive(Debug, Clone, Copy, Default)]
pub struct RealTimeHandler;

impl RealTimeHandler {
    /// Create a new real time handler
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PhysicalTimeEffects for RealTimeHandler {
    async fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Settable clock for deterministic tests.
///
/// Clones share the same clock.
#[derive(Debug, Clone)]
pub struct SimulatedTimeHandler {
    current_time: Arc<Mutex<DateTime<Utc>>>,
    /// Added to the clock after every read, so successive events are ordered
    auto_advance: Duration,
}

impl SimulatedTimeHandler {
    /// Create a clock frozen at `start`
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            current_time: Arc::new(Mutex::new(start)),
            auto_advance: Duration::zero(),
        }
    }

    /// Create a clock that advances by `step` after every read
    pub fn with_auto_advance(start: DateTime<Utc>, step: Duration) -> Self {
        Self {
            current_time: Arc::new(Mutex::new(start)),
            auto_advance: step,
        }
    }

    /// Advance simulated time
    pub fn advance(&self, duration: Duration) {
        let mut time = self.current_time.lock();
        *time += duration;
    }

    /// Current simulated time, without advancing it
    pub fn peek(&self) -> DateTime<Utc> {
        *self.current_time.lock()
    }
}

impl Default for SimulatedTimeHandler {
    fn default() -> Self {
        Self::new(DateTime::<Utc>::UNIX_EPOCH)
    }
}

#[async_trait]
impl PhysicalTimeEffects for SimulatedTimeHandler {
    async fn now(&self) -> DateTime<Utc> {
        let mut time = self.current_time.lock();
        let now = *time;
        *time += self.auto_advance;
        now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[tokio::test]
    async fn test_simulated_clock_is_frozen_until_advanced() {
        let start = Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap();
        let clock = SimulatedTimeHandler::new(start);
        assert_eq!(clock.now().await, start);
        assert_eq!(clock.now().await, start);

        clock.advance(Duration::seconds(30));
        assert_eq!(clock.now().await, start + Duration::seconds(30));
    }

    #[tokio::test]
    async fn test_auto_advance_orders_reads() {
        let start = Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap();
        let clock = SimulatedTimeHandler::with_auto_advance(start, Duration::seconds(1));
        let first = clock.now().await;
        let second = clock.clone().now().await;
        assert!(second > first);
        assert_eq!(clock.peek(), start + Duration::seconds(2));
    }

    #[tokio::test]
    async fn test_real_clock_moves_forward() {
        let clock = RealTimeHandler::new();
        let a = clock.now().await;
        let b = clock.now().await;
        assert!(b >= a);
    }
}
