//! Clock utilities for the scroll timeline.
//!
//! Touch samples, timer deadlines, and emitted events all share one
//! millisecond timeline. A [`Clock`] hands out positions on that timeline:
//! - [`SessionClock`] anchors it to a monotonic epoch taken at startup
//! - [`ManualClock`] is moved by hand for replays and tests

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Instant;

/// Source of "now" in milliseconds since a fixed epoch.
pub trait Clock: Send + Sync {
    /// Milliseconds elapsed since the clock's epoch.
    fn now_ms(&self) -> i64;
}

/// A monotonic clock anchored to the moment a session started.
#[derive(Debug, Clone)]
pub struct SessionClock {
    /// The instant the session started.
    epoch: Instant,

    /// Wall-clock time at epoch (ISO 8601 string).
    epoch_wall: String,
}

impl SessionClock {
    /// Create a new clock anchored to now.
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
            epoch_wall: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Wall-clock time at session start.
    pub fn epoch_wall(&self) -> &str {
        &self.epoch_wall
    }

    /// The underlying epoch instant.
    pub fn epoch(&self) -> Instant {
        self.epoch
    }
}

impl Clock for SessionClock {
    fn now_ms(&self) -> i64 {
        i64::try_from(self.epoch.elapsed().as_millis()).unwrap_or(i64::MAX)
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: AtomicI64,
}

impl ManualClock {
    pub fn new(start_ms: i64) -> Self {
        Self {
            now_ms: AtomicI64::new(start_ms),
        }
    }

    /// Jump to an absolute time. Moving backwards is ignored.
    pub fn set(&self, now_ms: i64) {
        self.now_ms.fetch_max(now_ms, Ordering::SeqCst);
    }

    /// Move forward by `delta_ms` and return the new time.
    pub fn advance(&self, delta_ms: u64) -> i64 {
        let delta = i64::try_from(delta_ms).unwrap_or(i64::MAX);
        let step = |now: i64| Some(now.saturating_add(delta));
        let previous = self
            .now_ms
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, step)
            .unwrap_or_else(|now| now);
        previous.saturating_add(delta)
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}
