//! Single-slot timers.
//!
//! Each component that needs a callback owns exactly one [`TimerSlot`].
//! Arming a slot replaces whatever was pending, so an owner can never have
//! two callbacks outstanding. Slots hold deadlines only; whoever drives the
//! engine decides when time has passed.

use echoscroll_model::touch::TimestampMs;

/// One optional deadline on the engine timeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimerSlot {
    deadline_ms: Option<TimestampMs>,
}

impl TimerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm for `now_ms + delay_ms`, cancelling any pending deadline.
    /// Delays are at least one millisecond.
    pub fn arm(&mut self, now_ms: TimestampMs, delay_ms: u64) -> TimestampMs {
        let delay = i64::try_from(delay_ms.max(1)).unwrap_or(i64::MAX);
        let deadline = now_ms.saturating_add(delay);
        self.deadline_ms = Some(deadline);
        deadline
    }

    /// Cancel the pending deadline. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.deadline_ms.take().is_some()
    }

    pub fn deadline(&self) -> Option<TimestampMs> {
        self.deadline_ms
    }

    pub fn is_armed(&self) -> bool {
        self.deadline_ms.is_some()
    }

    /// Consume the deadline if it has been reached.
    pub fn fire(&mut self, now_ms: TimestampMs) -> bool {
        match self.deadline_ms {
            Some(deadline) if deadline <= now_ms => {
                self.deadline_ms = None;
                true
            }
            _ => false,
        }
    }
}
