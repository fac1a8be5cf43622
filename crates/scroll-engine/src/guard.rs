//! Interaction guard: yields autoscroll to the user, then catches up.
//!
//! A touch newer than `interaction_window_ms` means the user is busy with
//! the screen. When that happens during a run, the guard asks for a pause
//! and arms a resume deadline `resume_delay_ms` out. Any further touch
//! before the deadline pushes it back. When the deadline passes and the user
//! has gone quiet, the guard asks for a resume.

use echoscroll_common::config::ScrollConfig;
use echoscroll_model::scroll::ScrollState;
use echoscroll_model::touch::TimestampMs;

use crate::timer::TimerSlot;

/// What the scheduler should do after an observed interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardAction {
    /// Nothing to do.
    None,
    /// Pause the running scheduler (resume is now pending).
    Pause,
    /// Already paused; the pending resume moved later.
    Extend,
}

/// Outcome of the resume deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeDecision {
    /// The user went quiet: resume scrolling.
    Resume,
    /// Still interacting: the deadline was re-armed.
    Wait,
}

#[derive(Debug, Clone)]
pub struct InteractionGuard {
    window_ms: u64,
    resume_delay_ms: u64,
    last_touch_ms: Option<TimestampMs>,
    resume: TimerSlot,
}

impl Default for InteractionGuard {
    fn default() -> Self {
        Self::from(&ScrollConfig::default())
    }
}

impl From<&ScrollConfig> for InteractionGuard {
    fn from(config: &ScrollConfig) -> Self {
        Self::new(config.interaction_window_ms, config.resume_delay_ms)
    }
}

impl InteractionGuard {
    pub fn new(window_ms: u64, resume_delay_ms: u64) -> Self {
        Self {
            window_ms,
            resume_delay_ms,
            last_touch_ms: None,
            resume: TimerSlot::new(),
        }
    }

    /// Note a touch without deciding anything. Older timestamps are ignored.
    pub fn record_touch(&mut self, timestamp_ms: TimestampMs) {
        if self.last_touch_ms.map_or(true, |last| timestamp_ms >= last) {
            self.last_touch_ms = Some(timestamp_ms);
        }
    }

    /// Whether the last touch is recent enough to count as interaction.
    pub fn is_user_interacting(&self, now_ms: TimestampMs) -> bool {
        self.last_touch_ms
            .is_some_and(|last| now_ms.saturating_sub(last) < self.window_ms())
    }

    fn window_ms(&self) -> i64 {
        i64::try_from(self.window_ms).unwrap_or(i64::MAX)
    }

    pub fn last_touch_ms(&self) -> Option<TimestampMs> {
        self.last_touch_ms
    }

    /// Record an interaction and decide whether autoscroll must yield.
    pub fn observe(&mut self, now_ms: TimestampMs, state: ScrollState) -> GuardAction {
        self.record_touch(now_ms);
        match state {
            ScrollState::Running => {
                self.arm_resume(now_ms);
                GuardAction::Pause
            }
            ScrollState::PausedForInteraction if self.supersede(now_ms) => GuardAction::Extend,
            _ => GuardAction::None,
        }
    }

    /// Arm (or re-arm) the resume deadline from `now_ms`.
    pub fn arm_resume(&mut self, now_ms: TimestampMs) -> TimestampMs {
        let deadline = self.resume.arm(now_ms, self.resume_delay_ms);
        tracing::debug!(deadline, "Autoscroll yielding to user");
        deadline
    }

    /// Push a pending resume back to a fresh delay. Returns false when no
    /// resume was pending.
    pub fn supersede(&mut self, now_ms: TimestampMs) -> bool {
        if !self.resume.is_armed() {
            return false;
        }
        self.resume.arm(now_ms, self.resume_delay_ms);
        true
    }

    /// Drop any pending resume.
    pub fn cancel(&mut self) -> bool {
        self.resume.cancel()
    }

    pub fn resume_pending(&self) -> bool {
        self.resume.is_armed()
    }

    pub fn next_deadline(&self) -> Option<TimestampMs> {
        self.resume.deadline()
    }

    /// Fire the resume deadline if due.
    pub fn fire(&mut self, now_ms: TimestampMs) -> Option<ResumeDecision> {
        if !self.resume.fire(now_ms) {
            return None;
        }
        if self.is_user_interacting(now_ms) {
            self.resume.arm(now_ms, self.resume_delay_ms);
            return Some(ResumeDecision::Wait);
        }
        Some(ResumeDecision::Resume)
    }

    /// Forget touches and cancel the pending resume.
    pub fn reset(&mut self) {
        self.last_touch_ms = None;
        self.resume.cancel();
    }
}
