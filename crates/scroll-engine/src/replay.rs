//! Deterministic replay of input traces.
//!
//! Records are applied in order on a virtual timeline. Before each record
//! the controller is advanced to the record's timestamp so every timer that
//! came due in between fires first. After the last record the timeline runs
//! on for `tail_ms` to let pending ticks and resumes play out.

use echoscroll_common::clock::{Clock, ManualClock};
use echoscroll_common::config::AppConfig;
use echoscroll_common::error::{EchoscrollError, EchoscrollResult};
use echoscroll_model::event::EngineEvent;
use echoscroll_model::input::{parse_jsonl_numbered, InputKind, InputRecord};
use echoscroll_model::scroll::{ScrollState, SpeedLevel};
use echoscroll_model::touch::{TimestampMs, TouchSample};

use crate::controller::TouchScrollController;

/// Default time to keep running after the last record.
pub const DEFAULT_TAIL_MS: u64 = 10_000;

/// Apply one input to the controller at `now_ms`.
pub fn apply_input(controller: &mut TouchScrollController, kind: &InputKind, now_ms: TimestampMs) {
    match *kind {
        InputKind::Down { x, y } => controller.on_touch_down(TouchSample::new(x, y, now_ms)),
        InputKind::Up { x, y } => {
            controller.on_touch_up(TouchSample::new(x, y, now_ms));
        }
        InputKind::Tap { x, y, duration_ms } => {
            controller.on_touch_sample(TouchSample::new(x, y, now_ms), duration_ms);
        }
        InputKind::Interaction {} => controller.on_user_interaction(now_ms),
        InputKind::TouchMode { enabled } => controller.set_touch_mode_enabled(enabled, now_ms),
        InputKind::Speed { level } => {
            controller.set_speed(level, now_ms);
        }
        InputKind::Sensitivity { value } => {
            controller.set_sensitivity(value, now_ms);
        }
        InputKind::AutoResume { enabled } => controller.set_auto_resume_enabled(enabled),
        InputKind::Start {} => controller.start_autoscroll(now_ms),
        InputKind::Stop {} => controller.stop_autoscroll(now_ms),
        InputKind::Resume {} => controller.resume_from_last_position(now_ms),
    }
}

/// Summary of a finished replay.
#[derive(Debug, Clone)]
pub struct ReplayReport {
    /// Everything the controller emitted, in order.
    pub events: Vec<EngineEvent>,
    /// Number of input records applied.
    pub records: usize,
    /// Timeline position when the replay stopped.
    pub end_ms: TimestampMs,
    pub final_state: ScrollState,
    pub final_speed: SpeedLevel,
}

impl ReplayReport {
    pub fn scroll_count(&self) -> usize {
        self.events.iter().filter(|e| e.as_scroll().is_some()).count()
    }

    pub fn gesture_count(&self) -> usize {
        self.events.iter().filter(|e| e.as_gesture().is_some()).count()
    }
}

/// Drives a [`TouchScrollController`] from recorded input.
pub struct Replayer {
    controller: TouchScrollController,
    clock: ManualClock,
    tail_ms: u64,
    records: usize,
    events: Vec<EngineEvent>,
}

impl Replayer {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            controller: TouchScrollController::new(config),
            clock: ManualClock::new(0),
            tail_ms: DEFAULT_TAIL_MS,
            records: 0,
            events: Vec::new(),
        }
    }

    pub fn with_tail(mut self, tail_ms: u64) -> Self {
        self.tail_ms = tail_ms;
        self
    }

    pub fn controller(&self) -> &TouchScrollController {
        &self.controller
    }

    /// Apply one record. Records must not go back in time.
    ///
    /// Errors carry the 1-based record number; [`Replayer::run_jsonl`]
    /// reports source lines instead.
    pub fn apply(&mut self, record: &InputRecord) -> EchoscrollResult<()> {
        self.apply_at(self.records + 1, record)
    }

    fn apply_at(&mut self, line: usize, record: &InputRecord) -> EchoscrollResult<()> {
        let now = self.clock.now_ms();
        if record.timestamp_ms < now {
            return Err(EchoscrollError::trace(
                line,
                format!(
                    "record at t={} is earlier than t={now}",
                    record.timestamp_ms
                ),
            ));
        }
        self.advance_to(record.timestamp_ms);
        apply_input(&mut self.controller, &record.kind, record.timestamp_ms);
        self.events.extend(self.controller.drain_events());
        self.records += 1;
        Ok(())
    }

    /// Move the virtual clock forward, firing due timers.
    pub fn advance_to(&mut self, now_ms: TimestampMs) {
        self.clock.set(now_ms);
        self.controller.advance_to(self.clock.now_ms());
        self.events.extend(self.controller.drain_events());
    }

    /// Apply all records, run the tail, and report.
    pub fn run(mut self, records: &[InputRecord]) -> EchoscrollResult<ReplayReport> {
        for record in records {
            self.apply(record)?;
        }
        Ok(self.finish())
    }

    /// Parse a JSONL trace and replay it.
    pub fn run_jsonl(mut self, jsonl: &str) -> EchoscrollResult<ReplayReport> {
        let records: Vec<(usize, InputRecord)> = parse_jsonl_numbered(jsonl)
            .map_err(|e| EchoscrollError::trace(e.line, e.source.to_string()))?;
        for (line, record) in &records {
            self.apply_at(*line, record)?;
        }
        Ok(self.finish())
    }

    fn finish(mut self) -> ReplayReport {
        let tail = i64::try_from(self.tail_ms).unwrap_or(i64::MAX);
        let end = self.clock.now_ms().saturating_add(tail);
        self.advance_to(end);
        tracing::info!(
            records = self.records,
            events = self.events.len(),
            end_ms = end,
            "Replay finished"
        );
        ReplayReport {
            final_state: self.controller.state(),
            final_speed: self.controller.speed(),
            events: self.events,
            records: self.records,
            end_ms: end,
        }
    }
}
