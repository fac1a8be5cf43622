//! Scroll scheduler: the "emit one scroll, wait, repeat" loop.
//!
//! # States
//!
//! ```text
//!            start                 pause
//!   Idle ──────────▶ Running ─────────────▶ PausedForInteraction
//!    ▲                 │  ▲                        │
//!    │      stop       │  └────────── resume ──────┘
//!    └─────────────────┴───────────── stop ────────┘
//! ```
//!
//! While running, exactly one tick deadline is pending. Each tick emits one
//! [`ScrollCommand`] and re-arms with a delay computed from the parameters
//! in effect *at that tick*, so speed and sensitivity changes apply without
//! a restart. A speed change additionally re-arms immediately (see
//! [`ScrollScheduler::retune`]).
//!
//! # Delay
//!
//! `base = delay_for_speed(level)`. Runs started from a touch with the
//! adaptive flag use `base * (0.5 + relative_y * sensitivity)`, where
//! `relative_y = touch_y / screen_height`: slower near the top of the
//! viewport, faster near the bottom.
//!
//! # Distance
//!
//! Fixed for the whole run when it starts:
//! `base_distance * (0.5 + sensitivity * 0.5)`.

use serde::{Deserialize, Serialize};

use echoscroll_common::config::ScrollConfig;
use echoscroll_model::scroll::{
    ScrollCommand, ScrollDirection, ScrollState, Sensitivity, SpeedLevel,
};
use echoscroll_model::touch::{Position, TimestampMs};

use crate::timer::TimerSlot;

/// Who started the current run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OriginKind {
    /// A touch gesture in touch-control mode.
    Touch,
    /// An explicit start request from the host.
    Manual,
}

/// Where and how a run of autoscroll started.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollOrigin {
    pub kind: OriginKind,
    /// Touch position the run started from, if any.
    pub position: Option<Position>,
    /// Use the position-dependent delay.
    pub adaptive: bool,
}

impl ScrollOrigin {
    pub fn manual() -> Self {
        Self {
            kind: OriginKind::Manual,
            position: None,
            adaptive: false,
        }
    }

    pub fn touch(position: Position, adaptive: bool) -> Self {
        Self {
            kind: OriginKind::Touch,
            position: Some(position),
            adaptive,
        }
    }

    pub fn is_touch(&self) -> bool {
        self.kind == OriginKind::Touch
    }
}

/// Settings read on every tick. Owned by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollParams {
    pub speed: SpeedLevel,
    pub sensitivity: Sensitivity,
}

/// A state change that listeners should hear about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: ScrollState,
    pub to: ScrollState,
}

/// Geometry and stroke parameters supplied by the platform.
#[derive(Debug, Clone, PartialEq)]
pub struct SchedulerConfig {
    /// Viewport height in touch coordinate units.
    pub screen_height: f64,
    /// Density-scaled base stroke length.
    pub base_distance: f64,
    /// Duration of each emitted stroke.
    pub stroke_duration_ms: u64,
    pub direction: ScrollDirection,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self::from(&ScrollConfig::default())
    }
}

impl From<&ScrollConfig> for SchedulerConfig {
    fn from(config: &ScrollConfig) -> Self {
        Self {
            screen_height: config.screen_height,
            base_distance: config.base_distance(),
            stroke_duration_ms: config.stroke_duration_ms,
            direction: if config.reverse_direction {
                ScrollDirection::Up
            } else {
                ScrollDirection::Down
            },
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ActiveRun {
    origin: ScrollOrigin,
    distance: i32,
}

/// Drives the scroll cadence and owns the scroll state.
#[derive(Debug, Clone)]
pub struct ScrollScheduler {
    config: SchedulerConfig,
    state: ScrollState,
    timer: TimerSlot,
    run: Option<ActiveRun>,
    ticks: u64,
}

impl ScrollScheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            config,
            state: ScrollState::Idle,
            timer: TimerSlot::new(),
            run: None,
            ticks: 0,
        }
    }

    pub fn state(&self) -> ScrollState {
        self.state
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Origin of the current run (kept while paused).
    pub fn origin(&self) -> Option<ScrollOrigin> {
        self.run.map(|run| run.origin)
    }

    /// Stroke distance of the current run.
    pub fn distance(&self) -> Option<i32> {
        self.run.map(|run| run.distance)
    }

    pub fn next_deadline(&self) -> Option<TimestampMs> {
        self.timer.deadline()
    }

    /// Ticks emitted since construction.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Delay before the next tick for the given run origin.
    pub fn delay_ms(&self, params: ScrollParams, origin: &ScrollOrigin) -> u64 {
        let base = params.speed.delay_ms();
        match origin.position {
            Some(position) if origin.adaptive && origin.is_touch() => {
                let relative = position.relative_y(self.config.screen_height);
                let factor = 0.5 + relative * params.sensitivity.get();
                (base as f64 * factor).round() as u64
            }
            _ => base,
        }
    }

    /// Stroke distance for a run started at the given sensitivity.
    pub fn scroll_distance(&self, sensitivity: Sensitivity) -> i32 {
        (self.config.base_distance * (0.5 + sensitivity.get() * 0.5)) as i32
    }

    /// Start a run. No-op while already running.
    pub fn start(
        &mut self,
        now_ms: TimestampMs,
        origin: ScrollOrigin,
        params: ScrollParams,
    ) -> Option<Transition> {
        if self.state == ScrollState::Running {
            tracing::debug!("Start ignored, already running");
            return None;
        }
        self.begin(now_ms, origin, params)
    }

    /// Replace the current run (if any) with a new one from `origin`.
    pub fn restart(
        &mut self,
        now_ms: TimestampMs,
        origin: ScrollOrigin,
        params: ScrollParams,
    ) -> Option<Transition> {
        self.begin(now_ms, origin, params)
    }

    /// Stop and forget the current run. No-op while idle.
    pub fn stop(&mut self) -> Option<Transition> {
        if self.state == ScrollState::Idle {
            return None;
        }
        self.timer.cancel();
        self.run = None;
        self.set_state(ScrollState::Idle)
    }

    /// Suspend ticking, keeping the run for a later resume.
    pub fn pause(&mut self) -> Option<Transition> {
        if self.state != ScrollState::Running {
            return None;
        }
        self.timer.cancel();
        self.set_state(ScrollState::PausedForInteraction)
    }

    /// Continue a paused run. `position` moves a touch-origin run to a newer
    /// touch position. No-op unless paused.
    pub fn resume(
        &mut self,
        now_ms: TimestampMs,
        params: ScrollParams,
        position: Option<Position>,
    ) -> Option<Transition> {
        if self.state != ScrollState::PausedForInteraction {
            return None;
        }
        let Some(run) = self.run.as_mut() else {
            return self.set_state(ScrollState::Idle);
        };
        if run.origin.is_touch() && position.is_some() {
            run.origin.position = position;
        }
        let origin = run.origin;
        let delay = self.delay_ms(params, &origin);
        self.timer.arm(now_ms, delay);
        self.set_state(ScrollState::Running)
    }

    /// Re-arm the pending tick with the current parameters. Used after a
    /// speed change so a long stale delay never survives. Returns whether a
    /// tick was re-armed.
    pub fn retune(&mut self, now_ms: TimestampMs, params: ScrollParams) -> bool {
        if self.state != ScrollState::Running {
            return false;
        }
        let Some(run) = self.run else {
            return false;
        };
        let delay = self.delay_ms(params, &run.origin);
        let deadline = self.timer.arm(now_ms, delay);
        tracing::debug!(delay_ms = delay, deadline, "Scroll cadence retuned");
        true
    }

    /// Fire the tick if due: returns the command to emit and re-arms.
    pub fn fire(&mut self, now_ms: TimestampMs, params: ScrollParams) -> Option<ScrollCommand> {
        if self.state != ScrollState::Running || !self.timer.fire(now_ms) {
            return None;
        }
        let run = self.run?;
        let command = ScrollCommand {
            direction: self.config.direction,
            distance: run.distance,
            duration_ms: self.config.stroke_duration_ms,
        };
        let delay = self.delay_ms(params, &run.origin);
        let deadline = self.timer.arm(now_ms, delay);
        self.ticks += 1;
        tracing::debug!(
            t = now_ms,
            distance = run.distance,
            next_delay_ms = delay,
            next_deadline = deadline,
            "Scroll tick"
        );
        Some(command)
    }

    fn begin(
        &mut self,
        now_ms: TimestampMs,
        origin: ScrollOrigin,
        params: ScrollParams,
    ) -> Option<Transition> {
        self.timer.cancel();
        let distance = self.scroll_distance(params.sensitivity);
        let delay = self.delay_ms(params, &origin);
        self.run = Some(ActiveRun { origin, distance });
        self.timer.arm(now_ms, delay);
        tracing::info!(
            origin = ?origin.kind,
            adaptive = origin.adaptive,
            speed = params.speed.get(),
            delay_ms = delay,
            distance,
            "Scrolling started"
        );
        self.set_state(ScrollState::Running)
    }

    fn set_state(&mut self, to: ScrollState) -> Option<Transition> {
        let from = self.state;
        if from == to {
            return None;
        }
        self.state = to;
        tracing::info!(?from, ?to, "Scroll state changed");
        Some(Transition { from, to })
    }
}
