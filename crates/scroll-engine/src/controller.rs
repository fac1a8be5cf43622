//! Touch scroll controller: gestures in, scroll commands out.
//!
//! The controller owns the speed level, the sensitivity, and the three
//! timed components (scheduler tick, guard resume, tap confirmation). It
//! never reads a clock: every operation takes the current time, and
//! [`TouchScrollController::advance_to`] fires whatever came due in
//! deadline order. Output accumulates in an outbox drained with
//! [`TouchScrollController::drain_events`].
//!
//! # Touch mode
//!
//! With touch mode on, each completed touch is classified and mapped to an
//! effect:
//!
//! | gesture     | effect                                                        |
//! |-------------|---------------------------------------------------------------|
//! | single tap  | running from touch: pause (guard arms resume); else start at tap |
//! | double tap  | active from touch: stop; else start adaptive at tap            |
//! | long press  | cycle speed `5 → 1`; restart cadence at the press if running   |
//! | swipe up    | speed + 1 (max 5)                                             |
//! | swipe down  | speed - 1 (min 1)                                             |
//!
//! A single tap takes effect only after `tap_confirm_ms` so the first half
//! of a double tap does not start and stop scrolling on its own. The
//! gesture notification goes out immediately either way.
//!
//! With touch mode off, touches are only interaction signals for the guard.

use echoscroll_common::config::AppConfig;
use echoscroll_gesture::{GestureClassifier, TouchPairer};
use echoscroll_model::event::EngineEvent;
use echoscroll_model::gesture::{GestureEvent, GestureKind};
use echoscroll_model::scroll::{ScrollState, Sensitivity, SpeedLevel};
use echoscroll_model::touch::{Position, TimestampMs, TouchSample};

use crate::guard::{GuardAction, InteractionGuard, ResumeDecision};
use crate::scheduler::{
    SchedulerConfig, ScrollOrigin, ScrollParams, ScrollScheduler, Transition,
};
use crate::timer::TimerSlot;

/// Orchestrates classifier, scheduler, and guard.
#[derive(Debug, Clone)]
pub struct TouchScrollController {
    classifier: GestureClassifier,
    pairer: TouchPairer,
    scheduler: ScrollScheduler,
    guard: InteractionGuard,
    tap_confirm: TimerSlot,
    pending_tap: Option<Position>,
    tap_confirm_ms: u64,
    params: ScrollParams,
    touch_mode: bool,
    auto_resume: bool,
    last_touch: Option<Position>,
    outbox: Vec<EngineEvent>,
    shut_down: bool,
}

impl Default for TouchScrollController {
    fn default() -> Self {
        Self::new(&AppConfig::default())
    }
}

impl TouchScrollController {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            classifier: GestureClassifier::new(config.gesture.clone()),
            pairer: TouchPairer::new(),
            scheduler: ScrollScheduler::new(SchedulerConfig::from(&config.scroll)),
            guard: InteractionGuard::from(&config.scroll),
            tap_confirm: TimerSlot::new(),
            pending_tap: None,
            tap_confirm_ms: config.gesture.tap_confirm_ms,
            params: ScrollParams {
                speed: SpeedLevel::new(config.scroll.initial_speed),
                sensitivity: Sensitivity::new(config.scroll.initial_sensitivity),
            },
            touch_mode: false,
            auto_resume: config.scroll.auto_resume,
            last_touch: None,
            outbox: Vec::new(),
            shut_down: false,
        }
    }

    pub fn state(&self) -> ScrollState {
        self.scheduler.state()
    }

    pub fn speed(&self) -> SpeedLevel {
        self.params.speed
    }

    pub fn sensitivity(&self) -> Sensitivity {
        self.params.sensitivity
    }

    pub fn is_touch_mode_enabled(&self) -> bool {
        self.touch_mode
    }

    pub fn is_auto_resume_enabled(&self) -> bool {
        self.auto_resume
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    pub fn last_touch_position(&self) -> Option<Position> {
        self.last_touch
    }

    pub fn scheduler(&self) -> &ScrollScheduler {
        &self.scheduler
    }

    pub fn guard(&self) -> &InteractionGuard {
        &self.guard
    }

    pub fn classifier(&self) -> &GestureClassifier {
        &self.classifier
    }

    /// Whether the current run was started by a touch and has not stopped.
    pub fn is_scrolling_from_touch(&self) -> bool {
        self.scheduler.state().is_active()
            && self.scheduler.origin().is_some_and(|o| o.is_touch())
    }

    /// Turn touch control on or off. Turning it off stops all scrolling and
    /// forgets gesture history.
    pub fn set_touch_mode_enabled(&mut self, enabled: bool, now_ms: TimestampMs) {
        if self.shut_down || enabled == self.touch_mode {
            return;
        }
        self.touch_mode = enabled;
        self.classifier.reset();
        self.pairer.reset();
        if !enabled {
            self.stop_all(now_ms);
        }
        tracing::info!(enabled, "Touch mode changed");
    }

    /// Set sensitivity (clamped). Takes effect on the next tick; the stroke
    /// distance of a running run is kept until it restarts.
    pub fn set_sensitivity(&mut self, value: f64, _now_ms: TimestampMs) -> Sensitivity {
        if self.shut_down {
            return self.params.sensitivity;
        }
        self.params.sensitivity = Sensitivity::new(value);
        tracing::info!(sensitivity = self.params.sensitivity.get(), "Touch sensitivity set");
        self.params.sensitivity
    }

    /// Set the speed level (clamped) and re-arm a running cadence.
    pub fn set_speed(&mut self, level: i32, now_ms: TimestampMs) -> SpeedLevel {
        if !self.shut_down {
            self.change_speed(SpeedLevel::new(level), now_ms);
        }
        self.params.speed
    }

    pub fn set_auto_resume_enabled(&mut self, enabled: bool) {
        if self.shut_down {
            return;
        }
        self.auto_resume = enabled;
        if !enabled {
            self.guard.cancel();
        }
        tracing::info!(enabled, "Auto-resume changed");
    }

    /// Feed one completed touch. `duration_ms` is the down-to-up duration;
    /// `None` means the touch-down was never seen. Returns the resolved
    /// gesture in touch mode.
    pub fn on_touch_sample(
        &mut self,
        sample: TouchSample,
        duration_ms: Option<i64>,
    ) -> Option<GestureKind> {
        if self.shut_down {
            return None;
        }
        let now_ms = sample.timestamp_ms;

        if !self.touch_mode {
            self.last_touch = Some(sample.position());
            self.on_user_interaction(now_ms);
            return None;
        }

        self.guard.record_touch(now_ms);
        self.guard.supersede(now_ms);

        let (kind, position) = match duration_ms {
            Some(duration) => (
                self.classifier.classify(sample, duration),
                sample.position(),
            ),
            None => self.classifier.classify_unpaired(now_ms),
        };
        self.last_touch = Some(position);

        tracing::debug!(?kind, x = position.x, y = position.y, t = now_ms, "Gesture resolved");
        self.outbox
            .push(EngineEvent::gesture(GestureEvent::new(kind, position, now_ms)));
        self.apply_gesture(kind, position, now_ms);
        Some(kind)
    }

    /// Platform touch-down callback.
    pub fn on_touch_down(&mut self, sample: TouchSample) {
        if self.shut_down {
            return;
        }
        self.pairer.down(sample);
        if self.touch_mode {
            self.guard.record_touch(sample.timestamp_ms);
            self.guard.supersede(sample.timestamp_ms);
            self.classifier.note_position(sample.position());
        } else {
            self.last_touch = Some(sample.position());
            self.on_user_interaction(sample.timestamp_ms);
        }
    }

    /// Platform touch-up callback: pairs with the last touch-down.
    pub fn on_touch_up(&mut self, sample: TouchSample) -> Option<GestureKind> {
        if self.shut_down {
            return None;
        }
        let paired = self.pairer.up(sample);
        self.on_touch_sample(paired.sample, paired.duration_ms)
    }

    /// The host saw the user interacting (no coordinates needed).
    pub fn on_user_interaction(&mut self, now_ms: TimestampMs) {
        if self.shut_down {
            return;
        }
        match self.guard.observe(now_ms, self.scheduler.state()) {
            GuardAction::Pause => {
                let transition = self.scheduler.pause();
                self.emit_transition(now_ms, transition);
                if !self.auto_resume {
                    self.guard.cancel();
                }
            }
            GuardAction::Extend => {
                tracing::debug!(t = now_ms, "Pending resume pushed back");
            }
            GuardAction::None => {}
        }
    }

    pub fn is_user_interacting(&self, now_ms: TimestampMs) -> bool {
        self.guard.is_user_interacting(now_ms)
    }

    /// Resume a paused run, or start a touch run at the last recorded touch
    /// position when idle. No-op while running or with auto-resume off.
    pub fn resume_from_last_position(&mut self, now_ms: TimestampMs) {
        if self.shut_down {
            return;
        }
        if !self.auto_resume {
            tracing::debug!("Resume ignored, auto-resume disabled");
            return;
        }
        match self.scheduler.state() {
            ScrollState::Running => {}
            ScrollState::PausedForInteraction => {
                self.guard.cancel();
                let transition = self.scheduler.resume(now_ms, self.params, self.last_touch);
                self.emit_transition(now_ms, transition);
            }
            ScrollState::Idle => match self.last_touch {
                Some(position) => {
                    let transition = self.scheduler.restart(
                        now_ms,
                        ScrollOrigin::touch(position, false),
                        self.params,
                    );
                    self.emit_transition(now_ms, transition);
                }
                None => tracing::debug!("Resume ignored, no touch position recorded"),
            },
        }
    }

    /// Start autoscroll independent of touch mode. No-op while running.
    pub fn start_autoscroll(&mut self, now_ms: TimestampMs) {
        if self.shut_down || self.scheduler.state() == ScrollState::Running {
            return;
        }
        self.guard.cancel();
        let transition = self
            .scheduler
            .start(now_ms, ScrollOrigin::manual(), self.params);
        self.emit_transition(now_ms, transition);
    }

    /// Stop all autoscroll and cancel every pending timer.
    pub fn stop_autoscroll(&mut self, now_ms: TimestampMs) {
        if self.shut_down {
            return;
        }
        self.stop_all(now_ms);
    }

    /// Stop everything for good. Later calls are ignored and no timer can
    /// fire afterwards.
    pub fn shutdown(&mut self, now_ms: TimestampMs) {
        if self.shut_down {
            return;
        }
        self.stop_all(now_ms);
        self.touch_mode = false;
        self.classifier.reset();
        self.pairer.reset();
        self.shut_down = true;
        tracing::info!("Controller shut down");
    }

    /// Earliest pending deadline across all timers.
    pub fn next_deadline(&self) -> Option<TimestampMs> {
        [
            self.tap_confirm.deadline(),
            self.guard.next_deadline(),
            self.scheduler.next_deadline(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    /// Fire every deadline up to and including `now_ms`, in order.
    pub fn advance_to(&mut self, now_ms: TimestampMs) {
        while let Some(deadline) = self.next_deadline().filter(|d| *d <= now_ms) {
            if !self.fire_due(deadline) {
                break;
            }
        }
    }

    /// Take everything emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.outbox)
    }

    fn fire_due(&mut self, now_ms: TimestampMs) -> bool {
        let mut fired = false;

        if self.tap_confirm.fire(now_ms) {
            fired = true;
            if let Some(position) = self.pending_tap.take() {
                self.apply_single_tap(position, now_ms);
            }
        }

        if let Some(decision) = self.guard.fire(now_ms) {
            fired = true;
            match decision {
                ResumeDecision::Resume => self.resume_from_last_position(now_ms),
                ResumeDecision::Wait => tracing::debug!(t = now_ms, "User still interacting"),
            }
        }

        if let Some(command) = self.scheduler.fire(now_ms, self.params) {
            fired = true;
            self.outbox.push(EngineEvent::scroll(now_ms, command));
        }

        fired
    }

    fn apply_gesture(&mut self, kind: GestureKind, position: Position, now_ms: TimestampMs) {
        match kind {
            GestureKind::SingleTap => {
                if self.tap_confirm_ms == 0 {
                    self.apply_single_tap(position, now_ms);
                } else {
                    self.pending_tap = Some(position);
                    self.tap_confirm.arm(now_ms, self.tap_confirm_ms);
                }
            }
            GestureKind::DoubleTap => {
                self.cancel_pending_tap();
                self.guard.cancel();
                if self.is_scrolling_from_touch() {
                    let transition = self.scheduler.stop();
                    self.emit_transition(now_ms, transition);
                } else {
                    self.start_from_touch(position, true, now_ms);
                }
            }
            GestureKind::LongPress => {
                self.change_speed(self.params.speed.cycled(), now_ms);
                if self.scheduler.state() == ScrollState::Running {
                    let adaptive = self.scheduler.origin().is_some_and(|o| o.adaptive);
                    self.start_from_touch(position, adaptive, now_ms);
                }
            }
            GestureKind::SwipeUp => self.change_speed(self.params.speed.faster(), now_ms),
            GestureKind::SwipeDown => self.change_speed(self.params.speed.slower(), now_ms),
        }
    }

    fn apply_single_tap(&mut self, position: Position, now_ms: TimestampMs) {
        let running_from_touch = self.scheduler.state() == ScrollState::Running
            && self.scheduler.origin().is_some_and(|o| o.is_touch());
        if running_from_touch {
            let transition = self.scheduler.pause();
            self.emit_transition(now_ms, transition);
            if self.auto_resume {
                self.guard.arm_resume(now_ms);
            }
        } else {
            self.guard.cancel();
            self.start_from_touch(position, false, now_ms);
        }
    }

    fn start_from_touch(&mut self, position: Position, adaptive: bool, now_ms: TimestampMs) {
        let transition =
            self.scheduler
                .restart(now_ms, ScrollOrigin::touch(position, adaptive), self.params);
        self.emit_transition(now_ms, transition);
    }

    fn change_speed(&mut self, speed: SpeedLevel, now_ms: TimestampMs) {
        if speed == self.params.speed {
            return;
        }
        self.params.speed = speed;
        tracing::info!(speed = speed.get(), label = speed.label(), "Scroll speed changed");
        self.outbox.push(EngineEvent::speed_changed(now_ms, speed));
        self.scheduler.retune(now_ms, self.params);
    }

    fn cancel_pending_tap(&mut self) {
        self.tap_confirm.cancel();
        self.pending_tap = None;
    }

    fn stop_all(&mut self, now_ms: TimestampMs) {
        self.cancel_pending_tap();
        self.guard.cancel();
        let transition = self.scheduler.stop();
        self.emit_transition(now_ms, transition);
    }

    fn emit_transition(&mut self, now_ms: TimestampMs, transition: Option<Transition>) {
        if let Some(Transition { from, to }) = transition {
            self.outbox.push(EngineEvent::state_changed(now_ms, from, to));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use echoscroll_model::event::EngineEventKind;
    use proptest::prelude::*;

    fn config(tap_confirm_ms: u64) -> AppConfig {
        let mut config = AppConfig::default();
        config.gesture.tap_confirm_ms = tap_confirm_ms;
        config.scroll.screen_height = 2_000.0;
        config
    }

    fn touch_controller(tap_confirm_ms: u64) -> TouchScrollController {
        let mut controller = TouchScrollController::new(&config(tap_confirm_ms));
        controller.set_touch_mode_enabled(true, 0);
        controller
    }

    fn tap(c: &mut TouchScrollController, x: f64, y: f64, t: i64) -> Option<GestureKind> {
        c.on_touch_sample(TouchSample::new(x, y, t), Some(60))
    }

    fn scroll_times(events: &[EngineEvent]) -> Vec<i64> {
        events
            .iter()
            .filter(|e| e.as_scroll().is_some())
            .map(|e| e.timestamp_ms)
            .collect()
    }

    fn transitions(events: &[EngineEvent]) -> Vec<(ScrollState, ScrollState)> {
        events.iter().filter_map(|e| e.as_state_change()).collect()
    }

    #[test]
    fn single_tap_starts_after_confirmation() {
        let mut c = touch_controller(300);
        assert_eq!(tap(&mut c, 500.0, 1_000.0, 1_000), Some(GestureKind::SingleTap));
        assert_eq!(c.state(), ScrollState::Idle);
        c.advance_to(1_300);
        assert_eq!(c.state(), ScrollState::Running);
        assert_eq!(c.next_deadline(), Some(3_300));

        let events = c.drain_events();
        assert!(matches!(
            events[0].kind,
            EngineEventKind::Gesture {
                gesture: GestureKind::SingleTap,
                ..
            }
        ));
        assert_eq!(
            transitions(&events),
            vec![(ScrollState::Idle, ScrollState::Running)]
        );
    }

    #[test]
    fn double_tap_from_idle_starts_adaptive() {
        let mut c = touch_controller(300);
        c.set_sensitivity(0.8, 0);
        c.set_speed(3, 0);
        tap(&mut c, 500.0, 1_800.0, 1_000);
        assert_eq!(tap(&mut c, 500.0, 1_800.0, 1_150), Some(GestureKind::DoubleTap));
        assert_eq!(c.state(), ScrollState::Running);
        // 2000 * (0.5 + 0.9 * 0.8)
        assert_eq!(c.next_deadline(), Some(1_150 + 2_440));
        c.advance_to(10_000);
        assert_eq!(c.state(), ScrollState::Running);
        let events = c.drain_events();
        assert_eq!(scroll_times(&events)[..2], [3_590, 6_030]);
    }

    #[test]
    fn double_tap_while_touch_scrolling_stops() {
        let mut c = touch_controller(0);
        tap(&mut c, 500.0, 500.0, 0);
        assert_eq!(c.state(), ScrollState::Running);
        tap(&mut c, 500.0, 500.0, 5_000);
        assert_eq!(c.state(), ScrollState::PausedForInteraction);
        assert_eq!(tap(&mut c, 500.0, 500.0, 5_100), Some(GestureKind::DoubleTap));
        assert_eq!(c.state(), ScrollState::Idle);
        assert_eq!(c.next_deadline(), None);
    }

    #[test]
    fn tap_pauses_then_guard_resumes() {
        let mut c = touch_controller(0);
        tap(&mut c, 500.0, 500.0, 0);
        tap(&mut c, 500.0, 500.0, 1_000);
        assert_eq!(c.state(), ScrollState::PausedForInteraction);
        c.advance_to(3_999);
        assert_eq!(c.state(), ScrollState::PausedForInteraction);
        c.advance_to(4_000);
        assert_eq!(c.state(), ScrollState::Running);
        assert_eq!(
            transitions(&c.drain_events()),
            vec![
                (ScrollState::Idle, ScrollState::Running),
                (ScrollState::Running, ScrollState::PausedForInteraction),
                (ScrollState::PausedForInteraction, ScrollState::Running),
            ]
        );
    }

    #[test]
    fn tap_while_paused_restarts_at_tap() {
        let mut c = touch_controller(0);
        tap(&mut c, 500.0, 500.0, 0);
        tap(&mut c, 500.0, 500.0, 1_000);
        tap(&mut c, 500.0, 520.0, 1_800);
        assert_eq!(c.state(), ScrollState::Running);
        assert!(!c.guard().resume_pending());
        assert_eq!(
            c.scheduler().origin().and_then(|o| o.position),
            Some(Position::new(500.0, 520.0))
        );
    }

    #[test]
    fn long_press_cycles_and_restarts_cadence() {
        let mut c = touch_controller(0);
        c.set_speed(5, 0);
        tap(&mut c, 500.0, 500.0, 0);
        assert_eq!(c.next_deadline(), Some(1_000));
        let kind = c.on_touch_sample(TouchSample::new(500.0, 520.0, 400), Some(700));
        assert_eq!(kind, Some(GestureKind::LongPress));
        assert_eq!(c.speed().get(), 1);
        assert_eq!(c.state(), ScrollState::Running);
        assert_eq!(c.next_deadline(), Some(3_400));
        let speed_events: Vec<_> = c
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e.kind, EngineEventKind::SpeedChanged { .. }))
            .collect();
        assert_eq!(speed_events.len(), 2);
    }

    #[test]
    fn swipes_step_speed_with_clamping() {
        let mut c = touch_controller(0);
        c.set_speed(4, 0);
        tap(&mut c, 100.0, 1_000.0, 0);
        c.stop_autoscroll(10);
        assert_eq!(tap(&mut c, 100.0, 700.0, 1_000), Some(GestureKind::SwipeUp));
        assert_eq!(c.speed().get(), 5);
        assert_eq!(tap(&mut c, 100.0, 400.0, 2_000), Some(GestureKind::SwipeUp));
        assert_eq!(c.speed().get(), 5);
        assert_eq!(tap(&mut c, 100.0, 900.0, 3_000), Some(GestureKind::SwipeDown));
        assert_eq!(c.speed().get(), 4);
        assert_eq!(c.state(), ScrollState::Idle);
    }

    #[test]
    fn speed_change_mid_run_uses_new_delay() {
        let mut c = TouchScrollController::new(&config(0));
        c.set_speed(1, 0);
        c.start_autoscroll(0);
        assert_eq!(c.next_deadline(), Some(3_000));
        c.advance_to(3_000);
        assert_eq!(c.next_deadline(), Some(6_000));
        c.set_speed(5, 3_200);
        assert_eq!(c.next_deadline(), Some(4_200));
        c.advance_to(6_000);
        assert_eq!(scroll_times(&c.drain_events()), vec![3_000, 4_200, 5_200]);
    }

    #[test]
    fn setters_clamp() {
        let mut c = TouchScrollController::default();
        assert_eq!(c.set_speed(0, 0).get(), 1);
        assert_eq!(c.set_speed(99, 0).get(), 5);
        assert_eq!(c.set_sensitivity(3.0, 0).get(), 1.0);
        assert_eq!(c.set_sensitivity(-1.0, 0).get(), 0.0);
    }

    #[test]
    fn touches_without_touch_mode_pause_manual_scrolling() {
        let mut c = TouchScrollController::new(&config(0));
        c.start_autoscroll(0);
        assert_eq!(c.on_touch_sample(TouchSample::new(1.0, 1.0, 500), Some(50)), None);
        assert_eq!(c.state(), ScrollState::PausedForInteraction);
        assert!(c.is_user_interacting(2_499));
        // New interaction at 2500 pushes the resume from 3500 to 5500.
        c.on_user_interaction(2_500);
        c.advance_to(5_499);
        assert_eq!(c.state(), ScrollState::PausedForInteraction);
        c.advance_to(5_500);
        assert_eq!(c.state(), ScrollState::Running);
        assert_eq!(c.scheduler().origin().map(|o| o.is_touch()), Some(false));
    }

    #[test]
    fn auto_resume_off_keeps_pause() {
        let mut c = TouchScrollController::new(&config(0));
        c.set_auto_resume_enabled(false);
        c.start_autoscroll(0);
        c.on_user_interaction(100);
        assert!(!c.guard().resume_pending());
        c.advance_to(60_000);
        assert_eq!(c.state(), ScrollState::PausedForInteraction);
        c.resume_from_last_position(60_000);
        assert_eq!(c.state(), ScrollState::PausedForInteraction);
    }

    #[test]
    fn disabling_touch_mode_stops_and_forgets() {
        let mut c = touch_controller(300);
        tap(&mut c, 500.0, 500.0, 0);
        c.advance_to(300);
        tap(&mut c, 500.0, 500.0, 1_000);
        c.set_touch_mode_enabled(false, 1_050);
        assert_eq!(c.state(), ScrollState::Idle);
        assert_eq!(c.next_deadline(), None);
        assert_eq!(*c.classifier().memory(), Default::default());
        c.advance_to(100_000);
        assert!(scroll_times(&c.drain_events()).is_empty());
    }

    #[test]
    fn resume_from_last_position_starts_idle_touch_run() {
        let mut c = touch_controller(0);
        c.resume_from_last_position(0);
        assert_eq!(c.state(), ScrollState::Idle);
        tap(&mut c, 300.0, 600.0, 100);
        c.stop_autoscroll(200);
        c.resume_from_last_position(1_000);
        assert_eq!(c.state(), ScrollState::Running);
        assert_eq!(
            c.scheduler().origin().and_then(|o| o.position),
            Some(Position::new(300.0, 600.0))
        );
    }

    #[test]
    fn unpaired_touch_up_is_tap_at_last_position() {
        let mut c = touch_controller(0);
        c.on_touch_down(TouchSample::new(40.0, 80.0, 0));
        c.on_touch_up(TouchSample::new(40.0, 80.0, 90));
        c.stop_autoscroll(100);
        let kind = c.on_touch_up(TouchSample::new(900.0, 1_900.0, 5_000));
        assert_eq!(kind, Some(GestureKind::SingleTap));
        assert_eq!(c.last_touch_position(), Some(Position::new(40.0, 80.0)));
        assert_eq!(c.state(), ScrollState::Running);
    }

    #[test]
    fn paired_stroke_is_a_swipe() {
        let mut c = touch_controller(0);
        c.on_touch_down(TouchSample::new(300.0, 1_200.0, 0));
        let kind = c.on_touch_up(TouchSample::new(300.0, 800.0, 150));
        assert_eq!(kind, Some(GestureKind::SwipeUp));
        assert_eq!(c.speed().get(), 4);
    }

    #[test]
    fn unbounded_resume_delay_still_advances() {
        let mut config = config(0);
        config.scroll.resume_delay_ms = u64::MAX;
        let mut c = TouchScrollController::new(&config);
        c.start_autoscroll(0);
        c.on_user_interaction(100);
        assert_eq!(c.guard().next_deadline(), Some(i64::MAX));
        c.advance_to(200);
        assert_eq!(c.state(), ScrollState::PausedForInteraction);
        assert_eq!(c.next_deadline(), Some(i64::MAX));
    }

    #[test]
    fn shutdown_cancels_everything() {
        let mut c = touch_controller(300);
        tap(&mut c, 1.0, 1.0, 0);
        c.start_autoscroll(10);
        c.shutdown(20);
        assert_eq!(c.state(), ScrollState::Idle);
        assert_eq!(c.next_deadline(), None);
        assert!(c.is_shut_down());
        c.start_autoscroll(30);
        tap(&mut c, 1.0, 1.0, 40);
        c.advance_to(100_000);
        assert_eq!(c.state(), ScrollState::Idle);
        assert!(scroll_times(&c.drain_events()).is_empty());
    }

    fn arb_step() -> impl Strategy<Value = (u8, f64, f64, i64)> {
        (0u8..9, 0.0f64..1_080.0, 0.0f64..2_000.0, 0i64..4_000)
    }

    proptest! {
        #[test]
        fn random_input_keeps_state_and_timers_consistent(
            steps in prop::collection::vec(arb_step(), 1..60),
        ) {
            let mut c = touch_controller(300);
            let mut now = 0i64;
            let mut last_event_ms = 0i64;
            for (op, x, y, gap) in steps {
                now += gap;
                c.advance_to(now);
                match op {
                    0 => c.on_touch_down(TouchSample::new(x, y, now)),
                    1 => { c.on_touch_up(TouchSample::new(x, y, now)); }
                    2 => { c.on_touch_sample(TouchSample::new(x, y, now), Some(gap % 900)); }
                    3 => c.on_user_interaction(now),
                    4 => { c.set_speed((gap % 9) as i32 - 2, now); }
                    5 => c.start_autoscroll(now),
                    6 => c.stop_autoscroll(now),
                    7 => c.resume_from_last_position(now),
                    _ => c.set_touch_mode_enabled(gap % 2 == 0, now),
                }

                let running = c.state() == ScrollState::Running;
                prop_assert_eq!(running, c.scheduler().next_deadline().is_some());
                if c.state() == ScrollState::Idle {
                    prop_assert!(!c.guard().resume_pending());
                }
                prop_assert!((1..=5).contains(&c.speed().get()));
                if let Some(deadline) = c.next_deadline() {
                    prop_assert!(deadline > now);
                }
                for event in c.drain_events() {
                    prop_assert!(event.timestamp_ms >= last_event_ms);
                    prop_assert!(event.timestamp_ms <= now);
                    last_event_ms = event.timestamp_ms;
                }
            }
        }
    }
}
