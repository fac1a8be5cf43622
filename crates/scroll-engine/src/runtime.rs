//! Async host for the controller.
//!
//! The controller is a plain state machine; [`ScrollRuntime`] puts it on a
//! tokio timeline. One driver task sleeps until the earliest deadline (or a
//! wakeup after an input), fires what came due, and broadcasts the events.
//! Inputs and timer firings are serialized through a single mutex, so a
//! tick never interleaves with a touch.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::{broadcast, Notify};
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant};

use echoscroll_common::config::AppConfig;
use echoscroll_common::error::{EchoscrollError, EchoscrollResult};
use echoscroll_model::event::EngineEvent;
use echoscroll_model::input::InputKind;
use echoscroll_model::scroll::{ScrollState, Sensitivity, SpeedLevel};
use echoscroll_model::touch::{TimestampMs, TouchSample};

use crate::controller::TouchScrollController;
use crate::replay::apply_input;

const EVENT_CHANNEL_CAPACITY: usize = 1024;

struct Shared {
    controller: Mutex<TouchScrollController>,
    epoch: Instant,
    wake: Notify,
    events: broadcast::Sender<EngineEvent>,
    stopped: AtomicBool,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, TouchScrollController> {
        self.controller
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn now_ms(&self) -> TimestampMs {
        TimestampMs::try_from(self.epoch.elapsed().as_millis()).unwrap_or(TimestampMs::MAX)
    }

    fn publish(&self, controller: &mut TouchScrollController) {
        for event in controller.drain_events() {
            // No subscribers is fine.
            let _ = self.events.send(event);
        }
    }
}

/// Runs a [`TouchScrollController`] on the tokio clock.
pub struct ScrollRuntime {
    shared: Arc<Shared>,
    driver: Option<JoinHandle<()>>,
}

impl ScrollRuntime {
    /// Start the driver task. Must be called inside a tokio runtime.
    pub fn spawn(config: &AppConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let shared = Arc::new(Shared {
            controller: Mutex::new(TouchScrollController::new(config)),
            epoch: Instant::now(),
            wake: Notify::new(),
            events,
            stopped: AtomicBool::new(false),
        });
        let driver = tokio::spawn(drive(Arc::clone(&shared)));
        tracing::info!("Scroll runtime started");
        Self {
            shared,
            driver: Some(driver),
        }
    }

    /// Receive every event emitted from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.shared.events.subscribe()
    }

    /// Milliseconds since the runtime started.
    pub fn now_ms(&self) -> TimestampMs {
        self.shared.now_ms()
    }

    pub fn is_running(&self) -> bool {
        !self.shared.stopped.load(Ordering::SeqCst)
    }

    /// Run `f` against the controller at the current time. Timers that came
    /// due are fired first; events are published and the driver re-plans
    /// afterwards.
    pub fn with_controller<R>(
        &self,
        f: impl FnOnce(&mut TouchScrollController, TimestampMs) -> R,
    ) -> EchoscrollResult<R> {
        if !self.is_running() {
            return Err(EchoscrollError::runtime("scroll runtime is shut down"));
        }
        let result = {
            let mut controller = self.shared.lock();
            let now = self.shared.now_ms();
            controller.advance_to(now);
            let result = f(&mut controller, now);
            self.shared.publish(&mut controller);
            result
        };
        self.shared.wake.notify_one();
        Ok(result)
    }

    pub fn apply(&self, kind: &InputKind) -> EchoscrollResult<()> {
        self.with_controller(|c, now| apply_input(c, kind, now))
    }

    pub fn on_touch_down(&self, x: f64, y: f64) -> EchoscrollResult<()> {
        self.with_controller(|c, now| c.on_touch_down(TouchSample::new(x, y, now)))
    }

    pub fn on_touch_up(&self, x: f64, y: f64) -> EchoscrollResult<()> {
        self.with_controller(|c, now| {
            c.on_touch_up(TouchSample::new(x, y, now));
        })
    }

    pub fn on_user_interaction(&self) -> EchoscrollResult<()> {
        self.with_controller(|c, now| c.on_user_interaction(now))
    }

    pub fn set_touch_mode_enabled(&self, enabled: bool) -> EchoscrollResult<()> {
        self.with_controller(|c, now| c.set_touch_mode_enabled(enabled, now))
    }

    pub fn set_speed(&self, level: i32) -> EchoscrollResult<SpeedLevel> {
        self.with_controller(|c, now| c.set_speed(level, now))
    }

    pub fn set_sensitivity(&self, value: f64) -> EchoscrollResult<Sensitivity> {
        self.with_controller(|c, now| c.set_sensitivity(value, now))
    }

    pub fn start_autoscroll(&self) -> EchoscrollResult<()> {
        self.with_controller(|c, now| c.start_autoscroll(now))
    }

    pub fn stop_autoscroll(&self) -> EchoscrollResult<()> {
        self.with_controller(|c, now| c.stop_autoscroll(now))
    }

    pub fn state(&self) -> ScrollState {
        self.shared.lock().state()
    }

    /// Stop scrolling, cancel every timer, and wait for the driver to exit.
    pub async fn shutdown(&mut self) -> EchoscrollResult<()> {
        if self.shared.stopped.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        {
            let mut controller = self.shared.lock();
            let now = self.shared.now_ms();
            controller.shutdown(now);
            self.shared.publish(&mut controller);
        }
        self.shared.wake.notify_one();
        if let Some(driver) = self.driver.take() {
            driver
                .await
                .map_err(|e| EchoscrollError::runtime(format!("Driver task failed: {e}")))?;
        }
        tracing::info!("Scroll runtime stopped");
        Ok(())
    }
}

impl Drop for ScrollRuntime {
    fn drop(&mut self) {
        self.shared.stopped.store(true, Ordering::SeqCst);
        self.shared.wake.notify_one();
    }
}

async fn drive(shared: Arc<Shared>) {
    while !shared.stopped.load(Ordering::SeqCst) {
        let deadline = {
            let mut controller = shared.lock();
            controller.advance_to(shared.now_ms());
            shared.publish(&mut controller);
            controller.next_deadline()
        };

        let at = deadline.and_then(|deadline_ms| {
            let offset = Duration::from_millis(u64::try_from(deadline_ms).unwrap_or(0));
            shared.epoch.checked_add(offset)
        });
        match at {
            Some(at) => {
                tokio::select! {
                    _ = tokio::time::sleep_until(at) => {}
                    _ = shared.wake.notified() => {}
                }
            }
            None => shared.wake.notified().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AppConfig {
        let mut config = AppConfig::default();
        config.gesture.tap_confirm_ms = 0;
        config
    }

    async fn next_scroll(rx: &mut broadcast::Receiver<EngineEvent>) -> EngineEvent {
        loop {
            let event = rx.recv().await.unwrap();
            if event.as_scroll().is_some() {
                return event;
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn manual_run_ticks_on_speed_cadence() {
        let mut runtime = ScrollRuntime::spawn(&config());
        let mut rx = runtime.subscribe();
        runtime.start_autoscroll().unwrap();

        let started = rx.recv().await.unwrap();
        assert_eq!(
            started.as_state_change(),
            Some((ScrollState::Idle, ScrollState::Running))
        );

        let first = next_scroll(&mut rx).await;
        assert!(first.timestamp_ms >= 2_000 && first.timestamp_ms < 2_100);
        let second = next_scroll(&mut rx).await;
        assert!(second.timestamp_ms >= 4_000 && second.timestamp_ms < 4_100);

        runtime.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn interaction_pauses_then_resumes() {
        let mut runtime = ScrollRuntime::spawn(&config());
        let mut rx = runtime.subscribe();
        runtime.start_autoscroll().unwrap();
        tokio::time::sleep(Duration::from_millis(500)).await;
        runtime.on_user_interaction().unwrap();
        assert_eq!(runtime.state(), ScrollState::PausedForInteraction);

        let mut resumed_at = None;
        while resumed_at.is_none() {
            let event = rx.recv().await.unwrap();
            let resumed = (ScrollState::PausedForInteraction, ScrollState::Running);
            if event.as_state_change() == Some(resumed) {
                resumed_at = Some(event.timestamp_ms);
            }
        }
        let t = resumed_at.unwrap();
        assert!(t >= 3_500 && t < 3_600);

        runtime.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn speed_change_rearms_sleeping_driver() {
        let mut runtime = ScrollRuntime::spawn(&config());
        let mut rx = runtime.subscribe();
        runtime.set_speed(1).unwrap();
        runtime.start_autoscroll().unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(runtime.set_speed(5).unwrap().get(), 5);

        let first = next_scroll(&mut rx).await;
        assert!(first.timestamp_ms >= 1_200 && first.timestamp_ms < 1_300);

        runtime.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_stops_everything() {
        let mut runtime = ScrollRuntime::spawn(&config());
        runtime.set_touch_mode_enabled(true).unwrap();
        runtime.on_touch_down(100.0, 100.0).unwrap();
        runtime.on_touch_up(100.0, 110.0).unwrap();
        assert_eq!(runtime.state(), ScrollState::Running);

        runtime.shutdown().await.unwrap();
        assert_eq!(runtime.state(), ScrollState::Idle);
        assert!(!runtime.is_running());
        assert!(runtime.start_autoscroll().is_err());
        runtime.shutdown().await.unwrap();
    }
}
