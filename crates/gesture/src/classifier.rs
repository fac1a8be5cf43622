//! Gesture classifier: maps one touch sample at a time to a gesture.
//!
//! # Policy
//!
//! Evaluated in order, first match wins:
//!
//! 1. **Double tap:** exactly one tap is pending and it resolved less than
//!    `double_tap_ms` ago.
//! 2. **Long press:** the touch-down-to-up duration exceeds `long_press_ms`.
//! 3. **Swipe:** the vertical displacement from the last known position
//!    exceeds `swipe_min_distance`. Moving toward the top is `SwipeUp`.
//! 4. **Single tap:** everything else. Registers a pending tap.
//!
//! Every branch except the single-tap fallthrough clears the pending tap.
//! Without a baseline position (first sample, or after a reset) no swipe is
//! possible.
//!
//! The long-press test compares a press *duration* against the threshold.
//! Absolute event timestamps are only ever compared with each other.

use echoscroll_common::config::GestureConfig;
use echoscroll_model::gesture::GestureKind;
use echoscroll_model::touch::{Position, TimestampMs, TouchSample};

/// Rolling state carried between samples.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClassifierMemory {
    /// Position of the most recent sample (or touch-down baseline).
    pub last_position: Option<Position>,
    /// When the most recent single tap resolved.
    pub last_tap_ms: Option<TimestampMs>,
    /// Single taps still waiting for a partner (0 or 1).
    pub pending_taps: u32,
}

/// Resolves touch samples into gestures.
#[derive(Debug, Clone)]
pub struct GestureClassifier {
    config: GestureConfig,
    memory: ClassifierMemory,
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

impl GestureClassifier {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            memory: ClassifierMemory::default(),
        }
    }

    /// Classify one sample given how long the finger was down.
    ///
    /// Never fails: every input maps to exactly one gesture.
    pub fn classify(&mut self, sample: TouchSample, duration_ms: i64) -> GestureKind {
        let since_last_tap = self
            .memory
            .last_tap_ms
            .map(|tap_ms| sample.timestamp_ms.saturating_sub(tap_ms));

        let kind = if self.memory.pending_taps == 1 && self.within_double_tap(since_last_tap) {
            GestureKind::DoubleTap
        } else if duration_ms > millis(self.config.long_press_ms) {
            GestureKind::LongPress
        } else if let Some(dy) = self.vertical_displacement(&sample) {
            if dy < 0.0 {
                GestureKind::SwipeUp
            } else {
                GestureKind::SwipeDown
            }
        } else {
            self.register_tap(sample.timestamp_ms);
            GestureKind::SingleTap
        };

        if kind != GestureKind::SingleTap {
            self.memory.pending_taps = 0;
        }
        self.memory.last_position = Some(sample.position());

        tracing::trace!(
            ?kind,
            x = sample.x,
            y = sample.y,
            t = sample.timestamp_ms,
            duration_ms,
            pending_taps = self.memory.pending_taps,
            "Classified touch sample"
        );
        kind
    }

    /// Resolve a touch-up that had no matching touch-down.
    ///
    /// Counts as a single tap at the last known position (or the origin when
    /// nothing has been seen yet).
    pub fn classify_unpaired(&mut self, timestamp_ms: TimestampMs) -> (GestureKind, Position) {
        let position = self.memory.last_position.unwrap_or_default();
        self.register_tap(timestamp_ms);
        tracing::debug!(t = timestamp_ms, "Touch-up without touch-down treated as tap");
        (GestureKind::SingleTap, position)
    }

    /// Move the swipe baseline without resolving a gesture (touch-down).
    pub fn note_position(&mut self, position: Position) {
        self.memory.last_position = Some(position);
    }

    /// Forget everything.
    pub fn reset(&mut self) {
        self.memory = ClassifierMemory::default();
    }

    pub fn memory(&self) -> &ClassifierMemory {
        &self.memory
    }

    pub fn last_position(&self) -> Option<Position> {
        self.memory.last_position
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    fn within_double_tap(&self, since_last_tap: Option<i64>) -> bool {
        let window = 0..millis(self.config.double_tap_ms);
        matches!(since_last_tap, Some(gap) if window.contains(&gap))
    }

    fn vertical_displacement(&self, sample: &TouchSample) -> Option<f64> {
        let baseline = self.memory.last_position?;
        let dy = sample.y - baseline.y;
        (dy.abs() > self.config.swipe_min_distance).then_some(dy)
    }

    /// At most one tap waits for a partner; a newer tap replaces it.
    fn register_tap(&mut self, timestamp_ms: TimestampMs) {
        self.memory.pending_taps = 1;
        self.memory.last_tap_ms = Some(timestamp_ms);
    }
}

fn millis(ms: u64) -> i64 {
    i64::try_from(ms).unwrap_or(i64::MAX)
}
