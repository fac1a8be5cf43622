//! Touch samples and positions.

use serde::{Deserialize, Serialize};

/// Milliseconds on the shared engine timeline.
pub type TimestampMs = i64;

/// A point on screen in device-independent units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Vertical position as a fraction of `screen_height`, clamped to `[0.0, 1.0]`.
    pub fn relative_y(&self, screen_height: f64) -> f64 {
        if screen_height <= 0.0 || !self.y.is_finite() {
            return 0.0;
        }
        (self.y / screen_height).clamp(0.0, 1.0)
    }
}

/// A single touch observation, immutable once created.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchSample {
    pub x: f64,
    pub y: f64,
    #[serde(rename = "t")]
    pub timestamp_ms: TimestampMs,
}

impl TouchSample {
    pub const fn new(x: f64, y: f64, timestamp_ms: TimestampMs) -> Self {
        Self { x, y, timestamp_ms }
    }

    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }
}
