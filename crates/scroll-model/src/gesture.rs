//! Gesture kinds and gesture events.

use serde::{Deserialize, Serialize};

use crate::touch::{Position, TimestampMs};

/// The closed set of gestures the classifier can resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureKind {
    SingleTap,
    DoubleTap,
    LongPress,
    SwipeUp,
    SwipeDown,
}

impl GestureKind {
    pub const ALL: [GestureKind; 5] = [
        GestureKind::SingleTap,
        GestureKind::DoubleTap,
        GestureKind::LongPress,
        GestureKind::SwipeUp,
        GestureKind::SwipeDown,
    ];

    /// Short human-readable name for feedback surfaces.
    pub fn label(self) -> &'static str {
        match self {
            GestureKind::SingleTap => "Tap",
            GestureKind::DoubleTap => "Double-tap",
            GestureKind::LongPress => "Long-press",
            GestureKind::SwipeUp => "Swipe up",
            GestureKind::SwipeDown => "Swipe down",
        }
    }
}

impl std::fmt::Display for GestureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A resolved gesture, delivered once to listeners and not retained.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureEvent {
    pub kind: GestureKind,
    pub position: Position,
    pub emitted_at_ms: TimestampMs,
}

impl GestureEvent {
    pub fn new(kind: GestureKind, position: Position, emitted_at_ms: TimestampMs) -> Self {
        Self {
            kind,
            position,
            emitted_at_ms,
        }
    }
}
