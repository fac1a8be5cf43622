//! Scroll settings, state, and commands.

use serde::{Deserialize, Serialize};

use crate::speed::{
    clamp_speed_level, delay_for_speed, label_for_speed, DEFAULT_SPEED_LEVEL, MAX_SPEED_LEVEL,
    MIN_SPEED_LEVEL,
};

/// A speed level that is always within `[1, 5]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub struct SpeedLevel(i32);

impl SpeedLevel {
    pub const MIN: SpeedLevel = SpeedLevel(MIN_SPEED_LEVEL);
    pub const MAX: SpeedLevel = SpeedLevel(MAX_SPEED_LEVEL);

    /// Build a level, clamping out-of-range input to the nearest bound.
    pub fn new(level: i32) -> Self {
        Self(clamp_speed_level(level))
    }

    pub fn get(self) -> i32 {
        self.0
    }

    /// One level faster, saturating at the maximum.
    pub fn faster(self) -> Self {
        Self::new(self.0.saturating_add(1))
    }

    /// One level slower, saturating at the minimum.
    pub fn slower(self) -> Self {
        Self::new(self.0.saturating_sub(1))
    }

    /// One level faster, wrapping from the maximum back to the minimum.
    pub fn cycled(self) -> Self {
        if self >= Self::MAX {
            Self::MIN
        } else {
            Self(self.0 + 1)
        }
    }

    pub fn delay_ms(self) -> u64 {
        delay_for_speed(self.0)
    }

    pub fn label(self) -> &'static str {
        label_for_speed(self.0)
    }
}

impl Default for SpeedLevel {
    fn default() -> Self {
        Self(DEFAULT_SPEED_LEVEL)
    }
}

impl From<i32> for SpeedLevel {
    fn from(level: i32) -> Self {
        Self::new(level)
    }
}

impl From<SpeedLevel> for i32 {
    fn from(level: SpeedLevel) -> Self {
        level.0
    }
}

/// Touch sensitivity, always within `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Sensitivity(f64);

impl Sensitivity {
    pub const DEFAULT: f64 = 0.5;

    /// Build a sensitivity, clamping to `[0.0, 1.0]`. NaN maps to the default.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self(Self::DEFAULT);
        }
        Self(value.clamp(0.0, 1.0))
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl Default for Sensitivity {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl From<f64> for Sensitivity {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<Sensitivity> for f64 {
    fn from(value: Sensitivity) -> Self {
        value.0
    }
}

/// Lifecycle state of automatic scrolling. Exactly one holds at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollState {
    #[default]
    Idle,
    Running,
    PausedForInteraction,
}

impl ScrollState {
    pub fn is_active(self) -> bool {
        !matches!(self, ScrollState::Idle)
    }
}

/// Direction content should move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollDirection {
    Up,
    Down,
}

/// A single scroll to perform. Consumed immediately by whatever injects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrollCommand {
    pub direction: ScrollDirection,
    /// Stroke length in device-independent units.
    pub distance: i32,
    pub duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn speed_steps_saturate_and_cycle_wraps() {
        assert_eq!(SpeedLevel::MAX.faster(), SpeedLevel::MAX);
        assert_eq!(SpeedLevel::MIN.slower(), SpeedLevel::MIN);
        assert_eq!(SpeedLevel::MAX.cycled(), SpeedLevel::MIN);
        assert_eq!(SpeedLevel::new(3).cycled().get(), 4);
        assert_eq!(SpeedLevel::default().delay_ms(), 2000);
        assert_eq!(SpeedLevel::new(1).label(), "Very Slow");
    }

    #[test]
    fn deserialization_clamps() {
        let level: SpeedLevel = serde_json::from_str("12").unwrap();
        assert_eq!(level, SpeedLevel::MAX);
        let sensitivity: Sensitivity = serde_json::from_str("-0.4").unwrap();
        assert_eq!(sensitivity.get(), 0.0);
        assert_eq!(serde_json::to_string(&SpeedLevel::new(2)).unwrap(), "2");
    }

    #[test]
    fn nan_sensitivity_falls_back_to_default() {
        assert_eq!(Sensitivity::new(f64::NAN).get(), Sensitivity::DEFAULT);
    }

    #[test]
    fn state_serializes_snake_case() {
        let json = serde_json::to_string(&ScrollState::PausedForInteraction).unwrap();
        assert_eq!(json, "\"paused_for_interaction\"");
        assert!(!ScrollState::Idle.is_active());
    }

    proptest! {
        #[test]
        fn speed_level_snaps_to_nearest_bound(level in any::<i32>()) {
            let expected = if level < 1 { 1 } else if level > 5 { 5 } else { level };
            prop_assert_eq!(SpeedLevel::new(level).get(), expected);
        }

        #[test]
        fn sensitivity_always_in_unit_range(value in proptest::num::f64::ANY) {
            let s = Sensitivity::new(value).get();
            prop_assert!((0.0..=1.0).contains(&s));
        }
    }
}
