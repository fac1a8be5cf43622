//! Application configuration.
//!
//! Every field has a default so a partial JSON file only overrides what it
//! names. Settings are read-only here: runtime changes made through the
//! controller are not written back.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{EchoscrollError, EchoscrollResult};

/// Upper bound for every millisecond setting (one day).
pub const MAX_DURATION_MS: u64 = 86_400_000;

/// Global application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Gesture recognition thresholds.
    pub gesture: GestureConfig,

    /// Scroll cadence and interaction settings.
    pub scroll: ScrollConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Thresholds used by the gesture classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Maximum gap between two taps for them to form a double tap (ms).
    pub double_tap_ms: u64,

    /// Touch-down-to-up duration above which a touch is a long press (ms).
    pub long_press_ms: u64,

    /// Vertical displacement above which a touch is a swipe (device-independent units).
    pub swipe_min_distance: f64,

    /// How long a single tap waits for a possible second tap before it takes
    /// effect (ms). `0` applies single taps immediately.
    pub tap_confirm_ms: u64,
}

/// Scroll scheduling parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    /// Speed level at startup, clamped to `[1, 5]`.
    pub initial_speed: i32,

    /// Touch sensitivity at startup, clamped to `[0.0, 1.0]`.
    pub initial_sensitivity: f64,

    /// Viewport height in the same units as touch coordinates.
    pub screen_height: f64,

    /// Platform density scale applied to `base_distance_dp`.
    pub density_scale: f64,

    /// Scroll distance before the sensitivity factor, in dp.
    pub base_distance_dp: f64,

    /// Duration of each emitted scroll stroke (ms).
    pub stroke_duration_ms: u64,

    /// A touch newer than this counts as ongoing user interaction (ms).
    pub interaction_window_ms: u64,

    /// Delay before autoscroll resumes after yielding to the user (ms).
    pub resume_delay_ms: u64,

    /// Whether autoscroll resumes by itself after an interaction pause.
    pub auto_resume: bool,

    /// Emit `Up` scroll commands instead of `Down`.
    pub reverse_direction: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "echoscroll_engine=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            double_tap_ms: 300,
            long_press_ms: 500,
            swipe_min_distance: 100.0,
            tap_confirm_ms: 300,
        }
    }
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            initial_speed: 3,
            initial_sensitivity: 0.5,
            screen_height: 2340.0,
            density_scale: 1.0,
            base_distance_dp: 200.0,
            stroke_duration_ms: 300,
            interaction_window_ms: 2000,
            resume_delay_ms: 3000,
            auto_resume: true,
            reverse_direction: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl ScrollConfig {
    /// Base scroll distance in device units for the configured density.
    pub fn base_distance(&self) -> f64 {
        self.base_distance_dp * self.density_scale
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!("Failed to load config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Load config from an explicit path. Unlike [`AppConfig::load`], any
    /// failure is reported.
    pub fn load_from(path: &Path) -> EchoscrollResult<Self> {
        if !path.exists() {
            return Err(EchoscrollError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| EchoscrollError::config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> EchoscrollResult<()> {
        if !(self.scroll.screen_height > 0.0) {
            return Err(EchoscrollError::config("scroll.screen_height must be positive"));
        }
        if !(self.scroll.density_scale > 0.0) {
            return Err(EchoscrollError::config("scroll.density_scale must be positive"));
        }
        if self.scroll.resume_delay_ms == 0 {
            return Err(EchoscrollError::config("scroll.resume_delay_ms must be non-zero"));
        }
        let durations = [
            ("gesture.double_tap_ms", self.gesture.double_tap_ms),
            ("gesture.long_press_ms", self.gesture.long_press_ms),
            ("gesture.tap_confirm_ms", self.gesture.tap_confirm_ms),
            ("scroll.stroke_duration_ms", self.scroll.stroke_duration_ms),
            ("scroll.interaction_window_ms", self.scroll.interaction_window_ms),
            ("scroll.resume_delay_ms", self.scroll.resume_delay_ms),
        ];
        if let Some((name, _)) = durations.iter().find(|(_, ms)| *ms > MAX_DURATION_MS) {
            return Err(EchoscrollError::config(format!(
                "{name} must be at most {MAX_DURATION_MS} ms"
            )));
        }
        Ok(())
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("echoscroll").join("config.json")
}
