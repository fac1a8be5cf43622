//! Speed table: fixed mapping from speed level to scroll delay and label.
//!
//! Pure lookups. Levels outside `[1, 5]` are clamped to the nearest bound.

/// Slowest selectable speed level.
pub const MIN_SPEED_LEVEL: i32 = 1;

/// Fastest selectable speed level.
pub const MAX_SPEED_LEVEL: i32 = 5;

/// Level used when nothing else is configured.
pub const DEFAULT_SPEED_LEVEL: i32 = 3;

/// `(level, delay_ms, label)` for every selectable level.
pub const SPEED_TABLE: [(i32, u64, &str); 5] = [
    (1, 3000, "Very Slow"),
    (2, 2500, "Slow"),
    (3, 2000, "Normal"),
    (4, 1500, "Fast"),
    (5, 1000, "Faster"),
];

/// Clamp an arbitrary level into `[MIN_SPEED_LEVEL, MAX_SPEED_LEVEL]`.
pub fn clamp_speed_level(level: i32) -> i32 {
    level.clamp(MIN_SPEED_LEVEL, MAX_SPEED_LEVEL)
}

/// Row of [`SPEED_TABLE`] for `level`, after clamping.
fn speed_entry(level: i32) -> (i32, u64, &'static str) {
    // Clamped, so the offset is in 0..SPEED_TABLE.len().
    SPEED_TABLE[(clamp_speed_level(level) - MIN_SPEED_LEVEL) as usize]
}

/// Base delay between scroll commands at `level`, in milliseconds.
pub fn delay_for_speed(level: i32) -> u64 {
    speed_entry(level).1
}

/// Human-readable label for `level`.
pub fn label_for_speed(level: i32) -> &'static str {
    speed_entry(level).2
}
