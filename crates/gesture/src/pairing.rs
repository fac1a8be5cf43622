//! Touch-down / touch-up pairing.
//!
//! Platforms report the start and end of a touch separately. The pairer
//! remembers the pending touch-down and, on touch-up, yields one sample at
//! the release point together with the press duration.

use echoscroll_model::touch::TouchSample;

/// A completed touch ready for classification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairedTouch {
    /// Release position and time.
    pub sample: TouchSample,
    /// Down-to-up duration, `None` when no touch-down was seen.
    pub duration_ms: Option<i64>,
    /// Where the finger went down, when known.
    pub down: Option<TouchSample>,
}

/// Matches touch-down callbacks with the following touch-up.
#[derive(Debug, Clone, Default)]
pub struct TouchPairer {
    pending_down: Option<TouchSample>,
}

impl TouchPairer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a touch-down. Returns a previous touch-down that never saw its
    /// touch-up, if any.
    pub fn down(&mut self, sample: TouchSample) -> Option<TouchSample> {
        let orphan = self.pending_down.replace(sample);
        if let Some(orphan) = orphan {
            tracing::debug!(t = orphan.timestamp_ms, "Dropping touch-down without touch-up");
        }
        orphan
    }

    /// Record a touch-up and pair it with the pending touch-down.
    pub fn up(&mut self, sample: TouchSample) -> PairedTouch {
        let down = self.pending_down.take();
        let duration_ms =
            down.map(|down| sample.timestamp_ms.saturating_sub(down.timestamp_ms).max(0));
        PairedTouch {
            sample,
            duration_ms,
            down,
        }
    }

    /// Touch-down still waiting for its touch-up.
    pub fn pending_down(&self) -> Option<&TouchSample> {
        self.pending_down.as_ref()
    }

    pub fn reset(&mut self) {
        self.pending_down = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_down_with_up() {
        let mut pairer = TouchPairer::new();
        assert!(pairer.down(TouchSample::new(10.0, 20.0, 1_000)).is_none());
        let paired = pairer.up(TouchSample::new(12.0, 180.0, 1_640));
        assert_eq!(paired.duration_ms, Some(640));
        assert_eq!(paired.sample.y, 180.0);
        assert_eq!(paired.down.map(|d| d.y), Some(20.0));
        assert!(pairer.pending_down().is_none());
    }

    #[test]
    fn up_without_down_has_no_duration() {
        let mut pairer = TouchPairer::new();
        let paired = pairer.up(TouchSample::new(1.0, 1.0, 50));
        assert_eq!(paired.duration_ms, None);
        assert_eq!(paired.down, None);
    }

    #[test]
    fn second_down_replaces_orphan() {
        let mut pairer = TouchPairer::new();
        pairer.down(TouchSample::new(0.0, 0.0, 0));
        let orphan = pairer.down(TouchSample::new(5.0, 5.0, 300));
        assert_eq!(orphan.map(|o| o.timestamp_ms), Some(0));
        assert_eq!(pairer.up(TouchSample::new(5.0, 5.0, 400)).duration_ms, Some(100));
    }

    #[test]
    fn out_of_order_up_clamps_duration_to_zero() {
        let mut pairer = TouchPairer::new();
        pairer.down(TouchSample::new(0.0, 0.0, 500));
        assert_eq!(pairer.up(TouchSample::new(0.0, 0.0, 450)).duration_ms, Some(0));
    }
}
