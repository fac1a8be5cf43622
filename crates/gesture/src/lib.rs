//! EchoScroll Gesture Recognition
//!
//! Turns raw touch input into discrete gestures:
//! - **Pairing:** Match touch-down and touch-up callbacks into one sample
//!   with its press duration
//! - **Classification:** Resolve each sample to exactly one
//!   [`GestureKind`](echoscroll_model::GestureKind)
//!
//! Pure state machines: no timers, no I/O. Time comes from sample timestamps.

pub mod classifier;
pub mod pairing;

pub use classifier::{ClassifierMemory, GestureClassifier};
pub use pairing::{PairedTouch, TouchPairer};
