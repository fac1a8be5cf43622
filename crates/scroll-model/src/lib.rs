//! EchoScroll Model
//!
//! Defines the data contracts shared by the gesture and scroll crates:
//! - **Touch:** Timestamped touch samples and positions
//! - **Gestures:** The closed set of recognised gestures and their events
//! - **Scroll:** Speed levels, sensitivity, scroll state, and commands
//! - **Speed table:** Fixed mapping from speed level to delay and label
//! - **Records:** Inbound input records and outbound engine events (JSONL)
//!
//! Positions are in device-independent units, timestamps in milliseconds on
//! a single shared timeline.

pub mod event;
pub mod gesture;
pub mod input;
pub mod scroll;
pub mod speed;
pub mod touch;

pub use event::*;
pub use gesture::*;
pub use input::*;
pub use scroll::*;
pub use speed::*;
pub use touch::*;
