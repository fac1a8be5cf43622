//! EchoScroll Engine
//!
//! Turns touch input into a paced stream of scroll commands:
//!
//! - **Scheduler:** one tick deadline, delay from speed level (and touch
//!   height for adaptive runs)
//! - **Guard:** yields to the user and resumes after a quiet period
//! - **Controller:** maps gestures to scheduler actions and owns settings
//! - **Replay / Runtime:** drive the controller from a trace or the tokio clock
//!
//! Everything below the runtime is sans-IO: time is passed in as
//! milliseconds and outputs are collected, never pushed.

pub mod controller;
pub mod guard;
pub mod replay;
pub mod runtime;
pub mod scheduler;
pub mod timer;
pub mod writer;

pub use controller::TouchScrollController;
pub use guard::{GuardAction, InteractionGuard, ResumeDecision};
pub use replay::{apply_input, ReplayReport, Replayer};
pub use runtime::ScrollRuntime;
pub use scheduler::{OriginKind, ScrollOrigin, ScrollParams, ScrollScheduler, SchedulerConfig};
pub use timer::TimerSlot;
pub use writer::EventWriter;
