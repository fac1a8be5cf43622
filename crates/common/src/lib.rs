//! EchoScroll Common Utilities
//!
//! Shared infrastructure for all EchoScroll crates:
//! - Error types and result aliases
//! - Clock abstractions for the scroll timeline
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
