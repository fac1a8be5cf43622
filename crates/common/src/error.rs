//! Error types shared across EchoScroll crates.
//!
//! The gesture and scroll state machines never fail: out-of-range inputs are
//! clamped. Errors only come from the edges (config files, traces, the event
//! writer, and a runtime that has already been shut down).

use std::path::PathBuf;

/// Top-level error type for EchoScroll operations.
#[derive(Debug, thiserror::Error)]
pub enum EchoscrollError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Trace error at line {line}: {message}")]
    Trace { line: usize, message: String },

    #[error("Runtime error: {message}")]
    Runtime { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias using EchoscrollError.
pub type EchoscrollResult<T> = Result<T, EchoscrollError>;

impl EchoscrollError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn trace(line: usize, msg: impl Into<String>) -> Self {
        Self::Trace {
            line,
            message: msg.into(),
        }
    }

    pub fn runtime(msg: impl Into<String>) -> Self {
        Self::Runtime {
            message: msg.into(),
        }
    }
}
