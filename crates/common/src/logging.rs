//! Tracing setup for the CLI and hosts embedding the engine.
//!
//! Logs always go to stderr: stdout is reserved for event streams.

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;

/// Crates whose spans and events follow the configured level.
const ECHOSCROLL_TARGETS: [&str; 5] = [
    "echoscroll",
    "echoscroll_common",
    "echoscroll_model",
    "echoscroll_gesture",
    "echoscroll_engine",
];

/// Expand a bare level into a directive that applies it to EchoScroll crates
/// only. Dependencies stay at `warn`. Anything that already looks like a
/// directive list is used as-is.
pub fn default_filter(level: &str) -> String {
    let level = level.trim();
    if level.contains('=') || level.contains(',') {
        return level.to_string();
    }
    let level = if level.is_empty() { "info" } else { level };
    std::iter::once("warn".to_string())
        .chain(ECHOSCROLL_TARGETS.iter().map(|t| format!("{t}={level}")))
        .collect::<Vec<_>>()
        .join(",")
}

/// Install the global subscriber. `RUST_LOG` takes precedence over the
/// configured level. Calling it twice keeps the first subscriber.
pub fn init_logging(config: &LoggingConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(&config.level)));

    let builder = fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    let installed = if config.json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.with_target(true).compact().finish())
    };
    if installed.is_ok() {
        tracing::debug!(level = %config.level, json = config.json, "Logging initialized");
    }
}
