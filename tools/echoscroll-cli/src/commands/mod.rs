pub mod classify;
pub mod config;
pub mod live;
pub mod replay;
pub mod speeds;

use std::path::Path;

use echoscroll_common::config::AppConfig;
use echoscroll_common::SessionClock;
use echoscroll_model::event::EventStreamHeader;

/// Read a trace file, with a readable error when it is missing.
pub fn read_trace(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read trace {}: {e}", path.display()))
}

/// Header for an event stream produced with `config`.
pub fn stream_header(config: &AppConfig, clock: &SessionClock) -> EventStreamHeader {
    EventStreamHeader {
        schema_version: "1.0".to_string(),
        epoch_wall: clock.epoch_wall().to_string(),
        screen_height: config.scroll.screen_height,
        density_scale: config.scroll.density_scale,
    }
}
