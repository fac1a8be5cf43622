//! Replay a trace on virtual time.

use std::path::PathBuf;

use echoscroll_common::config::AppConfig;
use echoscroll_common::SessionClock;
use echoscroll_engine::{EventWriter, Replayer};

pub fn run(
    trace: PathBuf,
    output: Option<PathBuf>,
    tail_ms: u64,
    config: &AppConfig,
) -> anyhow::Result<()> {
    let content = super::read_trace(&trace)?;
    let report = Replayer::new(config)
        .with_tail(tail_ms)
        .run_jsonl(&content)
        .map_err(|e| anyhow::anyhow!("Failed to replay {}: {e}", trace.display()))?;

    let header = super::stream_header(config, &SessionClock::start());
    let mut writer = match &output {
        Some(path) => EventWriter::create(path, &header)?,
        None => EventWriter::from_writer(Box::new(std::io::stdout()), &header)?,
    };
    writer.write_all(&report.events)?;
    writer.flush()?;

    // Keep stdout clean for the event stream.
    if let Some(path) = writer.path() {
        println!("Replayed {} records from {}", report.records, trace.display());
        println!(
            "  Events: {} ({} scrolls, {} gestures)",
            report.events.len(),
            report.scroll_count(),
            report.gesture_count()
        );
        println!("  Ended at: {} ms", report.end_ms);
        println!(
            "  Final state: {:?}, speed {} ({})",
            report.final_state,
            report.final_speed.get(),
            report.final_speed.label()
        );
        println!("  Output: {}", path.display());
    } else {
        tracing::info!(
            records = report.records,
            events = report.events.len(),
            scrolls = report.scroll_count(),
            end_ms = report.end_ms,
            "Replay written to stdout"
        );
    }

    Ok(())
}
