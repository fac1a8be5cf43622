//! Drive the engine from stdin on the real clock.
//!
//! Each stdin line is an input record; its `t` is ignored and the runtime
//! clock is used instead. Engine events stream to stdout as JSONL.

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;

use echoscroll_common::config::AppConfig;
use echoscroll_common::SessionClock;
use echoscroll_engine::{EventWriter, ScrollRuntime};
use echoscroll_model::input::InputRecord;

pub async fn run(exit_on_eof: bool, config: &AppConfig) -> anyhow::Result<()> {
    let header = super::stream_header(config, &SessionClock::start());
    let mut writer = EventWriter::from_writer(Box::new(std::io::stdout()), &header)?;

    let mut runtime = ScrollRuntime::spawn(config);
    let mut events = runtime.subscribe();

    let printer = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => {
                    if let Err(e) = writer.write_event(&event).and_then(|_| writer.flush()) {
                        tracing::warn!(error = %e, "Failed to write event");
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Event output fell behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
        writer.events_written()
    });

    eprintln!("Reading input records from stdin, Ctrl+C to stop...");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut line_no = 0usize;
    let mut stdin_open = true;
    loop {
        tokio::select! {
            line = lines.next_line(), if stdin_open => {
                match line? {
                    Some(line) => {
                        line_no += 1;
                        let trimmed = line.trim();
                        if trimmed.is_empty() || trimmed.starts_with('#') {
                            continue;
                        }
                        match serde_json::from_str::<InputRecord>(trimmed) {
                            Ok(record) => runtime.apply(&record.kind)?,
                            Err(e) => tracing::warn!(line = line_no, error = %e, "Skipping bad input record"),
                        }
                    }
                    None if exit_on_eof => break,
                    None => stdin_open = false,
                }
            }
            result = tokio::signal::ctrl_c() => {
                result?;
                break;
            }
        }
    }

    runtime.shutdown().await?;
    drop(runtime);
    let written = printer.await?;
    eprintln!("Stopped after {written} events");

    Ok(())
}
