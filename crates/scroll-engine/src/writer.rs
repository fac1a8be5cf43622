//! Append-only JSONL writer for engine events.

use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use echoscroll_common::error::{EchoscrollError, EchoscrollResult};
use echoscroll_model::event::{EngineEvent, EventStreamHeader};

/// Writes events as JSONL, header first as a `#` comment line.
pub struct EventWriter {
    writer: BufWriter<Box<dyn Write + Send>>,
    path: Option<PathBuf>,
    events_written: u64,
}

impl EventWriter {
    /// Create (or truncate) a file and write the header.
    pub fn create(path: impl Into<PathBuf>, header: &EventStreamHeader) -> EchoscrollResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)?;

        let mut writer = Self::from_writer(Box::new(file), header)?;
        writer.path = Some(path);
        Ok(writer)
    }

    /// Write to any sink, e.g. stdout.
    pub fn from_writer(
        sink: Box<dyn Write + Send>,
        header: &EventStreamHeader,
    ) -> EchoscrollResult<Self> {
        let mut writer = BufWriter::new(sink);
        let header_json = serde_json::to_string(header)?;
        writeln!(writer, "# {header_json}")
            .map_err(|e| EchoscrollError::runtime(format!("Failed to write header: {e}")))?;

        Ok(Self {
            writer,
            path: None,
            events_written: 0,
        })
    }

    pub fn write_event(&mut self, event: &EngineEvent) -> EchoscrollResult<()> {
        let json = serde_json::to_string(event)?;
        writeln!(self.writer, "{json}")
            .map_err(|e| EchoscrollError::runtime(format!("Failed to write event: {e}")))?;
        self.events_written += 1;

        if self.events_written % 1000 == 0 {
            self.flush()?;
        }

        Ok(())
    }

    pub fn write_all(&mut self, events: &[EngineEvent]) -> EchoscrollResult<()> {
        events.iter().try_for_each(|event| self.write_event(event))
    }

    pub fn flush(&mut self) -> EchoscrollResult<()> {
        self.writer
            .flush()
            .map_err(|e| EchoscrollError::runtime(format!("Failed to flush events: {e}")))
    }

    pub fn events_written(&self) -> u64 {
        self.events_written
    }

    /// Output file, when writing to one.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl Drop for EventWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}
