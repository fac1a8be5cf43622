//! Inbound input records.
//!
//! A trace of everything that reaches the engine from outside: touch
//! down/up callbacks, pre-paired taps, interaction hints, and setting
//! changes. One JSON object per line, `#` lines are comments.

use serde::{Deserialize, Serialize};

use crate::touch::{TimestampMs, TouchSample};

/// A single timestamped input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputRecord {
    /// Milliseconds on the engine timeline.
    #[serde(rename = "t")]
    pub timestamp_ms: TimestampMs,

    #[serde(flatten)]
    pub kind: InputKind,
}

/// Discriminated union of input types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputKind {
    /// Finger touched the screen.
    Down { x: f64, y: f64 },

    /// Finger left the screen.
    Up { x: f64, y: f64 },

    /// A touch already paired upstream, with its down-to-up duration if known.
    Tap {
        x: f64,
        y: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        duration_ms: Option<i64>,
    },

    /// The host observed user activity without coordinates.
    Interaction {},

    /// Touch control mode toggled.
    TouchMode { enabled: bool },

    /// Speed level requested (clamped by the engine).
    Speed { level: i32 },

    /// Touch sensitivity requested (clamped by the engine).
    Sensitivity { value: f64 },

    /// Auto-resume after interaction toggled.
    AutoResume { enabled: bool },

    /// Start autoscroll independent of touch mode.
    Start {},

    /// Stop all autoscroll.
    Stop {},

    /// Resume from the last recorded touch position.
    Resume {},
}

impl InputRecord {
    pub fn new(timestamp_ms: TimestampMs, kind: InputKind) -> Self {
        Self { timestamp_ms, kind }
    }

    pub fn down(timestamp_ms: TimestampMs, x: f64, y: f64) -> Self {
        Self::new(timestamp_ms, InputKind::Down { x, y })
    }

    pub fn up(timestamp_ms: TimestampMs, x: f64, y: f64) -> Self {
        Self::new(timestamp_ms, InputKind::Up { x, y })
    }

    pub fn tap(timestamp_ms: TimestampMs, x: f64, y: f64, duration_ms: Option<i64>) -> Self {
        Self::new(timestamp_ms, InputKind::Tap { x, y, duration_ms })
    }

    /// The touch sample carried by this record, if it carries coordinates.
    pub fn touch_sample(&self) -> Option<TouchSample> {
        match self.kind {
            InputKind::Down { x, y } | InputKind::Up { x, y } | InputKind::Tap { x, y, .. } => {
                Some(TouchSample::new(x, y, self.timestamp_ms))
            }
            _ => None,
        }
    }
}

/// Error raised while reading a JSONL stream.
#[derive(Debug, thiserror::Error)]
#[error("line {line}: {source}")]
pub struct JsonlError {
    /// 1-based line number in the input.
    pub line: usize,
    #[source]
    pub source: serde_json::Error,
}

/// Parse JSONL content, skipping blank lines and `#` comments.
pub fn parse_jsonl<T: serde::de::DeserializeOwned>(jsonl: &str) -> Result<Vec<T>, JsonlError> {
    Ok(parse_jsonl_numbered(jsonl)?
        .into_iter()
        .map(|(_, value)| value)
        .collect())
}

/// Like [`parse_jsonl`], but keeps the 1-based source line of every value.
pub fn parse_jsonl_numbered<T: serde::de::DeserializeOwned>(
    jsonl: &str,
) -> Result<Vec<(usize, T)>, JsonlError> {
    jsonl
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line, content)| {
            serde_json::from_str(content)
                .map(|value| (line, value))
                .map_err(|source| JsonlError { line, source })
        })
        .collect()
}

/// Parse input records from JSONL content.
pub fn parse_input_records(jsonl: &str) -> Result<Vec<InputRecord>, JsonlError> {
    parse_jsonl(jsonl)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mixed_trace() {
        let jsonl = "# reading session\n\
            {\"t\":0,\"type\":\"touch_mode\",\"enabled\":true}\n\
            \n\
            {\"t\":100,\"type\":\"down\",\"x\":540.0,\"y\":900.0}\n\
            {\"t\":180,\"type\":\"up\",\"x\":540.0,\"y\":900.0}\n\
            {\"t\":900,\"type\":\"tap\",\"x\":10.0,\"y\":20.0}\n\
            {\"t\":1000,\"type\":\"start\"}\n";
        let records = parse_input_records(jsonl).unwrap();
        assert_eq!(records.len(), 5);
        assert_eq!(records[0].kind, InputKind::TouchMode { enabled: true });
        assert_eq!(
            records[3].kind,
            InputKind::Tap {
                x: 10.0,
                y: 20.0,
                duration_ms: None
            }
        );
        assert_eq!(records[4].kind, InputKind::Start {});
        assert_eq!(
            records[2].touch_sample(),
            Some(TouchSample::new(540.0, 900.0, 180))
        );
        assert_eq!(records[4].touch_sample(), None);
    }

    #[test]
    fn numbered_parse_keeps_source_lines() {
        let jsonl = "# header\n\n{\"t\":0,\"type\":\"start\"}\n# note\n{\"t\":9,\"type\":\"stop\"}\n";
        let records: Vec<(usize, InputRecord)> = parse_jsonl_numbered(jsonl).unwrap();
        let lines: Vec<_> = records.iter().map(|(line, _)| *line).collect();
        assert_eq!(lines, vec![3, 5]);
        assert_eq!(records[1].1.kind, InputKind::Stop {});
    }

    #[test]
    fn reports_offending_line() {
        let jsonl = "{\"t\":0,\"type\":\"stop\"}\n# comment\n{\"t\":5,\"type\":\"wiggle\"}\n";
        let err = parse_input_records(jsonl).unwrap_err();
        assert_eq!(err.line, 3);
    }

    #[test]
    fn tap_omits_missing_duration() {
        let json = serde_json::to_string(&InputRecord::tap(7, 1.0, 2.0, None)).unwrap();
        assert!(!json.contains("duration_ms"));
        let json = serde_json::to_string(&InputRecord::tap(7, 1.0, 2.0, Some(600))).unwrap();
        assert!(json.contains("\"duration_ms\":600"));
    }
}
