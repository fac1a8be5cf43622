//! Outbound engine events.
//!
//! Everything the engine tells the outside world (scroll commands, gesture
//! notifications, state transitions, speed changes) is one [`EngineEvent`].
//! A JSONL stream of these is also the cross-process serialization format.

use serde::{Deserialize, Serialize};

use crate::gesture::{GestureEvent, GestureKind};
use crate::input::{parse_jsonl, JsonlError};
use crate::scroll::{ScrollCommand, ScrollState, SpeedLevel};
use crate::touch::{Position, TimestampMs};

/// A single emitted event with timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineEvent {
    /// Milliseconds on the engine timeline.
    #[serde(rename = "t")]
    pub timestamp_ms: TimestampMs,

    /// The event payload.
    #[serde(flatten)]
    pub kind: EngineEventKind,
}

/// Discriminated union of event types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineEventKind {
    /// One scroll to inject now.
    Scroll { command: ScrollCommand },

    /// A gesture was resolved.
    Gesture {
        gesture: GestureKind,
        position: Position,
    },

    /// Scroll state transition.
    StateChanged { from: ScrollState, to: ScrollState },

    /// Speed level changed.
    SpeedChanged { level: SpeedLevel, label: String },
}

/// Metadata written as the first (comment) line of an event stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventStreamHeader {
    /// Schema version for forward compatibility.
    pub schema_version: String,

    /// Wall-clock time at timeline zero (ISO 8601).
    pub epoch_wall: String,

    /// Viewport height used for adaptive delays.
    pub screen_height: f64,

    /// Density scale used for scroll distances.
    pub density_scale: f64,
}

impl EngineEvent {
    pub fn scroll(timestamp_ms: TimestampMs, command: ScrollCommand) -> Self {
        Self {
            timestamp_ms,
            kind: EngineEventKind::Scroll { command },
        }
    }

    pub fn gesture(event: GestureEvent) -> Self {
        Self {
            timestamp_ms: event.emitted_at_ms,
            kind: EngineEventKind::Gesture {
                gesture: event.kind,
                position: event.position,
            },
        }
    }

    pub fn state_changed(timestamp_ms: TimestampMs, from: ScrollState, to: ScrollState) -> Self {
        Self {
            timestamp_ms,
            kind: EngineEventKind::StateChanged { from, to },
        }
    }

    pub fn speed_changed(timestamp_ms: TimestampMs, level: SpeedLevel) -> Self {
        Self {
            timestamp_ms,
            kind: EngineEventKind::SpeedChanged {
                level,
                label: level.label().to_string(),
            },
        }
    }

    /// The scroll command, if this is a scroll event.
    pub fn as_scroll(&self) -> Option<&ScrollCommand> {
        match &self.kind {
            EngineEventKind::Scroll { command } => Some(command),
            _ => None,
        }
    }

    /// The gesture notification, if this is a gesture event.
    pub fn as_gesture(&self) -> Option<GestureEvent> {
        match self.kind {
            EngineEventKind::Gesture { gesture, position } => {
                Some(GestureEvent::new(gesture, position, self.timestamp_ms))
            }
            _ => None,
        }
    }

    /// The `(from, to)` pair, if this is a state transition.
    pub fn as_state_change(&self) -> Option<(ScrollState, ScrollState)> {
        match self.kind {
            EngineEventKind::StateChanged { from, to } => Some((from, to)),
            _ => None,
        }
    }
}

/// Serialize events to JSONL format.
pub fn serialize_events(events: &[EngineEvent]) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    for event in events {
        output.push_str(&serde_json::to_string(event)?);
        output.push('\n');
    }
    Ok(output)
}

/// Parse events from JSONL content (one JSON object per line).
pub fn parse_events(jsonl: &str) -> Result<Vec<EngineEvent>, JsonlError> {
    parse_jsonl(jsonl)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scroll::ScrollDirection;

    #[test]
    fn json_format_is_flat() {
        let event = EngineEvent::scroll(
            2000,
            ScrollCommand {
                direction: ScrollDirection::Down,
                distance: 150,
                duration_ms: 300,
            },
        );
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"t\":2000"));
        assert!(json.contains("\"type\":\"scroll\""));
        assert!(json.contains("\"direction\":\"down\""));
        assert!(json.contains("\"distance\":150"));
    }

    #[test]
    fn parse_skips_header_comment() {
        let jsonl = "# {\"schema_version\":\"1.0\"}\n\
            {\"t\":0,\"type\":\"state_changed\",\"from\":\"idle\",\"to\":\"running\"}\n\
            {\"t\":5,\"type\":\"speed_changed\",\"level\":4,\"label\":\"Fast\"}\n";
        let parsed = parse_events(jsonl).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(
            parsed[0].as_state_change(),
            Some((ScrollState::Idle, ScrollState::Running))
        );
        assert_eq!(parsed[1], EngineEvent::speed_changed(5, SpeedLevel::new(4)));
    }

    #[test]
    fn gesture_event_keeps_its_timestamp() {
        let gesture = GestureEvent::new(GestureKind::LongPress, Position::new(3.0, 4.0), 812);
        let event = EngineEvent::gesture(gesture);
        assert_eq!(event.timestamp_ms, 812);
        assert_eq!(event.as_gesture(), Some(gesture));
        assert_eq!(event.as_scroll(), None);

        let jsonl = serialize_events(&[event.clone()]).unwrap();
        assert_eq!(parse_events(&jsonl).unwrap(), vec![event]);
    }
}
