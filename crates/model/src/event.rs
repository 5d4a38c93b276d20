//! Input and output event types for the Smoothwheel event streams.
//!
//! Both streams use an append-only JSONL format: one JSON object per line,
//! with optional header lines prefixed by `#`. Timestamps are monotonic
//! nanoseconds since the session clock started.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::ScrollConfig;

/// Monotonic timestamp in nanoseconds since session start.
pub type TimestampNs = u64;

/// Scroll axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Vertical,
    Horizontal,
}

impl Axis {
    /// Both axes, in tick order.
    pub const ALL: [Axis; 2] = [Axis::Vertical, Axis::Horizontal];

    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::Vertical => "vertical",
            Axis::Horizontal => "horizontal",
        }
    }
}

/// Where an input event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSource {
    Keyboard,
    Mouse,
    Wheel,
}

/// Button/key state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonState {
    Down,
    Up,
}

/// A single raw input event with timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputEvent {
    /// Monotonic nanoseconds since session start.
    #[serde(rename = "t")]
    pub timestamp_ns: TimestampNs,

    /// The event payload.
    #[serde(flatten)]
    pub kind: EventKind,
}

/// Discriminated union of raw input payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    /// Wheel rotation on one axis, in device units (detents or hi-res fractions).
    Wheel { axis: Axis, delta: f64 },

    /// Keyboard key, identified by its Linux input key code.
    Key { code: u16, state: ButtonState },

    /// Mouse button, identified by its Linux input button code.
    Button { code: u16, state: ButtonState },
}

impl InputEvent {
    /// Create a wheel event.
    pub fn wheel(timestamp_ns: TimestampNs, axis: Axis, delta: f64) -> Self {
        Self {
            timestamp_ns,
            kind: EventKind::Wheel { axis, delta },
        }
    }

    /// Create a keyboard event.
    pub fn key(timestamp_ns: TimestampNs, code: u16, state: ButtonState) -> Self {
        Self {
            timestamp_ns,
            kind: EventKind::Key { code, state },
        }
    }

    /// Create a mouse button event.
    pub fn button(timestamp_ns: TimestampNs, code: u16, state: ButtonState) -> Self {
        Self {
            timestamp_ns,
            kind: EventKind::Button { code, state },
        }
    }

    /// Timestamp as fractional seconds since session start.
    pub fn timestamp_secs(&self) -> f64 {
        self.timestamp_ns as f64 / 1_000_000_000.0
    }

    /// Source class of this event.
    pub fn source(&self) -> EventSource {
        match self.kind {
            EventKind::Wheel { .. } => EventSource::Wheel,
            EventKind::Key { .. } => EventSource::Keyboard,
            EventKind::Button { .. } => EventSource::Mouse,
        }
    }
}

/// A shaped scroll event produced by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutputEvent {
    /// Tick (or ingestion) time in nanoseconds since session start.
    #[serde(rename = "t")]
    pub timestamp_ns: TimestampNs,

    pub axis: Axis,

    /// Scroll delta in output units, sign already reversed if requested.
    pub delta: f64,

    /// True whenever the value did not come from a 1:1 raw pass-through.
    pub synthetic: bool,

    /// Zero-delta marker emitted once when manual input stops.
    pub tracking_end: bool,
}

impl OutputEvent {
    /// A raw delta delivered without interpolation.
    pub fn pass_through(timestamp_ns: TimestampNs, axis: Axis, delta: f64) -> Self {
        Self {
            timestamp_ns,
            axis,
            delta,
            synthetic: false,
            tracking_end: false,
        }
    }

    /// A value produced by the smoothing pipeline.
    pub fn smoothed(timestamp_ns: TimestampNs, axis: Axis, delta: f64) -> Self {
        Self {
            timestamp_ns,
            axis,
            delta,
            synthetic: true,
            tracking_end: false,
        }
    }

    /// The synthetic tracking-end marker.
    pub fn tracking_end(timestamp_ns: TimestampNs, axis: Axis) -> Self {
        Self {
            timestamp_ns,
            axis,
            delta: 0.0,
            synthetic: true,
            tracking_end: true,
        }
    }

    /// Timestamp as fractional seconds since session start.
    pub fn timestamp_secs(&self) -> f64 {
        self.timestamp_ns as f64 / 1_000_000_000.0
    }
}

/// Header written as the first (commented) line of an output stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputStreamHeader {
    /// Schema version for forward compatibility.
    pub schema_version: String,

    /// Wall-clock time at session start (ISO 8601).
    pub epoch_wall: String,

    /// Tick cadence the engine was driven at.
    pub tick_hz: u32,

    /// The resolved scroll configuration in effect when the stream opened.
    pub config: ScrollConfig,
}

/// Parse a JSONL stream (one JSON object per line), skipping blank lines
/// and `#` header lines.
pub fn parse_jsonl<T: DeserializeOwned>(jsonl: &str) -> Result<Vec<T>, serde_json::Error> {
    jsonl
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(serde_json::from_str)
        .collect()
}

/// Serialize input events to JSONL format.
pub fn serialize_events(events: &[InputEvent]) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    for event in events {
        output.push_str(&serde_json::to_string(event)?);
        output.push('\n');
    }
    Ok(output)
}
