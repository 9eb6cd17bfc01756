//! Capability values and the notifications published about them.

use serde::{Deserialize, Serialize};

/// Open/close state of a window covering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowCoveringState {
    Up,
    Down,
    Idle,
}

impl WindowCoveringState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Idle => "idle",
        }
    }
}

impl std::fmt::Display for WindowCoveringState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for WindowCoveringState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            "idle" | "stop" => Ok(Self::Idle),
            other => Err(format!("unknown window covering state '{}'", other)),
        }
    }
}

/// Abstract, unit-normalized capability value.
///
/// Positions are floats in `[0, 1]`, measurements are in their physical
/// unit (W, °C). Serialized untagged, so `0.5` and `"up"` both parse.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CapabilityValue {
    Number(f64),
    State(WindowCoveringState),
}

impl CapabilityValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            Self::State(_) => None,
        }
    }

    pub fn as_state(&self) -> Option<WindowCoveringState> {
        match self {
            Self::State(s) => Some(*s),
            Self::Number(_) => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::State(_) => "state",
        }
    }
}

impl From<f64> for CapabilityValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<WindowCoveringState> for CapabilityValue {
    fn from(s: WindowCoveringState) -> Self {
        Self::State(s)
    }
}

impl std::fmt::Display for CapabilityValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(v) => write!(f, "{}", v),
            Self::State(s) => write!(f, "{}", s),
        }
    }
}

impl std::str::FromStr for CapabilityValue {
    type Err = String;

    /// Numbers parse as `Number`, everything else must be a covering state.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(v) = s.trim().parse::<f64>() {
            return Ok(Self::Number(v));
        }
        s.trim().parse::<WindowCoveringState>().map(Self::State)
    }
}

/// Event metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventMetadata {
    /// Component that emitted the event (`router`, `direct`, ...)
    pub source: String,
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
}

impl EventMetadata {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// Notifications published by the translation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DeviceEvent {
    /// A capability has a new abstract value.
    ///
    /// Emitted after a decoded report, after a completed stop request, and
    /// optimistically by direct-channel actions before the device confirms.
    CapabilityChanged {
        device_id: String,
        capability: String,
        value: CapabilityValue,
        /// Unix timestamp in milliseconds
        timestamp: i64,
    },
    /// An outbound command could not be delivered.
    ///
    /// Earlier optimistic `CapabilityChanged` events for the same
    /// capability are not retracted.
    CommandFailed {
        device_id: String,
        capability: String,
        channel: u8,
        error: String,
        /// Unix timestamp in milliseconds
        timestamp: i64,
    },
}

impl DeviceEvent {
    pub fn capability_changed(
        device_id: impl Into<String>,
        capability: impl Into<String>,
        value: impl Into<CapabilityValue>,
    ) -> Self {
        Self::CapabilityChanged {
            device_id: device_id.into(),
            capability: capability.into(),
            value: value.into(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn command_failed(
        device_id: impl Into<String>,
        capability: impl Into<String>,
        channel: u8,
        error: impl Into<String>,
    ) -> Self {
        Self::CommandFailed {
            device_id: device_id.into(),
            capability: capability.into(),
            channel,
            error: error.into(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn device_id(&self) -> &str {
        match self {
            Self::CapabilityChanged { device_id, .. } | Self::CommandFailed { device_id, .. } => {
                device_id
            }
        }
    }

    pub fn capability(&self) -> &str {
        match self {
            Self::CapabilityChanged { capability, .. }
            | Self::CommandFailed { capability, .. } => capability,
        }
    }

    /// Unix timestamp in milliseconds.
    pub fn timestamp(&self) -> i64 {
        match self {
            Self::CapabilityChanged { timestamp, .. }
            | Self::CommandFailed { timestamp, .. } => *timestamp,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::CapabilityChanged { .. } => "CapabilityChanged",
            Self::CommandFailed { .. } => "CommandFailed",
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::CommandFailed { .. })
    }
}
