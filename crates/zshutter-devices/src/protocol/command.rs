//! Typed command and report vocabulary of the multi-channel node.
//!
//! Frames are already decoded by the transport; these types only carry the
//! fields the translation layer reads or writes.

use serde::{Deserialize, Serialize};

/// Command classes used by the shutter profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandClass {
    SwitchBinary,
    SwitchMultilevel,
    Meter,
    SensorMultilevel,
}

/// Opaque protocol command identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandId {
    SwitchBinaryGet,
    SwitchBinarySet,
    SwitchBinaryReport,
    SwitchMultilevelGet,
    SwitchMultilevelSet,
    SwitchMultilevelReport,
    SwitchMultilevelStopLevelChange,
    MeterGet,
    MeterReport,
    SensorMultilevelGet,
    SensorMultilevelReport,
}

impl CommandId {
    pub fn command_class(&self) -> CommandClass {
        match self {
            Self::SwitchBinaryGet | Self::SwitchBinarySet | Self::SwitchBinaryReport => {
                CommandClass::SwitchBinary
            }
            Self::SwitchMultilevelGet
            | Self::SwitchMultilevelSet
            | Self::SwitchMultilevelReport
            | Self::SwitchMultilevelStopLevelChange => CommandClass::SwitchMultilevel,
            Self::MeterGet | Self::MeterReport => CommandClass::Meter,
            Self::SensorMultilevelGet | Self::SensorMultilevelReport => {
                CommandClass::SensorMultilevel
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SwitchBinaryGet => "SWITCH_BINARY_GET",
            Self::SwitchBinarySet => "SWITCH_BINARY_SET",
            Self::SwitchBinaryReport => "SWITCH_BINARY_REPORT",
            Self::SwitchMultilevelGet => "SWITCH_MULTILEVEL_GET",
            Self::SwitchMultilevelSet => "SWITCH_MULTILEVEL_SET",
            Self::SwitchMultilevelReport => "SWITCH_MULTILEVEL_REPORT",
            Self::SwitchMultilevelStopLevelChange => "SWITCH_MULTILEVEL_STOP_LEVEL_CHANGE",
            Self::MeterGet => "METER_GET",
            Self::MeterReport => "METER_REPORT",
            Self::SensorMultilevelGet => "SENSOR_MULTILEVEL_GET",
            Self::SensorMultilevelReport => "SENSOR_MULTILEVEL_REPORT",
        }
    }
}

impl std::fmt::Display for CommandId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Binary switch value byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SwitchValue(pub u8);

impl SwitchValue {
    /// "on/enable"
    pub const ON: Self = Self(0xFF);
    /// "off/disable"
    pub const OFF: Self = Self(0x00);
}

/// Transition duration attached to multilevel set commands.
///
/// The profile always lets the device use its configured motor timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DimmingDuration {
    FactoryDefault,
}

/// Payload of an outbound set command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProtocolPayload {
    SwitchBinarySet {
        value: SwitchValue,
    },
    SwitchMultilevelSet {
        /// Target level, `0..=99`
        value: u8,
        duration: DimmingDuration,
    },
}

/// Meter rate type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateType {
    Import,
}

/// Multilevel sensor types the profile understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorType {
    Temperature,
    Luminance,
}

/// Parameters of a get request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GetRequest {
    /// Get without parameters.
    Plain,
    Meter {
        scale: u8,
        rate_type: RateType,
        scale2: u8,
    },
    SensorMultilevel {
        sensor_type: SensorType,
        scale: u8,
    },
}

/// Frame carried by an outbound command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "frame", rename_all = "snake_case")]
pub enum CommandFrame {
    Set(ProtocolPayload),
    Get(GetRequest),
}

/// Command addressed to one channel of the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundCommand {
    pub channel: u8,
    pub command: CommandId,
    pub frame: CommandFrame,
}

impl OutboundCommand {
    pub fn set(channel: u8, command: CommandId, payload: ProtocolPayload) -> Self {
        Self {
            channel,
            command,
            frame: CommandFrame::Set(payload),
        }
    }

    pub fn get(channel: u8, command: CommandId, request: GetRequest) -> Self {
        Self {
            channel,
            command,
            frame: CommandFrame::Get(request),
        }
    }
}

/// Inbound report, already decoded from the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Report {
    SwitchBinary {
        value: SwitchValue,
    },
    SwitchMultilevel {
        /// Raw current level; `None` when the report omits it
        #[serde(default)]
        raw_value: Option<u8>,
    },
    Meter {
        /// Scale bits 1..0 of the second properties byte
        #[serde(default)]
        scale_bits_10: Option<u8>,
        value: f64,
    },
    SensorMultilevel {
        sensor_type: SensorType,
        value: f64,
    },
}

impl Report {
    /// Report command this frame corresponds to.
    pub fn command(&self) -> CommandId {
        match self {
            Self::SwitchBinary { .. } => CommandId::SwitchBinaryReport,
            Self::SwitchMultilevel { .. } => CommandId::SwitchMultilevelReport,
            Self::Meter { .. } => CommandId::MeterReport,
            Self::SensorMultilevel { .. } => CommandId::SensorMultilevelReport,
        }
    }
}
