//! Value codec: abstract capability values <-> protocol encodings.
//!
//! Every function here is pure. Out-of-range numbers are clamped on
//! encode; decode returns `None` when a report carries nothing usable.

use serde::{Deserialize, Serialize};
use zshutter_core::{CapabilityValue, WindowCoveringState};

use crate::protocol::command::{
    DimmingDuration, GetRequest, ProtocolPayload, RateType, Report, SensorType, SwitchValue,
};

/// Highest level a multilevel switch accepts.
pub const MAX_LEVEL: u8 = 99;

/// Meter scale selecting the power reading (W) on an electric meter.
pub const POWER_METER_SCALE: u8 = 2;

/// Temperature scale requested from the sensor (°C).
pub const TEMPERATURE_SCALE: u8 = 0;

/// Reading the node sends when no temperature sensor is attached.
pub const NO_SENSOR_VALUE: f64 = -999.9;

/// Result of encoding a value for a set command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoded {
    /// Send this payload with the descriptor's set command.
    Payload(ProtocolPayload),
    /// No direct payload; stop the level change on the same channel instead.
    StopLevelChange,
}

/// Encoding rules, one variant per kind of capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueCodec {
    /// Up/down/idle over a binary switch.
    WindowCoveringState,
    /// Position in `[0, 1]` over a multilevel switch.
    Level,
    /// Power reading from a meter report.
    PowerMeter,
    /// Temperature reading from a multilevel sensor report.
    Temperature,
}

impl ValueCodec {
    /// Kind of abstract value this codec takes, if it takes one at all.
    pub fn value_kind(&self) -> &'static str {
        match self {
            Self::WindowCoveringState => "state",
            Self::Level | Self::PowerMeter | Self::Temperature => "number",
        }
    }

    /// Encode a value for a set command.
    ///
    /// Returns `None` when the value is of the wrong kind for this codec or
    /// the codec is read-only. Numeric range is never a reason to fail.
    /// The covering state codec accepts every value: anything other than
    /// `up` or `down` stops the motor.
    pub fn encode(&self, value: &CapabilityValue) -> Option<Encoded> {
        match (self, value) {
            (Self::WindowCoveringState, value) => Some(
                match value.as_state().and_then(encode_covering_state) {
                    Some(payload) => Encoded::Payload(payload),
                    None => Encoded::StopLevelChange,
                },
            ),
            (Self::Level, CapabilityValue::Number(v)) => Some(Encoded::Payload(encode_level(*v))),
            _ => None,
        }
    }

    /// Parameters of the get request for this codec.
    pub fn get_request(&self) -> GetRequest {
        match self {
            Self::WindowCoveringState | Self::Level => GetRequest::Plain,
            Self::PowerMeter => GetRequest::Meter {
                scale: POWER_METER_SCALE,
                rate_type: RateType::Import,
                scale2: 0,
            },
            Self::Temperature => GetRequest::SensorMultilevel {
                sensor_type: SensorType::Temperature,
                scale: TEMPERATURE_SCALE,
            },
        }
    }

    /// Decode a report. `None` means the report holds no valid value.
    pub fn decode(&self, report: &Report) -> Option<CapabilityValue> {
        match (self, report) {
            (Self::WindowCoveringState, Report::SwitchBinary { value }) => {
                Some(decode_covering_state(*value).into())
            }
            (Self::Level, Report::SwitchMultilevel { raw_value }) => {
                decode_level(*raw_value).map(CapabilityValue::Number)
            }
            (
                Self::PowerMeter,
                Report::Meter {
                    scale_bits_10,
                    value,
                },
            ) => decode_power(*scale_bits_10, *value).map(CapabilityValue::Number),
            (Self::Temperature, Report::SensorMultilevel { sensor_type, value }) => {
                decode_temperature(*sensor_type, *value).map(CapabilityValue::Number)
            }
            _ => None,
        }
    }
}

/// `up` -> on, `down` -> off, `idle` has no binary encoding.
pub fn encode_covering_state(state: WindowCoveringState) -> Option<ProtocolPayload> {
    let value = match state {
        WindowCoveringState::Up => SwitchValue::ON,
        WindowCoveringState::Down => SwitchValue::OFF,
        WindowCoveringState::Idle => return None,
    };
    Some(ProtocolPayload::SwitchBinarySet { value })
}

/// Any token other than on/off means the covering is not moving.
pub fn decode_covering_state(value: SwitchValue) -> WindowCoveringState {
    match value {
        SwitchValue::ON => WindowCoveringState::Up,
        SwitchValue::OFF => WindowCoveringState::Down,
        _ => WindowCoveringState::Idle,
    }
}

/// Encode a `[0, 1]` position. `>= 1` becomes 0.99, negative or NaN becomes 0.
pub fn encode_level(value: f64) -> ProtocolPayload {
    let clamped = if value >= 1.0 {
        0.99
    } else if value > 0.0 {
        value
    } else {
        0.0
    };
    level_payload_from_percent((clamped * 100.0).round() as i64)
}

/// Multilevel set payload for an integer percentage, clamped to `0..=99`.
pub fn level_payload_from_percent(percent: i64) -> ProtocolPayload {
    ProtocolPayload::SwitchMultilevelSet {
        value: percent.clamp(0, MAX_LEVEL as i64) as u8,
        duration: DimmingDuration::FactoryDefault,
    }
}

/// Levels above 99 (unknown, restore-last) are not positions.
pub fn decode_level(raw_value: Option<u8>) -> Option<f64> {
    raw_value
        .filter(|raw| *raw <= MAX_LEVEL)
        .map(|raw| raw as f64 / 100.0)
}

/// Only a reading explicitly tagged with the power scale is accepted.
pub fn decode_power(scale_bits_10: Option<u8>, value: f64) -> Option<f64> {
    match scale_bits_10 {
        Some(POWER_METER_SCALE) => Some(value),
        _ => None,
    }
}

/// Drops the "no sensor" sentinel and non-temperature readings.
pub fn decode_temperature(sensor_type: SensorType, value: f64) -> Option<f64> {
    if sensor_type != SensorType::Temperature || !value.is_finite() || value == NO_SENSOR_VALUE {
        return None;
    }
    Some(value)
}
