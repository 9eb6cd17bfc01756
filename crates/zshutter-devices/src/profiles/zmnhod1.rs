//! Qubino ZMNHOD1 Flush Shutter DC.
//!
//! Channel 1 drives the motor (binary state and position), channel 2 the
//! venetian slats, channel 3 the external temperature sensor.

use crate::parameters::ParameterProfile;
use crate::protocol::codec::ValueCodec;
use crate::protocol::command::CommandClass;
use crate::protocol::mapping::{
    CapabilityDescriptor, DescriptorTable, DescriptorTableBuilder, MappingResult,
};

pub const DEVICE_TYPE: &str = "ZMNHOD1";

pub const WINDOWCOVERINGS_STATE: &str = "windowcoverings_state";
pub const DIM_SHUTTER: &str = "dim.shutter";
pub const DIM_VENETIAN: &str = "dim.venetian";
pub const MEASURE_POWER: &str = "measure_power";
pub const MEASURE_TEMPERATURE: &str = "measure_temperature";

/// Configuration parameters as `(name, index, size)`.
pub const PARAMETERS: [(&str, u8, u8); 15] = [
    ("all_on_all_off", 10, 2),
    ("power_report_on_power_change", 40, 1),
    ("power_report_by_time_interval", 42, 2),
    ("operating_modes", 71, 1),
    ("slats_tilting_full_turn_time", 72, 2),
    ("slats_position", 73, 1),
    ("motor_moving_up_down_time", 74, 2),
    ("motor_operation_detection", 76, 1),
    ("forced_shutter_calibration", 78, 1),
    ("power_reporting_to_controller", 80, 1),
    ("power_consumption_max_delay_time", 85, 1),
    ("power_consumption_at_limit_switch_delay_time", 86, 1),
    ("delay_time_between_outputs", 90, 1),
    ("temperature_sensor_offset_settings", 110, 2),
    ("digital_temperature_sensor_reporting", 120, 1),
];

/// Reference parameter profile.
pub fn parameters() -> ParameterProfile {
    let mut profile = ParameterProfile::new();
    for (name, index, size) in PARAMETERS {
        profile.insert(name, index, size);
    }
    profile
}

/// Descriptor table with the reference parameter profile.
pub fn table() -> MappingResult<DescriptorTable> {
    table_with_parameters(parameters())
}

/// Descriptor table with a replacement parameter profile.
pub fn table_with_parameters(parameters: ParameterProfile) -> MappingResult<DescriptorTable> {
    DescriptorTableBuilder::new(DEVICE_TYPE)
        .capability(CapabilityDescriptor::read_write(
            WINDOWCOVERINGS_STATE,
            1,
            CommandClass::SwitchBinary,
            ValueCodec::WindowCoveringState,
        ))
        .capability(CapabilityDescriptor::read_write(
            DIM_SHUTTER,
            1,
            CommandClass::SwitchMultilevel,
            ValueCodec::Level,
        ))
        .capability(
            CapabilityDescriptor::read_write(
                DIM_VENETIAN,
                2,
                CommandClass::SwitchMultilevel,
                ValueCodec::Level,
            )
            .optional(),
        )
        .capability(CapabilityDescriptor::read_only(
            MEASURE_POWER,
            1,
            CommandClass::Meter,
            ValueCodec::PowerMeter,
        ))
        .capability(
            CapabilityDescriptor::read_only(
                MEASURE_TEMPERATURE,
                3,
                CommandClass::SensorMultilevel,
                ValueCodec::Temperature,
            )
            .optional(),
        )
        .parameters(parameters)
        .build()
}
