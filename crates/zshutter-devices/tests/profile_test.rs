//! Reference profile tests.

use std::collections::HashSet;
use std::io::Write;

use zshutter_devices::profiles::zmnhod1;
use zshutter_devices::protocol::command::{CommandClass, CommandId};
use zshutter_devices::{MappingError, ParameterProfile};

#[test]
fn test_reference_profile_capabilities() {
    let table = zmnhod1::table().unwrap();

    assert_eq!(table.device_type(), "ZMNHOD1");
    assert_eq!(
        table.capabilities(),
        vec![
            "windowcoverings_state",
            "dim.shutter",
            "dim.venetian",
            "measure_power",
            "measure_temperature",
        ]
    );
    assert_eq!(
        table.optional_capabilities(),
        vec!["dim.venetian", "measure_temperature"]
    );
    assert_eq!(table.channels(), vec![1, 2, 3]);
    assert_eq!(table.on_channel(1).count(), 3);
}

#[test]
fn test_reference_profile_descriptors() {
    let table = zmnhod1::table().unwrap();

    let state = table.descriptor(zmnhod1::WINDOWCOVERINGS_STATE).unwrap();
    assert_eq!(state.command_class, CommandClass::SwitchBinary);
    assert_eq!(state.set_command, Some(CommandId::SwitchBinarySet));
    assert_eq!(state.report_command, Some(CommandId::SwitchBinaryReport));

    let power = table.descriptor(zmnhod1::MEASURE_POWER).unwrap();
    assert!(!power.is_writable());
    assert_eq!(power.get_command, Some(CommandId::MeterGet));

    let temperature = table.descriptor(zmnhod1::MEASURE_TEMPERATURE).unwrap();
    assert_eq!(temperature.channel, 3);
    assert!(!temperature.required);
}

#[test]
fn test_reference_parameters() {
    let table = zmnhod1::table().unwrap();
    let parameters = table.parameters();

    assert_eq!(parameters.len(), 15);
    let indices: HashSet<u8> = parameters.iter().map(|(_, p)| p.index).collect();
    assert_eq!(indices.len(), parameters.len());

    let offset = parameters.get("temperature_sensor_offset_settings").unwrap();
    assert_eq!((offset.index, offset.size), (110, 2));
}

#[test]
fn test_configuration_set_from_reference_profile() {
    let parameters = zmnhod1::parameters();

    let set = parameters
        .configuration_set("motor_moving_up_down_time", 300)
        .unwrap();
    assert_eq!(set.index, 74);
    assert_eq!(set.value_bytes(), vec![0x01, 0x2C]);

    assert!(matches!(
        parameters.configuration_set("operating_modes", 256),
        Err(MappingError::ParameterOutOfRange { .. })
    ));
    assert!(matches!(
        parameters.configuration_set("led_color", 1),
        Err(MappingError::UnknownParameter(_))
    ));
}

#[test]
fn test_load_parameter_profile_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"operating_modes": {{"index": 71, "size": 1}}, "slats_position": {{"index": 73, "size": 1}}}}"#
    )
    .unwrap();

    let profile = ParameterProfile::from_path(file.path()).unwrap();
    assert_eq!(profile.len(), 2);

    let table = zmnhod1::table_with_parameters(profile).unwrap();
    assert_eq!(table.parameters().len(), 2);
    assert_eq!(table.capabilities().len(), 5);
}

#[test]
fn test_duplicate_index_in_file_is_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"a": {{"index": 71, "size": 1}}, "b": {{"index": 71, "size": 2}}}}"#
    )
    .unwrap();

    assert!(matches!(
        ParameterProfile::from_path(file.path()),
        Err(MappingError::DuplicateParameterIndex { index: 71, .. })
    ));
}
