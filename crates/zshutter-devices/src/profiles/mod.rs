//! Built-in device profiles.

pub mod zmnhod1;

use crate::parameters::ParameterProfile;
use crate::protocol::mapping::{DescriptorTable, MappingError, MappingResult};

/// Device types with a built-in profile.
pub fn available_profiles() -> Vec<&'static str> {
    vec![zmnhod1::DEVICE_TYPE]
}

/// Build the descriptor table of a built-in profile by device type.
///
/// `parameters` replaces the profile's reference configuration parameters.
pub fn profile_table(
    device_type: &str,
    parameters: Option<ParameterProfile>,
) -> MappingResult<DescriptorTable> {
    match device_type.to_ascii_uppercase().as_str() {
        zmnhod1::DEVICE_TYPE => match parameters {
            Some(parameters) => zmnhod1::table_with_parameters(parameters),
            None => zmnhod1::table(),
        },
        _ => Err(MappingError::Profile(format!(
            "Unknown device type: {}. Available: {}",
            device_type,
            available_profiles().join(", ")
        ))),
    }
}
