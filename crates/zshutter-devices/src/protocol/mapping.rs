//! Capability Descriptor Table.
//!
//! Binds capability names to a channel, the commands used on that channel,
//! and the codec that translates values. Built once and never mutated.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use serde::Serialize;

use crate::parameters::ParameterProfile;
use crate::protocol::codec::ValueCodec;
use crate::protocol::command::{CommandClass, CommandId};

/// Result type for table construction and parameter framing.
pub type MappingResult<T> = Result<T, MappingError>;

/// Errors raised while building a table or framing a parameter.
#[derive(Debug, thiserror::Error)]
pub enum MappingError {
    #[error("Duplicate capability: {0}")]
    DuplicateCapability(String),

    #[error("Capability '{0}' has an invalid channel 0")]
    InvalidChannel(String),

    #[error("Capability '{0}' has neither a set nor a report command")]
    MissingCommands(String),

    #[error("Capabilities '{existing}' and '{conflicting}' use the same commands on channel {channel}")]
    ChannelConflict {
        channel: u8,
        existing: String,
        conflicting: String,
    },

    #[error("Duplicate parameter: {0}")]
    DuplicateParameter(String),

    #[error("Parameters '{existing}' and '{conflicting}' share index {index}")]
    DuplicateParameterIndex {
        index: u8,
        existing: String,
        conflicting: String,
    },

    #[error("Parameter '{name}' has unsupported size {size}")]
    InvalidParameterSize { name: String, size: u8 },

    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),

    #[error("Value {value} does not fit parameter '{name}' ({size} bytes)")]
    ParameterOutOfRange { name: String, value: i64, size: u8 },

    #[error("Invalid parameter profile: {0}")]
    Profile(String),
}

/// Static binding of one capability.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapabilityDescriptor {
    pub name: String,
    /// Multi-channel endpoint, `>= 1`
    pub channel: u8,
    pub command_class: CommandClass,
    pub get_command: Option<CommandId>,
    /// Absent for read-only capabilities
    pub set_command: Option<CommandId>,
    pub report_command: Option<CommandId>,
    pub codec: ValueCodec,
    /// `false` when the device may legitimately lack this capability
    pub required: bool,
}

impl CapabilityDescriptor {
    /// Capability driven through SET/GET/REPORT of one command class.
    pub fn read_write(
        name: impl Into<String>,
        channel: u8,
        command_class: CommandClass,
        codec: ValueCodec,
    ) -> Self {
        let (get, set, report) = commands_for(command_class);
        Self {
            name: name.into(),
            channel,
            command_class,
            get_command: get,
            set_command: set,
            report_command: report,
            codec,
            required: true,
        }
    }

    /// Capability that is only polled and reported.
    pub fn read_only(
        name: impl Into<String>,
        channel: u8,
        command_class: CommandClass,
        codec: ValueCodec,
    ) -> Self {
        let (get, _, report) = commands_for(command_class);
        Self {
            name: name.into(),
            channel,
            command_class,
            get_command: get,
            set_command: None,
            report_command: report,
            codec,
            required: true,
        }
    }

    /// Mark this capability as optional.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn is_writable(&self) -> bool {
        self.set_command.is_some()
    }

    pub fn is_readable(&self) -> bool {
        self.get_command.is_some()
    }
}

/// Default get/set/report commands of a command class.
fn commands_for(
    command_class: CommandClass,
) -> (Option<CommandId>, Option<CommandId>, Option<CommandId>) {
    match command_class {
        CommandClass::SwitchBinary => (
            Some(CommandId::SwitchBinaryGet),
            Some(CommandId::SwitchBinarySet),
            Some(CommandId::SwitchBinaryReport),
        ),
        CommandClass::SwitchMultilevel => (
            Some(CommandId::SwitchMultilevelGet),
            Some(CommandId::SwitchMultilevelSet),
            Some(CommandId::SwitchMultilevelReport),
        ),
        CommandClass::Meter => (Some(CommandId::MeterGet), None, Some(CommandId::MeterReport)),
        CommandClass::SensorMultilevel => (
            Some(CommandId::SensorMultilevelGet),
            None,
            Some(CommandId::SensorMultilevelReport),
        ),
    }
}

/// Read-only mapping from capability name to descriptor.
#[derive(Debug, Clone, Serialize)]
pub struct DescriptorTable {
    device_type: String,
    descriptors: Vec<CapabilityDescriptor>,
    #[serde(skip)]
    index: HashMap<String, usize>,
    parameters: ParameterProfile,
}

/// Shared table reference.
pub type SharedTable = Arc<DescriptorTable>;

impl DescriptorTable {
    pub fn device_type(&self) -> &str {
        &self.device_type
    }

    pub fn descriptor(&self, capability_name: &str) -> Option<&CapabilityDescriptor> {
        self.index
            .get(capability_name)
            .map(|&position| &self.descriptors[position])
    }

    pub fn has_capability(&self, capability_name: &str) -> bool {
        self.index.contains_key(capability_name)
    }

    /// Descriptors in declaration order.
    pub fn descriptors(&self) -> &[CapabilityDescriptor] {
        &self.descriptors
    }

    /// Capability names in declaration order.
    pub fn capabilities(&self) -> Vec<&str> {
        self.descriptors.iter().map(|d| d.name.as_str()).collect()
    }

    pub fn required_capabilities(&self) -> Vec<&str> {
        self.descriptors
            .iter()
            .filter(|d| d.required)
            .map(|d| d.name.as_str())
            .collect()
    }

    pub fn optional_capabilities(&self) -> Vec<&str> {
        self.descriptors
            .iter()
            .filter(|d| !d.required)
            .map(|d| d.name.as_str())
            .collect()
    }

    /// Distinct channels in ascending order.
    pub fn channels(&self) -> Vec<u8> {
        self.descriptors
            .iter()
            .map(|d| d.channel)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Capabilities addressed on one channel.
    pub fn on_channel(&self, channel: u8) -> impl Iterator<Item = &CapabilityDescriptor> {
        self.descriptors.iter().filter(move |d| d.channel == channel)
    }

    pub fn parameters(&self) -> &ParameterProfile {
        &self.parameters
    }

    pub fn into_shared(self) -> SharedTable {
        Arc::new(self)
    }
}

/// Builder for descriptor tables.
pub struct DescriptorTableBuilder {
    device_type: String,
    descriptors: Vec<CapabilityDescriptor>,
    parameters: ParameterProfile,
    duplicate_parameters: Vec<String>,
}

impl DescriptorTableBuilder {
    pub fn new(device_type: impl Into<String>) -> Self {
        Self {
            device_type: device_type.into(),
            descriptors: Vec::new(),
            parameters: ParameterProfile::default(),
            duplicate_parameters: Vec::new(),
        }
    }

    /// Add a descriptor.
    pub fn capability(mut self, descriptor: CapabilityDescriptor) -> Self {
        self.descriptors.push(descriptor);
        self
    }

    /// Add a configuration parameter. A repeated name fails the build.
    pub fn parameter(mut self, name: impl Into<String>, index: u8, size: u8) -> Self {
        let name = name.into();
        if self.parameters.insert(name.clone(), index, size).is_some() {
            self.duplicate_parameters.push(name);
        }
        self
    }

    /// Replace the configuration parameter profile.
    pub fn parameters(mut self, parameters: ParameterProfile) -> Self {
        self.parameters = parameters;
        self.duplicate_parameters.clear();
        self
    }

    /// Validate and build the table.
    pub fn build(self) -> MappingResult<DescriptorTable> {
        let mut index = HashMap::with_capacity(self.descriptors.len());
        {
            let mut command_pairs: HashMap<(u8, Option<CommandId>, Option<CommandId>), &str> =
                HashMap::new();
            let mut seen = HashSet::new();

            for (position, descriptor) in self.descriptors.iter().enumerate() {
                if !seen.insert(descriptor.name.as_str()) {
                    return Err(MappingError::DuplicateCapability(descriptor.name.clone()));
                }
                if descriptor.channel == 0 {
                    return Err(MappingError::InvalidChannel(descriptor.name.clone()));
                }
                if descriptor.set_command.is_none() && descriptor.report_command.is_none() {
                    return Err(MappingError::MissingCommands(descriptor.name.clone()));
                }

                let key = (
                    descriptor.channel,
                    descriptor.set_command,
                    descriptor.report_command,
                );
                if let Some(existing) = command_pairs.insert(key, descriptor.name.as_str()) {
                    return Err(MappingError::ChannelConflict {
                        channel: descriptor.channel,
                        existing: existing.to_string(),
                        conflicting: descriptor.name.clone(),
                    });
                }

                index.insert(descriptor.name.clone(), position);
            }
        }

        if let Some(name) = self.duplicate_parameters.first() {
            return Err(MappingError::DuplicateParameter(name.clone()));
        }
        self.parameters.validate()?;

        tracing::debug!(
            device_type = %self.device_type,
            capabilities = self.descriptors.len(),
            parameters = self.parameters.len(),
            "descriptor table built"
        );

        Ok(DescriptorTable {
            device_type: self.device_type,
            descriptors: self.descriptors,
            index,
            parameters: self.parameters,
        })
    }
}
