//! Protocol Translation Layer
//!
//! Maps named device capabilities onto the command classes and channels of
//! a multi-channel node, and converts values between the capability domain
//! and the protocol domain.
//!
//! ## Architecture
//!
//! ```text
//! Capability                            Node
//! ├─ windowcoverings_state  ──────→  ├─ ch1 SWITCH_BINARY
//! ├─ dim.shutter            ──────→  ├─ ch1 SWITCH_MULTILEVEL
//! ├─ measure_power          ──────→  ├─ ch1 METER
//! ├─ dim.venetian           ──────→  ├─ ch2 SWITCH_MULTILEVEL
//! └─ measure_temperature    ──────→  └─ ch3 SENSOR_MULTILEVEL
//! ```

pub mod codec;
pub mod command;
pub mod mapping;

// Re-exports
pub use codec::{Encoded, ValueCodec};
pub use command::{
    CommandClass, CommandFrame, CommandId, DimmingDuration, GetRequest, OutboundCommand,
    ProtocolPayload, RateType, Report, SensorType, SwitchValue,
};
pub use mapping::{
    CapabilityDescriptor, DescriptorTable, DescriptorTableBuilder, MappingError, MappingResult,
    SharedTable,
};
