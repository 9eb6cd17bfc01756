//! Shutter Device Translation Crate
//!
//! Translates between the named capabilities of a motorized shutter and
//! the command classes of the multi-channel node that drives it.
//!
//! ## Architecture
//!
//! - **DescriptorTable**: Static capability → (channel, command class, codec) map
//! - **ValueCodec**: Capability value ⇄ protocol payload conversion
//! - **CommandRouter**: Set/get/report handling for named capabilities
//! - **DirectChannelActions**: Channel-addressed shutter and slat actions
//! - **NodeTransport**: Send side of the bus, supplied by the host
//!
//! Profiles for concrete devices live in [`profiles`].

pub mod adapter;
pub mod adapters;
pub mod direct;
pub mod error;
pub mod parameters;
pub mod profiles;
pub mod protocol;
pub mod router;

// Protocol re-exports
pub use protocol::{
    CapabilityDescriptor, CommandClass, CommandId, DescriptorTable, DescriptorTableBuilder,
    Encoded, MappingError, MappingResult, OutboundCommand, ProtocolPayload, Report,
    SharedTable, ValueCodec,
};

pub use adapter::{AdapterError, AdapterResult, NodeTransport, SharedTransport};
pub use adapters::{LoopbackConfig, LoopbackTransport, TransportCall};
pub use direct::{DirectAction, DirectChannelActions, DirectTarget};
pub use error::{DeviceError, DeviceResult};
pub use parameters::{ConfigurationParameter, ConfigurationSet, ParameterProfile};
pub use profiles::{available_profiles, profile_table};
pub use router::{CommandRouter, SetPlan};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
