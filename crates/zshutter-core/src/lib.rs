//! Core types for zshutter.
//!
//! Holds what every other crate shares: capability values, the device
//! events published about them, the event bus that carries those events,
//! and environment-driven configuration defaults.

pub mod config;
pub mod event;
pub mod eventbus;

pub use event::{CapabilityValue, DeviceEvent, EventMetadata, WindowCoveringState};
pub use eventbus::{DEFAULT_CHANNEL_CAPACITY, EventBus, EventBusReceiver, FilteredReceiver};

/// Re-exports commonly used types.
pub mod prelude {
    pub use crate::config::{defaults, env_vars};
    pub use crate::event::{CapabilityValue, DeviceEvent, EventMetadata, WindowCoveringState};
    pub use crate::eventbus::EventBus;
}
