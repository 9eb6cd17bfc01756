//! Runtime errors of the router and the direct-channel path.

use crate::adapter::AdapterError;
use crate::protocol::mapping::MappingError;

/// Result type for device operations.
pub type DeviceResult<T> = Result<T, DeviceError>;

#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    /// Capability not present in the descriptor table
    #[error("Unknown capability: {0}")]
    UnknownCapability(String),

    /// Set attempted on a capability without an outbound command
    #[error("Capability '{0}' is read-only")]
    ReadOnlyCapability(String),

    /// Get attempted on a capability without a get command
    #[error("Capability '{0}' cannot be polled")]
    NotReadable(String),

    /// Value of the wrong kind for the capability's codec
    #[error("Capability '{capability}' expects a {expected} value, got {found}")]
    InvalidValue {
        capability: String,
        expected: &'static str,
        found: &'static str,
    },

    /// The transport failed to deliver a command
    #[error("Transport failure on channel {channel}: {source}")]
    Transport {
        channel: u8,
        #[source]
        source: AdapterError,
    },

    #[error(transparent)]
    Mapping(#[from] MappingError),
}

impl DeviceError {
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}
