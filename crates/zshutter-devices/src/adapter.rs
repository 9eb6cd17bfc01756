//! Transport collaborator interface.
//!
//! The translation layer never talks to the bus directly. It hands typed
//! commands to a `NodeTransport`, which owns node resolution, framing,
//! acknowledgement and any retry policy.

use async_trait::async_trait;
use std::sync::Arc;

use crate::protocol::command::OutboundCommand;

/// Result type for transport operations.
pub type AdapterResult<T> = Result<T, AdapterError>;

/// Errors reported by a transport.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Node could not be resolved or reached
    #[error("Connection error: {0}")]
    Connection(String),

    /// Command was not acknowledged
    #[error("Communication error: {0}")]
    Communication(String),

    /// Transport is shut down
    #[error("Transport stopped")]
    Stopped,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Send side of the bus, scoped to one node.
///
/// Each call resolves once the transport has finished with the command
/// (acknowledged or failed). Implementations must not reorder commands
/// issued for the same channel.
#[async_trait]
pub trait NodeTransport: Send + Sync {
    /// Transport name, for logging.
    fn name(&self) -> &str;

    /// Send a set or get command to a channel.
    async fn send_command(&self, command: OutboundCommand) -> AdapterResult<()>;

    /// Stop an ongoing multilevel level change on a channel.
    async fn stop_level_change(&self, channel: u8) -> AdapterResult<()>;
}

/// Shared transport reference.
pub type SharedTransport = Arc<dyn NodeTransport>;
