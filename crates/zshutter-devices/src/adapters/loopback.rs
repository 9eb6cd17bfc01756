//! In-process transport that records every command it is given.
//!
//! Used by the CLI to show what would go on the wire, and by tests to
//! assert on ordering and failure handling.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

use crate::adapter::{AdapterError, AdapterResult, NodeTransport};
use crate::protocol::command::OutboundCommand;

/// A call received by the loopback transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum TransportCall {
    Command(OutboundCommand),
    StopLevelChange { channel: u8 },
}

impl TransportCall {
    pub fn channel(&self) -> u8 {
        match self {
            Self::Command(command) => command.channel,
            Self::StopLevelChange { channel } => *channel,
        }
    }
}

/// Loopback transport configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoopbackConfig {
    #[serde(default = "default_name")]
    pub name: String,
    /// Start with every call failing
    #[serde(default)]
    pub offline: bool,
}

fn default_name() -> String {
    "loopback".to_string()
}

impl Default for LoopbackConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            offline: false,
        }
    }
}

/// Records calls in arrival order; fails them all while offline.
pub struct LoopbackTransport {
    name: String,
    offline: AtomicBool,
    calls: Mutex<Vec<TransportCall>>,
}

impl LoopbackTransport {
    pub fn new() -> Self {
        Self::with_config(LoopbackConfig::default())
    }

    pub fn with_config(config: LoopbackConfig) -> Self {
        Self {
            name: config.name,
            offline: AtomicBool::new(config.offline),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Make subsequent calls fail (`true`) or succeed (`false`).
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn is_offline(&self) -> bool {
        self.offline.load(Ordering::SeqCst)
    }

    /// Calls delivered so far, oldest first. Failed calls are not recorded.
    pub async fn calls(&self) -> Vec<TransportCall> {
        self.calls.lock().await.clone()
    }

    /// Take and clear the recorded calls.
    pub async fn take_calls(&self) -> Vec<TransportCall> {
        std::mem::take(&mut *self.calls.lock().await)
    }

    async fn record(&self, call: TransportCall) -> AdapterResult<()> {
        if self.is_offline() {
            return Err(AdapterError::Connection(format!(
                "{} is offline, channel {} unreachable",
                self.name,
                call.channel()
            )));
        }
        tracing::debug!(transport = %self.name, ?call, "loopback call");
        self.calls.lock().await.push(call);
        Ok(())
    }
}

impl Default for LoopbackTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NodeTransport for LoopbackTransport {
    fn name(&self) -> &str {
        &self.name
    }

    async fn send_command(&self, command: OutboundCommand) -> AdapterResult<()> {
        self.record(TransportCall::Command(command)).await
    }

    async fn stop_level_change(&self, channel: u8) -> AdapterResult<()> {
        self.record(TransportCall::StopLevelChange { channel }).await
    }
}
