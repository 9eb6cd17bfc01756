//! Command Router.
//!
//! Runtime entry point for named capabilities: resolves the descriptor,
//! runs the codec, and hands the result to the transport. The router keeps
//! no values and no queue; each `set`/`poll` awaits its transport call, so
//! sequential calls reach the transport in the order they were made.

use serde::Serialize;
use zshutter_core::{CapabilityValue, DeviceEvent, EventBus, WindowCoveringState};

use crate::adapter::{AdapterError, SharedTransport};
use crate::error::{DeviceError, DeviceResult};
use crate::protocol::codec::Encoded;
use crate::protocol::command::{OutboundCommand, Report};
use crate::protocol::mapping::{CapabilityDescriptor, SharedTable};

const EVENT_SOURCE: &str = "router";

/// What a set request turns into on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "plan", rename_all = "snake_case")]
pub enum SetPlan {
    /// Send this command.
    Command(OutboundCommand),
    /// Stop the level change on this channel, then report `idle`.
    StopLevelChange { channel: u8 },
}

impl SetPlan {
    pub fn channel(&self) -> u8 {
        match self {
            Self::Command(command) => command.channel,
            Self::StopLevelChange { channel } => *channel,
        }
    }
}

/// Routes capability operations for one node.
pub struct CommandRouter {
    device_id: String,
    table: SharedTable,
    transport: SharedTransport,
    events: EventBus,
}

impl CommandRouter {
    pub fn new(
        device_id: impl Into<String>,
        table: SharedTable,
        transport: SharedTransport,
        events: EventBus,
    ) -> Self {
        Self {
            device_id: device_id.into(),
            table,
            transport,
            events,
        }
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    fn descriptor(&self, capability: &str) -> DeviceResult<&CapabilityDescriptor> {
        self.table
            .descriptor(capability)
            .ok_or_else(|| DeviceError::UnknownCapability(capability.to_string()))
    }

    /// Resolve and encode a set request without sending anything.
    pub fn plan_set(&self, capability: &str, value: &CapabilityValue) -> DeviceResult<SetPlan> {
        let descriptor = self.descriptor(capability)?;
        let set_command = descriptor
            .set_command
            .ok_or_else(|| DeviceError::ReadOnlyCapability(capability.to_string()))?;

        let encoded = descriptor
            .codec
            .encode(value)
            .ok_or_else(|| DeviceError::InvalidValue {
                capability: capability.to_string(),
                expected: descriptor.codec.value_kind(),
                found: value.type_name(),
            })?;

        Ok(match encoded {
            Encoded::Payload(payload) => {
                SetPlan::Command(OutboundCommand::set(descriptor.channel, set_command, payload))
            }
            Encoded::StopLevelChange => SetPlan::StopLevelChange {
                channel: descriptor.channel,
            },
        })
    }

    /// Encode and send a set request.
    ///
    /// A stop request is sent as a level-change stop on the capability's
    /// channel; once the transport completes it, observers are told the
    /// capability is now `idle`.
    pub async fn set(&self, capability: &str, value: CapabilityValue) -> DeviceResult<SetPlan> {
        let plan = self.plan_set(capability, &value)?;

        match plan {
            SetPlan::Command(command) => {
                tracing::info!(
                    device_id = %self.device_id,
                    capability,
                    channel = command.channel,
                    command = %command.command,
                    "sending set command"
                );
                if let Err(e) = self.transport.send_command(command).await {
                    return Err(self.transport_failed(capability, command.channel, e).await);
                }
            }
            SetPlan::StopLevelChange { channel } => {
                tracing::info!(
                    device_id = %self.device_id,
                    capability,
                    channel,
                    "stopping level change"
                );
                if let Err(e) = self.transport.stop_level_change(channel).await {
                    return Err(self.transport_failed(capability, channel, e).await);
                }
                self.notify(capability, WindowCoveringState::Idle.into())
                    .await;
            }
        }

        Ok(plan)
    }

    /// Build the get request for a capability.
    pub fn get(&self, capability: &str) -> DeviceResult<OutboundCommand> {
        let descriptor = self.descriptor(capability)?;
        let get_command = descriptor
            .get_command
            .ok_or_else(|| DeviceError::NotReadable(capability.to_string()))?;

        Ok(OutboundCommand::get(
            descriptor.channel,
            get_command,
            descriptor.codec.get_request(),
        ))
    }

    /// Build the get request for a capability and send it.
    pub async fn poll(&self, capability: &str) -> DeviceResult<OutboundCommand> {
        let command = self.get(capability)?;
        tracing::debug!(
            device_id = %self.device_id,
            capability,
            channel = command.channel,
            command = %command.command,
            "polling capability"
        );
        if let Err(e) = self.transport.send_command(command).await {
            return Err(self.transport_failed(capability, command.channel, e).await);
        }
        Ok(command)
    }

    /// Decode a report. `Ok(None)` means the report carried no usable value.
    pub fn on_report(
        &self,
        capability: &str,
        report: &Report,
    ) -> DeviceResult<Option<CapabilityValue>> {
        let descriptor = self.descriptor(capability)?;
        Ok(descriptor.codec.decode(report))
    }

    /// Decode a report and publish the value if there is one.
    pub async fn ingest_report(
        &self,
        capability: &str,
        report: &Report,
    ) -> DeviceResult<Option<CapabilityValue>> {
        let decoded = self.on_report(capability, report)?;
        match decoded {
            Some(value) => self.notify(capability, value).await,
            None => tracing::debug!(
                device_id = %self.device_id,
                capability,
                ?report,
                "report carried no value, update suppressed"
            ),
        }
        Ok(decoded)
    }

    async fn notify(&self, capability: &str, value: CapabilityValue) {
        let event = DeviceEvent::capability_changed(&self.device_id, capability, value);
        self.events.publish_with_source(event, EVENT_SOURCE).await;
    }

    async fn transport_failed(
        &self,
        capability: &str,
        channel: u8,
        source: AdapterError,
    ) -> DeviceError {
        tracing::warn!(
            device_id = %self.device_id,
            transport = self.transport.name(),
            capability,
            channel,
            error = %source,
            "transport failed"
        );
        let event =
            DeviceEvent::command_failed(&self.device_id, capability, channel, source.to_string());
        self.events.publish_with_source(event, EVENT_SOURCE).await;
        DeviceError::Transport { channel, source }
    }
}
