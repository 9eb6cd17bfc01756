//! Direct-Channel Override Path.
//!
//! Automation actions that move the shutter or tilt the slats to a raw
//! percentage. They skip the descriptor table, address channel 1 or 2
//! directly, and publish the new value before the device confirms it.
//! A failed send is reported to the caller and as a `CommandFailed` event;
//! the value already published is left in place.

use serde::{Deserialize, Serialize};
use zshutter_core::{DeviceEvent, EventBus};

use crate::adapter::SharedTransport;
use crate::error::{DeviceError, DeviceResult};
use crate::protocol::codec::level_payload_from_percent;
use crate::protocol::command::{CommandId, OutboundCommand};

const EVENT_SOURCE: &str = "direct";

/// Channel-addressed action targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectTarget {
    /// Shutter position, channel 1
    ShutterPosition,
    /// Slat tilt of a venetian blind, channel 2
    #[serde(alias = "slats_tilt")]
    SlatTilt,
}

impl DirectTarget {
    pub fn channel(&self) -> u8 {
        match self {
            Self::ShutterPosition => 1,
            Self::SlatTilt => 2,
        }
    }

    /// Capability whose value the action changes.
    pub fn capability(&self) -> &'static str {
        match self {
            Self::ShutterPosition => "dim.shutter",
            Self::SlatTilt => "dim.venetian",
        }
    }
}

impl std::str::FromStr for DirectTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.replace('-', "_").as_str() {
            "shutter_position" => Ok(Self::ShutterPosition),
            "slat_tilt" | "slats_tilt" => Ok(Self::SlatTilt),
            other => Err(format!("unknown action target '{}'", other)),
        }
    }
}

/// Raw percentage action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectAction {
    pub target: DirectTarget,
    /// Requested percentage, nominally `0..=100`
    pub value: i64,
}

impl DirectAction {
    pub fn new(target: DirectTarget, value: i64) -> Self {
        Self { target, value }
    }

    /// Value published to observers: the request over 100, unclamped.
    pub fn notified_value(&self) -> f64 {
        self.value as f64 / 100.0
    }

    /// Command sent to the channel; the level is clamped to `0..=99`.
    pub fn command(&self) -> OutboundCommand {
        OutboundCommand::set(
            self.target.channel(),
            CommandId::SwitchMultilevelSet,
            level_payload_from_percent(self.value),
        )
    }
}

/// Executes direct-channel actions for one node.
pub struct DirectChannelActions {
    device_id: String,
    transport: SharedTransport,
    events: EventBus,
}

impl DirectChannelActions {
    pub fn new(device_id: impl Into<String>, transport: SharedTransport, events: EventBus) -> Self {
        Self {
            device_id: device_id.into(),
            transport,
            events,
        }
    }

    /// Publish the requested value, then send the level to the channel.
    pub async fn run(&self, action: DirectAction) -> DeviceResult<OutboundCommand> {
        let command = action.command();
        let capability = action.target.capability();

        self.events
            .publish_with_source(
                DeviceEvent::capability_changed(
                    &self.device_id,
                    capability,
                    action.notified_value(),
                ),
                EVENT_SOURCE,
            )
            .await;

        tracing::info!(
            device_id = %self.device_id,
            target = ?action.target,
            requested = action.value,
            channel = command.channel,
            "sending direct channel level"
        );

        if let Err(source) = self.transport.send_command(command).await {
            tracing::warn!(
                device_id = %self.device_id,
                capability,
                channel = command.channel,
                error = %source,
                "direct channel send failed, published value not retracted"
            );
            self.events
                .publish_with_source(
                    DeviceEvent::command_failed(
                        &self.device_id,
                        capability,
                        command.channel,
                        source.to_string(),
                    ),
                    EVENT_SOURCE,
                )
                .await;
            return Err(DeviceError::Transport {
                channel: command.channel,
                source,
            });
        }

        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::command::{CommandFrame, DimmingDuration, ProtocolPayload};

    #[test]
    fn test_target_channels() {
        assert_eq!(DirectTarget::ShutterPosition.channel(), 1);
        assert_eq!(DirectTarget::SlatTilt.channel(), 2);
        assert_eq!(DirectTarget::SlatTilt.capability(), "dim.venetian");
        assert_eq!("slats-tilt".parse::<DirectTarget>(), Ok(DirectTarget::SlatTilt));
        assert!("tilt".parse::<DirectTarget>().is_err());
    }

    #[test]
    fn test_clamp_for_wire_but_not_for_notification() {
        let action = DirectAction::new(DirectTarget::ShutterPosition, 150);
        assert_eq!(action.notified_value(), 1.5);
        assert_eq!(
            action.command().frame,
            CommandFrame::Set(ProtocolPayload::SwitchMultilevelSet {
                value: 99,
                duration: DimmingDuration::FactoryDefault,
            })
        );

        let action = DirectAction::new(DirectTarget::SlatTilt, 100);
        assert_eq!(action.notified_value(), 1.0);
        assert_eq!(action.command().channel, 2);
    }
}
