//! Direct-channel action tests.

use std::sync::Arc;

use zshutter_core::{CapabilityValue, DeviceEvent, EventBus};
use zshutter_devices::protocol::command::{CommandFrame, DimmingDuration};
use zshutter_devices::{
    DeviceError, DirectAction, DirectChannelActions, DirectTarget, LoopbackTransport,
    ProtocolPayload, TransportCall,
};

fn setup() -> (DirectChannelActions, Arc<LoopbackTransport>, EventBus) {
    let transport = Arc::new(LoopbackTransport::new());
    let events = EventBus::new();
    let actions = DirectChannelActions::new("node-7", transport.clone(), events.clone());
    (actions, transport, events)
}

fn changed_value(event: &DeviceEvent) -> Option<f64> {
    match event {
        DeviceEvent::CapabilityChanged { value, .. } => value.as_f64(),
        _ => None,
    }
}

#[tokio::test]
async fn test_shutter_position_clamps_wire_value() {
    let (actions, transport, events) = setup();
    let mut rx = events.subscribe();

    let command = actions
        .run(DirectAction::new(DirectTarget::ShutterPosition, 150))
        .await
        .unwrap();

    assert_eq!(command.channel, 1);
    assert_eq!(
        command.frame,
        CommandFrame::Set(ProtocolPayload::SwitchMultilevelSet {
            value: 99,
            duration: DimmingDuration::FactoryDefault,
        })
    );
    assert_eq!(transport.calls().await, vec![TransportCall::Command(command)]);

    let (event, metadata) = rx.try_recv().unwrap();
    assert_eq!(metadata.source, "direct");
    assert_eq!(event.capability(), "dim.shutter");
    assert_eq!(changed_value(&event), Some(1.5));
}

#[tokio::test]
async fn test_slat_tilt_targets_channel_two() {
    let (actions, transport, events) = setup();
    let mut rx = events.subscribe_capability("dim.venetian");

    actions
        .run(DirectAction::new(DirectTarget::SlatTilt, 40))
        .await
        .unwrap();

    let calls = transport.calls().await;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].channel(), 2);

    let (event, _) = rx.try_recv().unwrap();
    assert_eq!(changed_value(&event), Some(0.4));
}

#[tokio::test]
async fn test_negative_value_sends_zero() {
    let (actions, _transport, _events) = setup();

    let command = actions
        .run(DirectAction::new(DirectTarget::ShutterPosition, -5))
        .await
        .unwrap();
    assert_eq!(
        command.frame,
        CommandFrame::Set(ProtocolPayload::SwitchMultilevelSet {
            value: 0,
            duration: DimmingDuration::FactoryDefault,
        })
    );
}

#[tokio::test]
async fn test_failure_keeps_optimistic_value_and_reports() {
    let (actions, transport, events) = setup();
    let mut rx = events.subscribe();
    transport.set_offline(true);

    let err = actions
        .run(DirectAction::new(DirectTarget::SlatTilt, 100))
        .await
        .unwrap_err();
    assert!(matches!(err, DeviceError::Transport { channel: 2, .. }));
    assert!(transport.calls().await.is_empty());

    let events: Vec<DeviceEvent> = rx.drain().into_iter().map(|(event, _)| event).collect();
    assert_eq!(events.len(), 2);
    assert_eq!(
        events[0],
        DeviceEvent::CapabilityChanged {
            device_id: "node-7".to_string(),
            capability: "dim.venetian".to_string(),
            value: CapabilityValue::Number(1.0),
            timestamp: events[0].timestamp(),
        }
    );
    assert!(events[1].is_failure());
    assert_eq!(events[1].capability(), "dim.venetian");
}
