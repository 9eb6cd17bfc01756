//! Tests for the EventBus module.
//!
//! - Basic publish/subscribe
//! - Multiple subscribers
//! - Filtered subscriptions
//! - Metadata

use std::time::Duration;
use tokio::time::timeout;
use zshutter_core::{DeviceEvent, EventBus, EventMetadata, WindowCoveringState};

#[tokio::test]
async fn test_event_bus_basic_publish_subscribe() {
    let bus = EventBus::new();
    let mut rx = bus.subscribe();

    assert!(bus.publish(DeviceEvent::capability_changed("node", "dim.shutter", 0.5)).await);

    let (event, _) = rx.recv().await.unwrap();
    assert_eq!(event.type_name(), "CapabilityChanged");
    assert_eq!(event.capability(), "dim.shutter");
}

#[tokio::test]
async fn test_event_bus_without_subscribers_drops_event() {
    let bus = EventBus::new();
    assert_eq!(bus.subscriber_count(), 0);
    assert!(!bus.publish(DeviceEvent::capability_changed("node", "dim.shutter", 0.5)).await);
}

#[tokio::test]
async fn test_event_bus_multiple_subscribers() {
    let bus = EventBus::new();
    let mut rx1 = bus.subscribe();
    let mut rx2 = bus.subscribe();
    assert_eq!(bus.subscriber_count(), 2);

    bus.publish(DeviceEvent::capability_changed(
        "node",
        "windowcoverings_state",
        WindowCoveringState::Idle,
    ))
    .await;

    let (e1, _) = rx1.recv().await.unwrap();
    let (e2, _) = rx2.recv().await.unwrap();
    assert_eq!(e1, e2);
}

#[tokio::test]
async fn test_capability_filter() {
    let bus = EventBus::new();
    let mut rx = bus.subscribe_capability("dim.venetian");

    bus.publish(DeviceEvent::capability_changed("node", "dim.shutter", 0.1)).await;
    bus.publish(DeviceEvent::capability_changed("node", "dim.venetian", 0.2)).await;

    let (event, _) = timeout(Duration::from_secs(1), rx.recv()).await.unwrap().unwrap();
    assert_eq!(event.capability(), "dim.venetian");
    assert!(rx.try_recv().is_none());
}

#[tokio::test]
async fn test_failure_filter() {
    let bus = EventBus::new();
    let mut rx = bus.subscribe_failures();

    bus.publish(DeviceEvent::capability_changed("node", "dim.shutter", 0.1)).await;
    bus.publish(DeviceEvent::command_failed("node", "dim.shutter", 1, "no ack")).await;

    let (event, _) = rx.try_recv().unwrap();
    assert!(event.is_failure());
}

#[tokio::test]
async fn test_metadata_source() {
    let bus = EventBus::with_name("test");
    assert_eq!(bus.name(), "test");
    let mut rx = bus.subscribe();

    bus.publish_with_source(DeviceEvent::capability_changed("node", "dim.shutter", 0.3), "router")
        .await;
    bus.publish_with_metadata(
        DeviceEvent::capability_changed("node", "dim.shutter", 0.4),
        EventMetadata {
            source: "direct".to_string(),
            timestamp: 42,
        },
    )
    .await;

    let events = rx.drain();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].1.source, "router");
    assert_eq!(events[1].1.source, "direct");
    assert_eq!(events[1].1.timestamp, 42);
}

#[tokio::test]
async fn test_drain_skips_lagged_events() {
    let bus = EventBus::with_capacity(1);
    let mut rx = bus.subscribe();

    bus.publish(DeviceEvent::capability_changed("node", "dim.venetian", 0.4)).await;
    bus.publish(DeviceEvent::command_failed("node", "dim.venetian", 2, "offline")).await;

    let events = rx.drain();
    assert_eq!(events.len(), 1);
    assert!(events[0].0.is_failure());
    assert!(rx.try_recv().is_none());
}

#[tokio::test]
async fn test_filtered_try_recv_skips_lagged_events() {
    let bus = EventBus::with_capacity(1);
    let mut rx = bus.subscribe_failures();

    bus.publish(DeviceEvent::command_failed("node", "dim.shutter", 1, "first")).await;
    bus.publish(DeviceEvent::command_failed("node", "dim.shutter", 1, "second")).await;

    match rx.try_recv() {
        Some((DeviceEvent::CommandFailed { error, .. }, _)) => assert_eq!(error, "second"),
        other => panic!("unexpected: {other:?}"),
    }
    assert!(rx.try_recv().is_none());
}
