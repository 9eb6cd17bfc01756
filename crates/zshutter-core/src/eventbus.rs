//! Event bus for capability notifications.
//!
//! The bus is the notification sink handed to the router and the
//! direct-channel path. Publishing is fire-and-forget: if nobody listens
//! the event is dropped, and slow subscribers may miss events.

use crate::event::{DeviceEvent, EventMetadata};
use tokio::sync::broadcast;

/// Default channel capacity for the event bus.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Broadcast event bus.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<(DeviceEvent, EventMetadata)>,
    name: String,
}

impl EventBus {
    /// Create a new event bus with default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a new event bus with the specified capacity.
    ///
    /// The capacity determines how many events are buffered for slow subscribers.
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            tx,
            name: "default".to_string(),
        }
    }

    /// Create a new event bus with a name.
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            tx: broadcast::channel(DEFAULT_CHANNEL_CAPACITY).0,
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Publish an event from the `system` source.
    ///
    /// Returns `true` if there was at least one subscriber.
    pub async fn publish(&self, event: DeviceEvent) -> bool {
        self.publish_with_source(event, "system").await
    }

    /// Publish an event with a custom source.
    pub async fn publish_with_source(&self, event: DeviceEvent, source: impl Into<String>) -> bool {
        let metadata = EventMetadata::new(source);
        self.publish_with_metadata(event, metadata).await
    }

    /// Publish an event with custom metadata.
    pub async fn publish_with_metadata(&self, event: DeviceEvent, metadata: EventMetadata) -> bool {
        let delivered = self.tx.send((event, metadata)).is_ok();
        if !delivered {
            tracing::trace!(bus = %self.name, "event dropped, no subscribers");
        }
        delivered
    }

    /// Subscribe to all events.
    pub fn subscribe(&self) -> EventBusReceiver {
        EventBusReceiver {
            rx: self.tx.subscribe(),
        }
    }

    /// Subscribe to events matching a filter.
    pub fn subscribe_filtered<F>(&self, filter: F) -> FilteredReceiver<F>
    where
        F: Fn(&DeviceEvent) -> bool + Send + 'static,
    {
        FilteredReceiver::new(self.tx.subscribe(), filter)
    }

    /// Subscribe to events for a single capability.
    pub fn subscribe_capability(
        &self,
        capability: impl Into<String>,
    ) -> FilteredReceiver<impl Fn(&DeviceEvent) -> bool + Send + 'static> {
        let capability = capability.into();
        self.subscribe_filtered(move |event| event.capability() == capability)
    }

    /// Subscribe to delivery failures only.
    pub fn subscribe_failures(&self) -> FilteredReceiver<fn(&DeviceEvent) -> bool> {
        FilteredReceiver::new(
            self.tx.subscribe(),
            DeviceEvent::is_failure as fn(&DeviceEvent) -> bool,
        )
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiver for all events from the event bus.
pub struct EventBusReceiver {
    rx: broadcast::Receiver<(DeviceEvent, EventMetadata)>,
}

impl EventBusReceiver {
    /// Receive the next event.
    ///
    /// Returns `None` once the bus is closed. Lagged events are skipped.
    pub async fn recv(&mut self) -> Option<(DeviceEvent, EventMetadata)> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "event receiver lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Try to receive an event without blocking.
    ///
    /// Lagged events are skipped; `None` means nothing is buffered.
    pub fn try_recv(&mut self) -> Option<(DeviceEvent, EventMetadata)> {
        loop {
            match self.rx.try_recv() {
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "event receiver lagged");
                }
                Err(_) => return None,
            }
        }
    }

    /// Drain every event currently buffered.
    pub fn drain(&mut self) -> Vec<(DeviceEvent, EventMetadata)> {
        let mut events = Vec::new();
        while let Some(event) = self.try_recv() {
            events.push(event);
        }
        events
    }
}

/// Receiver for filtered events from the event bus.
pub struct FilteredReceiver<F>
where
    F: Fn(&DeviceEvent) -> bool + Send,
{
    rx: broadcast::Receiver<(DeviceEvent, EventMetadata)>,
    filter: F,
}

impl<F> FilteredReceiver<F>
where
    F: Fn(&DeviceEvent) -> bool + Send,
{
    fn new(rx: broadcast::Receiver<(DeviceEvent, EventMetadata)>, filter: F) -> Self {
        Self { rx, filter }
    }

    /// Receive the next event matching the filter.
    pub async fn recv(&mut self) -> Option<(DeviceEvent, EventMetadata)> {
        loop {
            match self.rx.recv().await {
                Ok((event, meta)) => {
                    if (self.filter)(&event) {
                        return Some((event, meta));
                    }
                }
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Try to receive a matching event without blocking.
    pub fn try_recv(&mut self) -> Option<(DeviceEvent, EventMetadata)> {
        loop {
            match self.rx.try_recv() {
                Ok((event, meta)) => {
                    if (self.filter)(&event) {
                        return Some((event, meta));
                    }
                }
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "filtered event receiver lagged");
                }
                Err(_) => return None,
            }
        }
    }
}
