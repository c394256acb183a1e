use futures::future::join_all;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use super::{events::RoomEvent, registry::SubscriberRegistry};

/// Result of one fan-out, mainly useful for logging and tests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub delivered: usize,
    pub failed: usize,
}

/// Delivers room events to the current subscribers of that room
///
/// The dispatcher:
/// - Snapshots the room's subscribers and releases the registry lock before sending
/// - Sends to every subscriber concurrently
/// - Cancels subscribers whose send fails, leaving their removal to the
///   subscription lifecycle
/// - Never lets one failing subscriber affect the others
#[derive(Clone)]
pub struct EventDispatcher {
    registry: SubscriberRegistry,
}

impl EventDispatcher {
    pub fn new(registry: SubscriberRegistry) -> Self {
        Self { registry }
    }

    /// Publishes an event without waiting for delivery
    ///
    /// The fan-out runs on its own task. Callers are free to drop the
    /// returned handle.
    pub fn publish(&self, event: RoomEvent) -> JoinHandle<DispatchOutcome> {
        let dispatcher = self.clone();
        tokio::spawn(async move { dispatcher.dispatch(&event).await })
    }

    /// Delivers an event to every subscriber of its room
    pub async fn dispatch(&self, event: &RoomEvent) -> DispatchOutcome {
        let room_id = event.room_id();
        let subscribers = self.registry.snapshot(room_id);

        if subscribers.is_empty() {
            debug!(
                room_id = %room_id,
                event_type = event.kind(),
                "No subscribers for room event"
            );
            return DispatchOutcome::default();
        }

        let sends = subscribers.iter().map(|subscriber| async move {
            let result = subscriber.connection.send(event).await;
            (subscriber, result)
        });

        let mut outcome = DispatchOutcome::default();
        for (subscriber, result) in join_all(sends).await {
            match result {
                Ok(()) => outcome.delivered += 1,
                Err(e) => {
                    error!(
                        room_id = %room_id,
                        subscriber_id = %subscriber.id,
                        event_type = event.kind(),
                        error = %e,
                        "Failed to send event to subscriber"
                    );
                    subscriber.cancel.cancel();
                    outcome.failed += 1;
                }
            }
        }

        debug!(
            room_id = %room_id,
            event_type = event.kind(),
            delivered = outcome.delivered,
            failed = outcome.failed,
            "Room event dispatched"
        );

        outcome
    }
}
