use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{
    connection::{SubscriberConnection, SubscriberId},
    registry::{Subscriber, SubscriberRegistry},
};

/// Lifecycle of a single subscriber connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SubscriptionState {
    Pending = 0,
    Active = 1,
    Terminating = 2,
    Closed = 3,
}

impl SubscriptionState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => SubscriptionState::Pending,
            1 => SubscriptionState::Active,
            2 => SubscriptionState::Terminating,
            _ => SubscriptionState::Closed,
        }
    }
}

/// Hands out subscriptions and ties them to the server's lifetime
///
/// Every subscriber token is a child of the shutdown token, so cancelling
/// the shutdown token tears down all open subscriptions.
#[derive(Clone)]
pub struct SubscriptionManager {
    registry: SubscriberRegistry,
    shutdown: CancellationToken,
}

impl SubscriptionManager {
    pub fn new(registry: SubscriberRegistry, shutdown: CancellationToken) -> Self {
        Self { registry, shutdown }
    }

    pub fn registry(&self) -> &SubscriberRegistry {
        &self.registry
    }

    /// Registers a connection for a room and returns its active handle
    pub fn subscribe(
        &self,
        room_id: &str,
        connection: Arc<dyn SubscriberConnection>,
    ) -> SubscriberHandle {
        let subscriber = Subscriber::new(connection, self.shutdown.child_token());
        let handle = SubscriberHandle {
            id: subscriber.id,
            room_id: room_id.to_string(),
            cancel: subscriber.cancel.clone(),
            connection: Arc::clone(&subscriber.connection),
            registry: self.registry.clone(),
            state: AtomicU8::new(SubscriptionState::Pending as u8),
        };

        self.registry.register(room_id, subscriber);
        handle.transition(SubscriptionState::Pending, SubscriptionState::Active);

        info!(
            room_id = %room_id,
            subscriber_id = %handle.id,
            "Subscriber connected"
        );

        handle
    }
}

/// Owner side of one subscription
///
/// The handle moves through Active -> Terminating -> Closed exactly once, no
/// matter how many teardown sources fire. Dropping an active handle still
/// removes it from the registry.
pub struct SubscriberHandle {
    id: SubscriberId,
    room_id: String,
    cancel: CancellationToken,
    connection: Arc<dyn SubscriberConnection>,
    registry: SubscriberRegistry,
    state: AtomicU8,
}

impl SubscriberHandle {
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    pub fn state(&self) -> SubscriptionState {
        SubscriptionState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Requests teardown. Safe to call any number of times.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Token shared by every teardown source of this subscription
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Waits until teardown is requested from any source
    pub async fn cancelled(&self) {
        self.cancel.cancelled().await;
    }

    /// Unregisters the subscriber and closes its connection
    ///
    /// Returns false if another caller already closed it.
    pub async fn close(&self) -> bool {
        if !self.transition(SubscriptionState::Active, SubscriptionState::Terminating) {
            return false;
        }

        self.cancel.cancel();
        self.registry.unregister(&self.room_id, self.id);

        if let Err(e) = self.connection.close().await {
            debug!(
                room_id = %self.room_id,
                subscriber_id = %self.id,
                error = %e,
                "Connection was already gone while closing"
            );
        }

        self.state
            .store(SubscriptionState::Closed as u8, Ordering::Release);

        info!(
            room_id = %self.room_id,
            subscriber_id = %self.id,
            "Subscriber disconnected"
        );
        true
    }

    /// Blocks until cancelled, then tears the subscription down
    pub async fn run_until_cancelled(self) {
        self.cancelled().await;
        self.close().await;
    }

    fn transition(&self, from: SubscriptionState, to: SubscriptionState) -> bool {
        self.state
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

impl Drop for SubscriberHandle {
    fn drop(&mut self) {
        if self.transition(SubscriptionState::Active, SubscriptionState::Closed) {
            warn!(
                room_id = %self.room_id,
                subscriber_id = %self.id,
                "Subscriber handle dropped without closing"
            );
            self.cancel.cancel();
            self.registry.unregister(&self.room_id, self.id);
        }
    }
}
