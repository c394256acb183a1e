use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use qarooms::event::{
    EventDispatcher, RoomEvent, SubscriberId, SubscriberRegistry, SubscriptionManager,
};

use super::mocks::MockConnection;

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub registry: SubscriberRegistry,
    pub dispatcher: EventDispatcher,
    pub subscriptions: SubscriptionManager,
    pub shutdown: CancellationToken,
}

/// One subscribed mock client with its lifecycle task running
pub struct TestSubscriber {
    pub id: SubscriberId,
    pub room_id: String,
    pub connection: Arc<MockConnection>,
    pub token: CancellationToken,
    pub task: JoinHandle<()>,
}

#[allow(dead_code)]
impl TestSubscriber {
    /// Simulates the client going away and waits for teardown to finish
    pub async fn disconnect(self) {
        self.token.cancel();
        self.wait_closed().await;
    }

    /// Waits for the lifecycle task to finish after some other cancellation
    pub async fn wait_closed(self) {
        tokio::time::timeout(Duration::from_secs(2), self.task)
            .await
            .expect("subscriber was not torn down in time")
            .expect("subscriber task panicked");
    }
}

pub struct TestSetupBuilder;

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn build(self) -> TestSetup {
        let registry = SubscriberRegistry::new();
        let shutdown = CancellationToken::new();

        TestSetup {
            dispatcher: EventDispatcher::new(registry.clone()),
            subscriptions: SubscriptionManager::new(registry.clone(), shutdown.clone()),
            registry,
            shutdown,
        }
    }
}

#[allow(dead_code)]
impl TestSetup {
    /// Connects a new mock client to a room
    pub fn subscribe(&self, room_id: &str) -> TestSubscriber {
        self.subscribe_with(room_id, MockConnection::new())
    }

    pub fn subscribe_with(&self, room_id: &str, connection: Arc<MockConnection>) -> TestSubscriber {
        let handle = self.subscriptions.subscribe(room_id, connection.clone());
        let id = handle.id();
        let token = handle.cancellation_token();
        let task = tokio::spawn(handle.run_until_cancelled());

        TestSubscriber {
            id,
            room_id: room_id.to_string(),
            connection,
            token,
            task,
        }
    }

    /// Publishes and waits for the fan-out to finish
    pub async fn publish_and_wait(&self, event: RoomEvent) {
        self.dispatcher
            .publish(event)
            .await
            .expect("dispatch task panicked");
    }
}
