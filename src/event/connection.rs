use async_trait::async_trait;
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use super::events::RoomEvent;

/// Errors a subscriber connection can report back to the dispatcher
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("Connection closed")]
    Closed,

    #[error("Send failed: {0}")]
    SendFailed(String),

    #[error("Send timed out")]
    Timeout,

    #[error("Failed to encode event: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Unique identity of one physical subscriber connection
///
/// Two connections watching the same room are always distinct subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(Uuid);

impl SubscriberId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubscriberId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Simple subscriber connection abstraction - all the core cares about is
/// delivering one event and releasing the transport
///
/// Teardown is not requested through this trait: every connection is paired
/// with a cancellation token by the subscription lifecycle, and that token is
/// the single signal all teardown sources share.
#[async_trait]
pub trait SubscriberConnection: Send + Sync {
    /// Deliver one event to the client
    async fn send(&self, event: &RoomEvent) -> Result<(), ConnectionError>;

    /// Release the underlying transport
    async fn close(&self) -> Result<(), ConnectionError>;
}
