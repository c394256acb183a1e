use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

use qarooms::event::{ConnectionError, RoomEvent, SubscriberConnection};

// ============================================================================
// Mock Infrastructure
// ============================================================================

/// Subscriber connection that records what it was sent instead of writing
/// to a socket
#[derive(Default)]
pub struct MockConnection {
    received: Mutex<Vec<String>>,
    failing: AtomicBool,
    send_attempts: AtomicUsize,
    closes: AtomicUsize,
    /// When set, sends park until the gate is opened
    gate: Mutex<Option<Arc<Notify>>>,
}

#[allow(dead_code)]
impl MockConnection {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Every following send returns an error
    pub fn fail_sends(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    /// Every following send blocks until the returned gate is notified
    pub fn stall_sends(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.gate.lock() = Some(Arc::clone(&gate));
        gate
    }

    pub fn received(&self) -> Vec<Value> {
        self.received
            .lock()
            .iter()
            .map(|raw| serde_json::from_str(raw).expect("mock received invalid JSON"))
            .collect()
    }

    pub fn send_attempts(&self) -> usize {
        self.send_attempts.load(Ordering::SeqCst)
    }

    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SubscriberConnection for MockConnection {
    async fn send(&self, event: &RoomEvent) -> Result<(), ConnectionError> {
        self.send_attempts.fetch_add(1, Ordering::SeqCst);

        let gate = self.gate.lock().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if self.failing.load(Ordering::SeqCst) {
            return Err(ConnectionError::SendFailed("connection reset".to_string()));
        }

        self.received.lock().push(event.to_json()?);
        Ok(())
    }

    async fn close(&self) -> Result<(), ConnectionError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
