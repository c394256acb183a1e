use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::connection::{SubscriberConnection, SubscriberId};

/// A live connection registered under a room, paired with the token that
/// tears it down
#[derive(Clone)]
pub struct Subscriber {
    pub id: SubscriberId,
    pub connection: Arc<dyn SubscriberConnection>,
    pub cancel: CancellationToken,
}

impl Subscriber {
    pub fn new(connection: Arc<dyn SubscriberConnection>, cancel: CancellationToken) -> Self {
        Self {
            id: SubscriberId::new(),
            connection,
            cancel,
        }
    }
}

impl fmt::Debug for Subscriber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscriber")
            .field("id", &self.id)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish()
    }
}

type RoomSubscribers = HashMap<SubscriberId, Subscriber>;

/// Registry of who is listening to which room
///
/// A single mutex guards the whole map. Every operation is a short map
/// update or copy, and the guard is never held across an await point, so
/// slow clients cannot stall registration for other rooms.
#[derive(Clone, Default)]
pub struct SubscriberRegistry {
    /// room_id -> subscribers
    rooms: Arc<Mutex<HashMap<String, RoomSubscribers>>>,
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a subscriber to a room, creating the room entry if needed
    pub fn register(&self, room_id: &str, subscriber: Subscriber) {
        let subscriber_id = subscriber.id;
        let mut rooms = self.rooms.lock();
        let room = rooms.entry(room_id.to_string()).or_default();
        room.insert(subscriber_id, subscriber);

        debug!(
            room_id = %room_id,
            subscriber_id = %subscriber_id,
            subscribers = room.len(),
            "Subscriber registered"
        );
    }

    /// Removes a subscriber from a room
    ///
    /// Returns whether anything was removed. Unknown rooms and subscribers
    /// are a no-op, since several teardown paths may race to get here.
    pub fn unregister(&self, room_id: &str, subscriber_id: SubscriberId) -> bool {
        let mut rooms = self.rooms.lock();
        let Some(room) = rooms.get_mut(room_id) else {
            return false;
        };

        let removed = room.remove(&subscriber_id).is_some();
        let remaining = room.len();
        if remaining == 0 {
            rooms.remove(room_id);
        }

        if removed {
            debug!(
                room_id = %room_id,
                subscriber_id = %subscriber_id,
                subscribers = remaining,
                "Subscriber unregistered"
            );
        }

        removed
    }

    /// Copies out the current subscribers of a room
    pub fn snapshot(&self, room_id: &str) -> Vec<Subscriber> {
        self.rooms
            .lock()
            .get(room_id)
            .map(|room| room.values().cloned().collect())
            .unwrap_or_default()
    }

    pub fn subscriber_count(&self, room_id: &str) -> usize {
        self.rooms.lock().get(room_id).map_or(0, |room| room.len())
    }

    /// Number of rooms with at least one subscriber
    pub fn room_count(&self) -> usize {
        self.rooms.lock().len()
    }

    pub fn contains(&self, room_id: &str, subscriber_id: SubscriberId) -> bool {
        self.rooms
            .lock()
            .get(room_id)
            .is_some_and(|room| room.contains_key(&subscriber_id))
    }
}
