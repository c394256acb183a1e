// Room-scoped publish/subscribe
//
// This module tracks live subscriber connections per room and fans out
// room events to exactly the subscribers of the affected room.

// Public API - what other modules can use
pub use connection::{ConnectionError, SubscriberConnection, SubscriberId};
pub use dispatcher::{DispatchOutcome, EventDispatcher};
pub use events::{EventPayload, MessageAnswered, MessageCreated, ReactionUpdated, RoomEvent};
pub use registry::{Subscriber, SubscriberRegistry};
pub use subscription::{SubscriberHandle, SubscriptionManager, SubscriptionState};

// Internal modules
mod connection;
mod dispatcher;
mod events;
mod registry;
mod subscription;
