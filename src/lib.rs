// Library crate for the live Q&A rooms server
// This file exposes the public API for integration tests

pub mod app;
pub mod config;
pub mod event;
pub mod room;
pub mod shared;
pub mod websockets;

// Re-export commonly used types for easier access in tests
pub use app::build_router;
pub use config::ServerConfig;
pub use event::{
    EventDispatcher, RoomEvent, SubscriberConnection, SubscriberHandle, SubscriberRegistry,
    SubscriptionManager,
};
pub use room::repository::{InMemoryRoomRepository, PostgresRoomRepository, RoomRepository};
pub use shared::{AppError, AppState};
