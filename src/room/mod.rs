// Public API - what other modules can use
pub use handlers::{
    create_room, create_room_message, get_room_message, list_room_messages, list_rooms,
    mark_message_as_answered, react_to_message, remove_reaction_from_message,
};
pub use service::RoomService;

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
mod service;
pub mod types;
