// Public API
pub use handler::subscribe_handler;
pub use socket::{wait_for_disconnect, WsConnection};

// Internal modules
mod handler;
mod socket;
