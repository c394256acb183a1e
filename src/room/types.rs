use serde::{Deserialize, Serialize};

/// Request payload for creating a new room
#[derive(Debug, Deserialize)]
pub struct RoomCreateRequest {
    pub theme: String,
}

/// Request payload for posting a message to a room
#[derive(Debug, Deserialize)]
pub struct MessageCreateRequest {
    pub message: String,
}

/// Response carrying the ID of a newly created room or message
#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: String,
}

/// Response carrying the updated reaction count of a message
#[derive(Debug, Serialize, Deserialize)]
pub struct ReactionResponse {
    pub value: i64,
}
