use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for rooms table
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct RoomModel {
    pub id: Uuid,
    pub theme: String,
}

impl RoomModel {
    /// Creates a new room model with a generated ID
    pub fn new(theme: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            theme,
        }
    }
}

/// Database model for messages table
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct MessageModel {
    pub id: Uuid,
    pub room_id: Uuid,
    pub message: String,
    pub reaction_count: i64,
    pub answered: bool,
    pub created_at: DateTime<Utc>,
}

impl MessageModel {
    pub fn new(room_id: Uuid, message: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            room_id,
            message,
            reaction_count: 0,
            answered: false,
            created_at: Utc::now(),
        }
    }

    /// Adds one reaction and returns the new count
    pub fn add_reaction(&mut self) -> i64 {
        self.reaction_count += 1;
        self.reaction_count
    }

    /// Takes one reaction back, never going below zero
    pub fn remove_reaction(&mut self) -> i64 {
        self.reaction_count = (self.reaction_count - 1).max(0);
        self.reaction_count
    }
}
