use async_trait::async_trait;
use parking_lot::Mutex;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use super::models::{MessageModel, RoomModel};
use crate::shared::AppError;

/// Trait for room and message storage operations
#[async_trait]
pub trait RoomRepository {
    async fn create_room(&self, theme: &str) -> Result<Uuid, AppError>;
    async fn get_room(&self, room_id: Uuid) -> Result<Option<RoomModel>, AppError>;
    async fn list_rooms(&self) -> Result<Vec<RoomModel>, AppError>;

    async fn insert_message(&self, room_id: Uuid, message: &str) -> Result<Uuid, AppError>;
    async fn get_message(&self, message_id: Uuid) -> Result<Option<MessageModel>, AppError>;
    async fn list_room_messages(&self, room_id: Uuid) -> Result<Vec<MessageModel>, AppError>;

    /// Adds a reaction and returns the new reaction count
    async fn react_to_message(&self, message_id: Uuid) -> Result<i64, AppError>;

    /// Removes a reaction and returns the new reaction count (never negative)
    async fn remove_reaction_from_message(&self, message_id: Uuid) -> Result<i64, AppError>;

    async fn mark_message_as_answered(&self, message_id: Uuid) -> Result<(), AppError>;
}

/// In-memory implementation of RoomRepository for development and testing
pub struct InMemoryRoomRepository {
    rooms: Mutex<HashMap<Uuid, RoomModel>>,
    /// Kept in insertion order so room messages list oldest first
    messages: Mutex<Vec<MessageModel>>,
}

impl Default for InMemoryRoomRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRoomRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
            messages: Mutex::new(Vec::new()),
        }
    }

    fn update_message<T>(
        &self,
        message_id: Uuid,
        update: impl FnOnce(&mut MessageModel) -> T,
    ) -> Result<T, AppError> {
        let mut messages = self.messages.lock();
        let message = messages.iter_mut().find(|m| m.id == message_id).ok_or_else(|| {
            warn!(message_id = %message_id, "Message not found in memory");
            AppError::NotFound("message not found".to_string())
        })?;
        Ok(update(message))
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    #[instrument(skip(self))]
    async fn create_room(&self, theme: &str) -> Result<Uuid, AppError> {
        let room = RoomModel::new(theme.to_string());
        let room_id = room.id;
        self.rooms.lock().insert(room_id, room);

        debug!(room_id = %room_id, "Room created in memory");
        Ok(room_id)
    }

    #[instrument(skip(self))]
    async fn get_room(&self, room_id: Uuid) -> Result<Option<RoomModel>, AppError> {
        let room = self.rooms.lock().get(&room_id).cloned();
        if room.is_none() {
            debug!(room_id = %room_id, "Room not found in memory");
        }
        Ok(room)
    }

    #[instrument(skip(self))]
    async fn list_rooms(&self) -> Result<Vec<RoomModel>, AppError> {
        Ok(self.rooms.lock().values().cloned().collect())
    }

    #[instrument(skip(self, message))]
    async fn insert_message(&self, room_id: Uuid, message: &str) -> Result<Uuid, AppError> {
        if !self.rooms.lock().contains_key(&room_id) {
            warn!(room_id = %room_id, "Cannot insert message into unknown room");
            return Err(AppError::NotFound("room not found".to_string()));
        }

        let message = MessageModel::new(room_id, message.to_string());
        let message_id = message.id;
        self.messages.lock().push(message);

        debug!(room_id = %room_id, message_id = %message_id, "Message inserted in memory");
        Ok(message_id)
    }

    #[instrument(skip(self))]
    async fn get_message(&self, message_id: Uuid) -> Result<Option<MessageModel>, AppError> {
        Ok(self
            .messages
            .lock()
            .iter()
            .find(|m| m.id == message_id)
            .cloned())
    }

    #[instrument(skip(self))]
    async fn list_room_messages(&self, room_id: Uuid) -> Result<Vec<MessageModel>, AppError> {
        Ok(self
            .messages
            .lock()
            .iter()
            .filter(|m| m.room_id == room_id)
            .cloned()
            .collect())
    }

    #[instrument(skip(self))]
    async fn react_to_message(&self, message_id: Uuid) -> Result<i64, AppError> {
        self.update_message(message_id, MessageModel::add_reaction)
    }

    #[instrument(skip(self))]
    async fn remove_reaction_from_message(&self, message_id: Uuid) -> Result<i64, AppError> {
        self.update_message(message_id, MessageModel::remove_reaction)
    }

    #[instrument(skip(self))]
    async fn mark_message_as_answered(&self, message_id: Uuid) -> Result<(), AppError> {
        self.update_message(message_id, |m| m.answered = true)
    }
}

/// PostgreSQL implementation of room repository
pub struct PostgresRoomRepository {
    pool: PgPool,
}

impl PostgresRoomRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn message_from_row(row: &sqlx::postgres::PgRow) -> MessageModel {
        MessageModel {
            id: row.get("id"),
            room_id: row.get("room_id"),
            message: row.get("message"),
            reaction_count: row.get("reaction_count"),
            answered: row.get("answered"),
            created_at: row.get("created_at"),
        }
    }
}

fn database_error(e: sqlx::Error) -> AppError {
    warn!(error = %e, "Database query failed");
    AppError::DatabaseError(e.to_string())
}

#[async_trait]
impl RoomRepository for PostgresRoomRepository {
    #[instrument(skip(self))]
    async fn create_room(&self, theme: &str) -> Result<Uuid, AppError> {
        let row = sqlx::query("INSERT INTO rooms (theme) VALUES ($1) RETURNING id")
            .bind(theme)
            .fetch_one(&self.pool)
            .await
            .map_err(database_error)?;

        let room_id: Uuid = row.get("id");
        debug!(room_id = %room_id, "Room created in database");
        Ok(room_id)
    }

    #[instrument(skip(self))]
    async fn get_room(&self, room_id: Uuid) -> Result<Option<RoomModel>, AppError> {
        sqlx::query_as::<_, RoomModel>("SELECT id, theme FROM rooms WHERE id = $1")
            .bind(room_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(database_error)
    }

    #[instrument(skip(self))]
    async fn list_rooms(&self) -> Result<Vec<RoomModel>, AppError> {
        sqlx::query_as::<_, RoomModel>("SELECT id, theme FROM rooms")
            .fetch_all(&self.pool)
            .await
            .map_err(database_error)
    }

    #[instrument(skip(self, message))]
    async fn insert_message(&self, room_id: Uuid, message: &str) -> Result<Uuid, AppError> {
        let row =
            sqlx::query("INSERT INTO messages (room_id, message) VALUES ($1, $2) RETURNING id")
                .bind(room_id)
                .bind(message)
                .fetch_one(&self.pool)
                .await
                .map_err(database_error)?;

        let message_id: Uuid = row.get("id");
        debug!(room_id = %room_id, message_id = %message_id, "Message inserted in database");
        Ok(message_id)
    }

    #[instrument(skip(self))]
    async fn get_message(&self, message_id: Uuid) -> Result<Option<MessageModel>, AppError> {
        let row = sqlx::query(
            "SELECT id, room_id, message, reaction_count, answered, created_at FROM messages WHERE id = $1",
        )
        .bind(message_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(row.as_ref().map(Self::message_from_row))
    }

    #[instrument(skip(self))]
    async fn list_room_messages(&self, room_id: Uuid) -> Result<Vec<MessageModel>, AppError> {
        let rows = sqlx::query(
            "SELECT id, room_id, message, reaction_count, answered, created_at FROM messages WHERE room_id = $1 ORDER BY created_at",
        )
        .bind(room_id)
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(rows.iter().map(Self::message_from_row).collect())
    }

    #[instrument(skip(self))]
    async fn react_to_message(&self, message_id: Uuid) -> Result<i64, AppError> {
        let row = sqlx::query(
            "UPDATE messages SET reaction_count = reaction_count + 1 WHERE id = $1 RETURNING reaction_count",
        )
        .bind(message_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?
        .ok_or_else(|| AppError::NotFound("message not found".to_string()))?;

        Ok(row.get("reaction_count"))
    }

    #[instrument(skip(self))]
    async fn remove_reaction_from_message(&self, message_id: Uuid) -> Result<i64, AppError> {
        let row = sqlx::query(
            "UPDATE messages SET reaction_count = GREATEST(reaction_count - 1, 0) WHERE id = $1 RETURNING reaction_count",
        )
        .bind(message_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?
        .ok_or_else(|| AppError::NotFound("message not found".to_string()))?;

        Ok(row.get("reaction_count"))
    }

    #[instrument(skip(self))]
    async fn mark_message_as_answered(&self, message_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE messages SET answered = true WHERE id = $1")
            .bind(message_id)
            .execute(&self.pool)
            .await
            .map_err(database_error)?;

        if result.rows_affected() == 0 {
            warn!(message_id = %message_id, "Message not found for update");
            return Err(AppError::NotFound("message not found".to_string()));
        }
        Ok(())
    }
}
