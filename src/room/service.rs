use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::{
    models::{MessageModel, RoomModel},
    repository::RoomRepository,
};
use crate::event::{EventDispatcher, RoomEvent};
use crate::shared::{AppError, AppState};

/// Service for room and message business logic
///
/// Every successful mutation publishes the matching room event. Publishing
/// never blocks the caller and its outcome never affects the result.
pub struct RoomService {
    repository: Arc<dyn RoomRepository + Send + Sync>,
    dispatcher: EventDispatcher,
}

impl RoomService {
    pub fn new(
        repository: Arc<dyn RoomRepository + Send + Sync>,
        dispatcher: EventDispatcher,
    ) -> Self {
        Self {
            repository,
            dispatcher,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(Arc::clone(&state.room_repository), state.dispatcher.clone())
    }

    /// Parses a room id from the path and checks the room exists
    ///
    /// Callers key the subscriber registry on the returned id's hyphenated
    /// lower-case form, whatever spelling the path used.
    #[instrument(skip(self))]
    pub async fn require_room(&self, raw_room_id: &str) -> Result<Uuid, AppError> {
        let room_id = parse_id(raw_room_id, "room")?;
        if self.repository.get_room(room_id).await?.is_none() {
            debug!(room_id = %room_id, "Room not found");
            return Err(AppError::BadRequest("room not found".to_string()));
        }
        Ok(room_id)
    }

    /// Parses a message id from the path and checks the message exists
    #[instrument(skip(self))]
    pub async fn require_message(&self, raw_message_id: &str) -> Result<MessageModel, AppError> {
        let message_id = parse_id(raw_message_id, "message")?;
        self.repository
            .get_message(message_id)
            .await?
            .ok_or_else(|| {
                debug!(message_id = %message_id, "Message not found");
                AppError::BadRequest("message not found".to_string())
            })
    }

    #[instrument(skip(self))]
    pub async fn create_room(&self, theme: &str) -> Result<Uuid, AppError> {
        let room_id = self.repository.create_room(theme).await?;
        info!(room_id = %room_id, "Room created");
        Ok(room_id)
    }

    #[instrument(skip(self))]
    pub async fn list_rooms(&self) -> Result<Vec<RoomModel>, AppError> {
        self.repository.list_rooms().await
    }

    #[instrument(skip(self))]
    pub async fn list_messages(&self, raw_room_id: &str) -> Result<Vec<MessageModel>, AppError> {
        let room_id = self.require_room(raw_room_id).await?;
        self.repository.list_room_messages(room_id).await
    }

    #[instrument(skip(self))]
    pub async fn get_message(
        &self,
        raw_room_id: &str,
        raw_message_id: &str,
    ) -> Result<MessageModel, AppError> {
        let room_id = self.require_room(raw_room_id).await?;
        self.message_in_room(room_id, raw_message_id).await
    }

    #[instrument(skip(self, message))]
    pub async fn create_message(&self, raw_room_id: &str, message: &str) -> Result<Uuid, AppError> {
        let room_id = self.require_room(raw_room_id).await?;
        let message_id = self.repository.insert_message(room_id, message).await?;

        info!(room_id = %room_id, message_id = %message_id, "Message created");
        self.dispatcher.publish(RoomEvent::message_created(
            room_id.to_string(),
            message_id.to_string(),
            message,
        ));

        Ok(message_id)
    }

    #[instrument(skip(self))]
    pub async fn react_to_message(
        &self,
        raw_room_id: &str,
        raw_message_id: &str,
    ) -> Result<i64, AppError> {
        let room_id = self.require_room(raw_room_id).await?;
        let message = self.message_in_room(room_id, raw_message_id).await?;
        let count = self.repository.react_to_message(message.id).await?;

        self.dispatcher.publish(RoomEvent::reacted_to_message(
            room_id.to_string(),
            message.id.to_string(),
            count,
        ));

        Ok(count)
    }

    #[instrument(skip(self))]
    pub async fn remove_reaction_from_message(
        &self,
        raw_room_id: &str,
        raw_message_id: &str,
    ) -> Result<i64, AppError> {
        let room_id = self.require_room(raw_room_id).await?;
        let message = self.message_in_room(room_id, raw_message_id).await?;
        let count = self.repository.remove_reaction_from_message(message.id).await?;

        self.dispatcher.publish(RoomEvent::removed_reaction_from_message(
            room_id.to_string(),
            message.id.to_string(),
            count,
        ));

        Ok(count)
    }

    #[instrument(skip(self))]
    pub async fn mark_message_as_answered(
        &self,
        raw_room_id: &str,
        raw_message_id: &str,
    ) -> Result<(), AppError> {
        let room_id = self.require_room(raw_room_id).await?;
        let message = self.message_in_room(room_id, raw_message_id).await?;
        self.repository.mark_message_as_answered(message.id).await?;

        self.dispatcher.publish(RoomEvent::marked_as_answered(
            room_id.to_string(),
            message.id.to_string(),
        ));

        Ok(())
    }

    /// Looks up a message and makes sure it belongs to the given room
    async fn message_in_room(
        &self,
        room_id: Uuid,
        raw_message_id: &str,
    ) -> Result<MessageModel, AppError> {
        let message = self.require_message(raw_message_id).await?;
        if message.room_id != room_id {
            warn!(
                room_id = %room_id,
                message_id = %message.id,
                "Message belongs to another room"
            );
            return Err(AppError::NotFound("message not found in room".to_string()));
        }
        Ok(message)
    }
}

fn parse_id(raw: &str, label: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::BadRequest(format!("invalid {} id", label)))
}
