use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument};

use super::{
    models::{MessageModel, RoomModel},
    service::RoomService,
    types::{CreatedResponse, MessageCreateRequest, ReactionResponse, RoomCreateRequest},
};
use crate::shared::{AppError, AppState};

/// HTTP handler for creating a new room
///
/// POST /api/rooms
#[instrument(name = "create_room", skip(state))]
pub async fn create_room(
    State(state): State<AppState>,
    Json(request): Json<RoomCreateRequest>,
) -> Result<Json<CreatedResponse>, AppError> {
    let room_id = RoomService::from_state(&state)
        .create_room(&request.theme)
        .await?;

    Ok(Json(CreatedResponse {
        id: room_id.to_string(),
    }))
}

/// HTTP handler for listing all rooms
///
/// GET /api/rooms
#[instrument(name = "list_rooms", skip(state))]
pub async fn list_rooms(State(state): State<AppState>) -> Result<Json<Vec<RoomModel>>, AppError> {
    let rooms = RoomService::from_state(&state).list_rooms().await?;
    info!(room_count = rooms.len(), "Rooms listed");
    Ok(Json(rooms))
}

/// HTTP handler for posting a message to a room
///
/// POST /api/rooms/:room_id/messages
#[instrument(name = "create_room_message", skip(state, request))]
pub async fn create_room_message(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    Json(request): Json<MessageCreateRequest>,
) -> Result<Json<CreatedResponse>, AppError> {
    let message_id = RoomService::from_state(&state)
        .create_message(&room_id, &request.message)
        .await?;

    Ok(Json(CreatedResponse {
        id: message_id.to_string(),
    }))
}

/// GET /api/rooms/:room_id/messages
#[instrument(name = "list_room_messages", skip(state))]
pub async fn list_room_messages(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> Result<Json<Vec<MessageModel>>, AppError> {
    let messages = RoomService::from_state(&state)
        .list_messages(&room_id)
        .await?;
    Ok(Json(messages))
}

/// GET /api/rooms/:room_id/messages/:message_id
#[instrument(name = "get_room_message", skip(state))]
pub async fn get_room_message(
    State(state): State<AppState>,
    Path((room_id, message_id)): Path<(String, String)>,
) -> Result<Json<MessageModel>, AppError> {
    let message = RoomService::from_state(&state)
        .get_message(&room_id, &message_id)
        .await?;
    Ok(Json(message))
}

/// PATCH /api/rooms/:room_id/messages/:message_id/react
#[instrument(name = "react_to_message", skip(state))]
pub async fn react_to_message(
    State(state): State<AppState>,
    Path((room_id, message_id)): Path<(String, String)>,
) -> Result<Json<ReactionResponse>, AppError> {
    let value = RoomService::from_state(&state)
        .react_to_message(&room_id, &message_id)
        .await?;
    Ok(Json(ReactionResponse { value }))
}

/// DELETE /api/rooms/:room_id/messages/:message_id/react
#[instrument(name = "remove_reaction_from_message", skip(state))]
pub async fn remove_reaction_from_message(
    State(state): State<AppState>,
    Path((room_id, message_id)): Path<(String, String)>,
) -> Result<Json<ReactionResponse>, AppError> {
    let value = RoomService::from_state(&state)
        .remove_reaction_from_message(&room_id, &message_id)
        .await?;
    Ok(Json(ReactionResponse { value }))
}

/// PATCH /api/rooms/:room_id/messages/:message_id/answer
#[instrument(name = "mark_message_as_answered", skip(state))]
pub async fn mark_message_as_answered(
    State(state): State<AppState>,
    Path((room_id, message_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    RoomService::from_state(&state)
        .mark_message_as_answered(&room_id, &message_id)
        .await?;
    Ok(StatusCode::OK)
}
