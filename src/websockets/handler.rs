use axum::{
    extract::{
        ws::{rejection::WebSocketUpgradeRejection, WebSocket},
        Path, State, WebSocketUpgrade,
    },
    response::{IntoResponse, Response},
};
use futures::StreamExt;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::socket::{wait_for_disconnect, WsConnection};
use crate::room::RoomService;
use crate::shared::{AppError, AppState};

/// WebSocket endpoint for following a room's live events
///
/// GET /subscribe/:room_id
/// The room must exist before the connection is upgraded, so a bad id is
/// reported as such even on a request that is not a websocket handshake.
#[instrument(name = "subscribe_handler", skip(state, ws))]
pub async fn subscribe_handler(
    Path(raw_room_id): Path<String>,
    State(state): State<AppState>,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Result<Response, AppError> {
    let room_id = RoomService::from_state(&state)
        .require_room(&raw_room_id)
        .await
        .map_err(|e| {
            warn!(room_id = %raw_room_id, error = %e, "Rejecting subscription");
            e
        })?
        .to_string();

    let ws = match ws {
        Ok(ws) => ws,
        Err(rejection) => {
            warn!(room_id = %room_id, error = %rejection, "Not a websocket handshake");
            return Ok(rejection.into_response());
        }
    };

    info!(room_id = %room_id, "Room verified, upgrading subscription connection");

    Ok(ws.on_upgrade(move |socket| handle_subscription(socket, room_id, state)))
}

/// Runs one subscriber connection from registration until teardown
///
/// Teardown starts when the client disconnects, a dispatch to it fails,
/// or the server shuts down, whichever happens first.
async fn handle_subscription(socket: WebSocket, room_id: String, state: AppState) {
    let (sink, mut stream) = socket.split();
    let connection = Arc::new(WsConnection::new(sink, state.send_timeout));
    let handle = state.subscriptions.subscribe(&room_id, connection);

    tokio::select! {
        _ = wait_for_disconnect(&mut stream) => {
            info!(
                room_id = %room_id,
                subscriber_id = %handle.id(),
                "Client closed subscription"
            );
            handle.cancel();
        }
        _ = handle.cancelled() => {}
    }

    handle.close().await;
}
