use axum::{
    http::{header, HeaderName, Method},
    routing::{get, patch, post},
    Router,
};
use std::time::Duration;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::room;
use crate::shared::AppState;
use crate::websockets::subscribe_handler;

/// Builds the full HTTP router: the room API plus the subscription endpoint
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/subscribe/:room_id", get(subscribe_handler))
        .route("/api/rooms", post(room::create_room).get(room::list_rooms))
        .route(
            "/api/rooms/:room_id/messages",
            post(room::create_room_message).get(room::list_room_messages),
        )
        .route(
            "/api/rooms/:room_id/messages/:message_id",
            get(room::get_room_message),
        )
        .route(
            "/api/rooms/:room_id/messages/:message_id/react",
            patch(room::react_to_message).delete(room::remove_reaction_from_message),
        )
        .route(
            "/api/rooms/:room_id/messages/:message_id/answer",
            patch(room::mark_message_as_answered),
        )
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(|origin, _| {
            origin.as_bytes().starts_with(b"https://") || origin.as_bytes().starts_with(b"http://")
        }))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
            Method::PATCH,
        ])
        .allow_headers([
            header::ACCEPT,
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-csrf-token"),
        ])
        .expose_headers([header::LINK])
        .allow_credentials(false)
        .max_age(Duration::from_secs(300))
}
