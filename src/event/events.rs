use serde::{Deserialize, Serialize};

/// Payload of a `message_created` notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageCreated {
    pub id: String,
    pub message: String,
}

/// Payload shared by reaction notifications; `value` is the new reaction count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionUpdated {
    pub id: String,
    pub value: i64,
}

/// Payload of a `marked_message_as_answered` notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageAnswered {
    pub id: String,
}

/// What subscribers actually receive on the wire:
/// `{"kind": "<kind>", "value": {...}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum EventPayload {
    MessageCreated(MessageCreated),
    ReactedToMessage(ReactionUpdated),
    RemovedReactionFromMessage(ReactionUpdated),
    #[serde(rename = "marked_message_as_answered")]
    MarkedAsAnswered(MessageAnswered),
}

/// Events that happened in a room
///
/// Events represent facts about things that have already happened to a
/// room's messages. The room id is only used for routing to subscribers
/// and is never part of the serialized payload.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomEvent {
    room_id: String,
    payload: EventPayload,
}

impl RoomEvent {
    pub fn new(room_id: impl Into<String>, payload: EventPayload) -> Self {
        Self {
            room_id: room_id.into(),
            payload,
        }
    }

    /// A new message was posted to the room
    pub fn message_created(
        room_id: impl Into<String>,
        message_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(
            room_id,
            EventPayload::MessageCreated(MessageCreated {
                id: message_id.into(),
                message: message.into(),
            }),
        )
    }

    /// A message received a reaction; `count` is the updated total
    pub fn reacted_to_message(
        room_id: impl Into<String>,
        message_id: impl Into<String>,
        count: i64,
    ) -> Self {
        Self::new(
            room_id,
            EventPayload::ReactedToMessage(ReactionUpdated {
                id: message_id.into(),
                value: count,
            }),
        )
    }

    /// A reaction was taken back; `count` is the updated total
    pub fn removed_reaction_from_message(
        room_id: impl Into<String>,
        message_id: impl Into<String>,
        count: i64,
    ) -> Self {
        Self::new(
            room_id,
            EventPayload::RemovedReactionFromMessage(ReactionUpdated {
                id: message_id.into(),
                value: count,
            }),
        )
    }

    pub fn marked_as_answered(room_id: impl Into<String>, message_id: impl Into<String>) -> Self {
        Self::new(
            room_id,
            EventPayload::MarkedAsAnswered(MessageAnswered {
                id: message_id.into(),
            }),
        )
    }

    /// Get the room this event is routed to
    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    /// Get the wire name of the event kind
    pub fn kind(&self) -> &'static str {
        match self.payload {
            EventPayload::MessageCreated(_) => "message_created",
            EventPayload::ReactedToMessage(_) => "reacted_to_message",
            EventPayload::RemovedReactionFromMessage(_) => "removed_reaction_from_message",
            EventPayload::MarkedAsAnswered(_) => "marked_message_as_answered",
        }
    }

    /// Encode the event as the JSON object sent to subscribers
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.payload)
    }
}
