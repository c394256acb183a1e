use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::debug;

use crate::event::{ConnectionError, RoomEvent, SubscriberConnection};

/// Subscriber connection backed by the send half of an axum WebSocket
///
/// Events go out as JSON text frames. The sink sits behind an async mutex
/// so concurrent dispatches to the same client serialize their writes.
pub struct WsConnection {
    sink: Mutex<SplitSink<WebSocket, Message>>,
    send_timeout: Option<Duration>,
}

impl WsConnection {
    pub fn new(sink: SplitSink<WebSocket, Message>, send_timeout: Option<Duration>) -> Self {
        Self {
            sink: Mutex::new(sink),
            send_timeout,
        }
    }
}

#[async_trait]
impl SubscriberConnection for WsConnection {
    async fn send(&self, event: &RoomEvent) -> Result<(), ConnectionError> {
        let text = event.to_json()?;
        let mut sink = self.sink.lock().await;

        let result = match self.send_timeout {
            Some(limit) => timeout(limit, sink.send(Message::Text(text)))
                .await
                .map_err(|_| ConnectionError::Timeout)?,
            None => sink.send(Message::Text(text)).await,
        };

        result.map_err(|e| ConnectionError::SendFailed(e.to_string()))
    }

    async fn close(&self) -> Result<(), ConnectionError> {
        let mut sink = self.sink.lock().await;
        // The peer may already be gone; closing the sink is what matters
        let _ = sink.send(Message::Close(None)).await;
        sink.close()
            .await
            .map_err(|_| ConnectionError::Closed)
    }
}

/// Reads client frames until the client goes away
///
/// Subscribers never send anything meaningful, so frames are only drained
/// to notice a close frame, the end of the stream, or a read error.
pub async fn wait_for_disconnect(stream: &mut SplitStream<WebSocket>) {
    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Close(_)) => {
                debug!("Client sent close frame");
                break;
            }
            Ok(_) => continue,
            Err(e) => {
                debug!(error = %e, "WebSocket read failed");
                break;
            }
        }
    }
}
