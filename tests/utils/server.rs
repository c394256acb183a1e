//! Real HTTP server on a loopback port for websocket tests
#![allow(dead_code)] // Test utilities may not all be used in every test

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use qarooms::event::{EventDispatcher, SubscriberRegistry, SubscriptionManager};
use qarooms::{build_router, AppState, InMemoryRoomRepository};

pub type ClientSocket = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub struct TestServer {
    pub addr: SocketAddr,
    pub router: Router,
    pub registry: SubscriberRegistry,
    pub shutdown: CancellationToken,
}

impl TestServer {
    /// Serves the full router on 127.0.0.1 with an ephemeral port
    pub async fn start() -> Self {
        let registry = SubscriberRegistry::new();
        let shutdown = CancellationToken::new();
        let state = AppState::new(
            Arc::new(InMemoryRoomRepository::new()),
            EventDispatcher::new(registry.clone()),
            SubscriptionManager::new(registry.clone(), shutdown.clone()),
        );
        let router = build_router(state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind test listener");
        let addr = listener.local_addr().expect("listener has no address");
        let served = router.clone();
        tokio::spawn(async move {
            axum::serve(listener, served).await.expect("test server failed");
        });

        Self {
            addr,
            router,
            registry,
            shutdown,
        }
    }

    /// Sends a REST request through the same router state the server uses
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<&str>,
    ) -> (StatusCode, serde_json::Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    pub async fn create_room(&self) -> String {
        let (status, body) = self
            .request("POST", "/api/rooms", Some(r#"{"theme": "live"}"#))
            .await;
        assert_eq!(status, StatusCode::OK);
        body["id"].as_str().expect("room id missing").to_string()
    }

    pub async fn post_message(&self, room_id: &str, message: &str) -> String {
        let (status, body) = self
            .request(
                "POST",
                &format!("/api/rooms/{}/messages", room_id),
                Some(&serde_json::json!({ "message": message }).to_string()),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        body["id"].as_str().expect("message id missing").to_string()
    }

    pub fn subscribe_url(&self, room_id: &str) -> String {
        format!("ws://{}/subscribe/{}", self.addr, room_id)
    }

    /// Opens a websocket subscription and waits until the server registered it
    pub async fn connect(&self, room_id: &str, registry_key: &str) -> ClientSocket {
        let before = self.registry.subscriber_count(registry_key);
        let (socket, _) = connect_async(self.subscribe_url(room_id))
            .await
            .expect("websocket handshake failed");
        self.wait_for_subscribers(registry_key, before + 1).await;
        socket
    }

    /// Polls the registry until the room holds exactly `count` subscribers
    pub async fn wait_for_subscribers(&self, room_id: &str, count: usize) {
        tokio::time::timeout(Duration::from_secs(2), async {
            while self.registry.subscriber_count(room_id) != count {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap_or_else(|_| {
            panic!(
                "room {} has {} subscribers, expected {}",
                room_id,
                self.registry.subscriber_count(room_id),
                count
            )
        });
    }
}
