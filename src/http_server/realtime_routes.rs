//! Realtime HTTP Routes and WebSocket Handler
//!
//! Every connected socket receives every change event, in the order each
//! resource applied its mutations.

use std::borrow::Cow;
use std::sync::Arc;

use axum::{
    extract::{
        ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use futures_util::{stream::SplitSink, SinkExt, StreamExt};
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;
use uuid::Uuid;

use crate::observability::{log_event_with_fields, Event, Logger};
use crate::realtime::{ChangeHub, ClientMessage, RealtimeError, ServerMessage};
use crate::service::ServiceRegistry;

// ==================
// Shared State
// ==================

/// Realtime state shared across handlers
pub struct RealtimeState {
    pub hub: Arc<ChangeHub>,
    pub registry: Arc<ServiceRegistry>,
}

impl RealtimeState {
    pub fn new(hub: Arc<ChangeHub>, registry: Arc<ServiceRegistry>) -> Self {
        Self { hub, registry }
    }
}

#[derive(Debug, Serialize)]
pub struct RealtimeStatsResponse {
    pub connected_clients: usize,
    pub events_published: u64,
    pub resources: Vec<String>,
}

/// Create realtime routes
pub fn realtime_routes(state: Arc<RealtimeState>) -> Router {
    Router::new()
        .route("/ws", get(websocket_handler))
        .route("/stats", get(stats_handler))
        .with_state(state)
}

async fn stats_handler(State(state): State<Arc<RealtimeState>>) -> Json<RealtimeStatsResponse> {
    let stats = state.hub.stats();
    Json(RealtimeStatsResponse {
        connected_clients: stats.connected_clients,
        events_published: stats.events_published,
        resources: state.registry.names(),
    })
}

// ==================
// WebSocket
// ==================

/// WebSocket upgrade handler
async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<RealtimeState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_websocket(socket, state))
}

type SocketSender = SplitSink<WebSocket, Message>;

/// Serialize and send one text frame; false once the socket is gone
async fn send_json<T: Serialize>(sender: &mut SocketSender, message: &T) -> bool {
    match serde_json::to_string(message) {
        Ok(json) => sender.send(Message::Text(json)).await.is_ok(),
        Err(_) => true,
    }
}

/// Handle individual WebSocket connection
async fn handle_websocket(socket: WebSocket, state: Arc<RealtimeState>) {
    let _guard = state.hub.connect();
    // Subscribe before greeting so no event after "connected" is missed
    let mut events = state.hub.subscribe();

    let (mut sender, mut receiver) = socket.split();
    let connection_id = Uuid::new_v4().to_string();
    log_event_with_fields(Event::ClientConnected, &[("connection_id", connection_id.as_str())]);

    let welcome = ServerMessage::Connected {
        connection_id: connection_id.clone(),
        resources: state.registry.names(),
    };

    if send_json(&mut sender, &welcome).await {
        loop {
            tokio::select! {
                incoming = receiver.next() => match incoming {
                    Some(Ok(Message::Text(text))) => {
                        let reply = match ClientMessage::parse(&text) {
                            Ok(ClientMessage::Ping) => ServerMessage::Pong,
                            Err(e) => {
                                Logger::warn(
                                    Event::ClientMessageRejected.as_str(),
                                    &[("connection_id", connection_id.as_str()), ("reason", e.to_string().as_str())],
                                );
                                ServerMessage::from(&e)
                            }
                        };
                        if !send_json(&mut sender, &reply).await {
                            break;
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if sender.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => {}
                },
                event = events.recv() => match event {
                    Ok(event) => {
                        if !send_json(&mut sender, &event.to_wire_format()).await {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        let skipped_text = skipped.to_string();
                        Logger::warn(
                            Event::ClientLagged.as_str(),
                            &[("connection_id", connection_id.as_str()), ("skipped", skipped_text.as_str())],
                        );
                        let notice = ServerMessage::from(&RealtimeError::Lagged(skipped));
                        if !send_json(&mut sender, &notice).await {
                            break;
                        }
                    }
                    Err(RecvError::Closed) => {
                        let err = RealtimeError::ConnectionClosed;
                        let frame = CloseFrame {
                            code: err.close_code(),
                            reason: Cow::Owned(err.to_string()),
                        };
                        let _ = sender.send(Message::Close(Some(frame))).await;
                        break;
                    }
                },
            }
        }
    }

    log_event_with_fields(Event::ClientDisconnected, &[("connection_id", connection_id.as_str())]);
}
