//! WebSocket push channel for the live dashboard.
//!
//! GET /ws
//!
//! Each connection registers a channel-backed sink with the broadcast hub.
//! Outgoing frames (broadcast events and `pong` replies) all go through that
//! channel so a single task owns the socket's write half.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Extension,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::kernel::{BroadcastHub, ChannelSink};
use crate::server::app::AxumAppState;

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Extension(state): Extension<AxumAppState>,
) -> Response {
    let hub = state.deps.broadcast_hub.clone();
    ws.on_upgrade(move |socket| handle_socket(socket, hub))
}

async fn handle_socket(socket: WebSocket, hub: BroadcastHub) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    let subscriber_id = hub.connect(Arc::new(ChannelSink::new(tx.clone()))).await;
    info!(subscriber_id = %subscriber_id, "Dashboard connected");

    let writer = tokio::spawn(async move {
        while let Some(payload) = rx.recv().await {
            if ws_tx.send(Message::Text(payload)).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(message)) = ws_rx.next().await {
        match message {
            Message::Text(text) if text == "ping" => {
                if tx.send("pong".to_string()).is_err() {
                    break;
                }
            }
            Message::Close(_) => break,
            other => debug!(subscriber_id = %subscriber_id, frame = ?other, "Ignoring client frame"),
        }
    }

    hub.disconnect(subscriber_id).await;
    writer.abort();
    info!(subscriber_id = %subscriber_id, "Dashboard disconnected");
}
