// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WebSocket handler for the per-session chat channel.
//!
//! Client -> Server: raw UTF-8 text, one message per turn.
//! Server -> Client: plain text for ordinary replies, or the scheduling
//! JSON envelope `{"type":"scheduling","message":...,"url":...,"linkText":...}`.
//! Clients distinguish the two by attempting a JSON parse.
//!
//! Messages are processed strictly sequentially per connection: one turn
//! runs to completion before the next text frame is read. If the connection
//! drops mid-turn the in-flight reply is discarded; state already advanced
//! for that turn is not rolled back.

use axum::{
    extract::{
        Path, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use tracing::{debug, info};

use crate::server::GatewayState;

/// WebSocket upgrade handler for `GET /ws/{session_id}`.
pub async fn ws_handler(
    Path(session_id): Path<String>,
    ws: WebSocketUpgrade,
    State(state): State<GatewayState>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state, session_id))
}

/// Drives one WebSocket connection: receive a turn, handle it, send the
/// reply, repeat.
async fn handle_socket(socket: WebSocket, state: GatewayState, session_id: String) {
    info!(%session_id, "WebSocket connected");
    let (mut sender, mut receiver) = socket.split();

    while let Some(Ok(msg)) = receiver.next().await {
        match msg {
            Message::Text(text) => {
                debug!(%session_id, "received message");
                let reply = state.orchestrator.handle(&session_id, &text).await;
                if sender
                    .send(Message::Text(reply.into_payload().into()))
                    .await
                    .is_err()
                {
                    break;
                }
            }
            Message::Close(_) => break,
            _ => {} // Ignore binary; ping/pong handled by the ws layer.
        }
    }

    info!(%session_id, "WebSocket disconnected");
}
