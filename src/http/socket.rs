//! Viewer WebSocket endpoint
//!
//! A viewer connects to `/ws?clientId=<id>`, receives a status message with
//! its session id, then every queued wire message for that session in order.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use swarm_audio_lib::{SocketFrame, WireMessage};

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SocketQuery {
    #[serde(rename = "clientId")]
    pub client_id: Option<String>,
}

/// Handle WebSocket upgrade requests from viewers.
pub async fn viewer_socket(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SocketQuery>,
    ws: WebSocketUpgrade,
) -> Response {
    let session_id = query
        .client_id
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| Uuid::new_v4().simple().to_string());

    ws.on_upgrade(move |socket| serve_viewer(socket, state, session_id))
}

fn to_ws_message(message: &WireMessage) -> Message {
    match message.encode() {
        SocketFrame::Text(text) => Message::Text(text.into()),
        SocketFrame::Binary(bytes) => Message::Binary(bytes),
    }
}

/// Forward queued messages to the viewer until either side goes away.
async fn serve_viewer(socket: WebSocket, state: Arc<AppState>, session_id: String) {
    let mut handle = state.sessions.register(session_id.clone());
    info!(session = %handle.session_id, connection = handle.connection, "Viewer connected");

    let (mut sink, mut stream) = socket.split();

    let hello = WireMessage::Status(serde_json::json!({ "sid": session_id }));
    if let Err(e) = sink.send(to_ws_message(&hello)).await {
        warn!(session = %session_id, "Failed to greet viewer: {}", e);
        state.sessions.unregister(&session_id, handle.connection);
        return;
    }

    loop {
        tokio::select! {
            queued = handle.rx.recv() => {
                // Sender side dropped: a newer connection took over this id.
                let Some(message) = queued else { break };
                if let Err(e) = sink.send(to_ws_message(&message)).await {
                    warn!(session = %session_id, "Error sending to viewer: {}", e);
                    break;
                }
            }
            incoming = stream.next() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => debug!(session = %session_id, "Ignoring viewer message"),
                    Some(Err(e)) => {
                        warn!(session = %session_id, "Viewer WebSocket error: {}", e);
                        break;
                    }
                }
            }
        }
    }

    state.sessions.unregister(&session_id, handle.connection);
    info!(session = %session_id, "Viewer disconnected");
}
