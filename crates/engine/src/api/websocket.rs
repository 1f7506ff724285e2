//! WebSocket handler for renderer connections
//!
//! The socket carries JSON `ClientMessage`s in and `ServerMessage`s out. A
//! connection must Join (binding its device id) before actions dispatch;
//! parse failures are answered on the wire without touching any session.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use uuid::Uuid;

use labyrinth_shared::{ClientMessage, ServerMessage};

use crate::infrastructure::state::AppState;

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle an individual WebSocket connection
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut ws_sender, mut ws_receiver) = socket.split();
    let connection_id = Uuid::new_v4();
    let mut device_id: Option<String> = None;

    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();

    tracing::info!(%connection_id, "WebSocket connection established");

    // Forward engine events to the socket in emission order.
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if let Ok(json) = serde_json::to_string(&msg) {
                if ws_sender.send(Message::Text(json.into())).await.is_err() {
                    break;
                }
            }
        }
    });

    while let Some(result) = ws_receiver.next().await {
        match result {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(msg) => {
                    let responses = handle_message(msg, &state, &mut device_id).await;
                    let mut closed = false;
                    for response in responses {
                        if tx.send(response).is_err() {
                            closed = true;
                            break;
                        }
                    }
                    if closed {
                        break;
                    }
                }
                Err(e) => {
                    tracing::warn!(%connection_id, error = %e, "Failed to parse message");
                    let error = ServerMessage::Error {
                        code: "PARSE_ERROR".to_string(),
                        message: format!("Invalid message format: {}", e),
                    };
                    if tx.send(error).is_err() {
                        break;
                    }
                }
            },
            Ok(Message::Close(_)) => {
                tracing::info!(%connection_id, "WebSocket closed by client");
                break;
            }
            Ok(Message::Ping(_)) => {
                let _ = tx.send(ServerMessage::Pong);
            }
            Err(e) => {
                tracing::error!(%connection_id, error = %e, "WebSocket error");
                break;
            }
            _ => {}
        }
    }

    // Session state is retained so the same device can reconnect.
    if let Some(device) = device_id {
        tracing::info!(%connection_id, device, "Device disconnected; session retained");
    }

    send_task.abort();
    tracing::info!(%connection_id, "WebSocket connection terminated");
}

/// Handle a parsed client message, returning events in emission order.
async fn handle_message(
    msg: ClientMessage,
    state: &AppState,
    device_id: &mut Option<String>,
) -> Vec<ServerMessage> {
    match msg {
        ClientMessage::Heartbeat => vec![ServerMessage::Pong],

        ClientMessage::Join { device_id: device } => {
            if device.trim().is_empty() {
                return vec![ServerMessage::Error {
                    code: "BAD_DEVICE".to_string(),
                    message: "Device id must not be empty".to_string(),
                }];
            }
            tracing::info!(device = %device, "Device joined");
            *device_id = Some(device.clone());
            state.host.open_session(&device).await
        }

        ClientMessage::Action { id, value } => match device_id {
            Some(device) => state.host.handle_action(device, &id, value).await,
            None => vec![ServerMessage::Error {
                code: "NOT_JOINED".to_string(),
                message: "Join with a device id before sending actions".to_string(),
            }],
        },
    }
}
