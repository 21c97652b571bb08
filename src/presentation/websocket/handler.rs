//! WebSocket Connection Handler
//!
//! Bridges one WebSocket to the host event loop. Each text frame carries one
//! JSON record in each direction.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Path, State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::domain::{InboundLink, Record};
use crate::shared::error::AppError;
use crate::startup::AppState;

/// WebSocket upgrade handler for `/peer/{peer_id}`
pub async fn peer_handler(
    ws: WebSocketUpgrade,
    Path(peer_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    if peer_id != state.host.peer_id() {
        tracing::debug!(peer_id = %peer_id, "Unknown peer id");
        return Err(AppError::NotFound(format!("No host with peer id {}", peer_id)));
    }

    let max_message_size = state.settings.websocket.max_message_size;
    let max_frame_size = state.settings.websocket.max_frame_size;
    Ok(ws
        .max_message_size(max_message_size)
        .max_frame_size(max_frame_size)
        .on_upgrade(move |socket| handle_socket(socket, state)))
}

/// Handle one remote connection until either side closes
async fn handle_socket(socket: WebSocket, state: AppState) {
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<Record>();
    let (inbound_tx, inbound_rx) = mpsc::unbounded_channel::<Record>();

    let Some(connection_id) = state.host.attach(InboundLink {
        label: "websocket".to_string(),
        outbound: outbound_tx,
        inbound: inbound_rx,
    }) else {
        return;
    };

    tracing::debug!(connection_id = %connection_id, "WebSocket attached");

    // Split socket for concurrent read/write
    let (mut sender, mut receiver) = socket.split();

    let mut send_task = tokio::spawn(async move {
        while let Some(record) = outbound_rx.recv().await {
            if sender
                .send(Message::Text(record.to_string().into()))
                .await
                .is_err()
            {
                return;
            }
        }
        // Host dropped the connection
        let _ = sender.send(Message::Close(None)).await;
    });

    let mut recv_task = tokio::spawn(async move {
        while let Some(frame) = receiver.next().await {
            match frame {
                Ok(Message::Text(text)) => match serde_json::from_str::<Record>(text.as_str()) {
                    Ok(record) => {
                        if inbound_tx.send(record).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::debug!(
                            connection_id = %connection_id,
                            error = %e,
                            "Dropping non-JSON frame"
                        );
                    }
                },
                Ok(Message::Close(_)) => break,
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!(connection_id = %connection_id, error = %e, "WebSocket error");
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    tracing::debug!(connection_id = %connection_id, "WebSocket closed");
}
