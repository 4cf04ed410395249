use axum::{
    extract::{ws::{WebSocket, WebSocketUpgrade, Message}, State},
    response::Response,
};
use futures_util::{StreamExt, SinkExt};
use tokio::sync::broadcast::error::RecvError;
use tokio::time::{interval, timeout, Duration};

use crate::{api::AppState, constants::{WS_CLIENT_TIMEOUT_SECS, WS_HEARTBEAT_INTERVAL_SECS}};

fn connected_payload(unread_count: usize) -> String {
    serde_json::json!({
        "type": "connected",
        "message": "Connected to notification stream",
        "unread_count": unread_count
    }).to_string()
}

/// WebSocket handler for live notifications
pub async fn handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> Response {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();

    let mut rx = state.notifications.subscribe();
    let unread = state.notifications.unread_count().await;

    let _ = sender.send(Message::Text(connected_payload(unread).into())).await;

    // Forward notifications and keep the connection alive
    let mut send_task = tokio::spawn(async move {
        let mut heartbeat = interval(Duration::from_secs(WS_HEARTBEAT_INTERVAL_SECS));

        loop {
            tokio::select! {
                _ = heartbeat.tick() => {
                    if sender.send(Message::Ping(Vec::new().into())).await.is_err() {
                        break;
                    }
                }
                result = rx.recv() => {
                    match result {
                        Ok(notification) => {
                            let json = serde_json::to_string(&notification).unwrap_or_default();
                            if sender.send(Message::Text(json.into())).await.is_err() {
                                break;
                            }
                        }
                        Err(RecvError::Lagged(skipped)) => {
                            tracing::warn!("Notification subscriber lagged, skipped {}", skipped);
                        }
                        Err(RecvError::Closed) => break,
                    }
                }
            }
        }
    });

    // Handle incoming messages (ping/pong)
    let mut recv_task = tokio::spawn(async move {
        loop {
            let next_msg = timeout(Duration::from_secs(WS_CLIENT_TIMEOUT_SECS), receiver.next()).await;
            let msg = match next_msg {
                Ok(Some(Ok(msg))) => msg,
                Ok(Some(Err(_))) | Ok(None) => break,
                Err(_) => {
                    tracing::info!("WebSocket client timeout");
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    tracing::debug!("Received: {}", text);
                }
                Message::Close(_) => {
                    tracing::info!("Client disconnected");
                    break;
                }
                Message::Ping(_) => {
                    tracing::debug!("Ping received");
                }
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => {
            recv_task.abort();
        }
        _ = &mut recv_task => {
            send_task.abort();
        }
    }

    tracing::info!("Notification WebSocket connection closed");
}
