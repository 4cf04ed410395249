use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::Duration;

use crate::{api::AppState, services::market_data::MarketData};

fn connected_payload() -> String {
    serde_json::json!({
        "type": "connected",
        "message": "Connected to price stream"
    })
    .to_string()
}

#[derive(Debug, Deserialize)]
struct SubscribeMessage {
    #[serde(rename = "type")]
    msg_type: String,
    tokens: Vec<String>,
}

#[derive(Debug, Serialize)]
struct PriceUpdate {
    #[serde(rename = "type")]
    msg_type: String,
    token: String,
    price: f64,
    change_24h: f64,
    timestamp: i64,
}

/// Applies a subscribe/unsubscribe message; unknown symbols are dropped.
fn apply_subscription(market: &MarketData, tokens: &mut Vec<String>, msg: SubscribeMessage) {
    let symbols = msg
        .tokens
        .iter()
        .filter_map(|t| market.token(t))
        .map(|t| t.symbol.clone());

    match msg.msg_type.as_str() {
        "subscribe" => {
            for symbol in symbols {
                if !tokens.contains(&symbol) {
                    tokens.push(symbol);
                }
            }
        }
        "unsubscribe" => {
            let symbols: Vec<String> = symbols.collect();
            tokens.retain(|t| !symbols.contains(t));
        }
        _ => {}
    }
}

fn price_updates(market: &MarketData, tokens: &[String]) -> Vec<PriceUpdate> {
    let mut rng = rand::rng();
    let timestamp = chrono::Utc::now().timestamp();
    tokens
        .iter()
        .filter_map(|token| {
            let (price, change_24h) = market.jittered_price(token, &mut rng)?;
            Some(PriceUpdate {
                msg_type: "price_update".to_string(),
                token: token.clone(),
                price,
                change_24h,
                timestamp,
            })
        })
        .collect()
}

/// WebSocket handler for mock price updates
pub async fn handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();

    // Track subscribed tokens
    let subscribed_tokens: Arc<RwLock<Vec<String>>> = Arc::new(RwLock::new(Vec::new()));
    let subscribed_clone = subscribed_tokens.clone();

    let _ = sender.send(Message::Text(connected_payload().into())).await;

    let period = Duration::from_secs(state.config.price_stream_interval_secs.max(1));
    let market = state.market.clone();
    let mut send_task = tokio::spawn(async move {
        loop {
            tokio::time::sleep(period).await;

            let tokens = subscribed_clone.read().await.clone();
            for update in price_updates(&market, &tokens) {
                let json = serde_json::to_string(&update).unwrap_or_default();
                if sender.send(Message::Text(json.into())).await.is_err() {
                    return;
                }
            }
        }
    });

    let market = state.market.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => {
                    if let Ok(subscription) = serde_json::from_str::<SubscribeMessage>(&text) {
                        let mut tokens = subscribed_tokens.write().await;
                        apply_subscription(&market, &mut tokens, subscription);
                        tracing::info!("Price subscriptions: {:?}", tokens);
                    }
                }
                Message::Close(_) => {
                    tracing::info!("Price stream client disconnected");
                    break;
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

    tracing::info!("Price WebSocket connection closed");
}
