use axum::{extract::State, Json};
use serde::Serialize;
use super::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub environment: String,
    pub testnet: bool,
    pub trade_state: String,
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let trade_state = state.trades.state().await;

    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: state.config.environment.clone(),
        testnet: state.config.is_testnet(),
        trade_state: trade_state.as_str().to_string(),
    })
}
