use axum::{extract::State, Json};
use serde::Deserialize;

use crate::{
    error::Result,
    models::{ApiResponse, NotificationType, WalletProvider, WalletSession},
    services::notification_service::NotificationSink,
};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct ConnectWalletRequest {
    pub provider: WalletProvider,
}

#[derive(Debug, Deserialize)]
pub struct SwitchNetworkRequest {
    pub network: String,
}

/// GET /api/v1/wallet/session
pub async fn get_session(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<WalletSession>>> {
    Ok(Json(ApiResponse::success(state.wallet.session().await)))
}

/// POST /api/v1/wallet/connect
pub async fn connect(
    State(state): State<AppState>,
    Json(req): Json<ConnectWalletRequest>,
) -> Result<Json<ApiResponse<WalletSession>>> {
    let session = state.wallet.connect(req.provider).await?;
    state
        .notifications
        .notify(
            NotificationType::Success,
            "Wallet Connected".to_string(),
            format!(
                "Connected {}",
                session.address.as_deref().unwrap_or_default()
            ),
            None,
        )
        .await;
    Ok(Json(ApiResponse::success(session)))
}

/// POST /api/v1/wallet/disconnect
pub async fn disconnect(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<WalletSession>>> {
    Ok(Json(ApiResponse::success(state.wallet.disconnect().await)))
}

/// POST /api/v1/wallet/network
pub async fn switch_network(
    State(state): State<AppState>,
    Json(req): Json<SwitchNetworkRequest>,
) -> Result<Json<ApiResponse<WalletSession>>> {
    let session = state.wallet.switch_network(&req.network).await?;
    Ok(Json(ApiResponse::success(session)))
}
