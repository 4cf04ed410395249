use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Amount {amount} is below minimum stake {min_stake}")]
    BelowMinimumStake { amount: String, min_stake: String },

    #[error("Order not found")]
    OrderNotFound,

    #[error("Position not found")]
    PositionNotFound,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("A trade is already in progress")]
    TradeInFlight,

    #[error("Wallet not connected")]
    WalletNotConnected,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::InvalidAmount(_) => (StatusCode::BAD_REQUEST, "INVALID_AMOUNT"),
            AppError::InvalidToken(_) => (StatusCode::BAD_REQUEST, "INVALID_TOKEN"),
            AppError::BelowMinimumStake { .. } => (StatusCode::BAD_REQUEST, "BELOW_MINIMUM_STAKE"),
            AppError::OrderNotFound => (StatusCode::NOT_FOUND, "ORDER_NOT_FOUND"),
            AppError::PositionNotFound => (StatusCode::NOT_FOUND, "POSITION_NOT_FOUND"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::TradeInFlight => (StatusCode::CONFLICT, "TRADE_IN_FLIGHT"),
            AppError::WalletNotConnected => (StatusCode::UNAUTHORIZED, "WALLET_NOT_CONNECTED"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::debug!("Request failed with {}: {}", code, self);
        }

        let details = match &self {
            AppError::BelowMinimumStake { amount, min_stake } => Some(serde_json::json!({
                "amount": amount,
                "min_stake": min_stake,
            })),
            _ => None,
        };

        let body = Json(ErrorResponse {
            success: false,
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
                details,
            },
        });

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
