use axum::{extract::{Path, State}, Json};
use serde::Serialize;

use crate::{
    error::Result,
    models::{ApiResponse, Token},
};

use super::AppState;

#[derive(Debug, Serialize)]
pub struct TokenListResponse {
    pub tokens: Vec<Token>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// GET /api/v1/market/tokens
pub async fn list_tokens(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<TokenListResponse>>> {
    Ok(Json(ApiResponse::success(TokenListResponse {
        tokens: state.market.tokens().to_vec(),
        updated_at: chrono::Utc::now(),
    })))
}

/// GET /api/v1/market/tokens/:symbol
pub async fn get_token(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<ApiResponse<Token>>> {
    let token = state.market.require(&symbol)?;
    Ok(Json(ApiResponse::success(token.clone())))
}
