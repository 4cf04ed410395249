use axum::{extract::State, Json};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, Result},
    models::{ApiResponse, StakingPool, StakingPosition},
    services::staking::estimated_monthly_reward,
};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct DepositRequest {
    pub pool_id: String,
    pub amount: String,
}

#[derive(Debug, Deserialize)]
pub struct PositionRequest {
    pub position_id: String,
}

#[derive(Debug, Serialize)]
pub struct DepositResponse {
    #[serde(flatten)]
    pub position: StakingPosition,
    pub estimated_monthly_reward: Decimal,
}

#[derive(Debug, Serialize)]
pub struct ClaimResponse {
    pub position_id: String,
    pub claimed: Decimal,
}

#[derive(Debug, Serialize)]
pub struct PositionsResponse {
    pub positions: Vec<StakingPosition>,
    pub total_staked_usd: f64,
    pub total_rewards_usd: f64,
}

fn parse_stake_amount(raw: &str) -> Result<Decimal> {
    let amount = raw
        .trim()
        .parse::<Decimal>()
        .map_err(|_| AppError::InvalidAmount("amount must be a decimal number".to_string()))?;
    if amount <= Decimal::ZERO {
        return Err(AppError::InvalidAmount(
            "Stake amount must be greater than zero".to_string(),
        ));
    }
    Ok(amount)
}

/// GET /api/v1/stake/pools
pub async fn get_pools(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<StakingPool>>>> {
    Ok(Json(ApiResponse::success(state.staking.pools().to_vec())))
}

/// POST /api/v1/stake/deposit
pub async fn deposit(
    State(state): State<AppState>,
    Json(req): Json<DepositRequest>,
) -> Result<Json<ApiResponse<DepositResponse>>> {
    let amount = parse_stake_amount(&req.amount)?;
    let position = state.staking.stake(&req.pool_id, amount).await?;
    let pool = state.staking.pool(&position.pool_id)?;

    Ok(Json(ApiResponse::success(DepositResponse {
        estimated_monthly_reward: estimated_monthly_reward(pool, position.amount),
        position,
    })))
}

/// POST /api/v1/stake/claim
pub async fn claim(
    State(state): State<AppState>,
    Json(req): Json<PositionRequest>,
) -> Result<Json<ApiResponse<ClaimResponse>>> {
    let claimed = state.staking.claim_rewards(&req.position_id).await?;
    Ok(Json(ApiResponse::success(ClaimResponse {
        position_id: req.position_id,
        claimed,
    })))
}

/// POST /api/v1/stake/withdraw
pub async fn withdraw(
    State(state): State<AppState>,
    Json(req): Json<PositionRequest>,
) -> Result<Json<ApiResponse<StakingPosition>>> {
    let position = state.staking.unstake(&req.position_id).await?;
    Ok(Json(ApiResponse::success(position)))
}

/// GET /api/v1/stake/positions
pub async fn get_positions(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<PositionsResponse>>> {
    let positions = state.staking.positions().await;
    let totals = state.staking.totals(&state.market).await;

    Ok(Json(ApiResponse::success(PositionsResponse {
        positions,
        total_staked_usd: totals.total_staked_usd,
        total_rewards_usd: totals.total_rewards_usd,
    })))
}
