use axum::{extract::{Query, State}, Json};
use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    models::{ApiResponse, FeeDiscount, TierStatus, TierStep},
    services::quote_calculator::effective_fee_percent,
};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct PointsQuery {
    pub points: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct LoyaltyTierResponse {
    pub points: u64,
    pub trading_volume_usd: f64,
    pub current: TierStatus,
    pub tiers: Vec<TierStep>,
}

#[derive(Debug, Serialize)]
pub struct DiscountResponse {
    #[serde(flatten)]
    pub discount: FeeDiscount,
    pub effective_fee_percent: f64,
}

/// GET /api/v1/rewards/tier?points=
///
/// Without `points` the tier is derived from points earned by settled trades.
pub async fn get_tier(
    State(state): State<AppState>,
    Query(query): Query<PointsQuery>,
) -> Result<Json<ApiResponse<LoyaltyTierResponse>>> {
    let points = match query.points {
        Some(points) => points,
        None => state.history.total_points().await,
    };

    Ok(Json(ApiResponse::success(LoyaltyTierResponse {
        points,
        trading_volume_usd: state.history.total_volume_usd().await,
        current: state.loyalty_tiers.tier_for(points),
        tiers: state.loyalty_tiers.steps().to_vec(),
    })))
}

/// GET /api/v1/rewards/discount
pub async fn get_discount(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<DiscountResponse>>> {
    let discount = state.nft_discount.snapshot().await;
    Ok(Json(ApiResponse::success(DiscountResponse {
        effective_fee_percent: effective_fee_percent(&discount),
        discount,
    })))
}
