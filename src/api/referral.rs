use axum::{extract::{Query, State}, Json};
use serde::{Deserialize, Serialize};
use crate::{
    error::{AppError, Result},
    models::{
        ActivityStatus, ApiResponse, PaginatedResponse, Referee, ReferralActivity, ReferralStats,
        TierStatus, TierStep,
    },
    services::tier_engine::{referral_code, referral_link},
};
use super::AppState;

#[derive(Debug, Serialize)]
pub struct ReferralCode {
    pub code: String,
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct TierQuery {
    pub count: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct ReferralTierResponse {
    pub referrals: u64,
    pub current: TierStatus,
    pub tiers: Vec<TierStep>,
}

#[derive(Debug, Serialize)]
pub struct ReferralStatsResponse {
    pub stats: ReferralStats,
    pub current: TierStatus,
    pub recent: Vec<Referee>,
}

#[derive(Debug, Deserialize)]
pub struct ActivityQuery {
    pub status: Option<String>,
    pub page: Option<i32>,
    pub limit: Option<i32>,
}

/// GET /api/v1/referral/code
pub async fn get_code(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ReferralCode>>> {
    let session = state.wallet.session().await;
    let address = session.address.as_deref();

    let response = ReferralCode {
        code: referral_code(address),
        url: referral_link(address),
    };

    Ok(Json(ApiResponse::success(response)))
}

/// GET /api/v1/referral/tier?count=
///
/// Without `count` the tier is computed from the referral log.
pub async fn get_tier(
    State(state): State<AppState>,
    Query(query): Query<TierQuery>,
) -> Result<Json<ApiResponse<ReferralTierResponse>>> {
    let referrals = query
        .count
        .unwrap_or_else(|| state.referrals.stats().total_referrals);

    let response = ReferralTierResponse {
        referrals,
        current: state.referral_tiers.tier_for(referrals),
        tiers: state.referral_tiers.steps().to_vec(),
    };

    Ok(Json(ApiResponse::success(response)))
}

/// GET /api/v1/referral/stats
pub async fn get_stats(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ReferralStatsResponse>>> {
    let stats = state.referrals.stats();

    let response = ReferralStatsResponse {
        current: state.referral_tiers.tier_for(stats.total_referrals),
        recent: state.referrals.referees().to_vec(),
        stats,
    };

    Ok(Json(ApiResponse::success(response)))
}

/// GET /api/v1/referral/history?status=completed|pending
pub async fn get_history(
    State(state): State<AppState>,
    Query(query): Query<ActivityQuery>,
) -> Result<Json<ApiResponse<PaginatedResponse<ReferralActivity>>>> {
    let status = match query.status.as_deref() {
        Some(raw) => Some(ActivityStatus::parse(raw).ok_or_else(|| {
            AppError::BadRequest(format!("Unknown referral status: {}", raw))
        })?),
        None => None,
    };

    let activity = state.referrals.activity(status);
    let page = PaginatedResponse::from_items(
        &activity,
        query.page.unwrap_or(1),
        query.limit.unwrap_or(20),
    );

    Ok(Json(ApiResponse::success(page)))
}
