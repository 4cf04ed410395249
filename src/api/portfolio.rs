use axum::{extract::{Query, State}, Json};
use serde::Deserialize;

use crate::{
    error::Result,
    models::{ApiResponse, PortfolioSummary},
    services::portfolio::{holdings, summarize, PortfolioPeriod},
};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub period: Option<String>,
}

/// GET /api/v1/portfolio/summary?period=24h|7d|30d|all
pub async fn get_summary(
    State(state): State<AppState>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<ApiResponse<PortfolioSummary>>> {
    let period = match query.period.as_deref() {
        Some(raw) => PortfolioPeriod::parse(raw)?,
        None => PortfolioPeriod::Week,
    };

    let session = state.wallet.session().await;
    let records = state.history.list(None).await;
    let positions = state.staking.positions().await;

    let held = holdings(&session, &records, &positions);
    let summary = summarize(&held, &state.market, period, state.clock.now());

    tracing::debug!(
        "Portfolio {} total ${:.2} across {} assets",
        summary.period,
        summary.total_value_usd,
        summary.assets.len()
    );

    Ok(Json(ApiResponse::success(summary)))
}
