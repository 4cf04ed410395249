use axum::{extract::{Query, State}, Json};
use serde::{Deserialize, Serialize};

use crate::{
    constants::SLIPPAGE_PRESETS,
    error::Result,
    models::{ApiResponse, Quote, SwapQuoteRequest, Trade, TradeState},
    services::quote_calculator::{compute_quote, compute_quote_with_slippage, parse_amount},
};

use super::AppState;

#[derive(Debug, Serialize)]
pub struct SwapQuoteResponse {
    #[serde(flatten)]
    pub quote: Quote,
    pub slippage_presets: Vec<f64>,
}

#[derive(Debug, Deserialize)]
pub struct ExecuteQuery {
    pub wait: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct TradeStatusResponse {
    pub state: TradeState,
    pub current: Option<Trade>,
    pub last_settled: Option<Trade>,
    pub lifecycle_ms: u64,
}

async fn quote_for(state: &AppState, req: &SwapQuoteRequest) -> Result<Quote> {
    parse_amount(&req.amount)?;
    let from = state.market.require(&req.from_token)?;
    let to = state.market.require(&req.to_token)?;
    let discount = state.nft_discount.snapshot().await;

    Ok(match req.slippage {
        Some(slippage) => compute_quote_with_slippage(from, to, &req.amount, &discount, slippage),
        None => compute_quote(from, to, &req.amount, &discount),
    })
}

/// POST /api/v1/swap/quote
pub async fn get_quote(
    State(state): State<AppState>,
    Json(req): Json<SwapQuoteRequest>,
) -> Result<Json<ApiResponse<SwapQuoteResponse>>> {
    let quote = quote_for(&state, &req).await?;
    tracing::debug!(
        "Quote {} {} -> {} {} (fee {}%)",
        quote.input_amount,
        quote.from_token,
        quote.output_amount,
        quote.to_token,
        quote.fee_percent
    );

    Ok(Json(ApiResponse::success(SwapQuoteResponse {
        quote,
        slippage_presets: SLIPPAGE_PRESETS.to_vec(),
    })))
}

/// POST /api/v1/swap/execute
///
/// Returns as soon as the trade enters `confirming`; poll `/swap/status`
/// or listen on `/ws/notifications` for the outcome. With `?wait=true`
/// the response is held until the trade settles.
pub async fn execute_swap(
    State(state): State<AppState>,
    Query(query): Query<ExecuteQuery>,
    Json(req): Json<SwapQuoteRequest>,
) -> Result<Json<ApiResponse<Trade>>> {
    let quote = quote_for(&state, &req).await?;
    let trade = if query.wait.unwrap_or(false) {
        state.trades.execute(quote).await?
    } else {
        state.trades.submit(quote).await?
    };
    Ok(Json(ApiResponse::success(trade)))
}

/// GET /api/v1/swap/status
pub async fn get_status(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<TradeStatusResponse>>> {
    let current = state.trades.current().await;
    let response = TradeStatusResponse {
        state: current.as_ref().map(|t| t.state).unwrap_or_default(),
        current,
        last_settled: state.trades.last_settled().await,
        lifecycle_ms: state.trades.delays().total().as_millis() as u64,
    };
    Ok(Json(ApiResponse::success(response)))
}
