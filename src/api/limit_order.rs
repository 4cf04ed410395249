use axum::{
    extract::{Path, Query, State},
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, Result},
    models::{ApiResponse, CreateLimitOrderRequest, LimitOrder, OrderStatus, PaginatedResponse},
    services::order_book::{
        preset_price, price_deviation_percent, DEFAULT_EXPIRY, DEFAULT_QUOTE_TOKEN,
        PRICE_PRESETS_PERCENT,
    },
};

use super::AppState;

#[derive(Debug, Serialize)]
pub struct CreateOrderResponse {
    #[serde(flatten)]
    pub order: LimitOrder,
    pub market_price: f64,
    pub deviation_percent: f64,
}

#[derive(Debug, Deserialize)]
pub struct ListOrdersQuery {
    pub status: Option<String>,
    pub page: Option<i32>,
    pub limit: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct PricePreset {
    pub percent: f64,
    pub price: f64,
}

#[derive(Debug, Serialize)]
pub struct PricePresetsResponse {
    pub token: String,
    pub market_price: f64,
    pub presets: Vec<PricePreset>,
}

fn parse_decimal(raw: &str, field: &str) -> Result<Decimal> {
    raw.trim()
        .parse::<Decimal>()
        .map_err(|_| AppError::InvalidAmount(format!("{} must be a decimal number", field)))
}

/// POST /api/v1/limit-order/create
pub async fn create_order(
    State(state): State<AppState>,
    Json(req): Json<CreateLimitOrderRequest>,
) -> Result<Json<ApiResponse<CreateOrderResponse>>> {
    let token = state.market.require(&req.token)?;
    let quote_token = req.quote_token.as_deref().unwrap_or(DEFAULT_QUOTE_TOKEN);
    state.market.require(quote_token)?;

    let amount = parse_decimal(&req.amount, "amount")?;
    let price = parse_decimal(&req.price, "price")?;
    let expiry = req.expiry.as_deref().unwrap_or(DEFAULT_EXPIRY);

    let order = state
        .orders
        .create_order(req.side, &token.symbol, quote_token, amount, price, expiry)
        .await?;

    Ok(Json(ApiResponse::success(CreateOrderResponse {
        market_price: token.price_usd,
        deviation_percent: price_deviation_percent(token.price_usd, order.price),
        order,
    })))
}

/// GET /api/v1/limit-order/list
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<ListOrdersQuery>,
) -> Result<Json<ApiResponse<PaginatedResponse<LimitOrder>>>> {
    let status = match query.status.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(raw) => Some(OrderStatus::parse(raw).ok_or_else(|| {
            AppError::BadRequest(format!("Unknown order status: {}", raw))
        })?),
        None => None,
    };

    let orders = state.orders.list_orders(status).await;
    let response = PaginatedResponse::from_items(
        &orders,
        query.page.unwrap_or(1),
        query.limit.unwrap_or(10),
    );
    Ok(Json(ApiResponse::success(response)))
}

/// GET /api/v1/limit-order/:order_id
pub async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> Result<Json<ApiResponse<LimitOrder>>> {
    let order = state
        .orders
        .get_order(&order_id)
        .await
        .ok_or(AppError::OrderNotFound)?;
    Ok(Json(ApiResponse::success(order)))
}

/// DELETE /api/v1/limit-order/:order_id
pub async fn cancel_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> Result<Json<ApiResponse<String>>> {
    if !state.orders.cancel_order(&order_id).await {
        return Err(AppError::OrderNotFound);
    }
    Ok(Json(ApiResponse::success(format!(
        "Order {} cancelled",
        order_id
    ))))
}

/// GET /api/v1/limit-order/presets/:token
pub async fn get_price_presets(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<ApiResponse<PricePresetsResponse>>> {
    let token = state.market.require(&token)?;
    let presets = PRICE_PRESETS_PERCENT
        .iter()
        .map(|percent| PricePreset {
            percent: *percent,
            price: preset_price(token.price_usd, *percent),
        })
        .collect();

    Ok(Json(ApiResponse::success(PricePresetsResponse {
        token: token.symbol.clone(),
        market_price: token.price_usd,
        presets,
    })))
}
