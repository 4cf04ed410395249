use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{
    crypto::hash,
    error::{AppError, Result},
    models::{LimitOrder, OrderSide, OrderStatus},
    services::{clock::Clock, market_data::normalize_symbol},
};

pub const DEFAULT_EXPIRY: &str = "1d";
pub const DEFAULT_QUOTE_TOKEN: &str = "USDT";
pub const PRICE_PRESETS_PERCENT: [f64; 4] = [-5.0, -10.0, -25.0, -50.0];

// Unknown codes fall back to 7 days.
pub fn expiry_duration_for(expiry: &str) -> chrono::Duration {
    match expiry.trim() {
        "10m" => chrono::Duration::minutes(10),
        "1h" => chrono::Duration::hours(1),
        "1d" => chrono::Duration::days(1),
        "3d" => chrono::Duration::days(3),
        "7d" => chrono::Duration::days(7),
        _ => chrono::Duration::days(7),
    }
}

pub fn expiry_label(expiry: &str) -> &'static str {
    match expiry.trim() {
        "10m" => "10 minutes",
        "1h" => "1 hour",
        "1d" => "1 day",
        "3d" => "3 days",
        _ => "7 days",
    }
}

fn normalize_expiry(expiry: &str) -> &'static str {
    match expiry.trim() {
        "10m" => "10m",
        "1h" => "1h",
        "1d" => "1d",
        "3d" => "3d",
        _ => "7d",
    }
}

/// Limit price derived from a market price and a percentage preset.
pub fn preset_price(market_price: f64, percent: f64) -> f64 {
    market_price * (1.0 + percent / 100.0)
}

/// How far a limit price sits from the market, in percent.
pub fn price_deviation_percent(market_price: f64, limit_price: Decimal) -> f64 {
    if market_price <= 0.0 {
        return 0.0;
    }
    let limit = limit_price.to_f64().unwrap_or(0.0);
    (limit - market_price) / market_price * 100.0
}

fn build_order_id(side: OrderSide, token: &str, amount: Decimal, now_ts: i64, seq: u64) -> String {
    hash::digest_hex(&[
        side.as_str(),
        token,
        &amount.to_string(),
        &now_ts.to_string(),
        &seq.to_string(),
    ])
}

/// In-memory limit orders. No matching engine; expiry is informational.
pub struct OrderBook {
    orders: RwLock<Vec<LimitOrder>>,
    clock: Arc<dyn Clock>,
    seq: AtomicU64,
}

impl OrderBook {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            orders: RwLock::new(Vec::new()),
            clock,
            seq: AtomicU64::new(0),
        }
    }

    pub async fn create_order(
        &self,
        side: OrderSide,
        token: &str,
        quote_token: &str,
        amount: Decimal,
        limit_price: Decimal,
        expiry: &str,
    ) -> Result<LimitOrder> {
        if amount <= Decimal::ZERO {
            return Err(AppError::InvalidAmount(
                "Order amount must be greater than zero".to_string(),
            ));
        }
        if limit_price <= Decimal::ZERO {
            return Err(AppError::InvalidAmount(
                "Limit price must be greater than zero".to_string(),
            ));
        }

        let token = normalize_symbol(token);
        let quote_token = normalize_symbol(quote_token);
        let expiry = normalize_expiry(expiry);
        let now = self.clock.now();
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);

        let order = LimitOrder {
            order_id: build_order_id(side, &token, amount, now.timestamp(), seq),
            side,
            token,
            quote_token,
            amount,
            price: limit_price,
            expiry: expiry.to_string(),
            expiry_label: expiry_label(expiry).to_string(),
            expires_at: now + expiry_duration_for(expiry),
            status: OrderStatus::Active,
            created_at: now,
        };

        self.orders.write().await.push(order.clone());
        tracing::info!(
            "Limit order created: id={}, side={:?}, {} {} @ {} {}",
            order.order_id,
            order.side,
            order.amount,
            order.token,
            order.price,
            order.quote_token
        );
        Ok(order)
    }

    /// Removes the order; `false` when the id is unknown.
    pub async fn cancel_order(&self, order_id: &str) -> bool {
        let mut orders = self.orders.write().await;
        let before = orders.len();
        orders.retain(|o| o.order_id != order_id);
        let removed = orders.len() != before;
        if removed {
            tracing::info!("Limit order cancelled: id={}", order_id);
        }
        removed
    }

    /// Newest first.
    pub async fn list_orders(&self, status: Option<OrderStatus>) -> Vec<LimitOrder> {
        self.orders
            .read()
            .await
            .iter()
            .rev()
            .filter(|o| status.map_or(true, |s| o.status == s))
            .cloned()
            .collect()
    }

    pub async fn get_order(&self, order_id: &str) -> Option<LimitOrder> {
        self.orders
            .read()
            .await
            .iter()
            .find(|o| o.order_id == order_id)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::clock::testing::{epoch, InstantClock, ManualClock};
    use std::time::Duration;

    fn dec(raw: &str) -> Decimal {
        raw.parse().unwrap()
    }

    fn book() -> OrderBook {
        OrderBook::new(Arc::new(InstantClock::new()))
    }

    #[test]
    fn expiry_duration_for_defaults_to_7d() {
        assert_eq!(expiry_duration_for("unknown").num_days(), 7);
        assert_eq!(expiry_duration_for("10m").num_minutes(), 10);
        assert_eq!(expiry_label("3d"), "3 days");
        assert_eq!(expiry_duration_for("30d").num_days(), 7);
        assert_eq!(normalize_expiry("30d"), "7d");
    }

    #[test]
    fn order_ids_differ_by_sequence() {
        let amount = dec("1.5");
        let first = build_order_id(OrderSide::Buy, "ETH", amount, 1_700_000_000, 0);
        let second = build_order_id(OrderSide::Buy, "ETH", amount, 1_700_000_000, 1);
        let sell = build_order_id(OrderSide::Sell, "ETH", amount, 1_700_000_000, 0);
        assert!(first.starts_with("0x"));
        assert_eq!(first.len(), 66);
        assert_ne!(first, second);
        assert_ne!(first, sell);
    }

    #[test]
    fn presets_and_deviation_agree() {
        let price = preset_price(65_000.0, -10.0);
        assert!((price - 58_500.0).abs() < 1e-9);
        let deviation = price_deviation_percent(65_000.0, dec("58500"));
        assert!((deviation + 10.0).abs() < 1e-9);
        assert_eq!(price_deviation_percent(0.0, dec("1")), 0.0);
    }

    #[tokio::test]
    async fn create_assigns_unique_ids() {
        let book = book();
        let a = book
            .create_order(OrderSide::Buy, "btc", "usdt", dec("0.5"), dec("60000"), "1d")
            .await
            .unwrap();
        let b = book
            .create_order(OrderSide::Buy, "btc", "usdt", dec("0.5"), dec("60000"), "1d")
            .await
            .unwrap();
        assert_ne!(a.order_id, b.order_id);
        assert_eq!(a.token, "BTC");
        assert_eq!(a.status, OrderStatus::Active);
        assert_eq!(a.expires_at, a.created_at + chrono::Duration::days(1));
    }

    #[tokio::test]
    async fn create_rejects_non_positive_values() {
        let book = book();
        let zero_amount = book
            .create_order(OrderSide::Sell, "ETH", "USDT", dec("0"), dec("2500"), "1h")
            .await;
        assert!(matches!(zero_amount, Err(AppError::InvalidAmount(_))));
        let negative_price = book
            .create_order(OrderSide::Sell, "ETH", "USDT", dec("1"), dec("-1"), "1h")
            .await;
        assert!(matches!(negative_price, Err(AppError::InvalidAmount(_))));
        assert!(book.list_orders(None).await.is_empty());
    }

    #[tokio::test]
    async fn cancel_removes_exactly_one_order() {
        let book = book();
        let mut ids = Vec::new();
        for amount in ["1", "2", "3"] {
            let order = book
                .create_order(OrderSide::Buy, "STRK", "USDT", dec(amount), dec("1.2"), "7d")
                .await
                .unwrap();
            ids.push(order.order_id);
        }

        assert!(book.cancel_order(&ids[1]).await);
        let remaining: Vec<String> = book
            .list_orders(None)
            .await
            .into_iter()
            .map(|o| o.order_id)
            .collect();
        assert_eq!(remaining, vec![ids[2].clone(), ids[0].clone()]);

        assert!(!book.cancel_order("0xdoesnotexist").await);
        assert!(!book.cancel_order(&ids[1]).await);
        assert_eq!(book.list_orders(None).await.len(), 2);
    }

    #[tokio::test]
    async fn list_filters_by_status() {
        let book = book();
        book.create_order(OrderSide::Buy, "CAREL", "USDT", dec("100"), dec("0.8"), "1d")
            .await
            .unwrap();
        assert_eq!(book.list_orders(Some(OrderStatus::Active)).await.len(), 1);
        assert!(book.list_orders(Some(OrderStatus::Filled)).await.is_empty());
    }

    #[tokio::test]
    async fn orders_persist_past_their_expiry_label() {
        let clock = Arc::new(ManualClock::new());
        let book = OrderBook::new(clock.clone());
        let order = book
            .create_order(OrderSide::Sell, "ETH", "USDT", dec("1"), dec("3000"), "10m")
            .await
            .unwrap();
        assert_eq!(order.created_at, epoch());

        clock.advance(Duration::from_secs(60 * 60 * 24));
        let listed = book.get_order(&order.order_id).await.unwrap();
        assert_eq!(listed.status, OrderStatus::Active);
    }
}
