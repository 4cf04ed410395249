use axum::http::HeaderValue;
use axum::{
    routing::{delete, get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod config;
mod constants;
mod crypto;
mod error;
mod models;
mod services;
mod websocket;

use config::Config;
use constants::API_VERSION;
use services::{clock::TokioClock, outcome::RandomOutcome};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "carel_sim=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    config.validate()?;

    tracing::info!("Starting CAREL simulation server");
    tracing::info!("Environment: {}", config.environment);
    tracing::info!("API Version: {}", API_VERSION);

    let outcome = RandomOutcome::new(config.trade_success_rate);
    tracing::info!(
        "Trade success rate: {:.0}%",
        outcome.success_rate() * 100.0
    );

    let app_state = api::AppState::new(config.clone(), Arc::new(TokioClock), Arc::new(outcome))?;

    // Start background services
    services::start_background_services(app_state.staking.clone());

    // Build router
    let app = build_router(app_state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_router(state: api::AppState) -> Router {
    // CORS configuration
    let cors = cors_from_config(&state.config);

    Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        // Market data
        .route("/api/v1/market/tokens", get(api::market::list_tokens))
        .route(
            "/api/v1/market/tokens/{symbol}",
            get(api::market::get_token),
        )
        // Swap & Bridge
        .route("/api/v1/swap/quote", post(api::swap::get_quote))
        .route("/api/v1/swap/execute", post(api::swap::execute_swap))
        .route("/api/v1/swap/status", get(api::swap::get_status))
        // Limit Orders
        .route(
            "/api/v1/limit-order/create",
            post(api::limit_order::create_order),
        )
        .route(
            "/api/v1/limit-order/list",
            get(api::limit_order::list_orders),
        )
        .route(
            "/api/v1/limit-order/presets/{token}",
            get(api::limit_order::get_price_presets),
        )
        .route(
            "/api/v1/limit-order/{order_id}",
            get(api::limit_order::get_order).delete(api::limit_order::cancel_order),
        )
        // Staking
        .route("/api/v1/stake/pools", get(api::stake::get_pools))
        .route("/api/v1/stake/deposit", post(api::stake::deposit))
        .route("/api/v1/stake/claim", post(api::stake::claim))
        .route("/api/v1/stake/withdraw", post(api::stake::withdraw))
        .route("/api/v1/stake/positions", get(api::stake::get_positions))
        // Referral
        .route("/api/v1/referral/code", get(api::referral::get_code))
        .route("/api/v1/referral/tier", get(api::referral::get_tier))
        .route("/api/v1/referral/stats", get(api::referral::get_stats))
        .route("/api/v1/referral/history", get(api::referral::get_history))
        // Portfolio
        .route(
            "/api/v1/portfolio/summary",
            get(api::portfolio::get_summary),
        )
        // Rewards
        .route("/api/v1/rewards/tier", get(api::rewards::get_tier))
        .route("/api/v1/rewards/discount", get(api::rewards::get_discount))
        // Leaderboard
        .route(
            "/api/v1/leaderboard/{type}",
            get(api::leaderboard::get_leaderboard),
        )
        // Wallet
        .route("/api/v1/wallet/session", get(api::wallet::get_session))
        .route("/api/v1/wallet/connect", post(api::wallet::connect))
        .route("/api/v1/wallet/disconnect", post(api::wallet::disconnect))
        .route("/api/v1/wallet/network", post(api::wallet::switch_network))
        // Notifications
        .route("/api/v1/notifications/list", get(api::notifications::list))
        .route(
            "/api/v1/notifications/mark-read",
            post(api::notifications::mark_read),
        )
        .route(
            "/api/v1/notifications",
            delete(api::notifications::clear_all),
        )
        .route(
            "/api/v1/notifications/{id}",
            delete(api::notifications::clear),
        )
        // Transactions
        .route(
            "/api/v1/transactions/history",
            get(api::transactions::get_history),
        )
        .route(
            "/api/v1/transactions/{tx_hash}",
            get(api::transactions::get_details),
        )
        // WebSocket endpoints
        .route("/ws/notifications", get(websocket::notifications::handler))
        .route("/ws/prices", get(websocket::prices::handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_from_config(config: &Config) -> CorsLayer {
    let raw = config.cors_allowed_origins.trim();
    if raw.is_empty() || raw == "*" {
        return CorsLayer::very_permissive();
    }

    let allowed: Vec<HeaderValue> = raw
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse::<HeaderValue>().ok())
        .collect();

    if allowed.is_empty() {
        tracing::warn!("No valid CORS origins parsed; falling back to permissive");
        return CorsLayer::very_permissive();
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use serde_json::{json, Value};
    use services::clock::{
        testing::{settle, InstantClock, ManualClock},
        Clock,
    };
    use services::outcome::{testing::FixedOutcome, TradeOutcome};
    use tower::ServiceExt;

    fn state_with_clock(clock: Arc<dyn Clock>, outcome: TradeOutcome) -> api::AppState {
        api::AppState::new(Config::default(), clock, Arc::new(FixedOutcome(outcome))).unwrap()
    }

    fn test_state(outcome: TradeOutcome) -> api::AppState {
        state_with_clock(Arc::new(InstantClock::new()), outcome)
    }

    async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn preflight(app: &Router, origin: &str) -> Option<String> {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/health")
            .header("origin", origin)
            .header("access-control-request-method", "GET")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    #[tokio::test]
    async fn cors_from_config_allows_only_listed_origins() {
        let mut config = Config::default();
        config.cors_allowed_origins = "http://localhost:3000, https://zkcarel.com".to_string();
        let app = Router::new()
            .route("/health", get(|| async { "ok" }))
            .layer(cors_from_config(&config));

        assert_eq!(
            preflight(&app, "https://zkcarel.com").await.as_deref(),
            Some("https://zkcarel.com")
        );
        assert_eq!(preflight(&app, "https://evil.example").await, None);
    }

    #[tokio::test]
    async fn health_reports_idle() {
        let app = build_router(test_state(TradeOutcome::Success));
        let (status, body) = call(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["trade_state"], "idle");
    }

    #[tokio::test]
    async fn quote_converts_btc_to_eth() {
        let app = build_router(test_state(TradeOutcome::Success));
        let (status, body) = call(
            &app,
            Method::POST,
            "/api/v1/swap/quote",
            Some(json!({"from_token": "BTC", "to_token": "ETH", "amount": "1.0"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let output = body["data"]["output_amount"].as_f64().unwrap();
        assert!((output - 26.530_612_244_9).abs() < 1e-6);
        assert_eq!(body["data"]["route"], "StarkGate Bridge");
        assert_eq!(body["data"]["slippage_presets"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn quote_rejects_malformed_amount() {
        let app = build_router(test_state(TradeOutcome::Success));
        let (status, body) = call(
            &app,
            Method::POST,
            "/api/v1/swap/quote",
            Some(json!({"from_token": "BTC", "to_token": "ETH", "amount": "abc"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "INVALID_AMOUNT");
    }

    #[tokio::test]
    async fn executed_swap_lands_in_history_and_notifications() {
        let app = build_router(test_state(TradeOutcome::Success));
        let (status, body) = call(
            &app,
            Method::POST,
            "/api/v1/swap/execute",
            Some(json!({"from_token": "ETH", "to_token": "USDT", "amount": "1"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["state"], "confirming");

        settle().await;

        let (_, history) = call(&app, Method::GET, "/api/v1/transactions/history", None).await;
        assert_eq!(history["data"]["total"], 1);
        assert_eq!(history["data"]["items"][0]["tx_type"], "swap");

        let (_, notifications) =
            call(&app, Method::GET, "/api/v1/notifications/list", None).await;
        assert_eq!(notifications["data"]["items"][0]["title"], "Swap Completed");
        assert_eq!(notifications["data"]["unread_count"], 1);

        let (_, status_body) = call(&app, Method::GET, "/api/v1/swap/status", None).await;
        assert_eq!(status_body["data"]["state"], "idle");
        assert_eq!(status_body["data"]["last_settled"]["state"], "success");
    }

    #[tokio::test]
    async fn second_execute_while_in_flight_conflicts() {
        // Time never advances, so the first trade stays in `confirming`.
        let app = build_router(state_with_clock(
            Arc::new(ManualClock::new()),
            TradeOutcome::Failure,
        ));
        let body = json!({"from_token": "ETH", "to_token": "USDT", "amount": "1"});
        let (first, _) = call(&app, Method::POST, "/api/v1/swap/execute", Some(body.clone())).await;
        assert_eq!(first, StatusCode::OK);
        let (second, error) = call(&app, Method::POST, "/api/v1/swap/execute", Some(body)).await;
        assert_eq!(second, StatusCode::CONFLICT);
        assert_eq!(error["error"]["code"], "TRADE_IN_FLIGHT");
    }

    #[tokio::test]
    async fn dropped_wait_request_does_not_block_next_trade() {
        let clock = Arc::new(ManualClock::new());
        let app = build_router(state_with_clock(clock.clone(), TradeOutcome::Success));
        let body = json!({"from_token": "ETH", "to_token": "USDT", "amount": "1"});

        let abandoned = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            call(&app, Method::POST, "/api/v1/swap/execute?wait=true", Some(body.clone())),
        )
        .await;
        assert!(abandoned.is_err());

        for ms in [1_000, 2_500, 3_000] {
            clock.advance(std::time::Duration::from_millis(ms));
            settle().await;
        }

        let (_, status_body) = call(&app, Method::GET, "/api/v1/swap/status", None).await;
        assert_eq!(status_body["data"]["state"], "idle");
        assert_eq!(status_body["data"]["last_settled"]["state"], "success");

        let (next, _) = call(&app, Method::POST, "/api/v1/swap/execute", Some(body)).await;
        assert_eq!(next, StatusCode::OK);
    }

    #[tokio::test]
    async fn concurrent_wait_requests_settle_exactly_one_trade() {
        let clock = Arc::new(ManualClock::new());
        let app = build_router(state_with_clock(clock.clone(), TradeOutcome::Success));
        let body = json!({"from_token": "USDC", "to_token": "USDT", "amount": "10"});

        let requests: Vec<_> = (0..2)
            .map(|_| {
                let app = app.clone();
                let body = body.clone();
                tokio::spawn(async move {
                    call(&app, Method::POST, "/api/v1/swap/execute?wait=true", Some(body)).await
                })
            })
            .collect();
        settle().await;

        for ms in [1_000, 2_500, 3_000] {
            clock.advance(std::time::Duration::from_millis(ms));
            settle().await;
        }

        let mut statuses = Vec::new();
        for request in requests {
            statuses.push(request.await.unwrap().0);
        }
        statuses.sort_by_key(|s| s.as_u16());
        assert_eq!(statuses, vec![StatusCode::OK, StatusCode::CONFLICT]);

        let (_, history) = call(&app, Method::GET, "/api/v1/transactions/history", None).await;
        assert_eq!(history["data"]["total"], 1);
    }

    #[tokio::test]
    async fn dropped_deposit_request_still_activates_position() {
        let clock = Arc::new(ManualClock::new());
        let app = build_router(state_with_clock(clock.clone(), TradeOutcome::Success));

        let abandoned = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            call(
                &app,
                Method::POST,
                "/api/v1/stake/deposit",
                Some(json!({"pool_id": "USDT", "amount": "100"})),
            ),
        )
        .await;
        assert!(abandoned.is_err());

        clock.advance(std::time::Duration::from_millis(1_500));
        settle().await;

        let (_, positions) = call(&app, Method::GET, "/api/v1/stake/positions", None).await;
        let position = &positions["data"]["positions"][0];
        assert_eq!(position["status"], "active");

        let (status, _) = call(
            &app,
            Method::POST,
            "/api/v1/stake/withdraw",
            Some(json!({"position_id": position["position_id"]})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn stake_below_minimum_is_rejected() {
        let app = build_router(test_state(TradeOutcome::Success));
        let (status, body) = call(
            &app,
            Method::POST,
            "/api/v1/stake/deposit",
            Some(json!({"pool_id": "USDT", "amount": "50"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "BELOW_MINIMUM_STAKE");

        let (status, body) = call(
            &app,
            Method::POST,
            "/api/v1/stake/deposit",
            Some(json!({"pool_id": "USDT", "amount": "100"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "active");

        let (_, positions) = call(&app, Method::GET, "/api/v1/stake/positions", None).await;
        assert_eq!(positions["data"]["positions"].as_array().unwrap().len(), 1);
        assert_eq!(positions["data"]["total_staked_usd"].as_f64().unwrap(), 100.0);
    }

    #[tokio::test]
    async fn limit_order_create_list_cancel() {
        let app = build_router(test_state(TradeOutcome::Success));
        let (status, created) = call(
            &app,
            Method::POST,
            "/api/v1/limit-order/create",
            Some(json!({"side": "buy", "token": "BTC", "amount": "0.1", "price": "60000", "expiry": "3d"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(created["data"]["expiry_label"], "3 days");
        let order_id = created["data"]["order_id"].as_str().unwrap().to_string();

        let (_, listed) = call(&app, Method::GET, "/api/v1/limit-order/list?status=active", None).await;
        assert_eq!(listed["data"]["total"], 1);

        let uri = format!("/api/v1/limit-order/{}", order_id);
        let (status, fetched) = call(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["data"]["side"], "buy");
        let (status, _) = call(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, body) = call(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "ORDER_NOT_FOUND");
    }

    #[tokio::test]
    async fn limit_order_rejects_zero_price() {
        let app = build_router(test_state(TradeOutcome::Success));
        let (status, body) = call(
            &app,
            Method::POST,
            "/api/v1/limit-order/create",
            Some(json!({"side": "sell", "token": "ETH", "amount": "1", "price": "0"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_AMOUNT");
    }

    #[tokio::test]
    async fn referral_tier_and_code_follow_wallet() {
        let app = build_router(test_state(TradeOutcome::Success));
        let (_, tier) = call(&app, Method::GET, "/api/v1/referral/tier?count=20", None).await;
        assert_eq!(tier["data"]["current"]["threshold"], 11);
        assert_eq!(tier["data"]["current"]["next_threshold"], 26);

        let (_, code) = call(&app, Method::GET, "/api/v1/referral/code", None).await;
        assert_eq!(code["data"]["code"], "CAREL-000000");

        let (status, _) = call(
            &app,
            Method::POST,
            "/api/v1/wallet/connect",
            Some(json!({"provider": "metamask"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let (_, code) = call(&app, Method::GET, "/api/v1/referral/code", None).await;
        assert_eq!(code["data"]["code"], "CAREL-1234..");
    }

    #[tokio::test]
    async fn referral_tier_defaults_to_logged_referrals() {
        let app = build_router(test_state(TradeOutcome::Success));
        let (status, tier) = call(&app, Method::GET, "/api/v1/referral/tier", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(tier["data"]["referrals"], 42);
        assert_eq!(tier["data"]["current"]["name"], "Gold");
        assert_eq!(tier["data"]["current"]["next_threshold"], 51);

        let (_, stats) = call(&app, Method::GET, "/api/v1/referral/stats", None).await;
        assert_eq!(stats["data"]["stats"]["active_referrals"], 35);
        assert_eq!(stats["data"]["stats"]["pending_points"], 1000);
        assert_eq!(stats["data"]["current"]["name"], "Gold");
        assert_eq!(stats["data"]["recent"][0]["joined_on"], "2024-01-15");
    }

    #[tokio::test]
    async fn referral_history_filters_by_status() {
        let app = build_router(test_state(TradeOutcome::Success));
        let (_, all) = call(&app, Method::GET, "/api/v1/referral/history?limit=2", None).await;
        assert_eq!(all["data"]["total"], 5);
        assert_eq!(all["data"]["items"].as_array().map(Vec::len), Some(2));

        let (_, pending) = call(
            &app,
            Method::GET,
            "/api/v1/referral/history?status=pending",
            None,
        )
        .await;
        assert_eq!(pending["data"]["total"], 1);
        assert_eq!(pending["data"]["items"][0]["action"], "Stake");

        let (status, body) = call(
            &app,
            Method::GET,
            "/api/v1/referral/history?status=paid",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn portfolio_summary_follows_wallet_and_period() {
        let app = build_router(test_state(TradeOutcome::Success));
        let (status, empty) = call(&app, Method::GET, "/api/v1/portfolio/summary", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(empty["data"]["period"], "7D");
        assert_eq!(empty["data"]["total_value_usd"], 0.0);

        call(
            &app,
            Method::POST,
            "/api/v1/wallet/connect",
            Some(json!({"provider": "metamask"})),
        )
        .await;
        let (_, summary) = call(
            &app,
            Method::GET,
            "/api/v1/portfolio/summary?period=24h",
            None,
        )
        .await;
        assert_eq!(summary["data"]["period"], "24H");
        assert_eq!(summary["data"]["total_value_usd"], 9625.0);
        assert_eq!(summary["data"]["assets"][0]["symbol"], "ETH");
        assert_eq!(summary["data"]["assets"].as_array().map(Vec::len), Some(3));
        assert_eq!(summary["data"]["series"].as_array().map(Vec::len), Some(25));

        let (status, _) = call(
            &app,
            Method::GET,
            "/api/v1/portfolio/summary?period=yearly",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn switch_network_requires_connected_wallet() {
        let app = build_router(test_state(TradeOutcome::Success));
        let (status, body) = call(
            &app,
            Method::POST,
            "/api/v1/wallet/network",
            Some(json!({"network": "starknet"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "WALLET_NOT_CONNECTED");
    }

    #[tokio::test]
    async fn leaderboard_rejects_unknown_category() {
        let app = build_router(test_state(TradeOutcome::Success));
        let (status, body) = call(&app, Method::GET, "/api/v1/leaderboard/trading", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["your_entry"]["rank"], 2);

        let (status, _) = call(&app, Method::GET, "/api/v1/leaderboard/weekly", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn notifications_mark_and_clear() {
        let app = build_router(test_state(TradeOutcome::Success));
        call(
            &app,
            Method::POST,
            "/api/v1/wallet/connect",
            Some(json!({"provider": "phantom"})),
        )
        .await;

        let (_, listed) = call(&app, Method::GET, "/api/v1/notifications/list", None).await;
        assert_eq!(listed["data"]["unread_count"], 1);
        let id = listed["data"]["items"][0]["id"].as_str().unwrap().to_string();

        let (_, marked) = call(
            &app,
            Method::POST,
            "/api/v1/notifications/mark-read",
            Some(json!({"notification_ids": [id.clone()]})),
        )
        .await;
        assert_eq!(marked["data"]["updated"], 1);

        let uri = format!("/api/v1/notifications/{}", id);
        let (status, _) = call(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = call(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, cleared) = call(&app, Method::DELETE, "/api/v1/notifications", None).await;
        assert_eq!(cleared["data"]["updated"], 0);
    }
}
