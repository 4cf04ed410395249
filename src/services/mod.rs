// All service modules
pub mod clock;
pub mod leaderboard;
pub mod market_data;
pub mod nft_discount;
pub mod notification_service;
pub mod order_book;
pub mod outcome;
pub mod portfolio;
pub mod quote_calculator;
pub mod referral_log;
pub mod staking;
pub mod tier_engine;
pub mod trade_simulator;
pub mod transaction_history;
pub mod wallet;

// Re-export for convenience
pub use leaderboard::Leaderboard;
pub use market_data::MarketData;
pub use nft_discount::NftDiscountService;
pub use notification_service::NotificationService;
pub use order_book::OrderBook;
pub use referral_log::ReferralLog;
pub use staking::StakingService;
pub use tier_engine::TierLadder;
pub use trade_simulator::TradeSimulator;
pub use transaction_history::TransactionHistoryService;
pub use wallet::{MockWalletConnector, WalletConnector};

use std::sync::Arc;

/// Start all background services
pub fn start_background_services(staking: Arc<StakingService>) {
    tracing::info!("Starting background services...");

    // Daily staking reward accrual
    staking.spawn_daily_accrual();

    tracing::info!("All background services started successfully");
}
