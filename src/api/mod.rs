pub mod health;
pub mod leaderboard;
pub mod limit_order;
pub mod market;
pub mod notifications;
pub mod portfolio;
pub mod referral;
pub mod rewards;
pub mod stake;
pub mod swap;
pub mod transactions;
pub mod wallet;

use std::sync::Arc;

use crate::config::Config;
use crate::constants::NFT_DISCOUNT_USES_TOTAL;
use crate::services::{
    clock::Clock,
    outcome::OutcomeSource,
    staking::{default_pools, StakingDelays},
    trade_simulator::TradeDelays,
    Leaderboard, MarketData, MockWalletConnector, NftDiscountService, NotificationService,
    OrderBook, ReferralLog, StakingService, TierLadder, TradeSimulator, TransactionHistoryService,
    WalletConnector,
};

// AppState definition
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub clock: Arc<dyn Clock>,
    pub market: Arc<MarketData>,
    pub trades: Arc<TradeSimulator>,
    pub orders: Arc<OrderBook>,
    pub staking: Arc<StakingService>,
    pub referrals: Arc<ReferralLog>,
    pub referral_tiers: Arc<TierLadder>,
    pub loyalty_tiers: Arc<TierLadder>,
    pub nft_discount: Arc<NftDiscountService>,
    pub notifications: Arc<NotificationService>,
    pub wallet: Arc<dyn WalletConnector>,
    pub history: Arc<TransactionHistoryService>,
    pub leaderboard: Arc<Leaderboard>,
}

impl AppState {
    /// Wires every simulator against one clock and one outcome source.
    pub fn new(
        config: Config,
        clock: Arc<dyn Clock>,
        outcome: Arc<dyn OutcomeSource>,
    ) -> anyhow::Result<Self> {
        let notifications = Arc::new(NotificationService::new(clock.clone()));
        let history = Arc::new(TransactionHistoryService::new());
        let nft_discount = Arc::new(NftDiscountService::new(
            config.nft_discount_uses,
            NFT_DISCOUNT_USES_TOTAL.max(config.nft_discount_uses),
        ));

        let trades = Arc::new(TradeSimulator::new(
            clock.clone(),
            outcome,
            notifications.clone(),
            history.clone(),
            nft_discount.clone(),
            TradeDelays::from_config(&config),
        ));
        let orders = Arc::new(OrderBook::new(clock.clone()));
        let staking = Arc::new(StakingService::new(
            default_pools(),
            clock.clone(),
            StakingDelays::from_config(&config),
        ));
        let wallet: Arc<dyn WalletConnector> =
            Arc::new(MockWalletConnector::from_config(clock.clone(), &config));

        Ok(Self {
            config,
            clock,
            market: Arc::new(MarketData::default()),
            trades,
            orders,
            staking,
            referrals: Arc::new(ReferralLog::default()),
            referral_tiers: Arc::new(TierLadder::referral_default()?),
            loyalty_tiers: Arc::new(TierLadder::loyalty_default()?),
            nft_discount,
            notifications,
            wallet,
            history,
            leaderboard: Arc::new(Leaderboard::default()),
        })
    }
}
