// src/models/mod.rs
pub mod simulation;

// Re-export so other modules can use `crate::models::X`
pub use simulation::{
    ActivityStatus,
    ApiResponse,
    CreateLimitOrderRequest,
    FeeDiscount,
    LeaderboardEntry,
    LimitOrder,
    Notification,
    NotificationType,
    OrderSide,
    OrderStatus,
    PaginatedResponse,
    PortfolioAsset,
    PortfolioPoint,
    PortfolioSummary,
    PositionStatus,
    Quote,
    Referee,
    ReferralActivity,
    ReferralStats,
    ReferralStatus,
    StakingPool,
    StakingPosition,
    SwapQuoteRequest,
    TierStatus,
    TierStep,
    Token,
    Trade,
    TradeState,
    TransactionRecord,
    WalletBalances,
    WalletProvider,
    WalletSession,
};
