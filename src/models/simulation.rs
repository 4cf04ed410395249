use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ==================== TOKEN ====================
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Token {
    pub symbol: String,
    pub name: String,
    pub icon: String,
    pub price_usd: f64,
    pub change_24h: f64,
    pub network: String,
}

// ==================== QUOTE ====================
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Quote {
    pub from_token: String,
    pub to_token: String,
    pub from_network: String,
    pub to_network: String,
    pub input_amount: f64,
    pub output_amount: f64,
    pub rate: f64,
    pub input_usd: f64,
    pub output_usd: f64,
    pub fee_percent: f64,
    pub fee_usd: f64,
    pub fee_discount_applied: bool,
    pub price_impact_percent: f64,
    pub high_price_impact: bool,
    pub points_earned: u64,
    pub slippage_percent: f64,
    pub min_received: f64,
    pub cross_chain: bool,
    pub route: String,
    pub estimated_time: String,
}

#[derive(Debug, Deserialize)]
pub struct SwapQuoteRequest {
    pub from_token: String,
    pub to_token: String,
    pub amount: String,
    pub slippage: Option<f64>,
}

// ==================== TRADE ====================
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TradeState {
    #[default]
    Idle,
    Confirming,
    Processing,
    Success,
    Error,
}

impl TradeState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Confirming => "confirming",
            Self::Processing => "processing",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    pub trade_id: String,
    pub quote: Quote,
    pub state: TradeState,
    pub tx_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ==================== TRANSACTION ====================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub tx_hash: String,
    pub tx_type: String, // swap/bridge
    pub token_in: String,
    pub token_out: String,
    pub amount_in: f64,
    pub amount_out: f64,
    pub usd_value: f64,
    pub fee_paid: f64,
    pub points_earned: u64,
    pub timestamp: DateTime<Utc>,
}

// ==================== LIMIT ORDER ====================
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }
}

/// The book only ever stores `Active` orders: cancel removes the order and
/// expiry is a label. The other states are accepted by the list filter so
/// clients written against a real order book get an empty page, not a 400.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Active,
    Filled,
    Cancelled,
    Expired,
}

impl OrderStatus {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "active" => Some(Self::Active),
            "filled" => Some(Self::Filled),
            "cancelled" | "canceled" => Some(Self::Cancelled),
            "expired" => Some(Self::Expired),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitOrder {
    pub order_id: String,
    pub side: OrderSide,
    pub token: String,
    pub quote_token: String,
    pub amount: Decimal,
    pub price: Decimal,
    pub expiry: String, // "10m", "1h", "1d", "3d", "7d"
    pub expiry_label: String,
    pub expires_at: DateTime<Utc>, // display only, never enforced
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateLimitOrderRequest {
    pub side: OrderSide,
    pub token: String,
    pub quote_token: Option<String>,
    pub amount: String,
    pub price: String,
    pub expiry: Option<String>,
}

// ==================== STAKING ====================
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StakingPool {
    pub pool_id: String,
    pub name: String,
    pub icon: String,
    pub kind: String, // Stablecoin/Crypto
    pub apy: f64,
    pub tvl: String,
    pub min_stake: Decimal,
    pub lock_period: String,
    pub reward_token: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PositionStatus {
    Active,
    Unlocking,
    Pending,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StakingPosition {
    pub position_id: String,
    pub pool_id: String,
    pub token: String,
    pub amount: Decimal,
    pub rewards: Decimal,
    pub status: PositionStatus,
    pub staked_at: DateTime<Utc>,
}

// ==================== TIERS ====================
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TierStep {
    pub name: String,
    pub threshold: u64,
    pub rate_percent: f64, // commission for referral, fee discount for loyalty
    pub bonus: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TierStatus {
    pub tier_index: usize,
    pub name: String,
    pub threshold: u64,
    pub rate_percent: f64,
    pub bonus: f64,
    pub next_threshold: Option<u64>,
    pub progress_to_next: f64,
}

// ==================== NFT DISCOUNT ====================
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FeeDiscount {
    pub active: bool,
    pub discount_percent: f64,
    pub uses_remaining: u32,
    pub uses_total: u32,
}

// ==================== NOTIFICATION ====================
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    Success,
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    #[serde(rename = "type")]
    pub notif_type: NotificationType,
    pub title: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

// ==================== WALLET ====================
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WalletProvider {
    Metamask,
    Walletconnect,
    Coinbase,
    Phantom,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct WalletBalances {
    pub eth: f64,
    pub usdt: f64,
    pub usdc: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WalletSession {
    pub is_connected: bool,
    pub address: Option<String>,
    pub provider: Option<WalletProvider>,
    pub balances: WalletBalances,
    pub network: String,
}

// ==================== LEADERBOARD ====================
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub address: String,
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub is_you: bool,
    pub change: i32,
}

// ==================== REFERRAL ====================
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReferralStatus {
    Active,
    Inactive,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Referee {
    pub address: String,
    pub joined_on: NaiveDate,
    pub volume_usd: f64,
    pub earnings: f64, // CAREL
    pub status: ReferralStatus,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ActivityStatus {
    Completed,
    Pending,
}

impl ActivityStatus {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "completed" => Some(Self::Completed),
            "pending" => Some(Self::Pending),
            _ => None,
        }
    }
}

/// Something a referred user did that earns the referrer points.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReferralActivity {
    pub id: u32,
    pub user: String,
    pub date: NaiveDate,
    pub action: String,
    pub volume_usd: f64,
    pub points: u64,
    pub status: ActivityStatus,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ReferralStats {
    pub total_referrals: u64,
    pub active_referrals: u64,
    pub total_earnings: f64,
    pub lifetime_volume_usd: f64,
    pub pending_points: u64,
}

// ==================== PORTFOLIO ====================
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PortfolioAsset {
    pub symbol: String,
    pub name: String,
    pub icon: String,
    pub amount: f64,
    pub value_usd: f64,
    pub percent: f64,
    pub change_24h: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PortfolioPoint {
    pub timestamp: DateTime<Utc>,
    pub value_usd: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PortfolioSummary {
    pub period: String,
    pub total_value_usd: f64,
    pub pnl_usd: f64,
    pub pnl_percent: f64,
    pub assets: Vec<PortfolioAsset>,
    pub series: Vec<PortfolioPoint>,
}

// ==================== API RESPONSE ====================
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub page: i32,
    pub limit: i32,
    pub total: i64,
}

impl<T: Clone> PaginatedResponse<T> {
    /// Slices an already-filtered list into one page (1-based).
    pub fn from_items(items: &[T], page: i32, limit: i32) -> Self {
        let page = page.max(1);
        let limit = limit.max(1);
        let start = ((page - 1) as usize).saturating_mul(limit as usize);
        let slice = items
            .iter()
            .skip(start)
            .take(limit as usize)
            .cloned()
            .collect();
        Self {
            items: slice,
            page,
            limit,
            total: items.len() as i64,
        }
    }
}
