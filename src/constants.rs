/// Application constants

// Fees (percent of USD notional)
pub const BASE_FEE_PERCENT: f64 = 0.3;

// Points configuration
pub const POINTS_PER_USD_SWAP: f64 = 10.0;

// Price impact above this is flagged to the user
pub const HIGH_PRICE_IMPACT_PERCENT: f64 = 1.0;

// Output amounts are displayed with this many decimals
pub const QUOTE_DISPLAY_DECIMALS: i32 = 6;

// Slippage
pub const DEFAULT_SLIPPAGE_PERCENT: f64 = 0.5;
pub const SLIPPAGE_PRESETS: [f64; 4] = [0.1, 0.3, 0.5, 1.0];
pub const MAX_SLIPPAGE_PERCENT: f64 = 50.0;

// Routes
pub const ROUTE_BRIDGE: &str = "StarkGate Bridge";
pub const ROUTE_SWAP: &str = "AVNU";
pub const ESTIMATED_TIME_BRIDGE: &str = "~3-5 min";
pub const ESTIMATED_TIME_SWAP: &str = "~30 sec";

// Trade simulation
pub const TRADE_SUCCESS_RATE: f64 = 0.9;
pub const TRADE_CONFIRM_DELAY_MS: u64 = 1_000;
pub const TRADE_PROCESSING_DELAY_MS: u64 = 2_500;
pub const TRADE_DISPLAY_DELAY_MS: u64 = 3_000;

// Staking simulation
pub const STAKE_DELAY_MS: u64 = 1_500;
pub const UNSTAKE_DELAY_MS: u64 = 2_000;
pub const DAYS_PER_YEAR: i64 = 365;

// Wallet simulation
pub const WALLET_CONNECT_DELAY_MS: u64 = 1_000;
pub const NETWORK_SWITCH_DELAY_MS: u64 = 500;
pub const MOCK_WALLET_ADDRESS: &str = "0x1234...5678";
pub const MOCK_BALANCE_ETH: f64 = 2.5;
pub const MOCK_BALANCE_USDT: f64 = 1_500.0;
pub const MOCK_BALANCE_USDC: f64 = 2_000.0;
pub const DEFAULT_NETWORK: &str = "ethereum";

// NFT fee discount
pub const NFT_DISCOUNT_USES_TOTAL: u32 = 10;
pub const NFT_DISCOUNT_USES_REMAINING: u32 = 5;

// Referral
pub const REFERRAL_CODE_PREFIX: &str = "CAREL-";
pub const REFERRAL_LINK_BASE: &str = "https://zkcarel.com/ref/";

// API version
pub const API_VERSION: &str = "v1";

// WebSocket configuration
pub const WS_HEARTBEAT_INTERVAL_SECS: u64 = 30;
pub const WS_CLIENT_TIMEOUT_SECS: u64 = 60;
pub const PRICE_STREAM_INTERVAL_SECS: u64 = 5;
pub const NOTIFICATION_CHANNEL_CAPACITY: usize = 100;

// Mock price jitter applied by the price stream (percent)
pub const PRICE_JITTER_PERCENT: f64 = 0.5;
