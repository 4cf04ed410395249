use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::constants::{
    NETWORK_SWITCH_DELAY_MS, NFT_DISCOUNT_USES_REMAINING, PRICE_STREAM_INTERVAL_SECS,
    STAKE_DELAY_MS, TRADE_CONFIRM_DELAY_MS, TRADE_DISPLAY_DELAY_MS, TRADE_PROCESSING_DELAY_MS,
    TRADE_SUCCESS_RATE, UNSTAKE_DELAY_MS, WALLET_CONNECT_DELAY_MS,
};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // Server
    pub host: String,
    pub port: u16,
    pub environment: String,

    // Trade simulation
    pub trade_success_rate: f64,
    pub trade_confirm_delay_ms: u64,
    pub trade_processing_delay_ms: u64,
    pub trade_display_delay_ms: u64,

    // Staking simulation
    pub stake_delay_ms: u64,
    pub unstake_delay_ms: u64,

    // Wallet simulation
    pub wallet_connect_delay_ms: u64,
    pub network_switch_delay_ms: u64,

    // Streams
    pub price_stream_interval_secs: u64,

    // NFT fee discount
    pub nft_discount_uses: u32,

    // CORS
    pub cors_allowed_origins: String,
}

fn env_or<T: FromStr>(name: &str, default: T) -> anyhow::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => Ok(raw.trim().parse()?),
        _ => Ok(default),
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            environment: "development".to_string(),
            trade_success_rate: TRADE_SUCCESS_RATE,
            trade_confirm_delay_ms: TRADE_CONFIRM_DELAY_MS,
            trade_processing_delay_ms: TRADE_PROCESSING_DELAY_MS,
            trade_display_delay_ms: TRADE_DISPLAY_DELAY_MS,
            stake_delay_ms: STAKE_DELAY_MS,
            unstake_delay_ms: UNSTAKE_DELAY_MS,
            wallet_connect_delay_ms: WALLET_CONNECT_DELAY_MS,
            network_switch_delay_ms: NETWORK_SWITCH_DELAY_MS,
            price_stream_interval_secs: PRICE_STREAM_INTERVAL_SECS,
            nft_discount_uses: NFT_DISCOUNT_USES_REMAINING,
            cors_allowed_origins: "*".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Config::default();

        Ok(Config {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: env_or("PORT", defaults.port)?,
            environment: env::var("ENVIRONMENT").unwrap_or(defaults.environment),

            trade_success_rate: env_or("TRADE_SUCCESS_RATE", defaults.trade_success_rate)?,
            trade_confirm_delay_ms: env_or(
                "TRADE_CONFIRM_DELAY_MS",
                defaults.trade_confirm_delay_ms,
            )?,
            trade_processing_delay_ms: env_or(
                "TRADE_PROCESSING_DELAY_MS",
                defaults.trade_processing_delay_ms,
            )?,
            trade_display_delay_ms: env_or(
                "TRADE_DISPLAY_DELAY_MS",
                defaults.trade_display_delay_ms,
            )?,

            stake_delay_ms: env_or("STAKE_DELAY_MS", defaults.stake_delay_ms)?,
            unstake_delay_ms: env_or("UNSTAKE_DELAY_MS", defaults.unstake_delay_ms)?,

            wallet_connect_delay_ms: env_or(
                "WALLET_CONNECT_DELAY_MS",
                defaults.wallet_connect_delay_ms,
            )?,
            network_switch_delay_ms: env_or(
                "NETWORK_SWITCH_DELAY_MS",
                defaults.network_switch_delay_ms,
            )?,

            price_stream_interval_secs: env_or(
                "PRICE_STREAM_INTERVAL_SECS",
                defaults.price_stream_interval_secs,
            )?,

            nft_discount_uses: env_or("NFT_DISCOUNT_USES", defaults.nft_discount_uses)?,

            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or(defaults.cors_allowed_origins),
        })
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.host.trim().is_empty() {
            anyhow::bail!("HOST is empty");
        }
        if !(0.0..=1.0).contains(&self.trade_success_rate) {
            anyhow::bail!(
                "TRADE_SUCCESS_RATE must be within [0, 1], got {}",
                self.trade_success_rate
            );
        }
        if self.price_stream_interval_secs == 0 {
            anyhow::bail!("PRICE_STREAM_INTERVAL_SECS must be > 0");
        }

        if self.trade_success_rate == 0.0 {
            tracing::warn!("TRADE_SUCCESS_RATE is 0; every simulated trade will fail");
        }
        if self.cors_allowed_origins.trim().is_empty() {
            tracing::warn!("CORS_ALLOWED_ORIGINS is empty; requests may be blocked");
        }

        Ok(())
    }

    pub fn is_testnet(&self) -> bool {
        let env = self.environment.to_ascii_lowercase();
        env == "development" || env == "testnet"
    }

    pub fn trade_confirm_delay(&self) -> Duration {
        Duration::from_millis(self.trade_confirm_delay_ms)
    }

    pub fn trade_processing_delay(&self) -> Duration {
        Duration::from_millis(self.trade_processing_delay_ms)
    }

    pub fn trade_display_delay(&self) -> Duration {
        Duration::from_millis(self.trade_display_delay_ms)
    }

    pub fn stake_delay(&self) -> Duration {
        Duration::from_millis(self.stake_delay_ms)
    }

    pub fn unstake_delay(&self) -> Duration {
        Duration::from_millis(self.unstake_delay_ms)
    }

    pub fn wallet_connect_delay(&self) -> Duration {
        Duration::from_millis(self.wallet_connect_delay_ms)
    }

    pub fn network_switch_delay(&self) -> Duration {
        Duration::from_millis(self.network_switch_delay_ms)
    }
}
