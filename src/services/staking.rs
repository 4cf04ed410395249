use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::{
    config::Config,
    constants::DAYS_PER_YEAR,
    crypto::hash,
    error::{AppError, Result},
    models::{PositionStatus, StakingPool, StakingPosition},
    services::{clock::Clock, market_data::MarketData},
};

const ONE_DAY: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StakingDelays {
    pub stake: Duration,
    pub unstake: Duration,
}

impl StakingDelays {
    pub fn from_config(config: &Config) -> Self {
        Self {
            stake: config.stake_delay(),
            unstake: config.unstake_delay(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StakingTotals {
    pub total_staked_usd: f64,
    pub total_rewards_usd: f64,
}

#[allow(clippy::too_many_arguments)]
fn pool(
    symbol: &str,
    name: &str,
    icon: &str,
    kind: &str,
    apy: f64,
    tvl: &str,
    min_stake: Decimal,
    lock_period: &str,
) -> StakingPool {
    StakingPool {
        pool_id: symbol.to_string(),
        name: name.to_string(),
        icon: icon.to_string(),
        kind: kind.to_string(),
        apy,
        tvl: tvl.to_string(),
        min_stake,
        lock_period: lock_period.to_string(),
        reward_token: symbol.to_string(),
    }
}

pub fn default_pools() -> Vec<StakingPool> {
    vec![
        pool("USDT", "Tether", "₮", "Stablecoin", 8.5, "2.4M", Decimal::new(100, 0), "Flexible"),
        pool("USDC", "USD Coin", "⭕", "Stablecoin", 8.2, "1.8M", Decimal::new(100, 0), "Flexible"),
        pool("BTC", "Bitcoin", "₿", "Crypto", 5.5, "4.2M", Decimal::new(1, 3), "30 days"),
        pool("ETH", "Ethereum", "Ξ", "Crypto", 6.8, "3.1M", Decimal::new(1, 2), "30 days"),
        pool("STRK", "StarkNet", "◈", "Crypto", 12.5, "820K", Decimal::new(10, 0), "60 days"),
        pool("CAREL", "Carel Protocol", "◐", "Crypto", 15.0, "650K", Decimal::new(100, 0), "90 days"),
    ]
}

fn normalize_pool_id(pool_id: &str) -> String {
    pool_id.trim().to_ascii_uppercase()
}

fn build_position_id(pool_id: &str, now_ts: i64, seq: u64) -> String {
    let pool_id = normalize_pool_id(pool_id);
    let digest = hash::short_digest(&[&pool_id, &now_ts.to_string(), &seq.to_string()], 12);
    format!("POS_{}_{}", pool_id, digest)
}

// Goes through the decimal text so 8.5 stays exactly 0.085.
fn apy_fraction(apy: f64) -> Decimal {
    apy.to_string()
        .parse::<Decimal>()
        .map(|apy| apy / Decimal::ONE_HUNDRED)
        .unwrap_or(Decimal::ZERO)
}

/// Projected reward over one month at the pool APY.
pub fn estimated_monthly_reward(pool: &StakingPool, amount: Decimal) -> Decimal {
    (amount * apy_fraction(pool.apy) / Decimal::from(12)).max(Decimal::ZERO)
}

/// Mock staking positions over a static pool catalog.
pub struct StakingService {
    pools: Vec<StakingPool>,
    positions: Arc<RwLock<Vec<StakingPosition>>>,
    clock: Arc<dyn Clock>,
    delays: StakingDelays,
    seq: AtomicU64,
}

impl StakingService {
    pub fn new(pools: Vec<StakingPool>, clock: Arc<dyn Clock>, delays: StakingDelays) -> Self {
        Self {
            pools,
            positions: Arc::new(RwLock::new(Vec::new())),
            clock,
            delays,
            seq: AtomicU64::new(0),
        }
    }

    pub fn pools(&self) -> &[StakingPool] {
        &self.pools
    }

    pub fn pool(&self, pool_id: &str) -> Result<&StakingPool> {
        let pool_id = normalize_pool_id(pool_id);
        self.pools
            .iter()
            .find(|p| p.pool_id == pool_id)
            .ok_or_else(|| AppError::InvalidToken(format!("Unknown staking pool: {}", pool_id)))
    }

    /// Opens a position after the stake latency. It is listed as `pending`
    /// while the latency elapses. The promotion to `active` runs on its own
    /// task, so it completes even if the caller goes away.
    pub async fn stake(&self, pool_id: &str, amount: Decimal) -> Result<StakingPosition> {
        let pool = self.pool(pool_id)?;
        if amount < pool.min_stake {
            return Err(AppError::BelowMinimumStake {
                amount: amount.to_string(),
                min_stake: pool.min_stake.to_string(),
            });
        }

        let now = self.clock.now();
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        let position = StakingPosition {
            position_id: build_position_id(&pool.pool_id, now.timestamp(), seq),
            pool_id: pool.pool_id.clone(),
            token: pool.pool_id.clone(),
            amount,
            rewards: Decimal::ZERO,
            status: PositionStatus::Pending,
            staked_at: now,
        };
        self.positions.write().await.insert(0, position.clone());
        tracing::debug!("Stake pending: {} {} ({})", amount, pool.pool_id, position.position_id);

        let positions = self.positions.clone();
        let clock = self.clock.clone();
        let delay = self.delays.stake;
        let id = position.position_id;
        let promotion = tokio::spawn(async move {
            clock.sleep(delay).await;
            let mut positions = positions.write().await;
            let stored = positions.iter_mut().find(|p| p.position_id == id)?;
            stored.status = PositionStatus::Active;
            tracing::info!(
                "Staked {} {} into position {}",
                stored.amount,
                stored.pool_id,
                stored.position_id
            );
            Some(stored.clone())
        });

        promotion
            .await
            .map_err(|e| AppError::Internal(format!("Stake task failed: {}", e)))?
            .ok_or(AppError::PositionNotFound)
    }

    /// Zeroes the accrued rewards and returns what was claimed.
    pub async fn claim_rewards(&self, position_id: &str) -> Result<Decimal> {
        let mut positions = self.positions.write().await;
        let position = positions
            .iter_mut()
            .find(|p| p.position_id == position_id)
            .ok_or(AppError::PositionNotFound)?;
        let claimed = position.rewards;
        position.rewards = Decimal::ZERO;
        tracing::info!("Claimed {} {} from {}", claimed, position.token, position_id);
        Ok(claimed)
    }

    /// Marks the position `unlocking`; it disappears once the unstake delay passes.
    pub async fn unstake(&self, position_id: &str) -> Result<StakingPosition> {
        let unlocking = {
            let mut positions = self.positions.write().await;
            let position = positions
                .iter_mut()
                .find(|p| p.position_id == position_id)
                .ok_or(AppError::PositionNotFound)?;
            match position.status {
                PositionStatus::Active => {}
                PositionStatus::Unlocking => {
                    return Err(AppError::BadRequest(
                        "Position is already unlocking".to_string(),
                    ))
                }
                PositionStatus::Pending => {
                    return Err(AppError::BadRequest(
                        "Position is still being staked".to_string(),
                    ))
                }
            }
            position.status = PositionStatus::Unlocking;
            position.clone()
        };

        let positions = self.positions.clone();
        let clock = self.clock.clone();
        let delay = self.delays.unstake;
        let id = unlocking.position_id.clone();
        tokio::spawn(async move {
            clock.sleep(delay).await;
            positions.write().await.retain(|p| p.position_id != id);
            tracing::info!("Position {} unstaked and removed", id);
        });

        Ok(unlocking)
    }

    /// Grows rewards of active positions by `amount * apy * days / 365`.
    pub async fn accrue_rewards(&self, days: u32) {
        let mut positions = self.positions.write().await;
        for position in positions
            .iter_mut()
            .filter(|p| p.status == PositionStatus::Active)
        {
            let Some(pool) = self.pools.iter().find(|p| p.pool_id == position.pool_id) else {
                continue;
            };
            let accrued = position.amount * apy_fraction(pool.apy) * Decimal::from(days)
                / Decimal::from(DAYS_PER_YEAR);
            position.rewards = (position.rewards + accrued).max(Decimal::ZERO);
        }
    }

    /// Accrues one day of rewards per simulated day, forever.
    pub fn spawn_daily_accrual(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let service = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                service.clock.sleep(ONE_DAY).await;
                service.accrue_rewards(1).await;
                tracing::debug!("Daily staking rewards accrued");
            }
        })
    }

    pub async fn positions(&self) -> Vec<StakingPosition> {
        self.positions.read().await.clone()
    }

    pub async fn position(&self, position_id: &str) -> Option<StakingPosition> {
        self.positions
            .read()
            .await
            .iter()
            .find(|p| p.position_id == position_id)
            .cloned()
    }

    pub async fn totals(&self, market: &MarketData) -> StakingTotals {
        let positions = self.positions.read().await;
        let mut totals = StakingTotals {
            total_staked_usd: 0.0,
            total_rewards_usd: 0.0,
        };
        for position in positions.iter() {
            let price = market.price_of(&position.token).unwrap_or(0.0);
            totals.total_staked_usd += position.amount.to_f64().unwrap_or(0.0) * price;
            totals.total_rewards_usd += position.rewards.to_f64().unwrap_or(0.0) * price;
        }
        totals
    }
}
