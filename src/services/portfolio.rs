use chrono::{DateTime, Duration, Utc};
use rust_decimal::prelude::ToPrimitive;
use std::collections::BTreeMap;

use crate::{
    error::{AppError, Result},
    models::{
        PortfolioAsset, PortfolioPoint, PortfolioSummary, StakingPosition, Token,
        TransactionRecord, WalletSession,
    },
    services::market_data::{normalize_symbol, MarketData},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortfolioPeriod {
    Day,
    Week,
    Month,
    All,
}

impl PortfolioPeriod {
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "24h" | "1d" => Ok(Self::Day),
            "7d" => Ok(Self::Week),
            "30d" => Ok(Self::Month),
            "all" => Ok(Self::All),
            _ => Err(AppError::BadRequest(format!(
                "Unknown portfolio period: {}",
                raw.trim()
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Day => "24H",
            Self::Week => "7D",
            Self::Month => "30D",
            Self::All => "ALL",
        }
    }

    // (spacing between points, number of steps back)
    fn steps(self) -> (Duration, i32) {
        match self {
            Self::Day => (Duration::hours(1), 24),
            Self::Week => (Duration::days(1), 7),
            Self::Month => (Duration::days(1), 30),
            Self::All => (Duration::weeks(1), 26),
        }
    }
}

/// Token amounts held: mock wallet balances, plus net flows of settled
/// trades, plus staked principal. Tokens that net out at or below zero are dropped.
pub fn holdings(
    session: &WalletSession,
    records: &[TransactionRecord],
    positions: &[StakingPosition],
) -> BTreeMap<String, f64> {
    let mut held: BTreeMap<String, f64> = BTreeMap::new();

    if session.is_connected {
        let balances = &session.balances;
        for (symbol, amount) in [
            ("ETH", balances.eth),
            ("USDT", balances.usdt),
            ("USDC", balances.usdc),
        ] {
            *held.entry(symbol.to_string()).or_default() += amount;
        }
    }

    for record in records {
        *held.entry(normalize_symbol(&record.token_in)).or_default() -= record.amount_in;
        *held.entry(normalize_symbol(&record.token_out)).or_default() += record.amount_out;
    }

    for position in positions {
        *held.entry(normalize_symbol(&position.token)).or_default() +=
            position.amount.to_f64().unwrap_or(0.0);
    }

    held.retain(|_, amount| *amount > 0.0);
    held
}

// Undo the 24h change, compounded per day, to estimate an earlier value.
fn value_days_back(priced: &[(f64, &Token)], days_back: f64) -> f64 {
    priced
        .iter()
        .map(|(amount, token)| {
            let daily = 1.0 + token.change_24h / 100.0;
            let factor = if daily > 0.0 { daily.powf(days_back) } else { 1.0 };
            amount * token.price_usd / factor
        })
        .sum()
}

pub fn summarize(
    held: &BTreeMap<String, f64>,
    market: &MarketData,
    period: PortfolioPeriod,
    now: DateTime<Utc>,
) -> PortfolioSummary {
    let priced: Vec<(f64, &Token)> = held
        .iter()
        .filter_map(|(symbol, amount)| market.token(symbol).map(|t| (*amount, t)))
        .collect();
    let total_value_usd: f64 = priced.iter().map(|(a, t)| a * t.price_usd).sum();

    let mut assets: Vec<PortfolioAsset> = priced
        .iter()
        .map(|(amount, token)| {
            let value_usd = amount * token.price_usd;
            PortfolioAsset {
                symbol: token.symbol.clone(),
                name: token.name.clone(),
                icon: token.icon.clone(),
                amount: *amount,
                value_usd,
                percent: if total_value_usd > 0.0 {
                    value_usd / total_value_usd * 100.0
                } else {
                    0.0
                },
                change_24h: token.change_24h,
            }
        })
        .collect();
    assets.sort_by(|a, b| b.value_usd.total_cmp(&a.value_usd));

    let (step, count) = period.steps();
    let series: Vec<PortfolioPoint> = (0..=count)
        .rev()
        .map(|k| {
            let offset = step * k;
            PortfolioPoint {
                timestamp: now - offset,
                value_usd: value_days_back(&priced, offset.num_seconds() as f64 / 86_400.0),
            }
        })
        .collect();

    let (pnl_usd, pnl_percent) = match (series.first(), series.last()) {
        (Some(first), Some(last)) => {
            let diff = last.value_usd - first.value_usd;
            let pct = if first.value_usd > 0.0 {
                diff / first.value_usd * 100.0
            } else {
                0.0
            };
            (diff, pct)
        }
        _ => (0.0, 0.0),
    };

    PortfolioSummary {
        period: period.as_str().to_string(),
        total_value_usd,
        pnl_usd,
        pnl_percent,
        assets,
        series,
    }
}
