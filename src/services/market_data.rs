// Static mock price table shared by quotes, staking totals and the price stream.

use rand::Rng;

use crate::{
    constants::PRICE_JITTER_PERCENT,
    error::{AppError, Result},
    models::Token,
};

fn token(symbol: &str, name: &str, icon: &str, price_usd: f64, change_24h: f64, network: &str) -> Token {
    Token {
        symbol: symbol.to_string(),
        name: name.to_string(),
        icon: icon.to_string(),
        price_usd,
        change_24h,
        network: network.to_string(),
    }
}

pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_ascii_uppercase()
}

#[derive(Debug, Clone)]
pub struct MarketData {
    tokens: Vec<Token>,
}

impl Default for MarketData {
    fn default() -> Self {
        Self::new(vec![
            token("BTC", "Bitcoin", "₿", 65_000.0, 5.2, "Bitcoin"),
            token("ETH", "Ethereum", "Ξ", 2_450.0, -2.1, "Ethereum"),
            token("STRK", "StarkNet", "◈", 1.25, 8.3, "StarkNet"),
            token("CAREL", "ZkCarel", "◇", 0.85, 15.8, "StarkNet"),
            token("USDC", "USD Coin", "$", 1.0, 0.0, "Ethereum"),
            token("USDT", "Tether", "₮", 1.0, 0.0, "Ethereum"),
            token("WBTC", "Wrapped BTC", "₿", 64_950.0, 5.1, "Ethereum"),
        ])
    }
}

impl MarketData {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn token(&self, symbol: &str) -> Option<&Token> {
        let symbol = normalize_symbol(symbol);
        self.tokens.iter().find(|t| t.symbol == symbol)
    }

    pub fn require(&self, symbol: &str) -> Result<&Token> {
        self.token(symbol)
            .ok_or_else(|| AppError::InvalidToken(symbol.trim().to_string()))
    }

    pub fn price_of(&self, symbol: &str) -> Option<f64> {
        self.token(symbol).map(|t| t.price_usd)
    }

    /// Price with a small random wobble around the table value, plus its 24h change.
    pub fn jittered_price<R: Rng + ?Sized>(&self, symbol: &str, rng: &mut R) -> Option<(f64, f64)> {
        let token = self.token(symbol)?;
        let wobble = rng.random_range(-1.0..=1.0) * PRICE_JITTER_PERCENT / 100.0;
        Some((token.price_usd * (1.0 + wobble), token.change_24h))
    }
}
