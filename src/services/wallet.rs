use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::{
    config::Config,
    constants::{
        DEFAULT_NETWORK, MOCK_BALANCE_ETH, MOCK_BALANCE_USDC, MOCK_BALANCE_USDT,
        MOCK_WALLET_ADDRESS,
    },
    error::{AppError, Result},
    models::{WalletBalances, WalletProvider, WalletSession},
    services::clock::Clock,
};

pub const SUPPORTED_NETWORKS: &[&str] = &["ethereum", "starknet", "bitcoin"];

#[async_trait]
pub trait WalletConnector: Send + Sync {
    async fn connect(&self, provider: WalletProvider) -> Result<WalletSession>;
    async fn disconnect(&self) -> WalletSession;
    async fn switch_network(&self, network: &str) -> Result<WalletSession>;
    async fn session(&self) -> WalletSession;
}

fn disconnected_session() -> WalletSession {
    WalletSession {
        is_connected: false,
        address: None,
        provider: None,
        balances: WalletBalances::default(),
        network: DEFAULT_NETWORK.to_string(),
    }
}

fn normalize_network(network: &str) -> Result<String> {
    let network = network.trim().to_ascii_lowercase();
    if SUPPORTED_NETWORKS.contains(&network.as_str()) {
        Ok(network)
    } else {
        Err(AppError::BadRequest(format!(
            "Unsupported network: {}",
            network
        )))
    }
}

/// Fake wallet: every provider yields the same address and balances.
pub struct MockWalletConnector {
    session: RwLock<WalletSession>,
    clock: Arc<dyn Clock>,
    connect_delay: Duration,
    switch_delay: Duration,
}

impl MockWalletConnector {
    pub fn new(clock: Arc<dyn Clock>, connect_delay: Duration, switch_delay: Duration) -> Self {
        Self {
            session: RwLock::new(disconnected_session()),
            clock,
            connect_delay,
            switch_delay,
        }
    }

    pub fn from_config(clock: Arc<dyn Clock>, config: &Config) -> Self {
        Self::new(
            clock,
            config.wallet_connect_delay(),
            config.network_switch_delay(),
        )
    }
}

#[async_trait]
impl WalletConnector for MockWalletConnector {
    async fn connect(&self, provider: WalletProvider) -> Result<WalletSession> {
        self.clock.sleep(self.connect_delay).await;

        let mut session = self.session.write().await;
        *session = WalletSession {
            is_connected: true,
            address: Some(MOCK_WALLET_ADDRESS.to_string()),
            provider: Some(provider),
            balances: WalletBalances {
                eth: MOCK_BALANCE_ETH,
                usdt: MOCK_BALANCE_USDT,
                usdc: MOCK_BALANCE_USDC,
            },
            network: DEFAULT_NETWORK.to_string(),
        };
        tracing::info!("Wallet connected via {:?}", provider);
        Ok(session.clone())
    }

    async fn disconnect(&self) -> WalletSession {
        let mut session = self.session.write().await;
        *session = disconnected_session();
        tracing::info!("Wallet disconnected");
        session.clone()
    }

    async fn switch_network(&self, network: &str) -> Result<WalletSession> {
        let network = normalize_network(network)?;
        if !self.session.read().await.is_connected {
            return Err(AppError::WalletNotConnected);
        }

        self.clock.sleep(self.switch_delay).await;

        let mut session = self.session.write().await;
        // Disconnected while the switch was pending.
        if !session.is_connected {
            return Err(AppError::WalletNotConnected);
        }
        session.network = network;
        tracing::info!("Wallet switched to {}", session.network);
        Ok(session.clone())
    }

    async fn session(&self) -> WalletSession {
        self.session.read().await.clone()
    }
}
