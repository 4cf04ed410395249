use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::{
    config::Config,
    crypto::hash::mock_tx_hash,
    error::{AppError, Result},
    models::{NotificationType, Quote, Trade, TradeState, TransactionRecord},
    services::{
        clock::Clock,
        nft_discount::NftDiscountService,
        notification_service::NotificationSink,
        outcome::{OutcomeSource, TradeOutcome},
        transaction_history::TransactionHistoryService,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradeDelays {
    pub confirm: Duration,
    pub processing: Duration,
    pub display: Duration,
}

impl TradeDelays {
    pub fn from_config(config: &Config) -> Self {
        Self {
            confirm: config.trade_confirm_delay(),
            processing: config.trade_processing_delay(),
            display: config.trade_display_delay(),
        }
    }

    /// Upper bound on how long a trade can stay out of `idle`.
    pub fn total(&self) -> Duration {
        self.confirm + self.processing + self.display
    }
}

fn trade_kind(quote: &Quote) -> &'static str {
    if quote.cross_chain {
        "bridge"
    } else {
        "swap"
    }
}

fn title_case(kind: &str) -> String {
    let mut chars = kind.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Drives `idle -> confirming -> processing -> success|error -> idle`.
/// One trade at a time; a started trade always runs to the end.
pub struct TradeSimulator {
    current: RwLock<Option<Trade>>,
    last_settled: RwLock<Option<Trade>>,
    clock: Arc<dyn Clock>,
    outcome: Arc<dyn OutcomeSource>,
    notifications: Arc<dyn NotificationSink>,
    history: Arc<TransactionHistoryService>,
    discount: Arc<NftDiscountService>,
    delays: TradeDelays,
    seq: AtomicU64,
}

impl TradeSimulator {
    pub fn new(
        clock: Arc<dyn Clock>,
        outcome: Arc<dyn OutcomeSource>,
        notifications: Arc<dyn NotificationSink>,
        history: Arc<TransactionHistoryService>,
        discount: Arc<NftDiscountService>,
        delays: TradeDelays,
    ) -> Self {
        Self {
            current: RwLock::new(None),
            last_settled: RwLock::new(None),
            clock,
            outcome,
            notifications,
            history,
            discount,
            delays,
            seq: AtomicU64::new(0),
        }
    }

    pub fn delays(&self) -> TradeDelays {
        self.delays
    }

    pub async fn state(&self) -> TradeState {
        self.current
            .read()
            .await
            .as_ref()
            .map(|t| t.state)
            .unwrap_or(TradeState::Idle)
    }

    pub async fn current(&self) -> Option<Trade> {
        self.current.read().await.clone()
    }

    pub async fn last_settled(&self) -> Option<Trade> {
        self.last_settled.read().await.clone()
    }

    /// Claims the single trade slot and moves it to `confirming`.
    pub async fn begin(&self, quote: Quote) -> Result<Trade> {
        if quote.input_amount.is_nan() || quote.input_amount <= 0.0 {
            return Err(AppError::InvalidAmount(
                "Cannot execute a zero-value quote".to_string(),
            ));
        }

        let mut current = self.current.write().await;
        if current.is_some() {
            return Err(AppError::TradeInFlight);
        }

        let now = self.clock.now();
        let seq = self.seq.fetch_add(1, Ordering::Relaxed) + 1;
        let trade = Trade {
            trade_id: format!("TRD_{}", seq),
            quote,
            state: TradeState::Confirming,
            tx_hash: None,
            created_at: now,
            updated_at: now,
        };
        *current = Some(trade.clone());

        tracing::info!(
            "Trade {} started: {} {} -> {}",
            trade.trade_id,
            trade.quote.input_amount,
            trade.quote.from_token,
            trade.quote.to_token
        );
        Ok(trade)
    }

    async fn transition(&self, trade: &mut Trade, state: TradeState) {
        trade.state = state;
        trade.updated_at = self.clock.now();
        *self.current.write().await = Some(trade.clone());
        tracing::debug!("Trade {} -> {}", trade.trade_id, state.as_str());
    }

    /// Runs the timed lifecycle of a trade returned by `begin`.
    /// Returns the settled trade after the display window has elapsed.
    async fn drive(&self, mut trade: Trade) -> Trade {
        self.clock.sleep(self.delays.confirm).await;
        self.transition(&mut trade, TradeState::Processing).await;

        self.clock.sleep(self.delays.processing).await;
        match self.outcome.roll() {
            TradeOutcome::Success => {
                let kind = trade_kind(&trade.quote);
                trade.tx_hash = Some(mock_tx_hash(
                    kind,
                    &trade.trade_id,
                    self.clock.now().timestamp(),
                ));
                self.transition(&mut trade, TradeState::Success).await;
                self.settle_success(&trade).await;
            }
            TradeOutcome::Failure => {
                self.transition(&mut trade, TradeState::Error).await;
                self.settle_failure(&trade).await;
            }
        }

        let settled = trade.clone();
        *self.last_settled.write().await = Some(settled.clone());

        self.clock.sleep(self.delays.display).await;
        *self.current.write().await = None;
        tracing::debug!("Trade {} reset to idle", settled.trade_id);

        settled
    }

    /// Claims the slot and runs the lifecycle on its own task. The task owns
    /// the slot until it returns to idle, whoever holds the handle.
    async fn spawn_lifecycle(self: &Arc<Self>, quote: Quote) -> Result<(Trade, JoinHandle<Trade>)> {
        let trade = self.begin(quote).await?;
        let simulator = Arc::clone(self);
        let pending = trade.clone();
        let handle = tokio::spawn(async move { simulator.drive(pending).await });
        Ok((trade, handle))
    }

    /// Waits for the trade to settle. Dropping this future leaves the
    /// lifecycle running.
    pub async fn execute(self: &Arc<Self>, quote: Quote) -> Result<Trade> {
        let (_, handle) = self.spawn_lifecycle(quote).await?;
        handle
            .await
            .map_err(|e| AppError::Internal(format!("Trade task failed: {}", e)))
    }

    /// Starts a trade and lets it run in the background.
    pub async fn submit(self: &Arc<Self>, quote: Quote) -> Result<Trade> {
        let (trade, _) = self.spawn_lifecycle(quote).await?;
        Ok(trade)
    }

    async fn settle_success(&self, trade: &Trade) {
        let quote = &trade.quote;
        let kind = trade_kind(quote);
        let tx_hash = trade.tx_hash.clone().unwrap_or_default();

        self.history
            .record(TransactionRecord {
                tx_hash: tx_hash.clone(),
                tx_type: kind.to_string(),
                token_in: quote.from_token.clone(),
                token_out: quote.to_token.clone(),
                amount_in: quote.input_amount,
                amount_out: quote.output_amount,
                usd_value: quote.input_usd,
                fee_paid: quote.fee_usd,
                points_earned: quote.points_earned,
                timestamp: trade.updated_at,
            })
            .await;

        if quote.fee_discount_applied {
            self.discount.consume_usage(kind).await;
        }

        self.notifications
            .notify(
                NotificationType::Success,
                format!("{} Completed", title_case(kind)),
                format!(
                    "{} {} {} to {:.6} {} completed",
                    title_case(kind),
                    quote.input_amount,
                    quote.from_token,
                    quote.output_amount,
                    quote.to_token
                ),
                Some(tx_hash),
            )
            .await;

        tracing::info!(
            "Trade {} settled: success, points={}",
            trade.trade_id,
            quote.points_earned
        );
    }

    async fn settle_failure(&self, trade: &Trade) {
        let quote = &trade.quote;
        let kind = trade_kind(quote);
        self.notifications
            .notify(
                NotificationType::Error,
                format!("{} Failed", title_case(kind)),
                format!(
                    "{} of {} {} to {} failed. Please try again.",
                    title_case(kind),
                    quote.input_amount,
                    quote.from_token,
                    quote.to_token
                ),
                None,
            )
            .await;
        tracing::warn!("Trade {} settled: error", trade.trade_id);
    }
}
