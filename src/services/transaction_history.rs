use tokio::sync::RwLock;

use crate::models::TransactionRecord;

/// Session-scoped record of settled simulated trades.
#[derive(Default)]
pub struct TransactionHistoryService {
    records: RwLock<Vec<TransactionRecord>>,
}

impl TransactionHistoryService {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record(&self, record: TransactionRecord) {
        tracing::debug!(
            "Recorded {} tx {}: {} {} -> {} {}",
            record.tx_type,
            record.tx_hash,
            record.amount_in,
            record.token_in,
            record.amount_out,
            record.token_out
        );
        self.records.write().await.push(record);
    }

    /// Newest first, optionally restricted to one tx type.
    pub async fn list(&self, tx_type: Option<&str>) -> Vec<TransactionRecord> {
        let records = self.records.read().await;
        records
            .iter()
            .rev()
            .filter(|r| tx_type.map_or(true, |t| r.tx_type.eq_ignore_ascii_case(t)))
            .cloned()
            .collect()
    }

    pub async fn get(&self, tx_hash: &str) -> Option<TransactionRecord> {
        self.records
            .read()
            .await
            .iter()
            .find(|r| r.tx_hash.eq_ignore_ascii_case(tx_hash))
            .cloned()
    }

    pub async fn total_volume_usd(&self) -> f64 {
        self.records.read().await.iter().map(|r| r.usd_value).sum()
    }

    pub async fn total_points(&self) -> u64 {
        self.records.read().await.iter().map(|r| r.points_earned).sum()
    }
}
