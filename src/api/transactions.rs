use axum::{
    extract::{State, Path, Query},
    Json,
};
use serde::Deserialize;
use chrono::{DateTime, Utc};

use crate::{
    error::{AppError, Result},
    models::{ApiResponse, PaginatedResponse, TransactionRecord},
};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub tx_type: Option<String>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    pub page: Option<i32>,
    pub limit: Option<i32>,
}

// Invalid dates are ignored rather than rejected.
fn parse_dates(query: &HistoryQuery) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
    let from = query.from_date.as_ref().and_then(|d| {
        DateTime::parse_from_rfc3339(d).ok().map(|dt| dt.with_timezone(&Utc))
    });
    let to = query.to_date.as_ref().and_then(|d| {
        DateTime::parse_from_rfc3339(d).ok().map(|dt| dt.with_timezone(&Utc))
    });
    (from, to)
}

fn within(record: &TransactionRecord, from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> bool {
    from.map_or(true, |from| record.timestamp >= from) && to.map_or(true, |to| record.timestamp <= to)
}

/// GET /api/v1/transactions/history
pub async fn get_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<ApiResponse<PaginatedResponse<TransactionRecord>>>> {
    let (from_date, to_date) = parse_dates(&query);
    let records: Vec<TransactionRecord> = state
        .history
        .list(query.tx_type.as_deref())
        .await
        .into_iter()
        .filter(|r| within(r, from_date, to_date))
        .collect();

    let history = PaginatedResponse::from_items(
        &records,
        query.page.unwrap_or(1),
        query.limit.unwrap_or(20),
    );
    Ok(Json(ApiResponse::success(history)))
}

/// GET /api/v1/transactions/:tx_hash
pub async fn get_details(
    State(state): State<AppState>,
    Path(tx_hash): Path<String>,
) -> Result<Json<ApiResponse<TransactionRecord>>> {
    let tx = state
        .history
        .get(&tx_hash)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Transaction {}", tx_hash)))?;

    Ok(Json(ApiResponse::success(tx)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(from_date: Option<&str>, to_date: Option<&str>) -> HistoryQuery {
        HistoryQuery {
            tx_type: None,
            from_date: from_date.map(str::to_string),
            to_date: to_date.map(str::to_string),
            page: None,
            limit: None,
        }
    }

    #[test]
    fn parse_dates_returns_none_for_invalid() {
        let (from, to) = parse_dates(&query(Some("invalid"), Some("invalid")));
        assert!(from.is_none());
        assert!(to.is_none());
    }

    #[test]
    fn parse_dates_parses_valid_rfc3339() {
        let (from, to) = parse_dates(&query(Some("2024-01-01T00:00:00Z"), None));
        assert!(from.is_some());
        assert!(to.is_none());
    }

    #[test]
    fn within_honours_open_bounds() {
        let record = TransactionRecord {
            tx_hash: "0x1".to_string(),
            tx_type: "swap".to_string(),
            token_in: "ETH".to_string(),
            token_out: "USDT".to_string(),
            amount_in: 1.0,
            amount_out: 2_450.0,
            usd_value: 2_450.0,
            fee_paid: 7.35,
            points_earned: 24_500,
            timestamp: DateTime::parse_from_rfc3339("2024-06-01T00:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
        };
        let (from, to) = parse_dates(&query(Some("2024-01-01T00:00:00Z"), None));
        assert!(within(&record, from, to));
        let (from, to) = parse_dates(&query(None, Some("2024-05-01T00:00:00Z")));
        assert!(!within(&record, from, to));
    }
}
