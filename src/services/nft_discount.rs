use tokio::sync::RwLock;

use crate::models::FeeDiscount;

const DEFAULT_DISCOUNT_PERCENT: f64 = 50.0;

/// Mock NFT fee discount with a limited number of uses.
pub struct NftDiscountService {
    state: RwLock<FeeDiscount>,
}

impl NftDiscountService {
    pub fn new(uses_remaining: u32, uses_total: u32) -> Self {
        Self::with_discount(DEFAULT_DISCOUNT_PERCENT, uses_remaining, uses_total)
    }

    pub fn with_discount(discount_percent: f64, uses_remaining: u32, uses_total: u32) -> Self {
        let uses_remaining = uses_remaining.min(uses_total);
        Self {
            state: RwLock::new(FeeDiscount {
                active: uses_remaining > 0,
                discount_percent: discount_percent.clamp(0.0, 100.0),
                uses_remaining,
                uses_total,
            }),
        }
    }

    pub async fn snapshot(&self) -> FeeDiscount {
        *self.state.read().await
    }

    /// Burns one use; the discount turns off when the last one is spent.
    pub async fn consume_usage(&self, action: &str) -> FeeDiscount {
        let mut state = self.state.write().await;
        if state.active && state.uses_remaining > 0 {
            state.uses_remaining -= 1;
            state.active = state.uses_remaining > 0;
            tracing::info!(
                "nft_discount_usage_consumed action={} discount={} remaining={}/{}",
                action,
                state.discount_percent,
                state.uses_remaining,
                state.uses_total
            );
        }
        *state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn consume_decrements_until_inactive() {
        let service = NftDiscountService::new(2, 10);
        assert!(service.snapshot().await.active);

        let after_one = service.consume_usage("swap").await;
        assert_eq!(after_one.uses_remaining, 1);
        assert!(after_one.active);

        let after_two = service.consume_usage("swap").await;
        assert_eq!(after_two.uses_remaining, 0);
        assert!(!after_two.active);

        let after_three = service.consume_usage("swap").await;
        assert_eq!(after_three.uses_remaining, 0);
    }

    #[tokio::test]
    async fn remaining_never_exceeds_total() {
        let service = NftDiscountService::new(20, 10);
        assert_eq!(service.snapshot().await.uses_remaining, 10);
        assert!(!NftDiscountService::with_discount(50.0, 0, 0).snapshot().await.active);
    }
}
