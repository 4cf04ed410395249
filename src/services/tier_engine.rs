use crate::{
    constants::{REFERRAL_CODE_PREFIX, REFERRAL_LINK_BASE},
    models::{TierStatus, TierStep},
};

fn step(name: &str, threshold: u64, rate_percent: f64, bonus: f64) -> TierStep {
    TierStep {
        name: name.to_string(),
        threshold,
        rate_percent,
        bonus,
    }
}

/// Ascending threshold ladder shared by referral and loyalty tiers.
#[derive(Debug, Clone)]
pub struct TierLadder {
    steps: Vec<TierStep>,
}

impl TierLadder {
    /// Startup-time validation; a bad ladder is a configuration error.
    pub fn new(steps: Vec<TierStep>) -> anyhow::Result<Self> {
        if steps.is_empty() {
            anyhow::bail!("Tier ladder needs at least one step");
        }
        if let Some(w) = steps.windows(2).find(|w| w[0].threshold >= w[1].threshold) {
            anyhow::bail!(
                "Tier thresholds must be strictly ascending: {} ({}) then {} ({})",
                w[0].name,
                w[0].threshold,
                w[1].name,
                w[1].threshold
            );
        }
        Ok(Self { steps })
    }

    /// Referral counts: 1/11/26/51 with 10-25% commission.
    pub fn referral_default() -> anyhow::Result<Self> {
        Self::new(vec![
            step("Bronze", 1, 10.0, 50.0),
            step("Silver", 11, 15.0, 150.0),
            step("Gold", 26, 20.0, 400.0),
            step("Platinum", 51, 25.0, 1_000.0),
        ])
    }

    /// Loyalty points; `rate_percent` is the fee discount.
    pub fn loyalty_default() -> anyhow::Result<Self> {
        Self::new(vec![
            step("Bronze", 1_000, 5.0, 0.0),
            step("Silver", 5_000, 15.0, 0.0),
            step("Gold", 10_000, 25.0, 0.0),
            step("Platinum", 25_000, 35.0, 0.0),
            step("Onyx", 50_000, 50.0, 0.0),
        ])
    }

    pub fn steps(&self) -> &[TierStep] {
        &self.steps
    }

    /// Highest step whose threshold is <= count. Counts under the first
    /// threshold still land on the first step, with zero progress.
    pub fn tier_for(&self, count: u64) -> TierStatus {
        let index = self
            .steps
            .iter()
            .rposition(|s| s.threshold <= count)
            .unwrap_or(0);
        let current = &self.steps[index];
        let next = self.steps.get(index + 1);

        let progress_to_next = match next {
            Some(next) => {
                let span = (next.threshold - current.threshold) as f64;
                let done = count as f64 - current.threshold as f64;
                (done / span * 100.0).clamp(0.0, 100.0)
            }
            None => 100.0,
        };

        TierStatus {
            tier_index: index,
            name: current.name.clone(),
            threshold: current.threshold,
            rate_percent: current.rate_percent,
            bonus: current.bonus,
            next_threshold: next.map(|s| s.threshold),
            progress_to_next,
        }
    }
}

/// `CAREL-` plus up to six characters of the address after `0x`.
pub fn referral_code(address: Option<&str>) -> String {
    let body: String = address
        .map(|addr| addr.trim().chars().skip(2).take(6).collect::<String>())
        .filter(|body| !body.is_empty())
        .map(|body| body.to_uppercase())
        .unwrap_or_else(|| "000000".to_string());
    format!("{}{}", REFERRAL_CODE_PREFIX, body)
}

pub fn referral_link(address: Option<&str>) -> String {
    let address = address.map(str::trim).filter(|a| !a.is_empty()).unwrap_or("0x0000");
    format!("{}{}", REFERRAL_LINK_BASE, address)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ladder(thresholds: &[u64]) -> TierLadder {
        TierLadder::new(
            thresholds
                .iter()
                .enumerate()
                .map(|(i, t)| step(&format!("T{}", i), *t, i as f64, 0.0))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn tier_for_reports_progress_between_steps() {
        let status = ladder(&[0, 5, 15, 30]).tier_for(20);
        assert_eq!(status.threshold, 15);
        assert_eq!(status.next_threshold, Some(30));
        assert!((status.progress_to_next - 33.333_333).abs() < 1e-3);
    }

    #[test]
    fn tier_for_is_monotonic() {
        let ladder = TierLadder::referral_default().unwrap();
        let mut last = 0;
        for count in 0..200 {
            let index = ladder.tier_for(count).tier_index;
            assert!(index >= last);
            last = index;
        }
        assert_eq!(last, 3);
    }

    #[test]
    fn below_first_threshold_and_top_tier() {
        let ladder = TierLadder::loyalty_default().unwrap();
        let start = ladder.tier_for(10);
        assert_eq!(start.tier_index, 0);
        assert_eq!(start.progress_to_next, 0.0);

        let top = ladder.tier_for(1_000_000);
        assert_eq!(top.name, "Onyx");
        assert_eq!(top.next_threshold, None);
        assert_eq!(top.progress_to_next, 100.0);
    }

    #[test]
    fn new_rejects_unsorted_or_empty_ladders() {
        assert!(TierLadder::new(Vec::new()).is_err());
        assert!(TierLadder::new(vec![step("a", 5, 0.0, 0.0), step("b", 5, 0.0, 0.0)]).is_err());
        let err = TierLadder::new(vec![step("a", 9, 0.0, 0.0), step("b", 3, 0.0, 0.0)])
            .unwrap_err()
            .to_string();
        assert!(err.contains("strictly ascending"));
        assert!(TierLadder::referral_default().is_ok());
        assert!(TierLadder::loyalty_default().is_ok());
    }

    #[test]
    fn referral_code_uses_address_slice() {
        assert_eq!(referral_code(Some("0xabcdef1234")), "CAREL-ABCDEF");
        assert_eq!(referral_code(None), "CAREL-000000");
        assert_eq!(referral_code(Some("0x12")), "CAREL-12");
        assert_eq!(referral_code(Some("0x")), "CAREL-000000");
        assert_eq!(referral_link(Some("0xabc")), "https://zkcarel.com/ref/0xabc");
        assert_eq!(referral_link(None), "https://zkcarel.com/ref/0x0000");
    }
}
