use chrono::NaiveDate;

use crate::models::{ActivityStatus, Referee, ReferralActivity, ReferralStats, ReferralStatus};

// Counters that cover referrals older than the listed window.
const SEED_TOTAL_REFERRALS: u64 = 42;
const SEED_ACTIVE_REFERRALS: u64 = 35;
const SEED_TOTAL_EARNINGS: f64 = 1_250.0;
const SEED_LIFETIME_VOLUME_USD: f64 = 45_600.0;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn referee(address: &str, joined_on: NaiveDate, volume_usd: f64, status: ReferralStatus) -> Referee {
    Referee {
        address: address.to_string(),
        joined_on,
        volume_usd,
        // 10% of volume, paid in CAREL
        earnings: (volume_usd / 10.0).floor(),
        status,
    }
}

fn activity(
    id: u32,
    user: &str,
    date: NaiveDate,
    action: &str,
    volume_usd: f64,
    status: ActivityStatus,
) -> ReferralActivity {
    ReferralActivity {
        id,
        user: user.to_string(),
        date,
        action: action.to_string(),
        volume_usd,
        points: (volume_usd / 10.0).floor() as u64,
        status,
    }
}

/// Static referral book: who joined through the user's code and what they did.
pub struct ReferralLog {
    referees: Vec<Referee>,
    activity: Vec<ReferralActivity>,
}

impl Default for ReferralLog {
    fn default() -> Self {
        Self::new(
            vec![
                referee("0xab...c3f1", date(2024, 1, 15), 1_240.0, ReferralStatus::Active),
                referee("0x12...45a9", date(2024, 1, 14), 890.0, ReferralStatus::Active),
                referee("0xcd...67b2", date(2024, 1, 12), 2_100.0, ReferralStatus::Active),
                referee("0xef...89c4", date(2024, 1, 10), 450.0, ReferralStatus::Inactive),
                referee("0x23...d1e5", date(2024, 1, 8), 3_200.0, ReferralStatus::Active),
            ],
            vec![
                activity(1, "0x8f...2e4d", date(2024, 1, 15), "Swap", 2_450.0, ActivityStatus::Completed),
                activity(2, "0x3a...9f1c", date(2024, 1, 14), "Bridge", 5_200.0, ActivityStatus::Completed),
                activity(3, "0x7b...4d8a", date(2024, 1, 13), "Swap", 890.0, ActivityStatus::Completed),
                activity(4, "0x1e...6c2f", date(2024, 1, 12), "Stake", 10_000.0, ActivityStatus::Pending),
                activity(5, "0x9d...8e1a", date(2024, 1, 11), "Swap", 3_100.0, ActivityStatus::Completed),
            ],
        )
    }
}

impl ReferralLog {
    pub fn new(mut referees: Vec<Referee>, mut activity: Vec<ReferralActivity>) -> Self {
        referees.sort_by(|a, b| b.joined_on.cmp(&a.joined_on));
        activity.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        Self { referees, activity }
    }

    /// Newest first.
    pub fn referees(&self) -> &[Referee] {
        &self.referees
    }

    /// Newest first, optionally filtered by status.
    pub fn activity(&self, status: Option<ActivityStatus>) -> Vec<ReferralActivity> {
        self.activity
            .iter()
            .filter(|a| status.map_or(true, |s| a.status == s))
            .cloned()
            .collect()
    }

    /// Seed counters, never below what the listed referees account for.
    pub fn stats(&self) -> ReferralStats {
        let listed_active = self
            .referees
            .iter()
            .filter(|r| r.status == ReferralStatus::Active)
            .count() as u64;
        let listed_earnings: f64 = self.referees.iter().map(|r| r.earnings).sum();
        let listed_volume: f64 = self.referees.iter().map(|r| r.volume_usd).sum();

        ReferralStats {
            total_referrals: SEED_TOTAL_REFERRALS.max(self.referees.len() as u64),
            active_referrals: SEED_ACTIVE_REFERRALS.max(listed_active),
            total_earnings: SEED_TOTAL_EARNINGS.max(listed_earnings),
            lifetime_volume_usd: SEED_LIFETIME_VOLUME_USD.max(listed_volume),
            pending_points: self
                .activity
                .iter()
                .filter(|a| a.status == ActivityStatus::Pending)
                .map(|a| a.points)
                .sum(),
        }
    }
}
