use crate::{
    error::{AppError, Result},
    models::LeaderboardEntry,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaderboardCategory {
    Total,
    Trading,
    Referral,
}

impl LeaderboardCategory {
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "total" | "points" => Ok(Self::Total),
            "trading" | "volume" => Ok(Self::Trading),
            "referral" | "referrals" => Ok(Self::Referral),
            _ => Err(AppError::BadRequest(
                "Invalid leaderboard type".to_string(),
            )),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Total => "total",
            Self::Trading => "trading",
            Self::Referral => "referral",
        }
    }
}

fn entry(address: &str, score: f64, is_you: bool, change: i32, label: Option<&str>) -> LeaderboardEntry {
    LeaderboardEntry {
        rank: 0,
        address: address.to_string(),
        score,
        label: label.map(str::to_string),
        is_you,
        change,
    }
}

/// Sorts by score descending and renumbers ranks from 1.
pub fn rank_entries(mut entries: Vec<LeaderboardEntry>) -> Vec<LeaderboardEntry> {
    entries.sort_by(|a, b| b.score.total_cmp(&a.score));
    for (i, entry) in entries.iter_mut().enumerate() {
        entry.rank = i as u32 + 1;
    }
    entries
}

/// Static mock boards.
pub struct Leaderboard {
    total: Vec<LeaderboardEntry>,
    trading: Vec<LeaderboardEntry>,
    referral: Vec<LeaderboardEntry>,
}

impl Default for Leaderboard {
    fn default() -> Self {
        let total = vec![
            entry("0x8f...4e2d", 45_200.0, true, 2, None),
            entry("0xab...c3f1", 42_800.0, false, -1, None),
            entry("0x12...45a9", 39_500.0, false, 1, None),
            entry("0xcd...67b2", 37_100.0, false, 0, None),
            entry("0xef...89c4", 35_900.0, false, -2, None),
            entry("0x23...d1e5", 34_200.0, false, 3, None),
            entry("0x56...f2a7", 32_800.0, false, 0, None),
            entry("0x78...b3c9", 31_500.0, false, -1, None),
        ];
        let trading = vec![
            entry("0xde...7a3c", 2_450_000.0, false, 0, Some("$2.45M")),
            entry("0x8f...4e2d", 1_890_000.0, true, 3, Some("$1.89M")),
            entry("0xab...c3f1", 1_520_000.0, false, -1, Some("$1.52M")),
            entry("0x45...9f2e", 1_180_000.0, false, 2, Some("$1.18M")),
            entry("0x12...45a9", 980_000.0, false, -2, Some("$980K")),
            entry("0xcd...67b2", 750_000.0, false, 1, Some("$750K")),
            entry("0x89...3d1f", 620_000.0, false, 0, Some("$620K")),
            entry("0xef...89c4", 540_000.0, false, -1, Some("$540K")),
        ];
        let referral = vec![
            entry("0x67...8b4a", 156.0, false, 1, Some("156 refs")),
            entry("0xbc...5e9d", 142.0, false, -1, Some("142 refs")),
            entry("0x8f...4e2d", 98.0, true, 5, Some("98 refs")),
            entry("0xab...c3f1", 87.0, false, 0, Some("87 refs")),
            entry("0x23...d1e5", 72.0, false, 2, Some("72 refs")),
            entry("0xf1...2c8e", 65.0, false, -2, Some("65 refs")),
            entry("0x12...45a9", 54.0, false, 1, Some("54 refs")),
            entry("0xcd...67b2", 48.0, false, 0, Some("48 refs")),
        ];
        Self::new(total, trading, referral)
    }
}

impl Leaderboard {
    pub fn new(
        total: Vec<LeaderboardEntry>,
        trading: Vec<LeaderboardEntry>,
        referral: Vec<LeaderboardEntry>,
    ) -> Self {
        Self {
            total: rank_entries(total),
            trading: rank_entries(trading),
            referral: rank_entries(referral),
        }
    }

    pub fn entries(&self, category: LeaderboardCategory) -> &[LeaderboardEntry] {
        match category {
            LeaderboardCategory::Total => &self.total,
            LeaderboardCategory::Trading => &self.trading,
            LeaderboardCategory::Referral => &self.referral,
        }
    }

    pub fn your_entry(&self, category: LeaderboardCategory) -> Option<&LeaderboardEntry> {
        self.entries(category).iter().find(|e| e.is_you)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boards_are_ranked_by_score() {
        let board = Leaderboard::default();
        for category in [
            LeaderboardCategory::Total,
            LeaderboardCategory::Trading,
            LeaderboardCategory::Referral,
        ] {
            let entries = board.entries(category);
            assert!(entries.windows(2).all(|w| w[0].score >= w[1].score));
            assert_eq!(entries[0].rank, 1);
            assert_eq!(entries.last().unwrap().rank as usize, entries.len());
        }
    }

    #[test]
    fn your_entry_per_category() {
        let board = Leaderboard::default();
        assert_eq!(board.your_entry(LeaderboardCategory::Total).unwrap().rank, 1);
        assert_eq!(board.your_entry(LeaderboardCategory::Trading).unwrap().rank, 2);
        assert_eq!(board.your_entry(LeaderboardCategory::Referral).unwrap().rank, 3);
    }

    #[test]
    fn rank_entries_reorders_unsorted_input() {
        let ranked = rank_entries(vec![
            entry("0xa", 1.0, false, 0, None),
            entry("0xb", 3.0, false, 0, None),
            entry("0xc", 2.0, false, 0, None),
        ]);
        let order: Vec<&str> = ranked.iter().map(|e| e.address.as_str()).collect();
        assert_eq!(order, vec!["0xb", "0xc", "0xa"]);
        assert_eq!(ranked[2].rank, 3);
    }

    #[test]
    fn category_parse_accepts_aliases() {
        assert_eq!(LeaderboardCategory::parse("Points").unwrap(), LeaderboardCategory::Total);
        assert_eq!(LeaderboardCategory::parse("volume").unwrap(), LeaderboardCategory::Trading);
        assert!(LeaderboardCategory::parse("weekly").is_err());
    }
}
