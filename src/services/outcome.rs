use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeOutcome {
    Success,
    Failure,
}

/// Decides how a simulated settlement ends.
pub trait OutcomeSource: Send + Sync {
    fn roll(&self) -> TradeOutcome;
}

/// Coin flip weighted by `success_rate`.
#[derive(Debug, Clone, Copy)]
pub struct RandomOutcome {
    success_rate: f64,
}

impl RandomOutcome {
    pub fn new(success_rate: f64) -> Self {
        let success_rate = if success_rate.is_finite() {
            success_rate.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self { success_rate }
    }

    pub fn success_rate(&self) -> f64 {
        self.success_rate
    }
}

impl OutcomeSource for RandomOutcome {
    fn roll(&self) -> TradeOutcome {
        if rand::rng().random_bool(self.success_rate) {
            TradeOutcome::Success
        } else {
            TradeOutcome::Failure
        }
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::sync::Mutex;

    pub struct FixedOutcome(pub TradeOutcome);

    impl OutcomeSource for FixedOutcome {
        fn roll(&self) -> TradeOutcome {
            self.0
        }
    }

    /// Replays a fixed script, repeating the last entry.
    pub struct ScriptedOutcome {
        script: Vec<TradeOutcome>,
        cursor: Mutex<usize>,
    }

    impl ScriptedOutcome {
        pub fn new(script: Vec<TradeOutcome>) -> Self {
            Self {
                script,
                cursor: Mutex::new(0),
            }
        }
    }

    impl OutcomeSource for ScriptedOutcome {
        fn roll(&self) -> TradeOutcome {
            let mut cursor = self.cursor.lock().unwrap();
            let idx = (*cursor).min(self.script.len().saturating_sub(1));
            *cursor += 1;
            self.script.get(idx).copied().unwrap_or(TradeOutcome::Failure)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    #[test]
    fn random_outcome_clamps_rate() {
        assert_eq!(RandomOutcome::new(1.7).success_rate(), 1.0);
        assert_eq!(RandomOutcome::new(-0.2).success_rate(), 0.0);
        assert_eq!(RandomOutcome::new(f64::NAN).success_rate(), 0.0);
    }

    #[test]
    fn random_outcome_extremes_are_deterministic() {
        let always = RandomOutcome::new(1.0);
        let never = RandomOutcome::new(0.0);
        for _ in 0..50 {
            assert_eq!(always.roll(), TradeOutcome::Success);
            assert_eq!(never.roll(), TradeOutcome::Failure);
        }
    }

    #[test]
    fn scripted_outcome_repeats_last_entry() {
        let source = ScriptedOutcome::new(vec![TradeOutcome::Failure, TradeOutcome::Success]);
        assert_eq!(source.roll(), TradeOutcome::Failure);
        assert_eq!(source.roll(), TradeOutcome::Success);
        assert_eq!(source.roll(), TradeOutcome::Success);
    }
}
