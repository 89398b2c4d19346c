use serde::{Deserialize, Serialize};

use crate::config::GameRules;
use crate::dataset::CefrLevel;

/// Answers given since the last batch evaluation at the current level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelCounts {
    pub questions: u32,
    pub correct: u32,
}

impl LevelCounts {
    pub fn record(&mut self, correct: bool) {
        self.questions += 1;
        if correct {
            self.correct += 1;
        }
    }

    pub fn accuracy(&self) -> Option<f64> {
        if self.questions == 0 {
            None
        } else {
            Some(self.correct as f64 / self.questions as f64)
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProgressionDecision {
    Promote(CefrLevel),
    Demote(CefrLevel),
    Stay,
}

pub struct Progression;

impl Progression {
    pub fn batch_complete(counts: &LevelCounts, rules: &GameRules) -> bool {
        counts.questions >= rules.batch_size
    }

    /// Decides a level change for one completed batch. Pure: the caller owns
    /// resetting `counts` afterwards.
    pub fn evaluate(
        level: CefrLevel,
        counts: &LevelCounts,
        queue_len: usize,
        locked: bool,
        rules: &GameRules,
    ) -> ProgressionDecision {
        if locked || !Self::batch_complete(counts, rules) {
            return ProgressionDecision::Stay;
        }
        let Some(accuracy) = counts.accuracy() else {
            return ProgressionDecision::Stay;
        };
        let thresholds = rules.thresholds.for_level(level);
        log::debug!(
            "evaluating {level}: accuracy {:.0}% over {} questions, {queue_len} queued",
            accuracy * 100.0,
            counts.questions
        );

        if let Some(up) = thresholds.up
            && accuracy >= up
        {
            if rules.strict_promotion && queue_len > 0 {
                log::info!("promotion from {level} held back by {queue_len} review items");
                return ProgressionDecision::Stay;
            }
            if let Some(next) = level.next() {
                return ProgressionDecision::Promote(next);
            }
        }

        if let Some(down) = thresholds.down
            && accuracy < down
            && let Some(previous) = level.previous()
        {
            return ProgressionDecision::Demote(previous);
        }

        ProgressionDecision::Stay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(correct: u32, questions: u32) -> LevelCounts {
        LevelCounts { questions, correct }
    }

    #[test]
    fn test_perfect_batch_promotes_a1() {
        let rules = GameRules::default();
        assert_eq!(
            Progression::evaluate(CefrLevel::A1, &counts(10, 10), 0, false, &rules),
            ProgressionDecision::Promote(CefrLevel::A2)
        );
    }

    #[test]
    fn test_incomplete_batch_stays() {
        let rules = GameRules::default();
        assert_eq!(
            Progression::evaluate(CefrLevel::A1, &counts(9, 9), 0, false, &rules),
            ProgressionDecision::Stay
        );
    }

    #[test]
    fn test_strict_mode_blocks_promotion_with_queue() {
        let mut rules = GameRules::default();
        assert_eq!(
            Progression::evaluate(CefrLevel::B1, &counts(10, 10), 1, false, &rules),
            ProgressionDecision::Stay
        );
        rules.strict_promotion = false;
        assert_eq!(
            Progression::evaluate(CefrLevel::B1, &counts(10, 10), 1, false, &rules),
            ProgressionDecision::Promote(CefrLevel::B2)
        );
    }

    #[test]
    fn test_demotion_is_one_step_and_floors_at_a1() {
        let rules = GameRules::default();
        for &level in CefrLevel::all() {
            let decision = Progression::evaluate(level, &counts(0, 10), 0, false, &rules);
            match level.previous() {
                Some(previous) if rules.thresholds.for_level(level).down.is_some() => {
                    assert_eq!(decision, ProgressionDecision::Demote(previous));
                }
                _ => assert_eq!(decision, ProgressionDecision::Stay),
            }
        }
    }

    #[test]
    fn test_c_never_promotes() {
        let rules = GameRules::default();
        assert_eq!(
            Progression::evaluate(CefrLevel::C, &counts(10, 10), 0, false, &rules),
            ProgressionDecision::Stay
        );
    }

    #[test]
    fn test_lock_suppresses_everything() {
        let rules = GameRules::default();
        assert_eq!(
            Progression::evaluate(CefrLevel::A1, &counts(10, 10), 0, true, &rules),
            ProgressionDecision::Stay
        );
        assert_eq!(
            Progression::evaluate(CefrLevel::B2, &counts(0, 10), 0, true, &rules),
            ProgressionDecision::Stay
        );
    }

    #[test]
    fn test_between_thresholds_stays() {
        let rules = GameRules::default();
        // A2: up 0.9, down 0.6
        assert_eq!(
            Progression::evaluate(CefrLevel::A2, &counts(7, 10), 0, false, &rules),
            ProgressionDecision::Stay
        );
    }
}
