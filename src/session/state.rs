use std::collections::HashSet;

use crate::config::GameRules;
use crate::dataset::CefrLevel;
use crate::engine::progression::{LevelCounts, Progression, ProgressionDecision};
use crate::engine::review::{ReviewItem, ReviewQueue};
use crate::engine::rolling::RollingWindow;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LevelChange {
    Promoted(CefrLevel),
    Demoted(CefrLevel),
}

/// Read-only snapshot for the presentation layer.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionStats {
    pub level: CefrLevel,
    pub locked: bool,
    pub streak: u32,
    pub best_streak: u32,
    pub rolling_accuracy: Option<f64>,
    pub rolling_len: usize,
    pub level_questions: u32,
    pub level_correct: u32,
    pub total_questions: u32,
    pub total_correct: u32,
    pub review_len: usize,
}

/// Everything the game mutates between questions. Owned by one `WordGame`.
#[derive(Clone, Debug)]
pub struct SessionState {
    pub level: CefrLevel,
    pub locked: bool,
    pub part_of_speech: Option<String>,
    pub streak: u32,
    pub best_streak: u32,
    pub counts: LevelCounts,
    pub rolling: RollingWindow,
    pub review: ReviewQueue,
    /// Displayed headword of the last fresh question.
    pub previous_word: Option<String>,
    pub answered_correctly: HashSet<String>,
    pub questions_since_reintroduction: u32,
    pub total_questions: u32,
    pub total_correct: u32,
}

impl SessionState {
    pub fn new(level: CefrLevel, rules: &GameRules) -> Self {
        Self {
            level,
            locked: false,
            part_of_speech: None,
            streak: 0,
            best_streak: 0,
            counts: LevelCounts::default(),
            rolling: RollingWindow::new(rules.rolling_window),
            review: ReviewQueue::new(),
            previous_word: None,
            answered_correctly: HashSet::new(),
            questions_since_reintroduction: 0,
            total_questions: 0,
            total_correct: 0,
        }
    }

    /// Updates history, streak, and counters. Returns the new streak.
    pub fn record_answer(&mut self, correct: bool) -> u32 {
        self.rolling.push(correct);
        self.counts.record(correct);
        self.total_questions += 1;
        if correct {
            self.total_correct += 1;
            self.streak += 1;
            self.best_streak = self.best_streak.max(self.streak);
        } else {
            self.streak = 0;
        }
        self.streak
    }

    pub fn enqueue_review(&mut self, item: ReviewItem) -> bool {
        self.review.enqueue(item)
    }

    /// Runs one batch evaluation if a batch is complete. Counters reset after
    /// every evaluation, so a batch fires at most once.
    pub fn evaluate_progression(&mut self, rules: &GameRules) -> Option<LevelChange> {
        if !Progression::batch_complete(&self.counts, rules) {
            return None;
        }
        let decision = Progression::evaluate(
            self.level,
            &self.counts,
            self.review.len(),
            self.locked,
            rules,
        );
        self.counts.reset();

        let change = match decision {
            ProgressionDecision::Promote(next) => LevelChange::Promoted(next),
            ProgressionDecision::Demote(previous) => LevelChange::Demoted(previous),
            ProgressionDecision::Stay => return None,
        };

        match change {
            LevelChange::Promoted(next) => {
                log::info!("promoted {} -> {next}", self.level);
                self.level = next;
            }
            LevelChange::Demoted(previous) => {
                log::info!("demoted {} -> {previous}", self.level);
                self.level = previous;
                if rules.clear_queue_on_demotion {
                    self.review.clear();
                }
            }
        }
        self.reset(!rules.preserve_streak_on_level_change);
        Some(change)
    }

    /// User level override: a fresh start at `level`, streak and queue included.
    pub fn set_level(&mut self, level: CefrLevel) {
        self.level = level;
        self.review.clear();
        self.reset(true);
    }

    pub fn toggle_lock(&mut self) -> bool {
        self.locked = !self.locked;
        self.locked
    }

    /// Clears per-level progress. The review queue is left to the caller.
    pub fn reset(&mut self, reset_streak: bool) {
        if reset_streak {
            self.streak = 0;
        }
        self.counts.reset();
        self.rolling.clear();
        self.answered_correctly.clear();
        self.previous_word = None;
        self.questions_since_reintroduction = 0;
    }

    pub fn rolling_accuracy(&self) -> Option<f64> {
        self.rolling.accuracy()
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            level: self.level,
            locked: self.locked,
            streak: self.streak,
            best_streak: self.best_streak,
            rolling_accuracy: self.rolling.accuracy(),
            rolling_len: self.rolling.len(),
            level_questions: self.counts.questions,
            level_correct: self.counts.correct,
            total_questions: self.total_questions,
            total_correct: self.total_correct,
            review_len: self.review.len(),
        }
    }
}
