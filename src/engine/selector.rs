use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

use crate::config::GameRules;
use crate::dataset::{Dataset, WordEntry};
use crate::engine::review::ReviewItem;
use crate::session::state::SessionState;

#[derive(Clone, Debug, PartialEq)]
pub enum Selection {
    Fresh(WordEntry),
    Reintroduced(ReviewItem),
}

impl Selection {
    pub fn word(&self) -> &WordEntry {
        match self {
            Selection::Fresh(word) => word,
            Selection::Reintroduced(item) => &item.word,
        }
    }

    pub fn is_reintroduced(&self) -> bool {
        matches!(self, Selection::Reintroduced(_))
    }
}

fn is_eligible(entry: &WordEntry, state: &SessionState, rules: &GameRules) -> bool {
    !entry.is_noop_translation()
        && !rules.is_stop_word(&entry.headword)
        && !rules.is_stop_word(entry.displayed_headword())
        && state
            .part_of_speech
            .as_deref()
            .is_none_or(|pos| entry.matches_pos_filter(pos))
}

/// Picks the next word: a due review item if there is one, otherwise a
/// uniform sample from the current level. `None` when nothing is eligible.
pub fn select_next(
    state: &mut SessionState,
    dataset: &Dataset,
    rules: &GameRules,
    rng: &mut SmallRng,
) -> Option<Selection> {
    let spacing_elapsed = state.questions_since_reintroduction >= rules.reintroduce_spacing;
    if let Some(head) = state
        .review
        .due(spacing_elapsed, rules.reintroduce_miss_threshold)
    {
        head.shown = true;
        let item = head.clone();
        state.questions_since_reintroduction = 0;
        state.previous_word = Some(item.word.displayed_headword().to_string());
        log::info!(
            "reintroducing {:?} after {} questions",
            item.word.displayed_headword(),
            item.miss_counter
        );
        return Some(Selection::Reintroduced(item));
    }

    let level_words: Vec<&WordEntry> = dataset
        .at_level(state.level)
        .filter(|e| is_eligible(e, state, rules))
        .collect();
    if level_words.is_empty() {
        log::warn!(
            "no words available at {} (filter {:?})",
            state.level,
            state.part_of_speech
        );
        return None;
    }
    if state.answered_correctly.len() >= level_words.len() {
        log::info!("every {} word answered correctly, starting over", state.level);
        state.answered_correctly.clear();
    }

    let mut candidates = fresh_candidates(&level_words, state);
    if candidates.is_empty() && !state.answered_correctly.is_empty() {
        state.answered_correctly.clear();
        candidates = fresh_candidates(&level_words, state);
    }
    if candidates.is_empty() {
        // a single eligible word may repeat
        candidates = level_words;
    }
    let chosen = (*candidates.choose(rng)?).clone();

    state.review.tick();
    state.questions_since_reintroduction += 1;
    state.previous_word = Some(chosen.displayed_headword().to_string());
    Some(Selection::Fresh(chosen))
}

fn fresh_candidates<'a>(level_words: &[&'a WordEntry], state: &SessionState) -> Vec<&'a WordEntry> {
    level_words
        .iter()
        .copied()
        .filter(|e| {
            let key = e.displayed_headword();
            state.previous_word.as_deref() != Some(key) && !state.answered_correctly.contains(key)
        })
        .collect()
}
