use std::collections::HashSet;

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

use crate::cloze::inflection::{EndingPattern, InflectionStrategy};
use crate::cloze::synthesis::starts_uppercase;
use crate::config::GameRules;
use crate::dataset::entry::displayed_form;
use crate::dataset::{CefrLevel, Dataset, WordEntry};

/// What the wrong answers for one cloze question must resemble.
#[derive(Clone, Debug)]
pub struct ClozeTarget<'a> {
    /// Displayed headword of the answer word.
    pub headword: &'a str,
    /// The answer as shown in the options, first letter lower-cased.
    pub clozed_form: &'a str,
    pub level: Option<CefrLevel>,
    pub part_of_speech: &'a str,
}

/// Collects options until `limit`, skipping any whose displayed form was
/// already taken or is the correct answer.
struct Picker {
    limit: usize,
    seen: HashSet<String>,
    picked: Vec<String>,
}

impl Picker {
    fn new(limit: usize, correct: &[&str]) -> Self {
        Self {
            limit,
            seen: correct
                .iter()
                .map(|c| displayed_form(c).to_lowercase())
                .collect(),
            picked: Vec::with_capacity(limit),
        }
    }

    fn is_full(&self) -> bool {
        self.picked.len() >= self.limit
    }

    fn offer_all(&mut self, mut options: Vec<String>, rng: &mut SmallRng) {
        options.shuffle(rng);
        for option in options {
            if self.is_full() {
                return;
            }
            let key = displayed_form(&option).to_lowercase();
            if !key.is_empty() && self.seen.insert(key) {
                self.picked.push(option);
            }
        }
    }
}

fn cloze_pool<'a>(dataset: &'a Dataset, base: &'a str) -> impl Iterator<Item = &'a WordEntry> {
    dataset.iter().filter(move |e| {
        let raw = e.displayed_headword().to_lowercase();
        !raw.is_empty() && raw != base && !e.is_banned_for_cloze()
    })
}

fn translation_pool<'a>(
    dataset: &'a Dataset,
    correct: &'a str,
    rules: &'a GameRules,
) -> impl Iterator<Item = &'a WordEntry> {
    let capitalized = starts_uppercase(correct);
    dataset.iter().filter(move |e| {
        e.translation != correct
            && starts_uppercase(&e.translation) == capitalized
            && !rules.is_stop_word(&e.headword)
    })
}

fn starts_with_letter(word: &str) -> bool {
    word.chars().next().is_some_and(char::is_alphabetic)
}

/// Wrong inflected forms for a cloze question, strictest candidates first:
/// 1. same POS prefix and level, short single words, matching ending
/// 2. exact POS at any level, matching ending
/// 3. any POS, matching ending and capitalisation
/// 4. any POS, matching capitalisation
///
/// Never more than `distractor_count`; fewer when the dataset runs dry.
pub fn cloze_distractors<S: InflectionStrategy>(
    dataset: &Dataset,
    target: &ClozeTarget<'_>,
    strategy: &S,
    rules: &GameRules,
    rng: &mut SmallRng,
) -> Vec<String> {
    let base = target.headword.to_lowercase();
    let clozed = target.clozed_form.to_lowercase();
    let uninflected = clozed == base;
    let ending = EndingPattern::from_form(&clozed);
    let pos = target.part_of_speech.to_lowercase();
    let pos_prefix: String = pos.chars().take(2).collect();
    let target_upper = starts_uppercase(target.headword);

    let inflect = |entry: &WordEntry| -> String {
        let raw = entry.displayed_headword().to_lowercase();
        if uninflected {
            raw
        } else {
            strategy.inflect(&raw, &clozed, target.part_of_speech)
        }
    };
    let usable = |form: &str, require_ending: bool| {
        form != clozed && starts_with_letter(form) && (!require_ending || ending.matches(form))
    };
    let pool = || cloze_pool(dataset, &base);

    let mut picker = Picker::new(rules.distractor_count, &[&clozed, &base]);

    let strict: Vec<String> = pool()
        .filter(|e| {
            let raw = e.displayed_headword();
            let len = raw.chars().count();
            !raw.contains(' ')
                && (3..=12).contains(&len)
                && e.part_of_speech.to_lowercase().starts_with(&pos_prefix)
                && e.cefr == target.level
        })
        .map(inflect)
        .filter(|form| usable(form, !uninflected))
        .collect();
    picker.offer_all(strict, rng);

    if !picker.is_full() {
        let any_level: Vec<String> = pool()
            .filter(|e| e.part_of_speech.to_lowercase() == pos)
            .map(inflect)
            .filter(|form| usable(form, !uninflected))
            .collect();
        picker.offer_all(any_level, rng);
    }

    if !picker.is_full() {
        let any_pos: Vec<String> = pool()
            .filter(|e| starts_uppercase(e.displayed_headword()) == target_upper)
            .map(inflect)
            .filter(|form| usable(form, true))
            .collect();
        picker.offer_all(any_pos, rng);
    }

    if !picker.is_full() {
        let case_only: Vec<String> = pool()
            .filter(|e| starts_uppercase(e.displayed_headword()) == target_upper)
            .map(inflect)
            .filter(|form| usable(form, false))
            .collect();
        picker.offer_all(case_only, rng);
    }

    if picker.picked.len() < rules.distractor_count {
        log::debug!(
            "only {} cloze distractors for {:?}",
            picker.picked.len(),
            target.clozed_form
        );
    }
    picker.picked
}

/// Wrong translations for a flashcard: same POS and level, then any level,
/// then any POS. Capitalisation always matches the correct translation.
pub fn translation_distractors(
    dataset: &Dataset,
    word: &WordEntry,
    rules: &GameRules,
    rng: &mut SmallRng,
) -> Vec<String> {
    let correct = word.translation.as_str();
    let pos = word.part_of_speech.as_str();

    let collect = |filter: &dyn Fn(&WordEntry) -> bool| -> Vec<String> {
        translation_pool(dataset, correct, rules)
            .filter(|e| filter(*e))
            .map(|e| e.translation.clone())
            .collect()
    };

    let mut picker = Picker::new(rules.distractor_count, &[correct]);
    picker.offer_all(
        collect(&|e| e.part_of_speech == pos && e.cefr == word.cefr),
        rng,
    );
    if !picker.is_full() {
        picker.offer_all(collect(&|e| e.part_of_speech == pos), rng);
    }
    if !picker.is_full() {
        picker.offer_all(collect(&|_| true), rng);
    }
    picker.picked
}

/// Keeps the first option for each displayed form.
pub fn unique_by_displayed(options: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    options
        .into_iter()
        .filter(|option| seen.insert(displayed_form(option).to_string()))
        .collect()
}
