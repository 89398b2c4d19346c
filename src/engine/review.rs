use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::dataset::WordEntry;

/// A missed word waiting to be asked again.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReviewItem {
    pub word: WordEntry,
    pub miss_counter: u32,
    pub was_cloze: bool,
    pub clozed_form: Option<String>,
    pub shown: bool,
}

impl ReviewItem {
    pub fn new(word: WordEntry, was_cloze: bool, clozed_form: Option<String>) -> Self {
        Self {
            word,
            miss_counter: 0,
            was_cloze,
            clozed_form,
            shown: false,
        }
    }

    fn key(&self) -> &str {
        self.word.displayed_headword()
    }
}

/// FIFO of missed words. An item leaves only after it has been shown again
/// and then answered correctly.
#[derive(Clone, Debug, Default)]
pub struct ReviewQueue {
    items: VecDeque<ReviewItem>,
}

impl ReviewQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `item` unless a word with the same displayed headword is
    /// already waiting. Returns whether it was added.
    pub fn enqueue(&mut self, item: ReviewItem) -> bool {
        if self.contains(item.key()) {
            return false;
        }
        log::debug!("queued {:?} for review", item.key());
        self.items.push_back(item);
        true
    }

    pub fn tick(&mut self) {
        for item in &mut self.items {
            item.miss_counter = item.miss_counter.saturating_add(1);
        }
    }

    /// The head item, if enough fresh questions have passed since the last
    /// reintroduction and it has waited at least `threshold` questions.
    pub fn due(&mut self, spacing_elapsed: bool, threshold: u32) -> Option<&mut ReviewItem> {
        if !spacing_elapsed {
            return None;
        }
        self.items
            .front_mut()
            .filter(|item| item.miss_counter >= threshold)
    }

    /// Removes the item for `headword` if it has been shown again.
    pub fn resolve(&mut self, headword: &str) -> bool {
        let key = crate::dataset::entry::displayed_form(headword);
        match self
            .items
            .iter()
            .position(|item| item.key() == key && item.shown)
        {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, headword: &str) -> bool {
        let key = crate::dataset::entry::displayed_form(headword);
        self.items.iter().any(|item| item.key() == key)
    }

    pub fn front(&self) -> Option<&ReviewItem> {
        self.items.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReviewItem> {
        self.items.iter()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
