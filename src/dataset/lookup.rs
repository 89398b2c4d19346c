use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

use crate::dataset::entry::WordEntry;
use crate::dataset::loader::Dataset;

fn is_exact(entry: &WordEntry, query: &str) -> bool {
    entry.headword.to_lowercase() == query
        || entry.translation.to_lowercase() == query
        || entry.displayed_headword().to_lowercase() == query
        || entry.displayed_translation().to_lowercase() == query
}

/// Case-insensitive substring search over headwords and translations.
/// Exact matches come first; otherwise dataset order is kept.
pub fn search<'a>(dataset: &'a Dataset, query: &str) -> Vec<&'a WordEntry> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }

    let mut matches: Vec<&WordEntry> = dataset
        .iter()
        .filter(|e| {
            e.headword.to_lowercase().contains(&query)
                || e.translation.to_lowercase().contains(&query)
        })
        .collect();

    // stable sort keeps dataset order within each group
    matches.sort_by_key(|e| if is_exact(e, &query) { 0 } else { 1 });
    matches
}

pub fn random_entry<'a>(dataset: &'a Dataset, rng: &mut SmallRng) -> Option<&'a WordEntry> {
    dataset.entries().choose(rng)
}
