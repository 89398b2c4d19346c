pub mod recording;
pub mod scoring;

pub use recording::{RecordingError, score_files};
pub use scoring::similarity_score;

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

use crate::dataset::{CefrLevel, Dataset, WordEntry};

/// Entries with a recorded example sentence, optionally at one level.
pub fn practice_candidates(dataset: &Dataset, level: Option<CefrLevel>) -> Vec<&WordEntry> {
    dataset
        .iter()
        .filter(|e| e.has_audio && e.example.is_some())
        .filter(|e| level.is_none_or(|l| e.cefr == Some(l)))
        .collect()
}

pub fn random_practice<'a>(
    dataset: &'a Dataset,
    level: Option<CefrLevel>,
    rng: &mut SmallRng,
) -> Option<&'a WordEntry> {
    practice_candidates(dataset, level).choose(rng).copied()
}
