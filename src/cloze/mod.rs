pub mod distractors;
pub mod inflection;
pub mod sentence;
pub mod synthesis;

pub use inflection::{HeuristicInflection, InflectionStrategy};
