pub mod library;
pub mod sentences;

pub use library::{Story, StoryError, StoryFilter, StoryLibrary};
pub use sentences::{SentencePair, pair_sentences};
