use std::io::Read;

use chrono::Duration;
use serde::Deserialize;

use crate::dataset::source::embedded_file;
use crate::dataset::{CefrLevel, DatasetError, DatasetSource};
use crate::stories::sentences::{SentencePair, pair_sentences};
use crate::store::DatasetCache;

const SAMPLE_FILE: &str = "stories-sample.csv";

#[derive(Debug, thiserror::Error)]
pub enum StoryError {
    #[error(transparent)]
    Source(#[from] DatasetError),
    #[error("malformed story CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("story file contains no usable rows ({rejected} rejected)")]
    Empty { rejected: usize },
}

/// A graded reader text with its English translation.
#[derive(Clone, Debug, PartialEq)]
pub struct Story {
    pub title_norwegian: String,
    pub title_english: String,
    pub genre: String,
    pub cefr: Option<CefrLevel>,
    pub norwegian: String,
    pub english: String,
}

impl Story {
    pub fn sentences(&self) -> Vec<SentencePair> {
        pair_sentences(&self.norwegian, &self.english)
    }
}

#[derive(Debug, Deserialize)]
struct RawStoryRow {
    #[serde(rename = "titleNorwegian", alias = "title_norwegian", alias = "title", default)]
    title_norwegian: String,
    #[serde(rename = "titleEnglish", alias = "title_english", default)]
    title_english: String,
    #[serde(default)]
    genre: String,
    #[serde(rename = "CEFR", alias = "cefr", alias = "level", default)]
    cefr: String,
    #[serde(default)]
    norwegian: String,
    #[serde(default)]
    english: String,
}

impl RawStoryRow {
    fn into_story(self) -> Option<Story> {
        let title_norwegian = self.title_norwegian.trim().to_string();
        let norwegian = self.norwegian.trim().to_string();
        if title_norwegian.is_empty() || norwegian.is_empty() {
            return None;
        }
        let cefr = match self.cefr.trim() {
            "" => None,
            raw => raw
                .parse::<CefrLevel>()
                .inspect_err(|e| log::debug!("{e} for story {title_norwegian:?}"))
                .ok(),
        };
        Some(Story {
            title_norwegian,
            title_english: self.title_english.trim().to_string(),
            genre: self.genre.trim().to_string(),
            cefr,
            norwegian,
            english: self.english.trim().to_string(),
        })
    }
}

/// Genre and level constraints for the story list. Unset fields match all.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StoryFilter {
    pub genre: Option<String>,
    pub level: Option<CefrLevel>,
}

impl StoryFilter {
    pub fn matches(&self, story: &Story) -> bool {
        let genre_match = self
            .genre
            .as_deref()
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .is_none_or(|g| story.genre.trim().to_lowercase() == g.to_lowercase());
        let level_match = self.level.is_none_or(|level| story.cefr == Some(level));
        genre_match && level_match
    }
}

#[derive(Clone, Debug, Default)]
pub struct StoryLibrary {
    stories: Vec<Story>,
}

impl StoryLibrary {
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, StoryError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers = reader.headers()?.clone();

        let mut stories = Vec::new();
        let mut rejected = 0;
        for result in reader.records() {
            let row: Option<RawStoryRow> = match result {
                Ok(record) if record.iter().all(|field| field.is_empty()) => continue,
                Ok(record) => record
                    .deserialize(Some(&headers))
                    .inspect_err(|e| log::debug!("rejecting story row: {e}"))
                    .ok(),
                Err(e) => {
                    log::debug!("rejecting story row: {e}");
                    None
                }
            };
            match row.and_then(RawStoryRow::into_story) {
                Some(story) => stories.push(story),
                None => rejected += 1,
            }
        }

        if stories.is_empty() {
            return Err(StoryError::Empty { rejected });
        }
        log::info!("loaded {} stories ({rejected} rejected)", stories.len());
        Ok(Self { stories })
    }

    pub fn from_csv_str(csv: &str) -> Result<Self, StoryError> {
        Self::from_csv_reader(csv.as_bytes())
    }

    pub fn load_embedded() -> Result<Self, StoryError> {
        let csv = embedded_file(SAMPLE_FILE).ok_or_else(|| {
            DatasetError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "embedded sample stories missing",
            ))
        })?;
        Self::from_csv_str(&csv)
    }

    /// Loads stories with the same cache and fallback rules as the word list.
    pub fn load(
        source: &DatasetSource,
        cache: Option<&DatasetCache>,
        max_age: Duration,
    ) -> Result<Self, StoryError> {
        source.load_csv(cache, max_age, Self::from_csv_str, Self::load_embedded)
    }

    pub fn stories(&self) -> &[Story] {
        &self.stories
    }

    pub fn len(&self) -> usize {
        self.stories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stories.is_empty()
    }

    pub fn filter(&self, filter: &StoryFilter) -> Vec<&Story> {
        self.stories.iter().filter(|s| filter.matches(s)).collect()
    }

    /// Looks a story up by its Norwegian title, falling back to a
    /// case-insensitive match.
    pub fn find(&self, title: &str) -> Option<&Story> {
        let title = title.trim();
        self.stories
            .iter()
            .find(|s| s.title_norwegian == title)
            .or_else(|| {
                let lower = title.to_lowercase();
                self.stories
                    .iter()
                    .find(|s| s.title_norwegian.to_lowercase() == lower)
            })
    }

    /// Distinct genres, lowercased and sorted.
    pub fn genres(&self) -> Vec<String> {
        let mut genres: Vec<String> = self
            .stories
            .iter()
            .map(|s| s.genre.trim().to_lowercase())
            .filter(|g| !g.is_empty())
            .collect();
        genres.sort();
        genres.dedup();
        genres
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = "\
titleNorwegian,titleEnglish,genre,CEFR,norwegian,english
 Katten Pus ,Pus the Cat,Children,A1,Pus er en katt. Hun liker fisk.,Pus is a cat. She likes fish.
Turen,The Hike,Nature,a2,Vi gikk til fjellet. Det regnet.,We walked to the mountain.
Uten tekst,No Text,Drama,B1,,
Drømmen,The Dream,children,B1,Jeg drømte om havet.,I dreamt of the sea.
";

    fn library() -> StoryLibrary {
        StoryLibrary::from_csv_str(SAMPLE).unwrap()
    }

    #[test]
    fn test_parse_trims_and_skips_empty_text() {
        let library = library();
        assert_eq!(library.len(), 3);
        let first = &library.stories()[0];
        assert_eq!(first.title_norwegian, "Katten Pus");
        assert_eq!(first.cefr, Some(CefrLevel::A1));
        assert_eq!(library.stories()[1].cefr, Some(CefrLevel::A2));
    }

    #[test]
    fn test_filter_by_genre_is_case_insensitive() {
        let library = library();
        let filter = StoryFilter {
            genre: Some(" CHILDREN ".to_string()),
            level: None,
        };
        let titles: Vec<&str> = library
            .filter(&filter)
            .iter()
            .map(|s| s.title_norwegian.as_str())
            .collect();
        assert_eq!(titles, vec!["Katten Pus", "Drømmen"]);
    }

    #[test]
    fn test_filter_combines_genre_and_level() {
        let library = library();
        let filter = StoryFilter {
            genre: Some("children".to_string()),
            level: Some(CefrLevel::B1),
        };
        let hits = library.filter(&filter);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title_norwegian, "Drømmen");

        let level_only = StoryFilter {
            genre: Some(String::new()),
            level: Some(CefrLevel::A2),
        };
        assert_eq!(library.filter(&level_only).len(), 1);
        assert_eq!(library.filter(&StoryFilter::default()).len(), 3);
    }

    #[test]
    fn test_find_by_title() {
        let library = library();
        assert_eq!(library.find("Turen").map(|s| s.title_english.as_str()), Some("The Hike"));
        assert!(library.find("turen").is_some());
        assert!(library.find("Ukjent").is_none());
    }

    #[test]
    fn test_story_sentences_pad_missing_english() {
        let library = library();
        let pairs = library.find("Turen").unwrap().sentences();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].english, "We walked to the mountain.");
        assert_eq!(pairs[1].norwegian, "Det regnet.");
        assert!(pairs[1].english.is_empty());
    }

    #[test]
    fn test_genres_are_distinct() {
        assert_eq!(library().genres(), vec!["children", "nature"]);
    }

    #[test]
    fn test_no_usable_rows_is_error() {
        let result = StoryLibrary::from_csv_str("titleNorwegian,norwegian\nTom,\n");
        assert!(matches!(result, Err(StoryError::Empty { rejected: 1 })));
    }

    #[test]
    fn test_embedded_sample_and_file_source() {
        let embedded = StoryLibrary::load(&DatasetSource::Embedded, None, Duration::hours(1)).unwrap();
        assert!(!embedded.is_empty());
        assert!(embedded.stories().iter().all(|s| !s.sentences().is_empty()));

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stories.csv");
        std::fs::write(&path, SAMPLE).unwrap();
        let from_file = StoryLibrary::load(&DatasetSource::File(path), None, Duration::hours(1)).unwrap();
        assert_eq!(from_file.len(), 3);
    }
}
