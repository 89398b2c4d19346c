use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::dataset::entry::{CefrLevel, WordEntry};

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("dataset fetch failed: {0}")]
    Fetch(String),
    #[error("dataset contains no usable rows ({rejected} rejected)")]
    Empty { rejected: usize },
}

/// Why a CSV row was kept out of the dataset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RowRejection {
    MissingHeadword,
    MissingTranslation,
    Malformed(String),
}

#[derive(Clone, Debug, Default)]
pub struct LoadReport {
    pub accepted: usize,
    pub rejected: Vec<(u64, RowRejection)>,
    pub unknown_levels: usize,
}

impl LoadReport {
    fn reject(&mut self, line: u64, reason: RowRejection) {
        log::debug!("rejecting dataset row at line {line}: {reason:?}");
        self.rejected.push((line, reason));
    }
}

/// One spreadsheet row as published. Column names follow the site's sheet,
/// with English aliases for hand-made files.
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "ord", alias = "headword", default)]
    headword: String,
    #[serde(rename = "engelsk", alias = "translation", default)]
    translation: String,
    #[serde(rename = "gender", alias = "part_of_speech", alias = "pos", default)]
    part_of_speech: String,
    #[serde(rename = "CEFR", alias = "cefr", alias = "level", default)]
    cefr: Option<String>,
    #[serde(rename = "uttale", alias = "pronunciation", default)]
    pronunciation: Option<String>,
    #[serde(rename = "eksempel", alias = "example", default)]
    example: Option<String>,
    #[serde(rename = "sentenceTranslation", alias = "sentence_translation", default)]
    sentence_translation: Option<String>,
    #[serde(rename = "definisjon", alias = "definition", default)]
    definition: Option<String>,
    #[serde(rename = "etymologi", alias = "etymology", default)]
    etymology: Option<String>,
    #[serde(rename = "hasAudio", alias = "has_audio", default)]
    has_audio: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl RawRow {
    fn into_entry(self, report: &mut LoadReport) -> Result<WordEntry, RowRejection> {
        let headword = self.headword.trim().to_string();
        let translation = self.translation.trim().to_string();
        if headword.is_empty() {
            return Err(RowRejection::MissingHeadword);
        }
        if translation.is_empty() {
            return Err(RowRejection::MissingTranslation);
        }

        let cefr = match non_empty(self.cefr) {
            Some(raw) => match raw.parse::<CefrLevel>() {
                Ok(level) => Some(level),
                Err(e) => {
                    log::debug!("{e} for {headword:?}");
                    report.unknown_levels += 1;
                    None
                }
            },
            None => None,
        };

        let has_audio = non_empty(self.has_audio)
            .map(|v| v.eq_ignore_ascii_case("x") || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Ok(WordEntry {
            headword,
            translation,
            part_of_speech: self.part_of_speech.trim().to_lowercase(),
            cefr,
            pronunciation: non_empty(self.pronunciation),
            example: non_empty(self.example),
            sentence_translation: non_empty(self.sentence_translation),
            definition: non_empty(self.definition),
            etymology: non_empty(self.etymology),
            has_audio,
        })
    }
}

/// The read-only word list the game draws from. Replaced wholesale on reload.
#[derive(Clone, Debug, Default)]
pub struct Dataset {
    entries: Vec<WordEntry>,
}

impl Dataset {
    pub fn new(entries: Vec<WordEntry>) -> Self {
        Self { entries }
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<(Self, LoadReport), DatasetError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers = reader.headers()?.clone();

        let mut report = LoadReport::default();
        let mut entries = Vec::new();

        for result in reader.records() {
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    let line = e.position().map(|p| p.line()).unwrap_or(0);
                    report.reject(line, RowRejection::Malformed(e.to_string()));
                    continue;
                }
            };
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            if record.iter().all(|field| field.is_empty()) {
                continue;
            }

            let raw: RawRow = match record.deserialize(Some(&headers)) {
                Ok(raw) => raw,
                Err(e) => {
                    report.reject(line, RowRejection::Malformed(e.to_string()));
                    continue;
                }
            };
            match raw.into_entry(&mut report) {
                Ok(entry) => entries.push(entry),
                Err(reason) => report.reject(line, reason),
            }
        }

        report.accepted = entries.len();
        if entries.is_empty() {
            return Err(DatasetError::Empty {
                rejected: report.rejected.len(),
            });
        }
        log::info!(
            "loaded {} dataset entries ({} rejected, {} without a known level)",
            report.accepted,
            report.rejected.len(),
            report.unknown_levels
        );
        Ok((Self { entries }, report))
    }

    pub fn from_csv_str(csv: &str) -> Result<(Self, LoadReport), DatasetError> {
        Self::from_csv_reader(csv.as_bytes())
    }

    pub fn from_path(path: &Path) -> Result<(Self, LoadReport), DatasetError> {
        let file = File::open(path)?;
        Self::from_csv_reader(file)
    }

    pub fn entries(&self) -> &[WordEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &WordEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn at_level(&self, level: CefrLevel) -> impl Iterator<Item = &WordEntry> {
        self.entries.iter().filter(move |e| e.cefr == Some(level))
    }

    /// The dataset's own copy of `word`: same headword, tag, and level.
    pub fn find_matching(&self, word: &WordEntry) -> Option<&WordEntry> {
        self.entries.iter().find(|e| {
            e.headword.to_lowercase() == word.headword.to_lowercase()
                && e.part_of_speech == word.part_of_speech
                && e.cefr == word.cefr
        })
    }

    /// Example text for `word`, borrowing another entry's example that opens
    /// with the headword when the word has none of its own.
    pub fn example_source<'a>(&'a self, word: &'a WordEntry) -> Option<&'a WordEntry> {
        let own = self.find_matching(word).unwrap_or(word);
        if own.example.is_some() {
            return Some(own);
        }
        let needle = word.headword.to_lowercase();
        self.entries.iter().find(|e| {
            e.example
                .as_deref()
                .is_some_and(|ex| ex.to_lowercase().starts_with(&needle))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
ord,engelsk,gender,CEFR,uttale,eksempel,sentenceTranslation,hasAudio
hund,\"dog, hound\",en,A1,hʉn,Hunden sover.,The dog sleeps.,X
hus,house,et,a1,,,,
,missing,en,A1,,,,
tom,,adjective,A2,,,,
spise,eat,verb,Z9,,Jeg spiser fisk.,I eat fish.,
";

    #[test]
    fn test_load_accepts_valid_rows_and_rejects_malformed() {
        let (dataset, report) = Dataset::from_csv_str(SAMPLE).unwrap();
        assert_eq!(dataset.len(), 3);
        assert_eq!(report.accepted, 3);
        assert_eq!(report.rejected.len(), 2);
        assert!(
            report
                .rejected
                .iter()
                .any(|(_, r)| *r == RowRejection::MissingHeadword)
        );
        assert!(
            report
                .rejected
                .iter()
                .any(|(_, r)| *r == RowRejection::MissingTranslation)
        );
        assert_eq!(report.unknown_levels, 1);
    }

    #[test]
    fn test_load_normalizes_fields() {
        let (dataset, _) = Dataset::from_csv_str(SAMPLE).unwrap();
        let hund = &dataset.entries()[0];
        assert_eq!(hund.displayed_translation(), "dog");
        assert_eq!(hund.cefr, Some(CefrLevel::A1));
        assert!(hund.has_audio);
        assert_eq!(hund.example.as_deref(), Some("Hunden sover."));

        let hus = &dataset.entries()[1];
        assert_eq!(hus.cefr, Some(CefrLevel::A1));
        assert_eq!(hus.example, None);
        assert!(!hus.has_audio);

        let spise = &dataset.entries()[2];
        assert_eq!(spise.cefr, None);
    }

    #[test]
    fn test_load_english_headers() {
        let csv = "headword,translation,pos,level\nkatt,cat,en,A1\n";
        let (dataset, _) = Dataset::from_csv_str(csv).unwrap();
        assert_eq!(dataset.entries()[0].headword, "katt");
        assert_eq!(dataset.entries()[0].part_of_speech, "en");
    }

    #[test]
    fn test_load_empty_is_error() {
        let csv = "ord,engelsk,gender,CEFR\n,,en,A1\n";
        match Dataset::from_csv_str(csv) {
            Err(DatasetError::Empty { rejected }) => assert_eq!(rejected, 1),
            other => panic!("expected Empty, got {other:?}"),
        }
    }

    #[test]
    fn test_example_source_borrows_from_other_entry() {
        let dataset = Dataset::new(vec![
            WordEntry::new("løpe", "run", "verb", CefrLevel::A1),
            WordEntry::new("løpetur", "run (noun)", "en", CefrLevel::A2)
                .with_example("Løpeturen var lang.", "The run was long."),
        ]);
        let word = dataset.entries()[0].clone();
        let source = dataset.example_source(&word).unwrap();
        assert_eq!(source.headword, "løpetur");
    }
}
