use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// --- CEFR Level ---

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CefrLevel {
    A1,
    A2,
    B1,
    B2,
    C,
}

impl CefrLevel {
    pub fn all() -> &'static [CefrLevel] {
        &[
            CefrLevel::A1,
            CefrLevel::A2,
            CefrLevel::B1,
            CefrLevel::B2,
            CefrLevel::C,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CefrLevel::A1 => "A1",
            CefrLevel::A2 => "A2",
            CefrLevel::B1 => "B1",
            CefrLevel::B2 => "B2",
            CefrLevel::C => "C",
        }
    }

    /// One step up. `None` at C.
    pub fn next(self) -> Option<Self> {
        match self {
            CefrLevel::A1 => Some(CefrLevel::A2),
            CefrLevel::A2 => Some(CefrLevel::B1),
            CefrLevel::B1 => Some(CefrLevel::B2),
            CefrLevel::B2 => Some(CefrLevel::C),
            CefrLevel::C => None,
        }
    }

    /// One step down. `None` at A1.
    pub fn previous(self) -> Option<Self> {
        match self {
            CefrLevel::A1 => None,
            CefrLevel::A2 => Some(CefrLevel::A1),
            CefrLevel::B1 => Some(CefrLevel::A2),
            CefrLevel::B2 => Some(CefrLevel::B1),
            CefrLevel::C => Some(CefrLevel::B2),
        }
    }
}

impl fmt::Display for CefrLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown CEFR level: {0:?}")]
pub struct UnknownLevel(pub String);

impl FromStr for CefrLevel {
    type Err = UnknownLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A1" => Ok(CefrLevel::A1),
            "A2" => Ok(CefrLevel::A2),
            "B1" => Ok(CefrLevel::B1),
            "B2" => Ok(CefrLevel::B2),
            "C" | "C1" | "C2" => Ok(CefrLevel::C),
            _ => Err(UnknownLevel(s.to_string())),
        }
    }
}

// --- Word Class ---

/// Part-of-speech tags that are never turned into cloze questions and never
/// offered as cloze distractors.
pub const BANNED_CLOZE_CLASSES: &[&str] = &["numeral", "pronoun", "possessive", "determiner"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NounGender {
    Masculine,
    Feminine,
    Neuter,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WordClass {
    Noun(Option<NounGender>),
    Verb,
    Adjective,
    Expression,
    Banned,
    Other,
}

impl WordClass {
    pub fn from_tag(tag: &str) -> Self {
        let tag = tag.trim().to_lowercase();
        if BANNED_CLOZE_CLASSES.iter().any(|b| tag.starts_with(b)) {
            return WordClass::Banned;
        }
        if tag.starts_with("en") {
            WordClass::Noun(Some(NounGender::Masculine))
        } else if tag.starts_with("ei") {
            WordClass::Noun(Some(NounGender::Feminine))
        } else if tag.starts_with("et") {
            WordClass::Noun(Some(NounGender::Neuter))
        } else if tag.starts_with("noun") || tag.starts_with("substantiv") {
            WordClass::Noun(None)
        } else if tag.starts_with("verb") {
            WordClass::Verb
        } else if tag.starts_with("adjective") {
            WordClass::Adjective
        } else if tag.starts_with("expression") || tag.starts_with("interjection") {
            WordClass::Expression
        } else {
            WordClass::Other
        }
    }

    pub fn is_noun(self) -> bool {
        matches!(self, WordClass::Noun(_))
    }
}

// --- Word Entry ---

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WordEntry {
    pub headword: String,
    pub translation: String,
    pub part_of_speech: String,
    pub cefr: Option<CefrLevel>,
    #[serde(default)]
    pub pronunciation: Option<String>,
    #[serde(default)]
    pub example: Option<String>,
    #[serde(default)]
    pub sentence_translation: Option<String>,
    #[serde(default)]
    pub definition: Option<String>,
    #[serde(default)]
    pub etymology: Option<String>,
    #[serde(default)]
    pub has_audio: bool,
}

/// First comma-separated segment, trimmed. This is the form shown to the user
/// and the form answers are compared on.
pub fn displayed_form(value: &str) -> &str {
    value.split(',').next().unwrap_or("").trim()
}

impl WordEntry {
    pub fn new(headword: &str, translation: &str, part_of_speech: &str, cefr: CefrLevel) -> Self {
        Self {
            headword: headword.to_string(),
            translation: translation.to_string(),
            part_of_speech: part_of_speech.to_string(),
            cefr: Some(cefr),
            pronunciation: None,
            example: None,
            sentence_translation: None,
            definition: None,
            etymology: None,
            has_audio: false,
        }
    }

    pub fn with_example(mut self, example: &str, translation: &str) -> Self {
        self.example = Some(example.to_string());
        if !translation.is_empty() {
            self.sentence_translation = Some(translation.to_string());
        }
        self
    }

    pub fn displayed_headword(&self) -> &str {
        displayed_form(&self.headword)
    }

    pub fn displayed_translation(&self) -> &str {
        displayed_form(&self.translation)
    }

    /// Lower-cased canonical headword used for matching inside sentences.
    pub fn base_form(&self) -> String {
        self.displayed_headword().to_lowercase()
    }

    pub fn word_class(&self) -> WordClass {
        WordClass::from_tag(&self.part_of_speech)
    }

    pub fn is_banned_for_cloze(&self) -> bool {
        self.word_class() == WordClass::Banned
    }

    /// Entries whose headword and translation display identically teach nothing.
    pub fn is_noop_translation(&self) -> bool {
        self.displayed_headword().to_lowercase() == self.displayed_translation().to_lowercase()
    }

    /// Matches the part-of-speech filter exposed to the user. "noun" covers the
    /// gendered tags en/et/ei.
    pub fn matches_pos_filter(&self, filter: &str) -> bool {
        let filter = filter.trim().to_lowercase();
        if filter.is_empty() {
            return true;
        }
        if filter == "noun" {
            return self.word_class().is_noun();
        }
        self.part_of_speech.to_lowercase().starts_with(&filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_steps_saturate() {
        assert_eq!(CefrLevel::A1.previous(), None);
        assert_eq!(CefrLevel::C.next(), None);
        assert_eq!(CefrLevel::B1.next(), Some(CefrLevel::B2));
        assert_eq!(CefrLevel::B1.previous(), Some(CefrLevel::A2));
    }

    #[test]
    fn test_level_parse() {
        assert_eq!("a2".parse::<CefrLevel>().unwrap(), CefrLevel::A2);
        assert_eq!(" C1 ".parse::<CefrLevel>().unwrap(), CefrLevel::C);
        assert!("D".parse::<CefrLevel>().is_err());
    }

    #[test]
    fn test_displayed_form_takes_first_segment() {
        assert_eq!(displayed_form("dog, hound"), "dog");
        assert_eq!(displayed_form("  katt "), "katt");
        assert_eq!(displayed_form(""), "");
    }

    #[test]
    fn test_word_class_from_tag() {
        assert_eq!(
            WordClass::from_tag("en"),
            WordClass::Noun(Some(NounGender::Masculine))
        );
        assert_eq!(
            WordClass::from_tag("et"),
            WordClass::Noun(Some(NounGender::Neuter))
        );
        assert_eq!(WordClass::from_tag("Verb"), WordClass::Verb);
        assert_eq!(WordClass::from_tag("expression"), WordClass::Expression);
        assert_eq!(WordClass::from_tag("pronoun"), WordClass::Banned);
        assert_eq!(WordClass::from_tag("determiner"), WordClass::Banned);
        assert_eq!(WordClass::from_tag("adverb"), WordClass::Other);
    }

    #[test]
    fn test_noop_translation() {
        let entry = WordEntry::new("pizza", "Pizza", "en", CefrLevel::A1);
        assert!(entry.is_noop_translation());
        let entry = WordEntry::new("hund", "dog", "en", CefrLevel::A1);
        assert!(!entry.is_noop_translation());
    }

    #[test]
    fn test_pos_filter_noun_covers_genders() {
        let en = WordEntry::new("hund", "dog", "en", CefrLevel::A1);
        let et = WordEntry::new("hus", "house", "et", CefrLevel::A1);
        let verb = WordEntry::new("spise", "eat", "verb", CefrLevel::A1);
        assert!(en.matches_pos_filter("noun"));
        assert!(et.matches_pos_filter("noun"));
        assert!(!verb.matches_pos_filter("noun"));
        assert!(verb.matches_pos_filter("verb"));
        assert!(verb.matches_pos_filter(""));
    }
}
