use rand::Rng;
use rand::rngs::SmallRng;

use crate::cloze::inflection::InflectionStrategy;
use crate::cloze::sentence::{Token, first_sentence, nfc, tokenize};
use crate::config::GameRules;
use crate::dataset::WordEntry;

pub const BLANK: &str = "___";

/// The part of a sentence a cloze question removes. Byte offsets into
/// `ClozeDraft::sentence`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClozeSpan {
    pub start: usize,
    pub end: usize,
    pub clozed_form: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClozeDraft {
    pub sentence: String,
    pub span: ClozeSpan,
}

impl ClozeDraft {
    pub fn sentence_with_blank(&self) -> String {
        blank_sentence(&self.sentence, &self.span)
    }
}

/// Coin flip at `cloze_probability`. Banned word classes always get a
/// flashcard, but the coin is still flipped so the RNG stream does not depend
/// on the word class.
pub fn choose_cloze(word: &WordEntry, rules: &GameRules, rng: &mut SmallRng) -> bool {
    let wants_cloze = rng.gen_bool(rules.cloze_probability);
    wants_cloze && !word.is_banned_for_cloze()
}

pub fn blank_sentence(sentence: &str, span: &ClozeSpan) -> String {
    format!("{}{BLANK}{}", &sentence[..span.start], &sentence[span.end..])
}

fn span_of(sentence: &str, tokens: &[Token<'_>]) -> ClozeSpan {
    let start = tokens[0].start;
    let end = tokens[tokens.len() - 1].end;
    ClozeSpan {
        start,
        end,
        clozed_form: sentence[start..end].to_string(),
    }
}

fn word_count(text: &str) -> usize {
    text.split(|c: char| !c.is_alphabetic())
        .filter(|part| !part.is_empty())
        .count()
        .max(1)
}

/// Finds the inflected form of `base` in `sentence`: token windows up to the
/// base's word count, joined with a space or a hyphen, then a shrinking
/// prefix search.
pub fn locate<S: InflectionStrategy>(
    sentence: &str,
    base: &str,
    strategy: &S,
) -> Option<ClozeSpan> {
    let tokens = tokenize(sentence);
    if tokens.is_empty() || base.is_empty() {
        return None;
    }
    let max_window = word_count(base);

    for start in 0..tokens.len() {
        let last = (start + max_window).min(tokens.len());
        for end in start + 1..=last {
            let window = &tokens[start..end];
            let texts: Vec<&str> = window.iter().map(|t| t.text).collect();
            if strategy.matches_inflected_form(base, &texts.join(" "))
                || strategy.matches_inflected_form(base, &texts.join("-"))
            {
                return Some(span_of(sentence, window));
            }
        }
    }

    prefix_fallback(sentence, &tokens, base)
}

fn prefix_fallback(sentence: &str, tokens: &[Token<'_>], base: &str) -> Option<ClozeSpan> {
    let lowered: Vec<String> = tokens.iter().map(|t| t.text.to_lowercase()).collect();
    let base_words: Vec<&str> = base.split_whitespace().collect();
    let base_chars: Vec<char> = base.chars().collect();

    for len in (3..=base_chars.len()).rev() {
        let prefix: String = base_chars[..len].iter().collect();
        let Some(index) = lowered.iter().position(|t| t.starts_with(&prefix)) else {
            continue;
        };
        // a multi-word base keeps its tail if the sentence continues with it
        let tail_end = index + base_words.len();
        if base_words.len() > 1 && tail_end <= tokens.len() {
            let rest_of_sentence = lowered[index + 1..tail_end].join(" ");
            if rest_of_sentence == base_words[1..].join(" ") {
                return Some(span_of(sentence, &tokens[index..tail_end]));
            }
        }
        return Some(span_of(sentence, &tokens[index..=index]));
    }
    None
}

/// Builds a cloze from the first sentence of `example`. `None` means the
/// caller falls back to a flashcard.
pub fn synthesize_cloze<S: InflectionStrategy>(
    word: &WordEntry,
    example: &str,
    rules: &GameRules,
    strategy: &S,
) -> Option<ClozeDraft> {
    let sentence = nfc(first_sentence(example, &rules.abbreviations)?);
    let base = nfc(&word.base_form());
    match locate(&sentence, &base, strategy) {
        Some(span) => Some(ClozeDraft { sentence, span }),
        None => {
            let tokens: Vec<&str> = tokenize(&sentence).iter().map(|t| t.text).collect();
            log::warn!(
                "cloze fallback for {:?} ({}): no match in {sentence:?}, tokens {tokens:?}",
                word.headword,
                word.part_of_speech
            );
            None
        }
    }
}

/// Rebuilds a cloze around a previously clozed form, for reintroductions.
pub fn rebuild_cloze(example: &str, clozed_form: &str, rules: &GameRules) -> Option<ClozeDraft> {
    let sentence = nfc(first_sentence(example, &rules.abbreviations)?);
    let wanted = nfc(clozed_form).to_lowercase();
    let wanted_words = word_count(&wanted);
    let tokens = tokenize(&sentence);

    for start in 0..tokens.len() {
        let end = (start + wanted_words).min(tokens.len());
        let window = &tokens[start..end];
        let texts: Vec<String> = window.iter().map(|t| t.text.to_lowercase()).collect();
        if texts.join(" ") == wanted || texts.join("-") == wanted {
            let span = span_of(&sentence, window);
            return Some(ClozeDraft { sentence, span });
        }
    }
    None
}

pub fn starts_uppercase(text: &str) -> bool {
    text.chars().next().is_some_and(char::is_uppercase)
}

pub fn lowercase_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloze::inflection::HeuristicInflection;
    use crate::dataset::CefrLevel;
    use rand::SeedableRng;

    fn draft(headword: &str, pos: &str, example: &str) -> Option<ClozeDraft> {
        let word = WordEntry::new(headword, "x", pos, CefrLevel::A1);
        synthesize_cloze(&word, example, &GameRules::default(), &HeuristicInflection)
    }

    #[test]
    fn test_finds_inflected_noun() {
        let d = draft("hund", "en", "Hunden sover på sofaen. Den er trøtt.").unwrap();
        assert_eq!(d.sentence, "Hunden sover på sofaen.");
        assert_eq!(d.span.clozed_form, "Hunden");
        assert_eq!(d.sentence_with_blank(), "___ sover på sofaen.");
    }

    #[test]
    fn test_final_e_stripped_match() {
        let d = draft("jente", "ei", "Jeg så jenta i går.").unwrap();
        assert_eq!(d.span.clozed_form, "jenta");
        assert_eq!(d.sentence_with_blank(), "Jeg så ___ i går.");
    }

    #[test]
    fn test_multi_word_expression() {
        let d = draft("ha det", "expression", "Vi sa ha det og gikk.").unwrap();
        assert_eq!(d.span.clozed_form, "ha det");
        assert_eq!(d.sentence_with_blank(), "Vi sa ___ og gikk.");
    }

    #[test]
    fn test_hyphenated_headword() {
        let d = draft("e-post", "en", "Hun sendte en e-post i dag.").unwrap();
        assert_eq!(d.span.clozed_form, "e-post");
    }

    #[test]
    fn test_prefix_fallback() {
        // "gikk" shares no prefix with "gå" but "skrev" shares "skr" with "skrive"
        let d = draft("skrive", "verb", "Han skrev et brev.").unwrap();
        assert_eq!(d.span.clozed_form, "skrev");
        assert!(draft("gå", "verb", "Vi gikk hjem.").is_none());
    }

    #[test]
    fn test_prefix_fallback_recovers_particle() {
        let d = draft("rydde ut", "verb", "Vi ryddet ut av kjelleren.").unwrap();
        assert_eq!(d.span.clozed_form, "ryddet ut");
    }

    #[test]
    fn test_no_example_falls_back() {
        assert!(draft("hund", "en", "").is_none());
        assert!(draft("hund", "en", "Katten sover.").is_none());
    }

    #[test]
    fn test_synthesis_is_deterministic() {
        let first = draft("bok", "ei", "Jeg leser boka hver kveld.");
        let second = draft("bok", "ei", "Jeg leser boka hver kveld.");
        assert_eq!(first, second);
    }

    #[test]
    fn test_rebuild_from_stored_form() {
        let rules = GameRules::default();
        let d = rebuild_cloze("Vi spiser middag klokka fem.", "spiser", &rules).unwrap();
        assert_eq!(d.sentence_with_blank(), "Vi ___ middag klokka fem.");
        assert!(rebuild_cloze("Vi spiser middag.", "drikker", &rules).is_none());
    }

    #[test]
    fn test_banned_classes_never_cloze() {
        let mut rules = GameRules::default();
        rules.cloze_probability = 1.0;
        let mut rng = SmallRng::seed_from_u64(1);
        let pronoun = WordEntry::new("han", "he", "pronoun", CefrLevel::A1);
        let noun = WordEntry::new("hund", "dog", "en", CefrLevel::A1);
        assert!(!choose_cloze(&pronoun, &rules, &mut rng));
        assert!(choose_cloze(&noun, &rules, &mut rng));
        rules.cloze_probability = 0.0;
        assert!(!choose_cloze(&noun, &rules, &mut rng));
    }

    #[test]
    fn test_case_helpers() {
        assert_eq!(lowercase_first("Hunden"), "hunden");
        assert_eq!(capitalize_first("ærlig"), "Ærlig");
        assert!(starts_uppercase("Øl"));
        assert!(!starts_uppercase("øl"));
        assert_eq!(capitalize_first(""), "");
    }
}
