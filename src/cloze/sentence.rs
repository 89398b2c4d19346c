use icu_normalizer::ComposingNormalizerBorrowed;

/// A word-like span of a sentence. `start..end` are byte offsets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
}

/// Canonical composition so "å" typed as a + ring matches the precomposed form.
pub fn nfc(text: &str) -> String {
    ComposingNormalizerBorrowed::new_nfc()
        .normalize(text)
        .to_string()
}

fn ends_with_abbreviation(prefix: &str, abbreviations: &[String]) -> bool {
    let lower = prefix.to_lowercase();
    abbreviations.iter().any(|abbr| {
        let abbr = abbr.to_lowercase();
        if abbr.is_empty() || !lower.ends_with(&abbr) {
            return false;
        }
        lower[..lower.len() - abbr.len()]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric())
    })
}

/// Splits after `.`, `!` or `?` followed by whitespace, unless the text up to
/// the mark ends with one of `abbreviations`.
pub fn split_sentences<'a>(text: &'a str, abbreviations: &[String]) -> Vec<&'a str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        let end = i + c.len_utf8();
        let followed_by_space = chars.peek().is_some_and(|&(_, next)| next.is_whitespace());
        if !followed_by_space || ends_with_abbreviation(&text[start..end], abbreviations) {
            continue;
        }
        let sentence = text[start..end].trim();
        if !sentence.is_empty() {
            sentences.push(sentence);
        }
        start = end;
    }

    let rest = text[start..].trim();
    if !rest.is_empty() {
        sentences.push(rest);
    }
    sentences
}

pub fn first_sentence<'a>(text: &'a str, abbreviations: &[String]) -> Option<&'a str> {
    split_sentences(text, abbreviations).into_iter().next()
}

/// Letter runs, joined across single internal hyphens ("e-post", "Jean-Luc").
pub fn tokenize(sentence: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut current: Option<usize> = None;
    let mut chars = sentence.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if c.is_alphabetic() {
            if current.is_none() {
                current = Some(i);
            }
            continue;
        }
        if let Some(start) = current {
            let hyphen_joins =
                c == '-' && chars.peek().is_some_and(|&(_, next)| next.is_alphabetic());
            if hyphen_joins {
                continue;
            }
            tokens.push(Token {
                text: &sentence[start..i],
                start,
                end: i,
            });
            current = None;
        }
    }
    if let Some(start) = current {
        tokens.push(Token {
            text: &sentence[start..],
            start,
            end: sentence.len(),
        });
    }
    tokens
}
