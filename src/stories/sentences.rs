const TERMINATORS: &[char] = &['.', '!', '?'];
const QUOTES: &[char] = &['"', '“', '”'];

/// One line of a story: the Norwegian sentence and its English counterpart,
/// empty when the translation has fewer sentences.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentencePair {
    pub norwegian: String,
    pub english: String,
}

/// Splits at `.`, `!` or `?` (plus one closing quote) followed by whitespace
/// or the end of the text. Trailing text without a terminator is kept as a
/// final sentence.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !TERMINATORS.contains(&c) {
            continue;
        }
        let mut end = i + c.len_utf8();
        if let Some(&(j, quote)) = chars.peek()
            && QUOTES.contains(&quote)
        {
            chars.next();
            end = j + quote.len_utf8();
        }
        if chars.peek().is_none_or(|&(_, next)| next.is_whitespace()) {
            let sentence = text[start..end].trim();
            if !sentence.is_empty() {
                sentences.push(sentence.to_string());
            }
            start = end;
        }
    }

    let rest = text[start..].trim();
    if !rest.is_empty() {
        sentences.push(rest.to_string());
    }
    sentences
}

/// Glues a piece that opens in lowercase onto the sentence before it, which
/// undoes splits after abbreviations and quoted speech.
pub fn merge_fragments(sentences: Vec<String>) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(sentences.len());
    for sentence in sentences {
        let starts_lowercase = sentence.chars().next().is_some_and(char::is_lowercase);
        match merged.last_mut() {
            Some(previous) if starts_lowercase => {
                previous.push(' ');
                previous.push_str(&sentence);
            }
            _ => merged.push(sentence),
        }
    }
    merged
}

pub fn story_sentences(text: &str) -> Vec<String> {
    merge_fragments(split_sentences(text))
}

/// Lines up the two texts sentence by sentence. The Norwegian text decides
/// the length: missing translations are empty and surplus ones are dropped.
pub fn pair_sentences(norwegian: &str, english: &str) -> Vec<SentencePair> {
    let mut english = story_sentences(english).into_iter();
    story_sentences(norwegian)
        .into_iter()
        .map(|norwegian| SentencePair {
            norwegian,
            english: english.next().unwrap_or_default(),
        })
        .collect()
}
