use crate::dataset::WordClass;

/// Turns a base form into the inflected form a sentence used, and recognises
/// inflected forms of a base inside sentences.
pub trait InflectionStrategy {
    /// Inflects `base` the way `clozed_form` is inflected. Returns `base`
    /// unchanged when no rule applies.
    fn inflect(&self, base: &str, clozed_form: &str, part_of_speech: &str) -> String;

    fn matches_inflected_form(&self, base: &str, token: &str) -> bool;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InflectionCategory {
    Adjective,
    Verb,
    Noun,
}

impl InflectionCategory {
    pub fn from_tag(part_of_speech: &str) -> Option<Self> {
        match WordClass::from_tag(part_of_speech) {
            WordClass::Adjective => Some(InflectionCategory::Adjective),
            WordClass::Verb => Some(InflectionCategory::Verb),
            WordClass::Noun(_) => Some(InflectionCategory::Noun),
            _ => None,
        }
    }

    fn rules(self) -> &'static [SuffixRule] {
        match self {
            InflectionCategory::Adjective => ADJECTIVE_RULES,
            InflectionCategory::Verb => VERB_RULES,
            InflectionCategory::Noun => NOUN_RULES,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transform {
    /// `base + suffix`
    Append,
    /// Drop a final `e` from the base, then append.
    StripFinalE,
    /// Append, sharing the base's final `e` with a suffix that starts with one.
    MergeFinalE,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SuffixRule {
    pub target: &'static str,
    pub transform: Transform,
}

const fn rule(target: &'static str, transform: Transform) -> SuffixRule {
    SuffixRule { target, transform }
}

// Longest target first within each category.
const ADJECTIVE_RULES: &[SuffixRule] = &[
    rule("ere", Transform::StripFinalE), // fin -> finere
    rule("est", Transform::StripFinalE), // fin -> finest
    rule("e", Transform::MergeFinalE),   // stor -> store
    rule("t", Transform::Append),        // stor -> stort
];

const VERB_RULES: &[SuffixRule] = &[
    rule("er", Transform::StripFinalE), // spise -> spiser
    rule("et", Transform::StripFinalE), // snakke -> snakket
    rule("te", Transform::StripFinalE), // spise -> spiste
    rule("r", Transform::StripFinalE),
    rule("t", Transform::StripFinalE),
    rule("s", Transform::StripFinalE),
];

const NOUN_RULES: &[SuffixRule] = &[
    rule("ene", Transform::Append),     // katt -> kattene
    rule("en", Transform::MergeFinalE), // bok -> boken, hage -> hagen
    rule("et", Transform::MergeFinalE), // hus -> huset, eple -> eplet
    rule("er", Transform::MergeFinalE), // hund -> hunder, jente -> jenter
    rule("n", Transform::Append),
    rule("t", Transform::Append),
    rule("a", Transform::Append), // ku -> kua
    rule("r", Transform::Append), // lilje -> liljer
];

fn never_takes_t(lower_base: &str) -> bool {
    lower_base.ends_with("ig") || lower_base.ends_with("sk")
}

impl SuffixRule {
    /// Applies the rule to `base`. Bases ending in "ig" or "sk" never get a
    /// suffix starting with "t".
    pub fn apply(&self, base: &str) -> String {
        let lower = base.to_lowercase();
        let ends_in_e = lower.ends_with('e');
        let (stem, suffix) = match self.transform {
            Transform::Append => (base, self.target),
            Transform::StripFinalE if ends_in_e => (&base[..base.len() - 1], self.target),
            Transform::StripFinalE => (base, self.target),
            Transform::MergeFinalE if ends_in_e && self.target.starts_with('e') => {
                (base, &self.target[1..])
            }
            Transform::MergeFinalE => (base, self.target),
        };
        if suffix.starts_with('t') && never_takes_t(&lower) {
            return base.to_string();
        }
        format!("{stem}{suffix}")
    }
}

/// Suffix table for adjectives, verbs, and nouns. Other classes are left
/// uninflected.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeuristicInflection;

impl HeuristicInflection {
    pub fn rule_for(clozed_form: &str, part_of_speech: &str) -> Option<SuffixRule> {
        let category = InflectionCategory::from_tag(part_of_speech)?;
        let clozed = clozed_form.to_lowercase();
        category
            .rules()
            .iter()
            .find(|r| clozed.ends_with(r.target))
            .copied()
    }
}

impl InflectionStrategy for HeuristicInflection {
    fn inflect(&self, base: &str, clozed_form: &str, part_of_speech: &str) -> String {
        if base.is_empty() || clozed_form.is_empty() {
            return base.to_string();
        }
        let lower_base = base.to_lowercase();
        if clozed_form.to_lowercase().ends_with('t') && never_takes_t(&lower_base) {
            return base.to_string();
        }
        match Self::rule_for(clozed_form, part_of_speech) {
            Some(rule) => rule.apply(base),
            None => base.to_string(),
        }
    }

    fn matches_inflected_form(&self, base: &str, token: &str) -> bool {
        if base.is_empty() || token.is_empty() {
            return false;
        }
        let base = base.to_lowercase();
        let token = token.to_lowercase();
        if token == base || token.starts_with(&base) {
            return true;
        }
        // jente -> jenta
        match base.strip_suffix('e') {
            Some(stem) if stem.chars().count() >= 2 => token.starts_with(stem),
            _ => false,
        }
    }
}

const ENDINGS: &[&str] = &["ene", "en", "a", "te", "et", "er", "e", "t", "r"];

/// The suffix class of a clozed form; distractors must share it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EndingPattern(String);

impl EndingPattern {
    pub fn from_form(form: &str) -> Self {
        let lower = form.to_lowercase();
        let ending = ENDINGS
            .iter()
            .find(|e| lower.ends_with(*e))
            .map(|e| e.to_string())
            .or_else(|| lower.chars().next_back().map(String::from))
            .unwrap_or_default();
        Self(ending)
    }

    pub fn matches(&self, word: &str) -> bool {
        word.to_lowercase().ends_with(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
