use crate::dataset::WordEntry;
use crate::dataset::entry::displayed_form;

#[derive(Clone, Debug, PartialEq)]
pub enum QuestionMode {
    /// Norwegian headword shown, English translation chosen.
    Flashcard,
    /// Example sentence with the word blanked, inflected form chosen.
    Cloze {
        sentence: String,
        sentence_with_blank: String,
        /// The form the sentence actually uses.
        clozed_form: String,
        sentence_translation: Option<String>,
        distractors: Vec<String>,
    },
}

/// A fully formed question, ready for whichever front end shows it.
#[derive(Clone, Debug, PartialEq)]
pub struct Question {
    pub word: WordEntry,
    pub mode: QuestionMode,
    /// Shuffled, one per displayed form, correct option included.
    pub options: Vec<String>,
    pub correct_option: String,
    pub is_reintroduced: bool,
}

impl Question {
    pub fn is_cloze(&self) -> bool {
        matches!(self.mode, QuestionMode::Cloze { .. })
    }

    pub fn prompt(&self) -> &str {
        match &self.mode {
            QuestionMode::Flashcard => self.word.displayed_headword(),
            QuestionMode::Cloze {
                sentence_with_blank,
                ..
            } => sentence_with_blank,
        }
    }

    /// Compares displayed forms, so "dog, hound" and "dog" are the same answer.
    pub fn is_correct(&self, chosen: &str) -> bool {
        displayed_form(chosen).to_lowercase() == displayed_form(&self.correct_option).to_lowercase()
    }

    pub fn clozed_form(&self) -> Option<&str> {
        match &self.mode {
            QuestionMode::Flashcard => None,
            QuestionMode::Cloze { clozed_form, .. } => Some(clozed_form),
        }
    }
}

/// What the learner sees after answering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Explanation {
    pub correct_answer: String,
    /// The example sentence, with the blank filled in for clozes.
    pub sentence: Option<String>,
    pub sentence_translation: Option<String>,
}

impl Explanation {
    pub fn for_question(question: &Question, flashcard_sentence: Option<(String, Option<String>)>) -> Self {
        match &question.mode {
            QuestionMode::Cloze {
                sentence,
                sentence_translation,
                ..
            } => Self {
                correct_answer: question.correct_option.clone(),
                sentence: Some(sentence.clone()),
                sentence_translation: sentence_translation.clone(),
            },
            QuestionMode::Flashcard => {
                let (sentence, sentence_translation) = match flashcard_sentence {
                    Some((sentence, translation)) => (Some(sentence), translation),
                    None => (None, None),
                };
                Self {
                    correct_answer: question.correct_option.clone(),
                    sentence,
                    sentence_translation,
                }
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub explanation: Explanation,
}
