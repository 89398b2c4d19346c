use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rust_i18n::t;

use crate::audio::{AudioRequest, Chime};
use crate::cloze::distractors::{
    ClozeTarget, cloze_distractors, translation_distractors, unique_by_displayed,
};
use crate::cloze::sentence::first_sentence;
use crate::cloze::synthesis::{
    ClozeDraft, capitalize_first, choose_cloze, lowercase_first, rebuild_cloze, starts_uppercase,
    synthesize_cloze,
};
use crate::cloze::{HeuristicInflection, InflectionStrategy};
use crate::config::GameRules;
use crate::dataset::{CefrLevel, Dataset, WordEntry};
use crate::engine::review::ReviewItem;
use crate::engine::selector::{Selection, select_next};
use crate::session::question::{AnswerOutcome, Explanation, Question, QuestionMode};
use crate::session::state::{LevelChange, SessionState, SessionStats};

/// Notifications for the presentation layer, drained with `take_events`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    LevelUp(CefrLevel),
    LevelDown(CefrLevel),
    StreakMilestone(u32),
    QueueCleared,
    LockToggled(bool),
}

impl GameEvent {
    pub fn message(&self) -> String {
        match self {
            GameEvent::LevelUp(level) => t!("events.level_up", level = level.as_str()).to_string(),
            GameEvent::LevelDown(level) => {
                t!("events.level_down", level = level.as_str()).to_string()
            }
            GameEvent::StreakMilestone(streak) => t!("events.streak", count = streak).to_string(),
            GameEvent::QueueCleared => t!("events.queue_cleared").to_string(),
            GameEvent::LockToggled(true) => t!("events.locked").to_string(),
            GameEvent::LockToggled(false) => t!("events.unlocked").to_string(),
        }
    }
}

/// A cloze that was found in an example, with the translation of that sentence.
struct FoundCloze {
    draft: ClozeDraft,
    sentence_translation: Option<String>,
}

/// One learner's game: picks words, builds questions, grades answers, and
/// moves the level. All mutation happens through `&mut self`.
pub struct WordGame<S: InflectionStrategy = HeuristicInflection> {
    dataset: Dataset,
    rules: GameRules,
    state: SessionState,
    strategy: S,
    rng: SmallRng,
    events: Vec<GameEvent>,
    audio: Vec<AudioRequest>,
}

impl WordGame<HeuristicInflection> {
    pub fn new(dataset: Dataset, rules: GameRules, level: CefrLevel) -> Self {
        Self::with_strategy(
            dataset,
            rules,
            level,
            HeuristicInflection,
            SmallRng::from_entropy(),
        )
    }

    /// Reproducible game: the same seed and answers give the same questions.
    pub fn with_seed(dataset: Dataset, rules: GameRules, level: CefrLevel, seed: u64) -> Self {
        Self::with_strategy(
            dataset,
            rules,
            level,
            HeuristicInflection,
            SmallRng::seed_from_u64(seed),
        )
    }
}

impl<S: InflectionStrategy> WordGame<S> {
    pub fn with_strategy(
        dataset: Dataset,
        mut rules: GameRules,
        level: CefrLevel,
        strategy: S,
        rng: SmallRng,
    ) -> Self {
        rules.normalize();
        let state = SessionState::new(level, &rules);
        Self {
            dataset,
            rules,
            state,
            strategy,
            rng,
            events: Vec::new(),
            audio: Vec::new(),
        }
    }

    /// The next question, or `None` when no word is eligible at the current
    /// level and filter.
    pub fn next_question(&mut self) -> Option<Question> {
        self.audio.push(AudioRequest::StopAll);
        let selection = select_next(&mut self.state, &self.dataset, &self.rules, &mut self.rng)?;
        let is_reintroduced = selection.is_reintroduced();

        let (word, cloze) = match selection {
            Selection::Fresh(word) => {
                let cloze = if choose_cloze(&word, &self.rules, &mut self.rng) {
                    self.find_cloze(&word, None)
                } else {
                    None
                };
                (word, cloze)
            }
            Selection::Reintroduced(item) => {
                self.audio.push(AudioRequest::Chime(Chime::Pop));
                let cloze = match (item.was_cloze, item.clozed_form.as_deref()) {
                    (true, Some(form)) => self.find_cloze(&item.word, Some(form)),
                    _ => None,
                };
                (item.word, cloze)
            }
        };

        let question = match cloze {
            Some(found) => self.cloze_question(word, found, is_reintroduced),
            None => self.flashcard_question(word, is_reintroduced),
        };
        log::debug!(
            "question for {:?}: {} options, cloze {}",
            question.word.headword,
            question.options.len(),
            question.is_cloze()
        );
        Some(question)
    }

    /// Looks for a cloze in the word's example. With `stored_form` the blank
    /// is rebuilt around the form used when the word was first missed.
    fn find_cloze(&self, word: &WordEntry, stored_form: Option<&str>) -> Option<FoundCloze> {
        let Some(source) = self.dataset.example_source(word) else {
            log::debug!("no example sentence for {:?}", word.headword);
            return None;
        };
        let example = source.example.as_deref()?;
        let draft = match stored_form {
            Some(form) => {
                let rebuilt = rebuild_cloze(example, form, &self.rules);
                if rebuilt.is_none() {
                    log::warn!("{form:?} no longer found in {example:?}, showing a flashcard");
                }
                rebuilt
            }
            None => synthesize_cloze(word, example, &self.rules, &self.strategy),
        }?;
        let sentence_translation = source
            .sentence_translation
            .as_deref()
            .and_then(|tr| first_sentence(tr, &self.rules.abbreviations))
            .map(str::to_string);
        Some(FoundCloze {
            draft,
            sentence_translation,
        })
    }

    fn cloze_question(&mut self, word: WordEntry, found: FoundCloze, is_reintroduced: bool) -> Question {
        let clozed_form = found.draft.span.clozed_form.clone();
        let answer = lowercase_first(&clozed_form);
        let target = ClozeTarget {
            headword: word.displayed_headword(),
            clozed_form: &answer,
            level: word.cefr,
            part_of_speech: &word.part_of_speech,
        };
        let wrong = cloze_distractors(
            &self.dataset,
            &target,
            &self.strategy,
            &self.rules,
            &mut self.rng,
        );

        // sentence-initial or proper noun: every option is capitalised alike
        let capitalize = starts_uppercase(&clozed_form);
        let format = |form: &str| {
            if capitalize {
                capitalize_first(form)
            } else {
                lowercase_first(form)
            }
        };
        let correct_option = format(&answer);
        let distractors: Vec<String> = wrong.iter().map(|w| format(w)).collect();

        let mut options = unique_by_displayed(
            std::iter::once(correct_option.clone())
                .chain(distractors.iter().cloned())
                .collect(),
        );
        options.shuffle(&mut self.rng);

        Question {
            word,
            mode: QuestionMode::Cloze {
                sentence_with_blank: found.draft.sentence_with_blank(),
                sentence: found.draft.sentence,
                clozed_form,
                sentence_translation: found.sentence_translation,
                distractors,
            },
            options,
            correct_option,
            is_reintroduced,
        }
    }

    fn flashcard_question(&mut self, word: WordEntry, is_reintroduced: bool) -> Question {
        let distractors = translation_distractors(&self.dataset, &word, &self.rules, &mut self.rng);
        let correct_option = word.translation.clone();
        let mut options = unique_by_displayed(
            std::iter::once(correct_option.clone())
                .chain(distractors)
                .collect(),
        );
        options.shuffle(&mut self.rng);
        self.audio
            .push(AudioRequest::Word(word.displayed_headword().to_string()));

        Question {
            word,
            mode: QuestionMode::Flashcard,
            options,
            correct_option,
            is_reintroduced,
        }
    }

    /// First sentence of the word's example and of its translation.
    fn example_sentence(&self, word: &WordEntry) -> Option<(String, Option<String>)> {
        let source = self.dataset.example_source(word)?;
        let sentence = first_sentence(source.example.as_deref()?, &self.rules.abbreviations)?;
        let translation = source
            .sentence_translation
            .as_deref()
            .and_then(|tr| first_sentence(tr, &self.rules.abbreviations))
            .map(str::to_string);
        Some((sentence.to_string(), translation))
    }

    /// Grades `chosen` against `question` and applies every consequence:
    /// streak, review queue, notifications, and batch progression.
    pub fn submit_answer(&mut self, question: &Question, chosen: &str) -> AnswerOutcome {
        let correct = question.is_correct(chosen);
        let headword = question.word.displayed_headword().to_string();

        let flashcard_sentence = match question.mode {
            QuestionMode::Flashcard => self.example_sentence(&question.word),
            QuestionMode::Cloze { .. } => None,
        };
        let explanation = Explanation::for_question(question, flashcard_sentence);

        self.audio.push(AudioRequest::Chime(if correct {
            Chime::Good
        } else {
            Chime::Bad
        }));
        if let Some(sentence) = &explanation.sentence {
            self.audio.push(AudioRequest::Sentence(sentence.clone()));
        }

        let streak = self.state.record_answer(correct);
        if correct {
            self.state.answered_correctly.insert(headword.clone());
            let resolved = self.state.review.resolve(&headword);
            if streak % self.rules.streak_milestone == 0 {
                self.events.push(GameEvent::StreakMilestone(streak));
            }
            if resolved && self.state.review.is_empty() {
                self.events.push(GameEvent::QueueCleared);
            }
        } else {
            let item = ReviewItem::new(
                question.word.clone(),
                question.is_cloze(),
                question.clozed_form().map(str::to_string),
            );
            self.state.enqueue_review(item);
        }

        match self.state.evaluate_progression(&self.rules) {
            Some(LevelChange::Promoted(level)) => self.events.push(GameEvent::LevelUp(level)),
            Some(LevelChange::Demoted(level)) => self.events.push(GameEvent::LevelDown(level)),
            None => {}
        }

        AnswerOutcome {
            correct,
            explanation,
        }
    }

    pub fn toggle_lock(&mut self) -> bool {
        let locked = self.state.toggle_lock();
        self.events.push(GameEvent::LockToggled(locked));
        locked
    }

    pub fn set_level(&mut self, level: CefrLevel) {
        log::info!("level set to {level}");
        self.state.set_level(level);
    }

    /// `None`, an empty string, or "all" removes the filter.
    pub fn set_part_of_speech(&mut self, filter: Option<&str>) {
        let filter = filter
            .map(|f| f.trim().to_lowercase())
            .filter(|f| !f.is_empty() && f != "all");
        self.state.part_of_speech = filter;
        self.state.previous_word = None;
        self.state.answered_correctly.clear();
    }

    /// Swaps in a freshly loaded dataset. Per-level progress starts over but
    /// the streak and the review queue survive.
    pub fn replace_dataset(&mut self, dataset: Dataset) {
        log::info!("dataset replaced ({} entries)", dataset.len());
        self.dataset = dataset;
        self.state.reset(false);
    }

    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn take_audio_requests(&mut self) -> Vec<AudioRequest> {
        std::mem::take(&mut self.audio)
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn stats(&self) -> SessionStats {
        self.state.stats()
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn rules(&self) -> &GameRules {
        &self.rules
    }
}
