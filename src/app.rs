use anyhow::{Context, Result, bail};
use rust_i18n::t;

use crate::audio::{self, AudioSink, LogAudioSink};
use crate::config::Config;
use crate::dataset::{Dataset, LoadReport};
use crate::session::{AnswerOutcome, Question, WordGame};
use crate::store::DatasetCache;
use crate::stories::StoryLibrary;

fn open_cache() -> Option<DatasetCache> {
    match DatasetCache::new() {
        Ok(cache) => Some(cache),
        Err(e) => {
            log::warn!("dataset cache unavailable: {e:#}");
            None
        }
    }
}

/// Loads the dataset the config points at, through the on-disk cache.
pub fn load_dataset(config: &Config) -> Result<(Dataset, LoadReport)> {
    let cache = open_cache();
    let source = config.dataset_source();
    source
        .load(cache.as_ref(), config.cache_max_age())
        .with_context(|| format!("loading dataset from {source}"))
}

pub fn load_stories(config: &Config) -> Result<StoryLibrary> {
    let cache = open_cache();
    let source = config.stories_source();
    StoryLibrary::load(&source, cache.as_ref(), config.cache_max_age())
        .with_context(|| format!("loading stories from {source}"))
}

pub fn feedback(outcome: &AnswerOutcome) -> String {
    if outcome.correct {
        t!("cli.correct").to_string()
    } else {
        t!("cli.incorrect", answer = outcome.explanation.correct_answer.as_str()).to_string()
    }
}

pub fn score_text(score: u8) -> String {
    t!("cli.score", score = score).to_string()
}

pub fn prompt_text() -> String {
    t!("cli.prompt").to_string()
}

pub fn no_words_text() -> String {
    t!("cli.no_words").to_string()
}

/// The terminal front end's state: one game, the question on screen, and
/// where audio goes.
pub struct App<A: AudioSink = LogAudioSink> {
    pub config: Config,
    pub game: WordGame,
    pub current: Option<Question>,
    pub should_quit: bool,
    audio: A,
}

impl App {
    pub fn new(config: Config, seed: Option<u64>) -> Result<Self> {
        let (dataset, report) = load_dataset(&config)?;
        if !report.rejected.is_empty() {
            log::warn!("{} dataset rows rejected", report.rejected.len());
        }
        Ok(Self::with_dataset(config, dataset, seed, LogAudioSink::default()))
    }
}

impl<A: AudioSink> App<A> {
    pub fn with_dataset(config: Config, dataset: Dataset, seed: Option<u64>, audio: A) -> Self {
        let rules = config.game.clone();
        let mut game = match seed {
            Some(seed) => WordGame::with_seed(dataset, rules, config.start_level, seed),
            None => WordGame::new(dataset, rules, config.start_level),
        };
        game.set_part_of_speech(config.part_of_speech.as_deref());
        Self {
            config,
            game,
            current: None,
            should_quit: false,
            audio,
        }
    }

    /// Moves on to the next question. `None` when the level has no words.
    pub fn next_question(&mut self) -> Option<&Question> {
        self.current = self.game.next_question();
        self.flush_audio();
        self.current.as_ref()
    }

    /// Answers the current question with the option at `index` (0-based).
    pub fn answer(&mut self, index: usize) -> Result<AnswerOutcome> {
        let Some(question) = self.current.take() else {
            bail!("no question to answer");
        };
        if index >= question.options.len() {
            let count = question.options.len();
            self.current = Some(question);
            bail!("pick a number between 1 and {count}");
        }
        let outcome = self.game.submit_answer(&question, &question.options[index]);
        self.flush_audio();
        Ok(outcome)
    }

    pub fn toggle_lock(&mut self) -> bool {
        self.game.toggle_lock()
    }

    /// Localised notifications raised since the last call.
    pub fn messages(&mut self) -> Vec<String> {
        self.game
            .take_events()
            .iter()
            .map(|event| event.message())
            .collect()
    }

    fn flush_audio(&mut self) {
        let requests = self.game.take_audio_requests();
        audio::dispatch(&mut self.audio, requests);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AudioError, AudioRequest};
    use crate::dataset::{CefrLevel, WordEntry};

    #[derive(Default)]
    struct RecordingSink {
        requests: Vec<AudioRequest>,
    }

    impl AudioSink for RecordingSink {
        fn play(&mut self, request: &AudioRequest) -> Result<(), AudioError> {
            self.requests.push(request.clone());
            Ok(())
        }
    }

    fn app() -> App<RecordingSink> {
        let dataset = Dataset::new(vec![
            WordEntry::new("hund", "dog", "en", CefrLevel::A1),
            WordEntry::new("katt", "cat", "en", CefrLevel::A1),
            WordEntry::new("bil", "car", "en", CefrLevel::A1),
        ]);
        let mut config = Config::default();
        config.game.cloze_probability = 0.0;
        App::with_dataset(config, dataset, Some(11), RecordingSink::default())
    }

    #[test]
    fn test_answer_by_index() {
        let mut app = app();
        let question = app.next_question().cloned().unwrap();
        let index = question
            .options
            .iter()
            .position(|o| *o == question.correct_option)
            .unwrap();
        assert!(app.answer(index).unwrap().correct);
        assert!(app.answer(0).is_err());
        assert!(app.audio.requests.contains(&AudioRequest::StopAll));
    }

    #[test]
    fn test_out_of_range_keeps_question() {
        let mut app = app();
        app.next_question();
        assert!(app.answer(99).is_err());
        assert!(app.current.is_some());
    }

    #[test]
    fn test_lock_message() {
        let mut app = app();
        app.toggle_lock();
        assert_eq!(app.messages().len(), 1);
        assert!(app.messages().is_empty());
    }
}
