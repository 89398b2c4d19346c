use std::fmt;

/// Short feedback sounds shipped with the site.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Chime {
    Good,
    Bad,
    /// Played when a missed word comes back.
    Pop,
}

impl Chime {
    pub fn path(self) -> &'static str {
        match self {
            Chime::Good => "Resources/Audio/goodChime.wav",
            Chime::Bad => "Resources/Audio/badChime.wav",
            Chime::Pop => "Resources/Audio/popChime.wav",
        }
    }
}

/// Fire-and-forget playback requests. The game never waits on them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AudioRequest {
    /// A new question supersedes whatever is still playing.
    StopAll,
    Chime(Chime),
    /// Displayed headword of the word to pronounce.
    Word(String),
    /// Example sentence text.
    Sentence(String),
}

impl fmt::Display for AudioRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioRequest::StopAll => write!(f, "stop all"),
            AudioRequest::Chime(chime) => write!(f, "chime {}", chime.path()),
            AudioRequest::Word(word) => write!(f, "word {}", word_audio_path(word)),
            AudioRequest::Sentence(sentence) => {
                write!(f, "sentence {}", sentence_audio_path(sentence))
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("audio file not found: {0}")]
    NotFound(String),
    #[error("audio playback failed: {0}")]
    Playback(String),
}

pub trait AudioSink {
    fn play(&mut self, request: &AudioRequest) -> Result<(), AudioError>;
}

/// Plays every request in order. Failures are logged and never reach the game.
pub fn dispatch<A: AudioSink + ?Sized>(sink: &mut A, requests: impl IntoIterator<Item = AudioRequest>) {
    for request in requests {
        if let Err(e) = sink.play(&request) {
            log::warn!("{request}: {e}");
        }
    }
}

pub fn sentence_audio_path(sentence: &str) -> String {
    let trimmed = sentence.trim();
    let name = trimmed.strip_suffix('?').unwrap_or(trimmed);
    format!("/Resources/Sentences/{name}.m4a")
}

pub fn word_audio_path(headword: &str) -> String {
    format!("/Resources/Words/{}.m4a", headword.trim())
}

/// Terminal front end: there is no speaker, so requests are only logged.
#[derive(Debug, Default)]
pub struct LogAudioSink {
    pub played: usize,
}

impl AudioSink for LogAudioSink {
    fn play(&mut self, request: &AudioRequest) -> Result<(), AudioError> {
        log::debug!("audio: {request}");
        self.played += 1;
        Ok(())
    }
}
