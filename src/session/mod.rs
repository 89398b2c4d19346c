pub mod game;
pub mod question;
pub mod state;

pub use game::{GameEvent, WordGame};
pub use question::{AnswerOutcome, Question, QuestionMode};
