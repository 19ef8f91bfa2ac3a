mod answer;
mod bank;
mod ids;
mod outcome;
mod question;
mod settings;

pub use answer::{Answer, count_correct};
pub use bank::{BankError, QuestionBank};
pub use ids::{QuestionId, SessionId};
pub use outcome::{QuizOutcome, ResultTier, ScoreSubmission, percentage};
pub use question::{Category, Difficulty, Question, QuestionError, QuestionSource};
pub use settings::{
    DEFAULT_ANNOUNCE_AT, DEFAULT_QUESTION_COUNT, DEFAULT_SECONDS_PER_QUESTION, QuizSettings,
    SettingsError,
};
