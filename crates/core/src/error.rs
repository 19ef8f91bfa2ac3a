use thiserror::Error;

use crate::model::{BankError, QuestionError, SettingsError};
use crate::session::QuizError;

/// Umbrella error for callers that do not care which layer of the domain failed.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Bank(#[from] BankError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Quiz(#[from] QuizError),
}
