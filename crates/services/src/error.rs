//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{BankError, QuestionError, SettingsError};
use quiz_core::session::QuizError;
use storage::repository::StorageError;

/// Errors emitted by `ScoreSubmitter` implementations.
///
/// These never reach the player: the runner logs them and moves on.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SubmissionError {
    #[error("score endpoint returned status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("score submission rejected: {0}")]
    Rejected(String),
}

/// Errors emitted by `LeaderboardClient` reads.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LeaderboardError {
    #[error("leaderboard endpoint returned status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("leaderboard request failed: {0}")]
    Rejected(String),
}

/// Errors emitted while reading configuration from the environment.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("{var} must be a positive number, got {raw:?}")]
    InvalidNumber { var: &'static str, raw: String },
    #[error("invalid {var}: {source}")]
    InvalidTag {
        var: &'static str,
        #[source]
        source: QuestionError,
    },
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

/// Errors emitted while assembling or running a quiz.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Bank(#[from] BankError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Quiz(#[from] QuizError),
}
