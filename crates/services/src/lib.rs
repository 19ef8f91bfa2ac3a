#![forbid(unsafe_code)]

pub mod app_services;
pub mod config;
pub mod error;
pub mod leaderboard;
pub mod runner;
pub mod snapshot;
pub mod submission;
pub mod timer;

pub use quiz_core::Clock;

pub use app_services::AppServices;
pub use config::QuizConfig;
pub use error::{ConfigError, LeaderboardError, QuizServiceError, SubmissionError};
pub use leaderboard::{LeaderboardClient, LeaderboardKind, LeaderboardStats, QuizScore};
pub use runner::QuizRunner;
pub use snapshot::{AnswerReview, QuestionView, QuizSnapshot};
pub use submission::{
    DiscardScoreSubmitter, HttpScoreSubmitter, ScoreSubmitter, sanitize_player_name,
};
pub use timer::CountdownTimer;
