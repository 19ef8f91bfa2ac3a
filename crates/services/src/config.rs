use std::env;
use std::path::PathBuf;

use quiz_core::model::{
    Category, DEFAULT_ANNOUNCE_AT, DEFAULT_QUESTION_COUNT, DEFAULT_SECONDS_PER_QUESTION,
    Difficulty, QuizSettings,
};

use crate::error::ConfigError;

pub const QUESTION_COUNT_VAR: &str = "QUIZ_QUESTION_COUNT";
pub const SECONDS_PER_QUESTION_VAR: &str = "QUIZ_SECONDS_PER_QUESTION";
pub const SCORES_URL_VAR: &str = "QUIZ_SCORES_URL";
pub const BANK_PATH_VAR: &str = "QUIZ_BANK_PATH";
pub const CATEGORY_VAR: &str = "QUIZ_CATEGORY";
pub const DIFFICULTY_VAR: &str = "QUIZ_DIFFICULTY";

/// Everything needed to assemble a runnable quiz.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizConfig {
    pub question_count: usize,
    pub seconds_per_question: u32,
    /// Base URL of the site hosting `/api/quiz/scores`. `None` disables submission.
    pub scores_url: Option<String>,
    /// JSON bank to load instead of the bundled one.
    pub bank_path: Option<PathBuf>,
    pub category: Option<Category>,
    pub difficulty: Option<Difficulty>,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            question_count: DEFAULT_QUESTION_COUNT,
            seconds_per_question: DEFAULT_SECONDS_PER_QUESTION,
            scores_url: None,
            bank_path: None,
            category: None,
            difficulty: None,
        }
    }
}

impl QuizConfig {
    /// Read `QUIZ_*` variables from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for unparsable numbers or unknown tags.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env`, reading through `lookup` instead of the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for unparsable numbers or unknown tags.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(raw) = value(QUESTION_COUNT_VAR) {
            config.question_count = parse_positive(QUESTION_COUNT_VAR, &raw)?;
        }
        if let Some(raw) = value(SECONDS_PER_QUESTION_VAR) {
            config.seconds_per_question = parse_positive(SECONDS_PER_QUESTION_VAR, &raw)?;
        }
        config.scores_url = value(SCORES_URL_VAR);
        config.bank_path = value(BANK_PATH_VAR).map(PathBuf::from);
        if let Some(raw) = value(CATEGORY_VAR) {
            config.category = Some(raw.parse().map_err(|source| ConfigError::InvalidTag {
                var: CATEGORY_VAR,
                source,
            })?);
        }
        if let Some(raw) = value(DIFFICULTY_VAR) {
            config.difficulty = Some(raw.parse().map_err(|source| ConfigError::InvalidTag {
                var: DIFFICULTY_VAR,
                source,
            })?);
        }

        Ok(config)
    }

    /// Domain settings for this config.
    ///
    /// Announcement thresholds that do not fit a short countdown are dropped
    /// rather than rejected.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Settings` if the counts are invalid.
    pub fn settings(&self) -> Result<QuizSettings, ConfigError> {
        let announce_at = DEFAULT_ANNOUNCE_AT
            .into_iter()
            .filter(|&at| at < self.seconds_per_question);
        Ok(QuizSettings::new(
            self.question_count,
            self.seconds_per_question,
            announce_at,
        )?)
    }
}

/// Parse a strictly positive number for `var`.
///
/// # Errors
///
/// Returns `ConfigError::InvalidNumber` for non-numeric or zero input.
pub fn parse_positive<T>(var: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialEq + Default,
{
    match raw.trim().parse::<T>() {
        Ok(value) if value != T::default() => Ok(value),
        _ => Err(ConfigError::InvalidNumber {
            var,
            raw: raw.to_string(),
        }),
    }
}
