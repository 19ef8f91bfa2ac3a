use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use url::Url;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question id cannot be empty")]
    EmptyId,

    #[error("question text cannot be empty")]
    EmptyPrompt,

    #[error("a question needs at least 2 options, got {len}")]
    TooFewOptions { len: usize },

    #[error("option {index} is empty")]
    EmptyOption { index: usize },

    #[error("correct answer {index} is out of range for {len} options")]
    CorrectAnswerOutOfRange { index: usize, len: usize },

    #[error("source title cannot be empty")]
    EmptySourceTitle,

    #[error("invalid source url {raw:?}: {reason}")]
    InvalidSourceUrl { raw: String, reason: String },

    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("unknown difficulty: {0}")]
    UnknownDifficulty(String),
}

//
// ─── TAGS ──────────────────────────────────────────────────────────────────────
//

/// Topic a question belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Basics,
    Wcag,
    Technical,
    BestPractices,
    Advanced,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Basics,
        Category::Wcag,
        Category::Technical,
        Category::BestPractices,
        Category::Advanced,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Basics => "basics",
            Category::Wcag => "wcag",
            Category::Technical => "technical",
            Category::BestPractices => "best-practices",
            Category::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = QuestionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == needle)
            .ok_or_else(|| QuestionError::UnknownCategory(s.to_string()))
    }
}

/// Rough difficulty rating of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = QuestionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(QuestionError::UnknownDifficulty(s.to_string())),
        }
    }
}

//
// ─── SOURCE ────────────────────────────────────────────────────────────────────
//

/// Reference material backing a question's explanation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionSource {
    title: String,
    url: Url,
}

impl QuestionSource {
    /// # Errors
    ///
    /// Returns `QuestionError::EmptySourceTitle` or `QuestionError::InvalidSourceUrl`.
    pub fn new(title: impl Into<String>, url: &str) -> Result<Self, QuestionError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(QuestionError::EmptySourceTitle);
        }
        let url = Url::parse(url).map_err(|e| QuestionError::InvalidSourceUrl {
            raw: url.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { title, url })
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A multiple-choice question.
///
/// Immutable once built. `correct_answer` always indexes into `options`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    options: Vec<String>,
    correct_answer: usize,
    explanation: Option<String>,
    source: Option<QuestionSource>,
    category: Option<Category>,
    difficulty: Option<Difficulty>,
}

impl Question {
    /// Build a question, validating the option list and the answer index.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the id or prompt is blank, fewer than two options
    /// are given, an option is blank, or `correct_answer` is out of range.
    pub fn new(
        id: impl Into<QuestionId>,
        prompt: impl Into<String>,
        options: Vec<String>,
        correct_answer: usize,
    ) -> Result<Self, QuestionError> {
        let id = id.into();
        if id.as_str().trim().is_empty() {
            return Err(QuestionError::EmptyId);
        }
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if options.len() < 2 {
            return Err(QuestionError::TooFewOptions { len: options.len() });
        }
        if let Some(index) = options.iter().position(|o| o.trim().is_empty()) {
            return Err(QuestionError::EmptyOption { index });
        }
        if correct_answer >= options.len() {
            return Err(QuestionError::CorrectAnswerOutOfRange {
                index: correct_answer,
                len: options.len(),
            });
        }

        Ok(Self {
            id,
            prompt,
            options,
            correct_answer,
            explanation: None,
            source: None,
            category: None,
            difficulty: None,
        })
    }

    #[must_use]
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        let explanation = explanation.into();
        self.explanation = (!explanation.trim().is_empty()).then_some(explanation);
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: QuestionSource) -> Self {
        self.source = Some(source);
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    #[must_use]
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    #[must_use]
    pub fn correct_answer(&self) -> usize {
        self.correct_answer
    }

    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    #[must_use]
    pub fn source(&self) -> Option<&QuestionSource> {
        self.source.as_ref()
    }

    #[must_use]
    pub fn category(&self) -> Option<Category> {
        self.category
    }

    #[must_use]
    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    /// Returns true if `index` is the correct option.
    #[must_use]
    pub fn is_correct(&self, index: usize) -> bool {
        index == self.correct_answer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("option {i}")).collect()
    }

    #[test]
    fn question_requires_two_options() {
        let err = Question::new("q1", "Why?", options(1), 0).unwrap_err();
        assert_eq!(err, QuestionError::TooFewOptions { len: 1 });
    }

    #[test]
    fn question_rejects_out_of_range_answer() {
        let err = Question::new("q1", "Why?", options(4), 4).unwrap_err();
        assert_eq!(err, QuestionError::CorrectAnswerOutOfRange { index: 4, len: 4 });
    }

    #[test]
    fn question_rejects_blank_fields() {
        assert_eq!(
            Question::new(" ", "Why?", options(2), 0).unwrap_err(),
            QuestionError::EmptyId
        );
        assert_eq!(
            Question::new("q1", "", options(2), 0).unwrap_err(),
            QuestionError::EmptyPrompt
        );
        let mut opts = options(3);
        opts[2] = "  ".into();
        assert_eq!(
            Question::new("q1", "Why?", opts, 0).unwrap_err(),
            QuestionError::EmptyOption { index: 2 }
        );
    }

    #[test]
    fn blank_explanation_is_dropped() {
        let q = Question::new("q1", "Why?", options(2), 1)
            .unwrap()
            .with_explanation("   ");
        assert_eq!(q.explanation(), None);
        assert!(q.is_correct(1));
        assert!(!q.is_correct(0));
    }

    #[test]
    fn source_requires_absolute_url() {
        assert!(QuestionSource::new("WAI", "https://www.w3.org/WAI/").is_ok());
        assert!(matches!(
            QuestionSource::new("WAI", "/relative/path"),
            Err(QuestionError::InvalidSourceUrl { .. })
        ));
        assert_eq!(
            QuestionSource::new(" ", "https://www.w3.org/").unwrap_err(),
            QuestionError::EmptySourceTitle
        );
    }

    #[test]
    fn tags_parse_case_insensitively() {
        assert_eq!("Best-Practices".parse::<Category>(), Ok(Category::BestPractices));
        assert_eq!("HARD".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert!(matches!(
            "expert".parse::<Difficulty>(),
            Err(QuestionError::UnknownDifficulty(_))
        ));
    }
}
