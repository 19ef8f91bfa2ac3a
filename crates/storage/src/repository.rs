use async_trait::async_trait;
use quiz_core::model::{
    BankError, Category, Difficulty, Question, QuestionBank, QuestionError, QuestionSource,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced by question bank sources.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("question record #{index} is malformed: {source}")]
    MalformedRecord {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid question {id}: {source}")]
    InvalidQuestion {
        id: String,
        #[source]
        source: QuestionError,
    },

    #[error(transparent)]
    InvalidBank(#[from] BankError),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

/// Question ids in hand-written banks are sometimes numbers, sometimes strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(u64),
    Text(String),
}

impl RecordId {
    #[must_use]
    pub fn into_string(self) -> String {
        match self {
            RecordId::Number(n) => n.to_string(),
            RecordId::Text(s) => s,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRecord {
    pub title: String,
    pub url: String,
}

/// Persisted shape of a question.
///
/// Mirrors the domain `Question` in its JSON form (`correctAnswer` and friends)
/// so the domain layer stays free of serialization concerns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    pub id: RecordId,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
}

impl QuestionRecord {
    /// Convert the record into a validated domain `Question`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if any field fails domain validation.
    pub fn into_question(self) -> Result<Question, QuestionError> {
        let mut question = Question::new(
            self.id.into_string(),
            self.question,
            self.options,
            self.correct_answer,
        )?;
        if let Some(explanation) = self.explanation {
            question = question.with_explanation(explanation);
        }
        if let Some(source) = self.source {
            question = question.with_source(QuestionSource::new(source.title, &source.url)?);
        }
        if let Some(category) = self.category {
            question = question.with_category(category);
        }
        if let Some(difficulty) = self.difficulty {
            question = question.with_difficulty(difficulty);
        }
        Ok(question)
    }
}

/// Validate a batch of records into a bank.
///
/// # Errors
///
/// Returns `StorageError::InvalidQuestion` for the first bad record, or
/// `StorageError::InvalidBank` if the bank itself is unusable.
pub fn bank_from_records(
    records: impl IntoIterator<Item = QuestionRecord>,
) -> Result<QuestionBank, StorageError> {
    let questions = records
        .into_iter()
        .map(|record| {
            let id = record.id.clone().into_string();
            record
                .into_question()
                .map_err(|source| StorageError::InvalidQuestion { id, source })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(QuestionBank::new(questions)?)
}

/// Source of the question pool a quiz samples from.
#[async_trait]
pub trait QuestionBankRepository: Send + Sync {
    /// Load and validate the full bank.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the bank cannot be read or fails validation.
    async fn load_bank(&self) -> Result<QuestionBank, StorageError>;
}

/// Simple in-memory bank for tests and embedding.
#[derive(Clone, Debug)]
pub struct InMemoryQuestionBank {
    bank: QuestionBank,
}

impl InMemoryQuestionBank {
    #[must_use]
    pub fn new(bank: QuestionBank) -> Self {
        Self { bank }
    }

    /// # Errors
    ///
    /// Returns `StorageError` if any record is invalid.
    pub fn from_records(
        records: impl IntoIterator<Item = QuestionRecord>,
    ) -> Result<Self, StorageError> {
        Ok(Self::new(bank_from_records(records)?))
    }
}

#[async_trait]
impl QuestionBankRepository for InMemoryQuestionBank {
    async fn load_bank(&self) -> Result<QuestionBank, StorageError> {
        Ok(self.bank.clone())
    }
}
