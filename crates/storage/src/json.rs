use async_trait::async_trait;
use quiz_core::model::QuestionBank;
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::repository::{QuestionBankRepository, QuestionRecord, StorageError, bank_from_records};

/// Parse a bank from JSON text: either a bare array of questions or
/// `{"questions": [...]}`.
///
/// # Errors
///
/// Returns `StorageError::Serialization` for malformed JSON or an unexpected
/// layout, `StorageError::MalformedRecord` naming the first record that does
/// not have the question shape, and validation errors for bad questions or an
/// empty bank.
pub fn parse_bank_json(raw: &str) -> Result<QuestionBank, StorageError> {
    let entries = match serde_json::from_str::<Value>(raw)? {
        Value::Array(entries) => entries,
        Value::Object(mut fields) => match fields.remove("questions") {
            Some(Value::Array(entries)) => entries,
            _ => {
                return Err(StorageError::Serialization(
                    "expected `questions` to be an array".into(),
                ));
            }
        },
        _ => {
            return Err(StorageError::Serialization(
                "expected an array of questions or an object with `questions`".into(),
            ));
        }
    };

    let records = entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            serde_json::from_value::<QuestionRecord>(entry)
                .map_err(|source| StorageError::MalformedRecord { index, source })
        })
        .collect::<Result<Vec<_>, _>>()?;
    bank_from_records(records)
}

/// Question bank read from a JSON file on every load.
#[derive(Clone, Debug)]
pub struct JsonFileQuestionBank {
    path: PathBuf,
}

impl JsonFileQuestionBank {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl QuestionBankRepository for JsonFileQuestionBank {
    async fn load_bank(&self) -> Result<QuestionBank, StorageError> {
        let raw = tokio::fs::read_to_string(&self.path).await?;
        parse_bank_json(&raw)
    }
}
