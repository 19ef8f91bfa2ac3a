use async_trait::async_trait;
use quiz_core::model::QuestionBank;

use crate::json::parse_bank_json;
use crate::repository::{QuestionBankRepository, StorageError};

const BUILTIN_BANK_JSON: &str = include_str!("../data/accessibility_questions.json");

/// The bundled 30-question web accessibility bank.
///
/// # Errors
///
/// Returns `StorageError` only if the embedded file is corrupt.
pub fn builtin_bank() -> Result<QuestionBank, StorageError> {
    parse_bank_json(BUILTIN_BANK_JSON)
}

/// Repository over the bundled bank.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuiltinQuestionBank;

#[async_trait]
impl QuestionBankRepository for BuiltinQuestionBank {
    async fn load_bank(&self) -> Result<QuestionBank, StorageError> {
        builtin_bank()
    }
}
