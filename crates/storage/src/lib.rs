#![forbid(unsafe_code)]

pub mod builtin;
pub mod json;
pub mod repository;

pub use builtin::{BuiltinQuestionBank, builtin_bank};
pub use json::{JsonFileQuestionBank, parse_bank_json};
pub use repository::{InMemoryQuestionBank, QuestionBankRepository, QuestionRecord, StorageError};
