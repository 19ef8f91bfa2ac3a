use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashSet;
use thiserror::Error;

use crate::model::ids::QuestionId;
use crate::model::question::{Category, Difficulty, Question};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BankError {
    #[error("question bank is empty")]
    Empty,

    #[error("duplicate question id: {0}")]
    DuplicateId(QuestionId),
}

/// Read-only, non-empty pool of questions a quiz samples from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// # Errors
    ///
    /// Returns `BankError::Empty` for an empty list and `BankError::DuplicateId`
    /// when two questions share an id.
    pub fn new(questions: Vec<Question>) -> Result<Self, BankError> {
        if questions.is_empty() {
            return Err(BankError::Empty);
        }
        let mut seen = HashSet::with_capacity(questions.len());
        for question in &questions {
            if !seen.insert(question.id()) {
                return Err(BankError::DuplicateId(question.id().clone()));
            }
        }
        Ok(Self { questions })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always false for a constructed bank; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Narrow the bank to questions matching `keep`.
    ///
    /// # Errors
    ///
    /// Returns `BankError::Empty` if nothing matches.
    pub fn filtered(&self, keep: impl Fn(&Question) -> bool) -> Result<Self, BankError> {
        let questions: Vec<Question> = self.questions.iter().filter(|q| keep(q)).cloned().collect();
        Self::new(questions)
    }

    /// # Errors
    ///
    /// Returns `BankError::Empty` if no question has this category.
    pub fn with_category(&self, category: Category) -> Result<Self, BankError> {
        self.filtered(|q| q.category() == Some(category))
    }

    /// # Errors
    ///
    /// Returns `BankError::Empty` if no question has this difficulty.
    pub fn with_difficulty(&self, difficulty: Difficulty) -> Result<Self, BankError> {
        self.filtered(|q| q.difficulty() == Some(difficulty))
    }

    /// Pick up to `count` distinct questions in random order.
    ///
    /// `count` larger than the bank is clamped to the bank size.
    pub fn sample<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<Question> {
        let mut picked = self.questions.clone();
        picked.as_mut_slice().shuffle(rng);
        picked.truncate(count.min(self.questions.len()));
        picked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn question(id: &str) -> Question {
        Question::new(id, format!("Question {id}?"), vec!["a".into(), "b".into()], 0).unwrap()
    }

    fn bank(n: usize) -> QuestionBank {
        QuestionBank::new((0..n).map(|i| question(&format!("q{i}"))).collect()).unwrap()
    }

    #[test]
    fn empty_bank_is_rejected() {
        assert_eq!(QuestionBank::new(Vec::new()).unwrap_err(), BankError::Empty);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = QuestionBank::new(vec![question("a"), question("b"), question("a")]).unwrap_err();
        assert_eq!(err, BankError::DuplicateId(QuestionId::new("a")));
    }

    #[test]
    fn sample_clamps_to_bank_size_without_repeats() {
        let bank = bank(30);
        let mut rng = StdRng::seed_from_u64(7);

        let picked = bank.sample(100, &mut rng);

        assert_eq!(picked.len(), 30);
        let ids: HashSet<_> = picked.iter().map(|q| q.id().clone()).collect();
        assert_eq!(ids.len(), 30);
    }

    #[test]
    fn sample_takes_requested_count() {
        let bank = bank(10);
        let mut rng = StdRng::seed_from_u64(1);
        let picked = bank.sample(4, &mut rng);
        assert_eq!(picked.len(), 4);
        assert!(picked.iter().all(|q| bank.questions().contains(q)));
    }

    #[test]
    fn filters_by_tags() {
        let bank = QuestionBank::new(vec![
            question("a").with_category(Category::Wcag).with_difficulty(Difficulty::Easy),
            question("b").with_category(Category::Basics).with_difficulty(Difficulty::Hard),
            question("c").with_category(Category::Wcag).with_difficulty(Difficulty::Hard),
        ])
        .unwrap();

        assert_eq!(bank.with_category(Category::Wcag).unwrap().len(), 2);
        assert_eq!(bank.with_difficulty(Difficulty::Hard).unwrap().len(), 2);
        assert_eq!(
            bank.with_category(Category::Advanced).unwrap_err(),
            BankError::Empty
        );
    }
}
