use crate::model::question::Question;

/// One entry in the answer history of a play-through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Answer {
    /// The player confirmed this option.
    Selected(usize),
    /// The question timed out and the player chose to skip it.
    Skipped,
}

impl Answer {
    /// Skipped answers are never correct.
    #[must_use]
    pub fn is_correct_for(self, question: &Question) -> bool {
        match self {
            Answer::Selected(index) => question.is_correct(index),
            Answer::Skipped => false,
        }
    }

    #[must_use]
    pub fn selected(self) -> Option<usize> {
        match self {
            Answer::Selected(index) => Some(index),
            Answer::Skipped => None,
        }
    }

    #[must_use]
    pub fn is_skipped(self) -> bool {
        matches!(self, Answer::Skipped)
    }
}

/// Count answers matching their question's correct option.
///
/// Answers are paired with questions by position; extra questions without an
/// answer yet contribute nothing.
#[must_use]
pub fn count_correct(questions: &[Question], answers: &[Answer]) -> usize {
    questions
        .iter()
        .zip(answers)
        .filter(|(question, answer)| answer.is_correct_for(question))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(correct: usize) -> Question {
        let options = vec!["a".into(), "b".into(), "c".into()];
        Question::new(format!("q{correct}"), "Pick one", options, correct).unwrap()
    }

    #[test]
    fn skipped_and_wrong_answers_score_the_same() {
        let questions = vec![question(0), question(1), question(2)];
        let answers = [Answer::Selected(0), Answer::Skipped, Answer::Selected(0)];

        assert_eq!(count_correct(&questions, &answers), 1);
        assert!(!Answer::Skipped.is_correct_for(&questions[1]));
        assert!(!Answer::Selected(0).is_correct_for(&questions[1]));
    }

    #[test]
    fn partial_history_counts_only_answered() {
        let questions = vec![question(1), question(1)];
        assert_eq!(count_correct(&questions, &[Answer::Selected(1)]), 1);
        assert_eq!(count_correct(&questions, &[]), 0);
    }
}
