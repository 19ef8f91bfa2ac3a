use quiz_core::model::{
    Answer, Category, Difficulty, Question, QuestionId, QuestionSource, QuizOutcome, SessionId,
};
use quiz_core::session::{Phase, QuizProgress, QuizSession};

/// Presentation-agnostic view of the question on screen.
///
/// The correct answer, explanation and source stay hidden until the player's
/// choice has been revealed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    pub id: QuestionId,
    pub prompt: String,
    pub options: Vec<String>,
    pub category: Option<Category>,
    pub difficulty: Option<Difficulty>,

    pub correct_answer: Option<usize>,
    pub explanation: Option<String>,
    pub source: Option<QuestionSource>,
}

impl QuestionView {
    #[must_use]
    pub fn from_question(question: &Question, revealed: bool) -> Self {
        Self {
            id: question.id().clone(),
            prompt: question.prompt().to_owned(),
            options: question.options().to_vec(),
            category: question.category(),
            difficulty: question.difficulty(),
            correct_answer: revealed.then(|| question.correct_answer()),
            explanation: revealed
                .then(|| question.explanation().map(str::to_owned))
                .flatten(),
            source: revealed.then(|| question.source().cloned()).flatten(),
        }
    }
}

/// One line of the end-of-quiz review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerReview {
    pub prompt: String,
    pub answer: Answer,
    /// Text of the option the player confirmed; `None` when skipped.
    pub your_option: Option<String>,
    pub correct_option: String,
    pub is_correct: bool,
    pub explanation: Option<String>,
}

impl AnswerReview {
    #[must_use]
    pub fn new(question: &Question, answer: Answer) -> Self {
        let options = question.options();
        Self {
            prompt: question.prompt().to_owned(),
            answer,
            your_option: answer
                .selected()
                .and_then(|index| options.get(index))
                .cloned(),
            correct_option: options[question.correct_answer()].clone(),
            is_correct: answer.is_correct_for(question),
            explanation: question.explanation().map(str::to_owned),
        }
    }

    #[must_use]
    pub fn is_skipped(&self) -> bool {
        self.answer.is_skipped()
    }
}

/// Everything a host needs to draw one frame of the quiz.
///
/// No pre-formatted strings; hosts decide how to present time and scores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSnapshot {
    pub session_id: SessionId,
    pub phase: Phase,
    pub question: Option<QuestionView>,
    pub selected: Option<usize>,
    pub revealed: bool,
    pub time_remaining: u32,
    pub score: usize,
    pub total: usize,
    pub progress: Option<QuizProgress>,
    pub outcome: Option<QuizOutcome>,
    pub player_name: Option<String>,
    /// Filled once the quiz is finished, in play order.
    pub review: Vec<AnswerReview>,
}

impl QuizSnapshot {
    #[must_use]
    pub fn from_session(session: &QuizSession) -> Self {
        Self {
            session_id: session.id(),
            phase: session.phase(),
            question: session
                .current_question()
                .map(|q| QuestionView::from_question(q, session.is_revealed())),
            selected: session.selected_answer(),
            revealed: session.is_revealed(),
            time_remaining: session.time_remaining(),
            score: session.score(),
            total: session.total(),
            progress: session.progress(),
            outcome: session.outcome(),
            player_name: session.player_name().map(str::to_owned),
            review: Self::review(session),
        }
    }

    fn review(session: &QuizSession) -> Vec<AnswerReview> {
        if session.outcome().is_none() {
            return Vec::new();
        }
        session
            .questions()
            .iter()
            .zip(session.answers())
            .map(|(question, answer)| AnswerReview::new(question, *answer))
            .collect()
    }

    /// Whether the current selection matches the revealed answer.
    #[must_use]
    pub fn selection_is_correct(&self) -> Option<bool> {
        let question = self.question.as_ref()?;
        let correct = question.correct_answer?;
        self.selected.map(|selected| selected == correct)
    }
}
