//! Timed quiz state machine.
//!
//! `QuizSession` is a plain value: every transition takes `&mut self`, returns
//! the effects the host must carry out, and never blocks. Rejected transitions
//! leave the session untouched.

use chrono::{DateTime, Utc};
use rand::Rng;
use std::fmt;
use thiserror::Error;

use crate::Clock;
use crate::model::{
    Answer, Question, QuestionBank, QuizOutcome, QuizSettings, ScoreSubmission, SessionId,
    count_correct,
};

mod countdown;
mod event;

use countdown::Countdown;
pub use event::{Action, Announcement, Effect, Phase, QuizEvent, TimerToken};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("cannot start a quiz without questions")]
    EmptyBank,

    #[error("cannot {action} during the {phase} phase")]
    InvalidTransition { phase: Phase, action: Action },

    #[error("no answer selected")]
    NoSelection,

    #[error("the answer has already been revealed")]
    AlreadyRevealed,

    #[error("option {index} is out of range for {options} options")]
    OptionOutOfRange { index: usize, options: usize },
}

//
// ─── PROGRESS ──────────────────────────────────────────────────────────────────
//

/// Position within an active play-through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizProgress {
    /// 1-based number of the current question.
    pub position: usize,
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One play-through of the quiz, from the intro screen to the results.
pub struct QuizSession {
    id: SessionId,
    settings: QuizSettings,
    clock: Clock,
    phase: Phase,
    questions: Vec<Question>,
    current: usize,
    answers: Vec<Answer>,
    selected: Option<usize>,
    revealed: bool,
    countdown: Countdown,
    player_name: Option<String>,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    /// A session waiting on the intro screen.
    #[must_use]
    pub fn new(settings: QuizSettings, clock: Clock) -> Self {
        let countdown = Countdown::new(settings.seconds_per_question());
        Self {
            id: SessionId::new_v4(),
            settings,
            clock,
            phase: Phase::Intro,
            questions: Vec::new(),
            current: 0,
            answers: Vec::new(),
            selected: None,
            revealed: false,
            countdown,
            player_name: None,
            started_at: None,
            completed_at: None,
        }
    }

    //
    // ─── ACCESSORS ─────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Questions picked for this play-through; empty before the quiz starts.
    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Index of the question on screen while a question is in play.
    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        self.in_question().then_some(self.current)
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.current_index().and_then(|i| self.questions.get(i))
    }

    #[must_use]
    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    #[must_use]
    pub fn selected_answer(&self) -> Option<usize> {
        self.selected
    }

    #[must_use]
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    #[must_use]
    pub fn time_remaining(&self) -> u32 {
        self.countdown.remaining()
    }

    /// Token of the timer currently allowed to tick, if any.
    #[must_use]
    pub fn armed_timer(&self) -> Option<TimerToken> {
        self.countdown.armed()
    }

    /// Correct answers recorded so far.
    #[must_use]
    pub fn score(&self) -> usize {
        count_correct(&self.questions, &self.answers)
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn progress(&self) -> Option<QuizProgress> {
        self.current_index().map(|current| QuizProgress {
            position: current + 1,
            total: self.questions.len(),
            answered: self.answers.len(),
            remaining: self.questions.len() - self.answers.len(),
        })
    }

    /// Final tally, available once every question is answered or skipped.
    #[must_use]
    pub fn outcome(&self) -> Option<QuizOutcome> {
        matches!(self.phase, Phase::NameEntry | Phase::Results)
            .then(|| QuizOutcome::new(self.score(), self.total()))
    }

    #[must_use]
    pub fn player_name(&self) -> Option<&str> {
        self.player_name.as_deref()
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    //
    // ─── TRANSITIONS ───────────────────────────────────────────────────────────
    //

    /// Leave the intro screen: sample questions and arm the first countdown.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidTransition` outside `Intro` and
    /// `QuizError::EmptyBank` if sampling yields nothing.
    pub fn start<R: Rng + ?Sized>(
        &mut self,
        bank: &QuestionBank,
        rng: &mut R,
    ) -> Result<Vec<Effect>, QuizError> {
        self.require(Phase::Intro, Action::Start)?;

        let questions = bank.sample(self.settings.question_count(), rng);
        if questions.is_empty() {
            return Err(QuizError::EmptyBank);
        }

        self.questions = questions;
        self.current = 0;
        self.answers.clear();
        self.selected = None;
        self.revealed = false;
        self.player_name = None;
        self.started_at = Some(self.clock.now());
        self.completed_at = None;
        self.phase = Phase::Active;

        let token = self.countdown.arm(self.settings.seconds_per_question());
        Ok(vec![
            Effect::ArmTimer(token),
            Effect::Announce(Announcement::QuestionStarted {
                position: 1,
                total: self.questions.len(),
            }),
        ])
    }

    /// Apply one event.
    ///
    /// # Errors
    ///
    /// Returns `QuizError` when the event is not allowed in the current state.
    /// Ticks never fail: stale or out-of-phase ticks are ignored.
    pub fn dispatch(&mut self, event: QuizEvent) -> Result<Vec<Effect>, QuizError> {
        match event {
            QuizEvent::Tick(token) => Ok(self.tick(token)),
            QuizEvent::SelectAnswer(index) => self.select_answer(index),
            QuizEvent::Confirm => self.confirm(),
            QuizEvent::ExtendTime => self.extend_time(),
            QuizEvent::SkipQuestion => self.skip_question(),
            QuizEvent::SubmitWithName(name) => self.submit_with_name(&name),
            QuizEvent::SubmitAnonymously => self.submit_anonymously(),
            QuizEvent::Restart => self.restart(),
        }
    }

    /// One second elapsed on the timer identified by `token`.
    pub fn tick(&mut self, token: TimerToken) -> Vec<Effect> {
        if self.phase != Phase::Active || self.revealed {
            return Vec::new();
        }
        let Some(remaining) = self.countdown.tick(token) else {
            return Vec::new();
        };

        if remaining == 0 {
            self.countdown.disarm();
            self.phase = Phase::TimeExpiredDecision;
            return vec![
                Effect::DisarmTimer,
                Effect::Announce(Announcement::TimeExpired),
            ];
        }
        if self.settings.announces(remaining) {
            return vec![Effect::Announce(Announcement::TimeRunningLow {
                seconds_remaining: remaining,
            })];
        }
        Vec::new()
    }

    /// Pick (or re-pick) an option. Stops the clock before recording the choice.
    ///
    /// # Errors
    ///
    /// Returns `QuizError` outside an unrevealed active question or for an
    /// option index the question does not have.
    pub fn select_answer(&mut self, index: usize) -> Result<Vec<Effect>, QuizError> {
        self.require(Phase::Active, Action::SelectAnswer)?;
        if self.revealed {
            return Err(QuizError::AlreadyRevealed);
        }
        let options = self.questions[self.current].option_count();
        if index >= options {
            return Err(QuizError::OptionOutOfRange { index, options });
        }

        let mut effects = Vec::new();
        if self.countdown.disarm() {
            effects.push(Effect::DisarmTimer);
        }
        self.selected = Some(index);
        Ok(effects)
    }

    /// First call reveals the answer; the second records it and moves on.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoSelection` if nothing is selected, or
    /// `QuizError::InvalidTransition` outside `Active`.
    pub fn confirm(&mut self) -> Result<Vec<Effect>, QuizError> {
        self.require(Phase::Active, Action::Confirm)?;
        let Some(selected) = self.selected else {
            return Err(QuizError::NoSelection);
        };

        if !self.revealed {
            self.revealed = true;
            let mut effects = Vec::new();
            if self.countdown.disarm() {
                effects.push(Effect::DisarmTimer);
            }
            effects.push(Effect::Announce(Announcement::AnswerRevealed {
                correct: self.questions[self.current].is_correct(selected),
            }));
            return Ok(effects);
        }

        self.answers.push(Answer::Selected(selected));
        Ok(self.move_on())
    }

    /// Restart the clock on an expired question without recording anything.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidTransition` outside `TimeExpiredDecision`.
    pub fn extend_time(&mut self) -> Result<Vec<Effect>, QuizError> {
        self.require(Phase::TimeExpiredDecision, Action::ExtendTime)?;
        self.phase = Phase::Active;
        let token = self.countdown.arm(self.settings.seconds_per_question());
        Ok(vec![Effect::ArmTimer(token)])
    }

    /// Give up on an expired question; it is recorded as skipped.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidTransition` outside `TimeExpiredDecision`.
    pub fn skip_question(&mut self) -> Result<Vec<Effect>, QuizError> {
        self.require(Phase::TimeExpiredDecision, Action::SkipQuestion)?;
        self.answers.push(Answer::Skipped);
        Ok(self.move_on())
    }

    /// Submit the final score under `name`. A blank name submits anonymously.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidTransition` outside `NameEntry`.
    pub fn submit_with_name(&mut self, name: &str) -> Result<Vec<Effect>, QuizError> {
        let name = name.trim();
        self.submit((!name.is_empty()).then(|| name.to_string()))
    }

    /// # Errors
    ///
    /// Returns `QuizError::InvalidTransition` outside `NameEntry`.
    pub fn submit_anonymously(&mut self) -> Result<Vec<Effect>, QuizError> {
        self.submit(None)
    }

    /// Discard this play-through and return to the intro screen.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidTransition` outside `Results`.
    pub fn restart(&mut self) -> Result<Vec<Effect>, QuizError> {
        self.require(Phase::Results, Action::Restart)?;
        let mut fresh = Self::new(self.settings.clone(), self.clock);
        fresh.countdown = Countdown::continuing(
            self.settings.seconds_per_question(),
            self.countdown.last_issued(),
        );
        *self = fresh;
        Ok(Vec::new())
    }

    //
    // ─── INTERNALS ─────────────────────────────────────────────────────────────
    //

    fn in_question(&self) -> bool {
        matches!(self.phase, Phase::Active | Phase::TimeExpiredDecision)
    }

    fn require(&self, phase: Phase, action: Action) -> Result<(), QuizError> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(QuizError::InvalidTransition {
                phase: self.phase,
                action,
            })
        }
    }

    /// Shared tail of confirm-advance and skip: the answer is already recorded.
    fn move_on(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.countdown.disarm() {
            effects.push(Effect::DisarmTimer);
        }
        self.selected = None;
        self.revealed = false;

        if self.current + 1 >= self.questions.len() {
            self.phase = Phase::NameEntry;
            self.completed_at = Some(self.clock.now());
            effects.push(Effect::Announce(Announcement::QuizCompleted {
                score: self.score(),
                total: self.total(),
            }));
            return effects;
        }

        self.current += 1;
        self.phase = Phase::Active;
        let token = self.countdown.arm(self.settings.seconds_per_question());
        effects.push(Effect::ArmTimer(token));
        effects.push(Effect::Announce(Announcement::QuestionStarted {
            position: self.current + 1,
            total: self.questions.len(),
        }));
        effects
    }

    fn submit(&mut self, name: Option<String>) -> Result<Vec<Effect>, QuizError> {
        self.require(Phase::NameEntry, Action::Submit)?;
        let submission = ScoreSubmission::new(self.score(), self.total(), name.clone());
        self.player_name = name;
        self.phase = Phase::Results;
        Ok(vec![Effect::SubmitScore(submission)])
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("id", &self.id)
            .field("phase", &self.phase)
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("answers_len", &self.answers.len())
            .field("selected", &self.selected)
            .field("revealed", &self.revealed)
            .field("time_remaining", &self.countdown.remaining())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
