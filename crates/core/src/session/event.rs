use std::fmt;

use crate::model::ScoreSubmission;

/// Identifies one arming of the countdown.
///
/// Every arm mints a new token, so ticks from a timer that was already
/// replaced can be told apart from live ones and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(u64);

impl TimerToken {
    pub(crate) fn after(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    pub(crate) const fn initial() -> Self {
        Self(0)
    }
}

/// Coarse state of a play-through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Intro,
    Active,
    TimeExpiredDecision,
    NameEntry,
    Results,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Intro => "intro",
            Phase::Active => "active",
            Phase::TimeExpiredDecision => "time-expired",
            Phase::NameEntry => "name-entry",
            Phase::Results => "results",
        })
    }
}

/// Stimuli a running session reacts to.
///
/// Starting is not an event: it needs the question bank and a random source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizEvent {
    Tick(TimerToken),
    SelectAnswer(usize),
    Confirm,
    ExtendTime,
    SkipQuestion,
    SubmitWithName(String),
    SubmitAnonymously,
    Restart,
}

impl QuizEvent {
    #[must_use]
    pub fn action(&self) -> Action {
        match self {
            QuizEvent::Tick(_) => Action::Tick,
            QuizEvent::SelectAnswer(_) => Action::SelectAnswer,
            QuizEvent::Confirm => Action::Confirm,
            QuizEvent::ExtendTime => Action::ExtendTime,
            QuizEvent::SkipQuestion => Action::SkipQuestion,
            QuizEvent::SubmitWithName(_) | QuizEvent::SubmitAnonymously => Action::Submit,
            QuizEvent::Restart => Action::Restart,
        }
    }
}

/// Payload-free name of an operation, used in rejection errors and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Start,
    Tick,
    SelectAnswer,
    Confirm,
    ExtendTime,
    SkipQuestion,
    Submit,
    Restart,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::Start => "start",
            Action::Tick => "tick",
            Action::SelectAnswer => "select answer",
            Action::Confirm => "confirm",
            Action::ExtendTime => "extend time",
            Action::SkipQuestion => "skip question",
            Action::Submit => "submit score",
            Action::Restart => "restart",
        })
    }
}

/// Advisory, non-blocking messages for whoever presents the quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Announcement {
    QuestionStarted { position: usize, total: usize },
    TimeRunningLow { seconds_remaining: u32 },
    TimeExpired,
    AnswerRevealed { correct: bool },
    QuizCompleted { score: usize, total: usize },
}

/// Side effects requested by a transition. The session never performs them itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Cancel any running countdown and start a fresh one tagged with this token.
    ArmTimer(TimerToken),
    /// Cancel the running countdown.
    DisarmTimer,
    Announce(Announcement),
    /// Hand the score to the leaderboard collaborator, once.
    SubmitScore(ScoreSubmission),
}
