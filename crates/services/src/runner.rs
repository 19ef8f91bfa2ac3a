use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use rand::Rng;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::task::JoinHandle;

use quiz_core::Clock;
use quiz_core::model::{QuestionBank, QuizSettings, ScoreSubmission};
use quiz_core::session::{Announcement, Effect, QuizError, QuizEvent, QuizSession};

use crate::snapshot::QuizSnapshot;
use crate::submission::ScoreSubmitter;
use crate::timer::CountdownTimer;

/// Drives one `QuizSession` against real time and a real leaderboard.
///
/// The runner is the single writer for its session. Player input goes through
/// `handle`, timer ticks through `next_tick`; the owner serializes the two
/// (typically with `tokio::select!`). Effects requested by the session are
/// carried out here and only announcements are handed back.
pub struct QuizRunner {
    session: QuizSession,
    timer: CountdownTimer,
    ticks: UnboundedReceiver<QuizEvent>,
    submitter: Arc<dyn ScoreSubmitter>,
    submission: Option<JoinHandle<()>>,
}

impl QuizRunner {
    #[must_use]
    pub fn new(settings: QuizSettings, clock: Clock, submitter: Arc<dyn ScoreSubmitter>) -> Self {
        let (tx, ticks) = mpsc::unbounded_channel();
        Self {
            session: QuizSession::new(settings, clock),
            timer: CountdownTimer::new(tx),
            ticks,
            submitter,
            submission: None,
        }
    }

    /// Change how often the countdown ticks. Tests use this to speed things up.
    #[must_use]
    pub fn with_tick_period(mut self, period: Duration) -> Self {
        self.timer = self.timer.with_period(period);
        self
    }

    #[must_use]
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    #[must_use]
    pub fn snapshot(&self) -> QuizSnapshot {
        QuizSnapshot::from_session(&self.session)
    }

    /// Leave the intro screen with a thread-local random source.
    ///
    /// # Errors
    ///
    /// Returns `QuizError` if the quiz is not on the intro screen or the bank
    /// yields no questions.
    pub fn start(&mut self, bank: &QuestionBank) -> Result<Vec<Announcement>, QuizError> {
        self.start_with_rng(bank, &mut rand::rng())
    }

    /// # Errors
    ///
    /// See [`QuizRunner::start`].
    pub fn start_with_rng<R: Rng + ?Sized>(
        &mut self,
        bank: &QuestionBank,
        rng: &mut R,
    ) -> Result<Vec<Announcement>, QuizError> {
        let effects = self.session.start(bank, rng)?;
        info!(
            "quiz {} started with {} questions",
            self.session.id(),
            self.session.total()
        );
        Ok(self.apply(effects))
    }

    /// Apply one event and carry out whatever it requires.
    ///
    /// # Errors
    ///
    /// Returns `QuizError` when the session rejects the event. Nothing changes
    /// in that case.
    pub fn handle(&mut self, event: QuizEvent) -> Result<Vec<Announcement>, QuizError> {
        let action = event.action();
        let before = self.session.phase();
        let effects = self.session.dispatch(event).inspect_err(|err| {
            debug!("quiz {}: rejected {action}: {err}", self.session.id());
        })?;

        let after = self.session.phase();
        if before != after {
            debug!(
                "quiz {}: {action} moved {before} -> {after}",
                self.session.id()
            );
        }
        Ok(self.apply(effects))
    }

    /// Wait for the next countdown tick and apply it.
    ///
    /// Never completes while no countdown is armed. Ticks from a replaced
    /// countdown are dropped by the session and yield no announcements.
    pub async fn next_tick(&mut self) -> Vec<Announcement> {
        let Some(event) = self.ticks.recv().await else {
            return std::future::pending().await;
        };
        self.handle(event).unwrap_or_default()
    }

    /// Wait for the most recent score submission to finish, if one is in flight.
    ///
    /// Submission outcomes are only logged, so this never fails. Hosts call it
    /// before exiting so the request is not cut short.
    pub async fn settle_submission(&mut self) {
        let Some(task) = self.submission.take() else {
            return;
        };
        if let Err(err) = task.await {
            warn!("score submission task ended abnormally: {err}");
        }
    }

    fn apply(&mut self, effects: Vec<Effect>) -> Vec<Announcement> {
        let mut announcements = Vec::new();
        for effect in effects {
            match effect {
                Effect::ArmTimer(token) => self.timer.arm(token),
                Effect::DisarmTimer => self.timer.disarm(),
                Effect::Announce(announcement) => {
                    if let Announcement::QuizCompleted { score, total } = announcement {
                        info!("quiz {} completed: {score}/{total}", self.session.id());
                    }
                    announcements.push(announcement);
                }
                Effect::SubmitScore(submission) => self.spawn_submission(submission),
            }
        }
        announcements
    }

    /// Hand the score to the submitter on a detached task.
    ///
    /// A submission from an earlier play-through keeps running if the player
    /// restarts; it no longer has any bearing on the session.
    fn spawn_submission(&mut self, submission: ScoreSubmission) {
        let submitter = Arc::clone(&self.submitter);
        let session_id = self.session.id();
        self.submission = Some(tokio::spawn(async move {
            match submitter.submit(&submission).await {
                Ok(()) => debug!(
                    "quiz {session_id}: submitted score {}/{}",
                    submission.score, submission.total
                ),
                Err(err) => warn!("quiz {session_id}: score submission failed: {err}"),
            }
        }));
    }
}

impl std::fmt::Debug for QuizRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuizRunner")
            .field("session", &self.session)
            .field("timer", &self.timer)
            .field("submission_in_flight", &self.submission.is_some())
            .finish_non_exhaustive()
    }
}
