use std::sync::Arc;

use log::info;
use quiz_core::Clock;
use quiz_core::model::{QuestionBank, QuizSettings};
use storage::{BuiltinQuestionBank, JsonFileQuestionBank, QuestionBankRepository};

use crate::config::QuizConfig;
use crate::error::QuizServiceError;
use crate::leaderboard::LeaderboardClient;
use crate::runner::QuizRunner;
use crate::submission::{DiscardScoreSubmitter, HttpScoreSubmitter, ScoreSubmitter};

/// Loaded bank, validated settings and leaderboard client, ready to hand out runners.
#[derive(Clone)]
pub struct AppServices {
    clock: Clock,
    settings: QuizSettings,
    bank: Arc<QuestionBank>,
    submitter: Arc<dyn ScoreSubmitter>,
    leaderboard: Option<Arc<LeaderboardClient>>,
}

impl AppServices {
    /// Build services from configuration: a JSON bank when a path is set, the
    /// bundled bank otherwise, and an HTTP submitter plus leaderboard reader
    /// when a scores URL is set.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError` if the settings are invalid, the bank cannot
    /// be loaded, or the filters leave no questions.
    pub async fn from_config(config: &QuizConfig, clock: Clock) -> Result<Self, QuizServiceError> {
        let submitter: Arc<dyn ScoreSubmitter> = match &config.scores_url {
            Some(url) => Arc::new(HttpScoreSubmitter::new(url)),
            None => Arc::new(DiscardScoreSubmitter),
        };

        let services = match &config.bank_path {
            Some(path) => {
                let repo = JsonFileQuestionBank::new(path.clone());
                Self::assemble(&repo, config, clock, submitter).await?
            }
            None => Self::assemble(&BuiltinQuestionBank, config, clock, submitter).await?,
        };

        Ok(match &config.scores_url {
            Some(url) => services.with_leaderboard(LeaderboardClient::new(url)),
            None => services,
        })
    }

    /// Build services from explicit collaborators.
    ///
    /// # Errors
    ///
    /// Same as [`AppServices::from_config`].
    pub async fn assemble(
        repo: &dyn QuestionBankRepository,
        config: &QuizConfig,
        clock: Clock,
        submitter: Arc<dyn ScoreSubmitter>,
    ) -> Result<Self, QuizServiceError> {
        let settings = config.settings()?;

        let mut bank = repo.load_bank().await?;
        if let Some(category) = config.category {
            bank = bank.with_category(category)?;
        }
        if let Some(difficulty) = config.difficulty {
            bank = bank.with_difficulty(difficulty)?;
        }
        info!(
            "question bank ready: {} questions, {} per quiz",
            bank.len(),
            settings.question_count().min(bank.len())
        );

        Ok(Self {
            clock,
            settings,
            bank: Arc::new(bank),
            submitter,
            leaderboard: None,
        })
    }

    #[must_use]
    pub fn with_leaderboard(mut self, client: LeaderboardClient) -> Self {
        self.leaderboard = Some(Arc::new(client));
        self
    }

    /// Leaderboard reader, present only when a scores URL is configured.
    #[must_use]
    pub fn leaderboard(&self) -> Option<Arc<LeaderboardClient>> {
        self.leaderboard.clone()
    }

    #[must_use]
    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    #[must_use]
    pub fn bank(&self) -> Arc<QuestionBank> {
        Arc::clone(&self.bank)
    }

    /// A fresh runner sitting on the intro screen.
    #[must_use]
    pub fn new_runner(&self) -> QuizRunner {
        QuizRunner::new(
            self.settings.clone(),
            self.clock,
            Arc::clone(&self.submitter),
        )
    }
}

impl std::fmt::Debug for AppServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppServices")
            .field("settings", &self.settings)
            .field("bank_len", &self.bank.len())
            .field("leaderboard", &self.leaderboard)
            .finish_non_exhaustive()
    }
}
