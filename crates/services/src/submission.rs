use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use quiz_core::model::ScoreSubmission;

use crate::error::SubmissionError;

/// Longest player name the leaderboard accepts, in characters.
pub const MAX_NAME_CHARS: usize = 50;

/// Leaderboard collaborator. Implementations may fail; callers never retry.
#[async_trait]
pub trait ScoreSubmitter: Send + Sync {
    /// Record one finished quiz.
    ///
    /// # Errors
    ///
    /// Returns `SubmissionError` if the score could not be recorded.
    async fn submit(&self, submission: &ScoreSubmission) -> Result<(), SubmissionError>;
}

/// Submitter used when no leaderboard is configured.
#[derive(Clone, Copy, Debug, Default)]
pub struct DiscardScoreSubmitter;

#[async_trait]
impl ScoreSubmitter for DiscardScoreSubmitter {
    async fn submit(&self, submission: &ScoreSubmission) -> Result<(), SubmissionError> {
        log::debug!(
            "no leaderboard configured, dropping score {}/{}",
            submission.score,
            submission.total
        );
        Ok(())
    }
}

/// Posts scores as JSON to `{base_url}/api/quiz/scores`.
#[derive(Clone, Debug)]
pub struct HttpScoreSubmitter {
    client: Client,
    endpoint: String,
}

impl HttpScoreSubmitter {
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    #[must_use]
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            endpoint: scores_endpoint(base_url),
        }
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ScoreSubmitter for HttpScoreSubmitter {
    async fn submit(&self, submission: &ScoreSubmission) -> Result<(), SubmissionError> {
        if submission.total == 0 || submission.score > submission.total {
            return Err(SubmissionError::Rejected(format!(
                "score {}/{} is out of range",
                submission.score, submission.total
            )));
        }

        let payload = ScorePayload {
            score: submission.score,
            total: submission.total,
            name: submission.name.as_deref().and_then(sanitize_player_name),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SubmissionError::HttpStatus(response.status()));
        }
        Ok(())
    }
}

/// Scores resource shared by submission and leaderboard reads.
pub(crate) fn scores_endpoint(base_url: &str) -> String {
    format!("{}/api/quiz/scores", base_url.trim_end_matches('/'))
}

#[derive(Debug, Serialize)]
struct ScorePayload {
    score: usize,
    total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

/// Make a player name safe to show on a public leaderboard.
///
/// Strips all markup, keeps the remaining text as plain characters, trims,
/// then caps the length at `MAX_NAME_CHARS`. Returns `None` when nothing
/// printable is left.
#[must_use]
pub fn sanitize_player_name(raw: &str) -> Option<String> {
    let markup_free = ammonia::Builder::empty().clean(raw.trim()).to_string();
    let plain = unescape_text(&markup_free);
    let capped: String = plain.trim().chars().take(MAX_NAME_CHARS).collect();
    let capped = capped.trim_end();
    (!capped.is_empty()).then(|| capped.to_string())
}

/// Undo the entity escaping the HTML serializer applies to text nodes.
///
/// The body is JSON, not HTML, so the leaderboard must receive the characters
/// the player typed. `&amp;` goes last so `&amp;lt;` decodes to `&lt;`.
fn unescape_text(serialized: &str) -> String {
    serialized
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&nbsp;", "\u{a0}")
        .replace("&amp;", "&")
}
