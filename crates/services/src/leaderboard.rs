//! Read side of the public leaderboard.

use chrono::{DateTime, NaiveDate, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::error::LeaderboardError;
use crate::submission::scores_endpoint;

/// How many entries a board shows unless asked otherwise.
pub const DEFAULT_BOARD_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeaderboardKind {
    AllTime,
    /// Scores recorded today, by the server's calendar.
    Daily,
}

impl LeaderboardKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LeaderboardKind::AllTime => "all-time",
            LeaderboardKind::Daily => "daily",
        }
    }
}

/// One stored result as the leaderboard reports it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizScore {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub score: usize,
    pub total: usize,
    pub percentage: u32,
    pub timestamp: DateTime<Utc>,
    pub date: NaiveDate,
}

impl QuizScore {
    /// Name to show; anonymous entries have none.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Anonymous")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardStats {
    pub total_attempts: u64,
    pub today_attempts: u64,
    /// Mean percentage across every attempt.
    pub average_score: u32,
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    success: bool,
    data: Option<T>,
    #[serde(default)]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn into_data(self) -> Result<T, LeaderboardError> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            (true, None) => Err(LeaderboardError::Rejected("response has no data".into())),
            (false, _) => Err(LeaderboardError::Rejected(
                self.error.unwrap_or_else(|| "unknown error".into()),
            )),
        }
    }
}

/// Reads rankings and totals from `{base_url}/api/quiz/scores`.
#[derive(Clone, Debug)]
pub struct LeaderboardClient {
    client: Client,
    endpoint: String,
}

impl LeaderboardClient {
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

    /// Best `limit` scores on the chosen board, highest first.
    ///
    /// # Errors
    ///
    /// Returns `LeaderboardError` on transport failure, a non-2xx status, or a
    /// response the server marks as failed.
    pub async fn top_scores(
        &self,
        kind: LeaderboardKind,
        limit: usize,
    ) -> Result<Vec<QuizScore>, LeaderboardError> {
        let limit = limit.to_string();
        self.fetch(&[("type", kind.as_str()), ("limit", limit.as_str())])
            .await
    }

    /// Attempt counts and the average percentage.
    ///
    /// # Errors
    ///
    /// Same as [`LeaderboardClient::top_scores`].
    pub async fn stats(&self) -> Result<LeaderboardStats, LeaderboardError> {
        self.fetch(&[("type", "stats")]).await
    }

    async fn fetch<T>(&self, query: &[(&str, &str)]) -> Result<T, LeaderboardError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let response = self.client.get(&self.endpoint).query(query).send().await?;

        let status = response.status();
        if status.is_success() {
            return response.json::<ApiResponse<T>>().await?.into_data();
        }
        match response.json::<ApiResponse<T>>().await {
            Ok(ApiResponse {
                error: Some(message),
                ..
            }) => Err(LeaderboardError::Rejected(message)),
            _ => Err(LeaderboardError::HttpStatus(status)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_kinds_use_query_names() {
        assert_eq!(LeaderboardKind::AllTime.as_str(), "all-time");
        assert_eq!(LeaderboardKind::Daily.as_str(), "daily");
    }

    #[test]
    fn score_entry_parses_camel_case_with_optional_name() {
        let score: QuizScore = serde_json::from_str(
            r#"{"id":"1718000000000","score":9,"total":10,"percentage":90,
                "timestamp":"2024-06-10T08:30:00.000Z","date":"2024-06-10"}"#,
        )
        .unwrap();
        assert_eq!(score.display_name(), "Anonymous");
        assert_eq!(score.percentage, 90);
        assert_eq!(score.date, NaiveDate::from_ymd_opt(2024, 6, 10).unwrap());
    }

    #[test]
    fn failed_response_carries_server_message() {
        let body: ApiResponse<LeaderboardStats> =
            serde_json::from_str(r#"{"success":false,"error":"Failed to fetch scores"}"#).unwrap();
        match body.into_data() {
            Err(LeaderboardError::Rejected(message)) => {
                assert_eq!(message, "Failed to fetch scores");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
