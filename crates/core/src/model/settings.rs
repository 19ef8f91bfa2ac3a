use thiserror::Error;

pub const DEFAULT_QUESTION_COUNT: usize = 30;
pub const DEFAULT_SECONDS_PER_QUESTION: u32 = 15;
pub const DEFAULT_ANNOUNCE_AT: [u32; 2] = [10, 5];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("question count must be > 0")]
    InvalidQuestionCount,

    #[error("seconds per question must be > 0")]
    InvalidSecondsPerQuestion,

    #[error("announcement at {at}s must be between 1 and {limit}s")]
    InvalidAnnouncement { at: u32, limit: u32 },
}

/// Tunables for a quiz play-through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSettings {
    question_count: usize,
    seconds_per_question: u32,
    announce_at: Vec<u32>,
}

impl Default for QuizSettings {
    /// 30 questions, 15 seconds each, warnings at 10 and 5 seconds left.
    fn default() -> Self {
        Self {
            question_count: DEFAULT_QUESTION_COUNT,
            seconds_per_question: DEFAULT_SECONDS_PER_QUESTION,
            announce_at: DEFAULT_ANNOUNCE_AT.to_vec(),
        }
    }
}

impl QuizSettings {
    /// Creates custom settings.
    ///
    /// Announcement thresholds are deduplicated and sorted from highest to lowest.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if a count is zero or a threshold is not strictly
    /// inside the countdown window.
    pub fn new(
        question_count: usize,
        seconds_per_question: u32,
        announce_at: impl IntoIterator<Item = u32>,
    ) -> Result<Self, SettingsError> {
        if question_count == 0 {
            return Err(SettingsError::InvalidQuestionCount);
        }
        if seconds_per_question == 0 {
            return Err(SettingsError::InvalidSecondsPerQuestion);
        }
        let mut announce_at: Vec<u32> = announce_at.into_iter().collect();
        if let Some(&at) = announce_at
            .iter()
            .find(|&&at| at == 0 || at >= seconds_per_question)
        {
            return Err(SettingsError::InvalidAnnouncement {
                at,
                limit: seconds_per_question.saturating_sub(1),
            });
        }
        announce_at.sort_unstable_by(|a, b| b.cmp(a));
        announce_at.dedup();

        Ok(Self {
            question_count,
            seconds_per_question,
            announce_at,
        })
    }

    /// Same as the defaults but with a different question count.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::InvalidQuestionCount` for zero.
    pub fn with_question_count(question_count: usize) -> Result<Self, SettingsError> {
        Self::new(
            question_count,
            DEFAULT_SECONDS_PER_QUESTION,
            DEFAULT_ANNOUNCE_AT,
        )
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.question_count
    }

    #[must_use]
    pub fn seconds_per_question(&self) -> u32 {
        self.seconds_per_question
    }

    #[must_use]
    pub fn announce_at(&self) -> &[u32] {
        &self.announce_at
    }

    #[must_use]
    pub fn announces(&self, seconds_remaining: u32) -> bool {
        self.announce_at.contains(&seconds_remaining)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_classic_quiz() {
        let settings = QuizSettings::default();
        assert_eq!(settings.question_count(), 30);
        assert_eq!(settings.seconds_per_question(), 15);
        assert!(settings.announces(10));
        assert!(settings.announces(5));
        assert!(!settings.announces(7));
    }

    #[test]
    fn zero_values_are_rejected() {
        assert_eq!(
            QuizSettings::new(0, 15, []).unwrap_err(),
            SettingsError::InvalidQuestionCount
        );
        assert_eq!(
            QuizSettings::new(5, 0, []).unwrap_err(),
            SettingsError::InvalidSecondsPerQuestion
        );
    }

    #[test]
    fn announcements_must_fit_the_window() {
        assert_eq!(
            QuizSettings::new(5, 8, [10]).unwrap_err(),
            SettingsError::InvalidAnnouncement { at: 10, limit: 7 }
        );
        assert!(matches!(
            QuizSettings::new(5, 8, [0]),
            Err(SettingsError::InvalidAnnouncement { at: 0, .. })
        ));
    }

    #[test]
    fn announcements_are_sorted_and_deduplicated() {
        let settings = QuizSettings::new(5, 20, [5, 10, 5, 3]).unwrap();
        assert_eq!(settings.announce_at(), &[10, 5, 3]);
    }
}
