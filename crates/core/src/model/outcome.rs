use serde::{Deserialize, Serialize};

//
// ─── RESULT TIER ───────────────────────────────────────────────────────────────
//

/// Feedback band for a finished quiz, picked from the percentage score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultTier {
    /// Perfect score.
    Master,
    /// 75% and above.
    Excellent,
    /// 50% and above.
    GoodProgress,
    /// 25% and above.
    KeepLearning,
    /// Below 25%.
    TimeToStudy,
}

impl ResultTier {
    #[must_use]
    pub fn from_percentage(percentage: u32) -> Self {
        match percentage {
            100.. => ResultTier::Master,
            75..=99 => ResultTier::Excellent,
            50..=74 => ResultTier::GoodProgress,
            25..=49 => ResultTier::KeepLearning,
            _ => ResultTier::TimeToStudy,
        }
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            ResultTier::Master => "Accessibility Master!",
            ResultTier::Excellent => "Excellent Work!",
            ResultTier::GoodProgress => "Good Progress!",
            ResultTier::KeepLearning => "Keep Learning!",
            ResultTier::TimeToStudy => "Time to Study!",
        }
    }

    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            ResultTier::Master => {
                "Wow! You're an accessibility wizard! Perfect score - you clearly know your stuff!"
            }
            ResultTier::Excellent => {
                "Great job! You have a solid understanding of web accessibility. Keep learning!"
            }
            ResultTier::GoodProgress => {
                "You're on the right track! There's more to learn, but you've got the basics down."
            }
            ResultTier::KeepLearning => {
                "You're getting there! Check out our resources to boost your accessibility knowledge."
            }
            ResultTier::TimeToStudy => {
                "Don't worry - everyone starts somewhere! Explore our guides to level up your skills."
            }
        }
    }
}

//
// ─── OUTCOME ───────────────────────────────────────────────────────────────────
//

/// Final tally of a completed play-through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizOutcome {
    pub score: usize,
    pub total: usize,
    pub percentage: u32,
    pub tier: ResultTier,
}

impl QuizOutcome {
    /// `score` is clamped to `total`.
    #[must_use]
    pub fn new(score: usize, total: usize) -> Self {
        let score = score.min(total);
        let percentage = percentage(score, total);
        Self {
            score,
            total,
            percentage,
            tier: ResultTier::from_percentage(percentage),
        }
    }

    #[must_use]
    pub fn is_perfect(&self) -> bool {
        self.total > 0 && self.score == self.total
    }
}

/// Whole-number percentage, rounding halves up. Zero total yields zero.
#[must_use]
pub fn percentage(score: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let rounded = (score.saturating_mul(200) + total) / total.saturating_mul(2);
    u32::try_from(rounded).unwrap_or(u32::MAX)
}

//
// ─── SUBMISSION ────────────────────────────────────────────────────────────────
//

/// Score record handed to the leaderboard collaborator.
///
/// Serializes to `{"score": .., "total": .., "name": ..}` with `name` omitted
/// for anonymous players.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSubmission {
    pub score: usize,
    pub total: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ScoreSubmission {
    #[must_use]
    pub fn new(score: usize, total: usize, name: Option<String>) -> Self {
        Self { score, total, name }
    }

    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.name.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_rounds_half_up() {
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 8), 13);
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(30, 30), 100);
    }

    #[test]
    fn tiers_follow_percentage_bands() {
        assert_eq!(QuizOutcome::new(30, 30).tier, ResultTier::Master);
        assert_eq!(QuizOutcome::new(23, 30).tier, ResultTier::Excellent);
        assert_eq!(QuizOutcome::new(3, 5).tier, ResultTier::GoodProgress);
        assert_eq!(QuizOutcome::new(1, 4).tier, ResultTier::KeepLearning);
        assert_eq!(QuizOutcome::new(0, 5).tier, ResultTier::TimeToStudy);
    }

    #[test]
    fn every_tier_has_its_own_wording() {
        let tiers = [
            ResultTier::Master,
            ResultTier::Excellent,
            ResultTier::GoodProgress,
            ResultTier::KeepLearning,
            ResultTier::TimeToStudy,
        ];
        let messages: std::collections::HashSet<_> =
            tiers.iter().map(|tier| tier.message()).collect();
        assert_eq!(messages.len(), tiers.len());
        assert!(ResultTier::Master.message().starts_with("Wow! You're an accessibility wizard!"));
        assert_eq!(
            ResultTier::KeepLearning.message(),
            "You're getting there! Check out our resources to boost your accessibility knowledge."
        );
    }

    #[test]
    fn outcome_clamps_score() {
        let outcome = QuizOutcome::new(7, 5);
        assert_eq!(outcome.score, 5);
        assert!(outcome.is_perfect());
    }
}
