use crate::session::event::TimerToken;

/// Countdown state for the current question.
///
/// `armed` holds the token of the only timer allowed to decrement `remaining`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Countdown {
    remaining: u32,
    armed: Option<TimerToken>,
    last_issued: TimerToken,
}

impl Countdown {
    pub(crate) fn new(seconds: u32) -> Self {
        Self::continuing(seconds, TimerToken::initial())
    }

    /// A stopped countdown whose next token follows `last_issued`.
    pub(crate) fn continuing(seconds: u32, last_issued: TimerToken) -> Self {
        Self {
            remaining: seconds,
            armed: None,
            last_issued,
        }
    }

    pub(crate) fn remaining(&self) -> u32 {
        self.remaining
    }

    pub(crate) fn armed(&self) -> Option<TimerToken> {
        self.armed
    }

    pub(crate) fn last_issued(&self) -> TimerToken {
        self.last_issued
    }

    /// Reset to `seconds` and mint the token of the new live timer.
    pub(crate) fn arm(&mut self, seconds: u32) -> TimerToken {
        let token = self.last_issued.after();
        self.last_issued = token;
        self.remaining = seconds;
        self.armed = Some(token);
        token
    }

    /// Returns true if a timer was live.
    pub(crate) fn disarm(&mut self) -> bool {
        self.armed.take().is_some()
    }

    /// Apply one tick. Returns the new remaining time, or `None` for a stale token.
    pub(crate) fn tick(&mut self, token: TimerToken) -> Option<u32> {
        if self.armed != Some(token) {
            return None;
        }
        self.remaining = self.remaining.saturating_sub(1);
        Some(self.remaining)
    }
}
