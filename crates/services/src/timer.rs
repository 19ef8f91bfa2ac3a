use std::time::Duration;

use quiz_core::session::{QuizEvent, TimerToken};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Default countdown resolution.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Cancellable repeating tick source for the question countdown.
///
/// Holds at most one live task. Arming always aborts the previous task first,
/// and dropping the timer aborts whatever is running.
///
/// Must be armed from inside a tokio runtime.
#[derive(Debug)]
pub struct CountdownTimer {
    period: Duration,
    ticks: UnboundedSender<QuizEvent>,
    task: Option<JoinHandle<()>>,
    armed: Option<TimerToken>,
}

impl CountdownTimer {
    #[must_use]
    pub fn new(ticks: UnboundedSender<QuizEvent>) -> Self {
        Self {
            period: TICK_PERIOD,
            ticks,
            task: None,
            armed: None,
        }
    }

    #[must_use]
    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    #[must_use]
    pub fn armed(&self) -> Option<TimerToken> {
        self.armed
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.task.is_some()
    }

    /// Start ticking with `token`, replacing any running countdown.
    ///
    /// The first tick fires one full period after arming.
    pub fn arm(&mut self, token: TimerToken) {
        self.disarm();

        let period = self.period;
        let ticks = self.ticks.clone();
        self.task = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if ticks.send(QuizEvent::Tick(token)).is_err() {
                    break;
                }
            }
        }));
        self.armed = Some(token);
    }

    pub fn disarm(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.armed = None;
    }
}

impl Drop for CountdownTimer {
    fn drop(&mut self) {
        self.disarm();
    }
}
