//! Heartbeat scheduling
//!
//! The scheduler only produces ticks; the session loop owns it and sends the
//! liveness frame on each tick. Cancelling drops the interval in place, so no
//! tick can be observed after `cancel` returns.

use std::time::Duration;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

/// Recurring heartbeat timer, present only while connected
#[derive(Debug, Default)]
pub struct HeartbeatScheduler {
    interval: Option<Interval>,
}

impl HeartbeatScheduler {
    /// Create an idle scheduler
    #[must_use]
    pub fn new() -> Self {
        Self { interval: None }
    }

    /// Start ticking every `period`, first tick one period from now
    ///
    /// Restarting replaces any running schedule.
    pub fn start(&mut self, period: Duration) {
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.interval = Some(interval);

        tracing::debug!(period_ms = period.as_millis() as u64, "Heartbeat scheduler started");
    }

    /// Stop the schedule; returns whether it was running
    pub fn cancel(&mut self) -> bool {
        let was_running = self.interval.take().is_some();
        if was_running {
            tracing::debug!("Heartbeat scheduler cancelled");
        }
        was_running
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.interval.is_some()
    }

    /// Current period, if running
    #[must_use]
    pub fn period(&self) -> Option<Duration> {
        self.interval.as_ref().map(Interval::period)
    }

    /// Wait for the next tick
    ///
    /// Never resolves while the scheduler is idle. Cancel-safe.
    pub async fn tick(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => std::future::pending().await,
        }
    }
}
