//! Quiz-wide countdown
//!
//! The countdown state lives in [`TimerService`] and is only ever mutated by
//! its owner. In driven mode a background tokio task emits one
//! [`TimerPulse`] per second over a channel; the owner feeds those pulses back
//! through [`TimerService::on_pulse`], so ticks are serialized with every other
//! state change. Each `start` bumps a generation counter, which lets pulses from
//! a stopped or replaced countdown be recognised and dropped.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Remaining time below which the countdown is shown as running low
pub const LOW_TIME_SECONDS: u32 = 60;

/// Interval between pulses
pub const PULSE_PERIOD: Duration = Duration::from_secs(1);

/// One elapsed second, as reported by the background ticker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerPulse {
    generation: u64,
}

/// Observable countdown events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// A second elapsed and time remains
    Tick {
        /// Seconds left on the clock
        seconds_remaining: u32,
    },
    /// The clock reached zero; fired once, after which the timer is stopped
    Expired,
}

/// Countdown clock for a quiz session
#[derive(Debug)]
pub struct TimerService {
    /// Budget the countdown was started with (0 = no limit)
    limit: u32,
    /// Seconds left
    remaining: u32,
    /// Whether the countdown is active
    running: bool,
    /// Incremented on every start
    generation: u64,
    /// Where the background ticker sends pulses (None = manual mode)
    pulses: Option<mpsc::UnboundedSender<TimerPulse>>,
    /// Cancels the running background ticker
    cancel: Option<CancellationToken>,
}

impl TimerService {
    /// A timer advanced by hand through [`TimerService::elapse_second`]
    pub fn manual() -> Self {
        Self { limit: 0, remaining: 0, running: false, generation: 0, pulses: None, cancel: None }
    }

    /// A timer that spawns a tokio ticker sending pulses to `pulses` while running
    ///
    /// `start` must then be called from within a tokio runtime.
    pub fn driven(pulses: mpsc::UnboundedSender<TimerPulse>) -> Self {
        Self {
            limit: 0,
            remaining: 0,
            running: false,
            generation: 0,
            pulses: Some(pulses),
            cancel: None,
        }
    }

    /// Start a countdown of `total_seconds`, replacing any running one
    pub fn start(&mut self, total_seconds: u32) {
        if total_seconds == 0 {
            return;
        }

        self.stop();
        self.generation += 1;
        self.limit = total_seconds;
        self.remaining = total_seconds;
        self.running = true;

        if let Some(ref tx) = self.pulses {
            let token = CancellationToken::new();
            tokio::spawn(run_ticker(tx.clone(), token.clone(), self.generation));
            self.cancel = Some(token);
        }

        tracing::debug!(seconds = total_seconds, generation = self.generation, "timer started");
    }

    /// Stop the countdown; safe to call at any time, any number of times
    pub fn stop(&mut self) {
        if let Some(token) = self.cancel.take() {
            token.cancel();
        }
        if self.running {
            self.running = false;
            tracing::debug!(remaining = self.remaining, "timer stopped");
        }
    }

    /// Stop and forget the budget
    pub fn reset(&mut self) {
        self.stop();
        self.limit = 0;
        self.remaining = 0;
    }

    /// Apply a pulse from the background ticker
    ///
    /// Pulses from an earlier generation, or arriving after a stop, are ignored.
    pub fn on_pulse(&mut self, pulse: TimerPulse) -> Option<TimerEvent> {
        if pulse.generation != self.generation {
            return None;
        }
        self.elapse_second()
    }

    /// Count down one second
    pub fn elapse_second(&mut self) -> Option<TimerEvent> {
        if !self.running {
            return None;
        }

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.stop();
            tracing::info!(limit = self.limit, "timer expired");
            Some(TimerEvent::Expired)
        } else {
            Some(TimerEvent::Tick { seconds_remaining: self.remaining })
        }
    }

    /// Whether the countdown is active
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Seconds left
    pub fn seconds_remaining(&self) -> u32 {
        self.remaining
    }

    /// Budget of the current countdown (0 = no limit)
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Advisory low-time flag
    pub fn is_low_time(&self) -> bool {
        self.running && self.remaining < LOW_TIME_SECONDS
    }
}

impl Default for TimerService {
    fn default() -> Self {
        Self::manual()
    }
}

impl Drop for TimerService {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Send one pulse per period until cancelled or the receiver goes away
async fn run_ticker(
    tx: mpsc::UnboundedSender<TimerPulse>,
    cancel: CancellationToken,
    generation: u64,
) {
    let mut interval = tokio::time::interval_at(Instant::now() + PULSE_PERIOD, PULSE_PERIOD);
    interval.set_missed_tick_behavior(MissedTickBehavior::Burst);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {
                if tx.send(TimerPulse { generation }).is_err() {
                    break;
                }
            }
        }
    }
}

/// Format seconds as `MM:SS`
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
