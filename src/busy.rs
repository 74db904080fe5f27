//! Busy-line polling
//!
//! The panel holds its BUSY line at the busy level while it processes a
//! command (a full refresh can take several seconds). Waiting is a two-state
//! machine per call:
//!
//! ```text
//!   sample ──busy──> yield(interval) ──> sample ...
//!      │
//!      └──ready──> return
//! ```
//!
//! Every busy observation is followed by exactly one yield of the configured
//! poll interval, so a wait never spins and the scheduler (and the watchdog
//! task) keeps running. [`BusyPoll`] holds the bookkeeping for a single wait
//! and is shared by the blocking and async waits in [`crate::interface`].

use embedded_hal::digital::PinState;

use crate::config::{BusyPolarity, Config};

/// Panel readiness derived from one busy-line sample
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BusyState {
    /// Panel is still processing
    Busy,
    /// Panel accepts the next command
    Ready,
}

/// What the wait loop does after a sample
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Step {
    /// Ready level observed, the wait is over
    Ready,
    /// Still busy, yield for this many milliseconds and sample again
    Yield(u32),
    /// Still busy and the configured bound is used up
    TimedOut,
}

/// State of one in-flight busy-wait
#[derive(Debug)]
pub(crate) struct BusyPoll {
    polarity: BusyPolarity,
    interval_ms: u32,
    timeout_ms: Option<u32>,
    polls: u32,
    waited_ms: u32,
}

impl BusyPoll {
    pub(crate) fn start(config: &Config) -> Self {
        log::debug!(
            "EPD busy wait: polling every {}ms, timeout {:?}",
            config.poll_interval_ms,
            config.busy_timeout_ms
        );
        Self {
            polarity: config.busy_polarity,
            // Config is public, so a zero interval can bypass Builder validation
            interval_ms: config.poll_interval_ms.max(1),
            timeout_ms: config.busy_timeout_ms,
            polls: 0,
            waited_ms: 0,
        }
    }

    /// Feed one busy-line sample
    pub(crate) fn step(&mut self, level: PinState) -> Step {
        if self.polarity.state(level) == BusyState::Ready {
            log::debug!(
                "EPD ready after {} polls (~{}ms)",
                self.polls,
                self.waited_ms
            );
            return Step::Ready;
        }

        let interval = match self.timeout_ms {
            Some(timeout) if self.waited_ms >= timeout => {
                log::warn!(
                    "EPD busy wait timed out after {} polls ({}ms)",
                    self.polls,
                    self.waited_ms
                );
                return Step::TimedOut;
            }
            Some(timeout) => self.interval_ms.min(timeout - self.waited_ms),
            None => self.interval_ms,
        };

        self.polls = self.polls.saturating_add(1);
        self.waited_ms = self.waited_ms.saturating_add(interval);
        log::trace!("EPD busy... poll {}", self.polls);
        Step::Yield(interval)
    }

    #[cfg(test)]
    pub(crate) fn polls(&self) -> u32 {
        self.polls
    }
}
