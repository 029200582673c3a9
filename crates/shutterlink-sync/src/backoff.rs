//! Capped exponential backoff policy
//!
//! When the device stalls or answers garbage, the engine sleeps an
//! increasing delay before polling again: base, 2x, 4x, ... capped at a
//! ceiling. Delays never grow unbounded and never hit zero, so a dead
//! link costs at most one request per ceiling interval and a flapping
//! link never busy-loops.

use std::time::Duration;

/// Default first delay after a failure (2 seconds)
const DEFAULT_BASE: Duration = Duration::from_secs(2);

/// Default delay ceiling (60 seconds)
const DEFAULT_CAP: Duration = Duration::from_secs(60);

/// Capped exponential backoff state
///
/// Owned by the engine's run loop; [`next_delay`](BackoffPolicy::next_delay)
/// advances the schedule, [`reset`](BackoffPolicy::reset) rewinds it after
/// a successful cycle.
#[derive(Debug, Clone)]
pub struct BackoffPolicy {
    /// First delay after a failure
    base: Duration,
    /// Upper bound on any delay
    cap: Duration,
    /// Delay to hand out next; `None` until the first failure
    current: Option<Duration>,
}

impl BackoffPolicy {
    /// Creates a policy with the given base and ceiling.
    ///
    /// A zero base is bumped to one second so the schedule can never
    /// busy-loop.
    #[must_use]
    pub fn new(base: Duration, cap: Duration) -> Self {
        let base = if base.is_zero() {
            Duration::from_secs(1)
        } else {
            base
        };
        let cap = cap.max(base);
        Self {
            base,
            cap,
            current: None,
        }
    }

    /// Creates a policy with the default 2s..60s schedule.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_BASE, DEFAULT_CAP)
    }

    /// The delay to sleep before the next poll attempt.
    ///
    /// Doubles on each consecutive call, saturating at the ceiling.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current.unwrap_or(self.base);
        let next = delay.saturating_mul(2).min(self.cap);
        self.current = Some(next);
        delay
    }

    /// Rewind the schedule after a successful cycle.
    pub fn reset(&mut self) {
        self.current = None;
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::with_defaults()
    }
}
