//! Timer-gated guard that limits how often a refresh may hit the network.

use std::time::{Duration, Instant};

/// Lets one call through per `interval`.
///
/// The first call always passes. Every call that passes records its own time;
/// calls before `last + interval` are refused without touching that record.
#[derive(Debug, Clone)]
pub struct Throttle {
    interval: Duration,
    last: Option<Instant>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Time of the last call that was let through.
    pub fn last_invocation(&self) -> Option<Instant> {
        self.last
    }

    /// Returns `true` and records the call if the interval has elapsed.
    pub fn try_acquire(&mut self) -> bool {
        self.try_acquire_at(Instant::now())
    }

    /// [`try_acquire`](Self::try_acquire) against an explicit clock reading.
    pub fn try_acquire_at(&mut self, now: Instant) -> bool {
        if self.remaining_at(now).is_zero() {
            self.last = Some(now);
            true
        } else {
            false
        }
    }

    /// Record a call at `now` regardless of the interval.
    pub fn mark_at(&mut self, now: Instant) {
        self.last = Some(now);
    }

    /// How long until the next call would be let through.
    pub fn remaining_at(&self, now: Instant) -> Duration {
        match self.last {
            Some(last) => self
                .interval
                .saturating_sub(now.saturating_duration_since(last)),
            None => Duration::ZERO,
        }
    }

    /// Forget the last call so the next one passes.
    pub fn reset(&mut self) {
        self.last = None;
    }
}
