//! Idle detection for the mode idle hook.
//!
//! The event loop polls [`IdleTimer::poll`] whenever it wakes up. The timer
//! fires once after `timeout` of inactivity and then stays quiet until the
//! next activity re-arms it, so a long pause yields one idle event rather
//! than one per poll.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
pub struct IdleTimer {
    last_activity: Instant,
    fired: bool,
}

impl IdleTimer {
    #[must_use]
    pub const fn new(now: Instant) -> Self {
        Self {
            last_activity: now,
            fired: false,
        }
    }

    /// Record activity at `now`, cancelling any idle period in progress.
    pub const fn touch(&mut self, now: Instant) {
        self.last_activity = now;
        self.fired = false;
    }

    /// True exactly once per idle period of at least `timeout`. A zero
    /// timeout never fires.
    pub fn poll(&mut self, now: Instant, timeout: Duration) -> bool {
        if timeout.is_zero() || self.fired {
            return false;
        }
        if now.saturating_duration_since(self.last_activity) < timeout {
            return false;
        }
        self.fired = true;
        true
    }

    /// Time left until the timer would fire, for event loops that sleep.
    #[must_use]
    pub fn remaining(&self, now: Instant, timeout: Duration) -> Option<Duration> {
        if timeout.is_zero() || self.fired {
            return None;
        }
        Some(timeout.saturating_sub(now.saturating_duration_since(self.last_activity)))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
