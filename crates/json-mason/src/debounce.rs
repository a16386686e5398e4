//! Trailing-delay coalescing timer.
//!
//! A pure state machine over explicit instants: no threads, no sleeping.
//! Hosts poll it from whatever loop they already run, and tests drive it
//! with synthetic clocks.

use std::time::{Duration, Instant};

/// Coalesces a burst of triggers into one deadline `delay` after the last
/// trigger.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Debouncer {
            delay,
            deadline: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Arm (or re-arm) the timer: the deadline moves to `now + delay`,
    /// replacing any pending deadline.
    pub fn schedule_at(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn schedule(&mut self) {
        self.schedule_at(Instant::now());
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// True exactly when a pending deadline has been reached; disarms it.
    pub fn fire_at(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn fire(&mut self) -> bool {
        self.fire_at(Instant::now())
    }
}
