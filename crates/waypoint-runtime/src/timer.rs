#![forbid(unsafe_code)]

//! Host-driven one-shot timers and trailing-edge debouncing.
//!
//! Nothing here sleeps or spawns. Deadlines are compared against the host's
//! monotonic clock whenever the host calls back in; the host learns when to
//! call back from [`Timer::deadline`].

use core::time::Duration;

/// Default trailing-edge debounce window for geometry recomputation.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(100);

/// A single pending deadline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timer {
    deadline: Option<Duration>,
}

impl Timer {
    pub const fn new() -> Self {
        Self { deadline: None }
    }

    /// Arm the timer `delay` after `now`, replacing any pending deadline.
    pub fn schedule(&mut self, now: Duration, delay: Duration) {
        self.deadline = Some(now.saturating_add(delay));
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    /// Returns `true` exactly once when `now` reaches the deadline, then
    /// disarms.
    pub fn poll(&mut self, now: Duration) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Trailing-edge debouncer: fires once `window` after the most recent
/// trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Debouncer {
    window: Duration,
    timer: Timer,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl Debouncer {
    pub const fn new(window: Duration) -> Self {
        Self {
            window,
            timer: Timer::new(),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Record an event at `now`, pushing the deadline back.
    pub fn trigger(&mut self, now: Duration) {
        self.timer.schedule(now, self.window);
    }

    pub fn cancel(&mut self) {
        self.timer.cancel();
    }

    pub fn is_pending(&self) -> bool {
        self.timer.is_pending()
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.timer.deadline()
    }

    pub fn poll(&mut self, now: Duration) -> bool {
        self.timer.poll(now)
    }
}

/// Earliest of several optional deadlines.
pub fn earliest(deadlines: impl IntoIterator<Item = Option<Duration>>) -> Option<Duration> {
    deadlines.into_iter().flatten().min()
}
