//! Trailing debounce on top of a [`TimerSource`].
//!
//! Every [`trigger`](TrailingDebounce::trigger) re-arms the timer, so only the
//! last event inside a window reaches the handler.
use std::time::Duration;

use crate::clock::{TimerKey, TimerSource};

/// Trailing-edge debounce with a fixed window.
#[derive(Debug, Clone, PartialEq)]
pub struct TrailingDebounce {
    window: Duration,
    armed: Option<TimerKey>,
}

impl TrailingDebounce {
    /// Creates a disarmed debounce.
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            armed: None,
        }
    }

    /// The debounce window.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Whether a timer is currently armed.
    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Records an event at `now`: cancels the previously armed timer and arms
    /// `task` at `now + window`.
    pub fn trigger<T>(&mut self, timers: &mut impl TimerSource<T>, now: Duration, task: T) {
        if let Some(previous) = self.armed.take() {
            timers.cancel(previous);
        }
        self.armed = Some(timers.schedule(now.saturating_add(self.window), task));
    }

    /// Disarms the pending timer, if any.
    pub fn cancel<T>(&mut self, timers: &mut impl TimerSource<T>) {
        if let Some(previous) = self.armed.take() {
            timers.cancel(previous);
        }
    }

    /// Consumes the armed key when the timer source reports it fired.
    ///
    /// Returns `false` for any other key.
    pub fn fired(&mut self, key: TimerKey) -> bool {
        if self.armed == Some(key) {
            self.armed = None;
            true
        } else {
            false
        }
    }
}
