//! Injectable time and a deterministic one-shot timer source.
//!
//! The feed never reads the wall clock on its own. Hosts hand it a `now`
//! (a [`Duration`] since an arbitrary epoch) with every event, usually from a
//! [`Clock`]. Deferred work (load completion, debounced scroll checks, wheel
//! settle checks, boundary auto-advance) is parked in a [`TimerQueue`] and
//! fired when the host advances time past its deadline.
use std::time::{Duration, Instant};

use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// Handle to a scheduled timer.
    pub struct TimerKey;
}

/// Source of the current time.
pub trait Clock {
    /// Returns the current time as an offset from the clock's epoch.
    fn now(&self) -> Duration;
}

/// Wall clock backed by [`Instant`]; the epoch is the moment of creation.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Creates a clock whose epoch is now.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Hand-driven clock for tests and simulations. It never runs backwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManualClock {
    now: Duration,
}

impl ManualClock {
    /// Creates a clock at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the clock forward by `by`.
    pub fn advance(&mut self, by: Duration) -> Duration {
        self.now = self.now.saturating_add(by);
        self.now
    }

    /// Moves the clock to `now`. Earlier values are ignored.
    pub fn set(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now
    }
}

/// Capability to arm and disarm one-shot timers.
pub trait TimerSource<T> {
    /// Schedules `task` to fire at `deadline`.
    fn schedule(&mut self, deadline: Duration, task: T) -> TimerKey;

    /// Cancels a pending timer. Returns `false` if it already fired or was
    /// cancelled before.
    fn cancel(&mut self, key: TimerKey) -> bool;
}

#[derive(Debug, Clone)]
struct TimerEntry<T> {
    deadline: Duration,
    seq: u64,
    task: T,
}

/// Deterministic one-shot timer queue.
///
/// Due timers pop in `(deadline, scheduling order)` order, so two timers with
/// the same deadline fire in the order they were scheduled.
#[derive(Debug, Clone)]
pub struct TimerQueue<T> {
    entries: SlotMap<TimerKey, TimerEntry<T>>,
    next_seq: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self {
            entries: SlotMap::with_key(),
            next_seq: 0,
        }
    }

    /// Returns whether `key` is still waiting to fire.
    pub fn is_pending(&self, key: TimerKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Earliest deadline among pending timers.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.earliest().map(|(_, entry)| entry.deadline)
    }

    /// Removes and returns the earliest timer whose deadline is at or before
    /// `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<(TimerKey, T)> {
        let (key, deadline) = self
            .earliest()
            .map(|(key, entry)| (key, entry.deadline))?;
        if deadline > now {
            return None;
        }
        self.entries.remove(key).map(|entry| (key, entry.task))
    }

    /// Number of pending timers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when nothing is scheduled.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every pending timer.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn earliest(&self) -> Option<(TimerKey, &TimerEntry<T>)> {
        self.entries
            .iter()
            .min_by_key(|(_, entry)| (entry.deadline, entry.seq))
    }
}

impl<T> TimerSource<T> for TimerQueue<T> {
    fn schedule(&mut self, deadline: Duration, task: T) -> TimerKey {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.entries.insert(TimerEntry {
            deadline,
            seq,
            task,
        })
    }

    fn cancel(&mut self, key: TimerKey) -> bool {
        self.entries.remove(key).is_some()
    }
}
