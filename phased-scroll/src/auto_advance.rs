//! Loads driven by the item count alone, independent of scroll position.
//!
//! Three boundaries exist: mounting an empty feed, exhausting the initial
//! vertical phase and exhausting the horizontal phase. Each fires at most
//! once per feed.
use std::{fmt, time::Duration};

use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::{
    clock::{TimerKey, TimerSource},
    phase::{HORIZONTAL_END, INITIAL_VERTICAL_END, Phase},
    task::{FeedTask, FeedTimers},
    trigger::TriggerContext,
};

/// A count boundary that advances the feed on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Boundary {
    /// The feed mounted with no items.
    Mount,
    /// The initial vertical phase is full; seeds the first horizontal item.
    EnterHorizontal,
    /// The horizontal phase is full; seeds the first final vertical item.
    ExitHorizontal,
}

impl Boundary {
    fn slot(self) -> usize {
        match self {
            Self::Mount => 0,
            Self::EnterHorizontal => 1,
            Self::ExitHorizontal => 2,
        }
    }

    /// Stable kebab-case name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mount => "mount",
            Self::EnterHorizontal => "enter-horizontal",
            Self::ExitHorizontal => "exit-horizontal",
        }
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Schedules the boundary loads and guards them against re-firing.
#[derive(Debug, Clone)]
pub struct BoundaryAutoAdvance {
    enter_delay: Duration,
    fired: [bool; 3],
    pending: SmallVec<[(Boundary, TimerKey); 2]>,
}

impl BoundaryAutoAdvance {
    /// Creates the guard. `enter_delay` is the delay of the
    /// [`Boundary::EnterHorizontal`] load.
    pub fn new(enter_delay: Duration) -> Self {
        Self {
            enter_delay,
            fired: [false; 3],
            pending: SmallVec::new(),
        }
    }

    /// Whether `boundary` has already been claimed.
    pub fn has_fired(&self, boundary: Boundary) -> bool {
        self.fired[boundary.slot()]
    }

    /// Number of scheduled boundary loads that have not fired yet.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Claims `boundary`. Returns `false` if it was claimed before.
    fn claim(&mut self, boundary: Boundary) -> bool {
        let slot = &mut self.fired[boundary.slot()];
        !std::mem::replace(slot, true)
    }

    /// Seeds the first item when the feed mounts empty.
    pub fn on_mount(&mut self, ctx: &mut TriggerContext<'_>) {
        if !self.claim(Boundary::Mount) {
            return;
        }
        if ctx.count() == 0 {
            debug!(boundary = %Boundary::Mount, "auto-advance");
            ctx.request_next();
        }
    }

    /// Reacts to a new item count. `exit_delay` is the horizontal strategy's
    /// exit auto-advance, if it has one.
    pub fn on_count_changed(&mut self, ctx: &mut TriggerContext<'_>, exit_delay: Option<Duration>) {
        let count = ctx.count();
        if count == INITIAL_VERTICAL_END && self.claim(Boundary::EnterHorizontal) {
            self.schedule(ctx, Boundary::EnterHorizontal, self.enter_delay);
        }
        if count == HORIZONTAL_END
            && ctx.phase == Phase::Horizontal
            && let Some(delay) = exit_delay
            && self.claim(Boundary::ExitHorizontal)
        {
            self.schedule(ctx, Boundary::ExitHorizontal, delay);
        }
    }

    fn schedule(&mut self, ctx: &mut TriggerContext<'_>, boundary: Boundary, delay: Duration) {
        let expected_count = ctx.count();
        let key = ctx.schedule(
            delay,
            FeedTask::Boundary {
                boundary,
                expected_count,
            },
        );
        self.pending.push((boundary, key));
        trace!(%boundary, ?delay, expected_count, "auto-advance scheduled");
    }

    /// Handles a fired boundary timer. Returns `true` if the key was one of
    /// this guard's timers.
    ///
    /// The load is dropped when the count moved on since scheduling.
    pub fn on_timer(
        &mut self,
        ctx: &mut TriggerContext<'_>,
        key: TimerKey,
        expected_count: usize,
    ) -> bool {
        let Some(index) = self.pending.iter().position(|(_, pending)| *pending == key) else {
            return false;
        };
        let (boundary, _) = self.pending.swap_remove(index);
        if ctx.count() != expected_count {
            trace!(%boundary, expected_count, count = ctx.count(), "auto-advance dropped");
            return true;
        }
        debug!(%boundary, "auto-advance");
        ctx.request_next();
        true
    }

    /// Cancels every scheduled boundary load. Claimed boundaries stay claimed.
    pub fn cancel(&mut self, timers: &mut FeedTimers) {
        for (_, key) in self.pending.drain(..) {
            timers.cancel(key);
        }
    }
}
