//! Deferred work parked in the feed's timer queue.
use crate::{auto_advance::Boundary, clock::TimerQueue};

/// A unit of deferred work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedTask {
    /// The in-flight load resolves and the next item is appended.
    CompleteLoad,
    /// The debounced bottom-proximity check of the vertical trigger.
    VerticalCheck,
    /// The nested-scroll decision, re-run after a redirected wheel event.
    WheelSettle,
    /// A boundary auto-advance, valid only while the count still equals
    /// `expected_count`.
    Boundary {
        /// Which boundary scheduled it.
        boundary: Boundary,
        /// The item count that justified it.
        expected_count: usize,
    },
}

/// The timer queue every feed component schedules into.
pub type FeedTimers = TimerQueue<FeedTask>;
